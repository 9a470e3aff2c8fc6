pub mod cancel_job;
pub mod create_compilation;
pub mod create_project;
pub mod delete_file;
pub mod delete_project;
pub mod errors;
pub mod get_compilation;
pub mod get_file;
pub mod get_job_status;
pub mod get_project;
pub mod list_files;
pub mod list_moments;
pub mod list_projects;
pub mod lookup_user;
pub mod queue_processing_job;
pub mod respond_to_invitation;
pub mod search_moments;
pub mod share_project;
pub mod track_search_click;
pub mod update_project;
pub mod upload_file;

pub use cancel_job::CancelJobUseCase;
pub use create_compilation::CreateCompilationUseCase;
pub use create_project::CreateProjectUseCase;
pub use delete_file::DeleteFileUseCase;
pub use delete_project::DeleteProjectUseCase;
pub use errors::*;
pub use get_compilation::GetCompilationUseCase;
pub use get_file::GetFileUseCase;
pub use get_job_status::GetJobStatusUseCase;
pub use get_project::GetProjectUseCase;
pub use list_files::ListFilesUseCase;
pub use list_moments::ListMomentsUseCase;
pub use list_projects::ListProjectsUseCase;
pub use lookup_user::LookupUserUseCase;
pub use queue_processing_job::QueueProcessingJobUseCase;
pub use respond_to_invitation::RespondToInvitationUseCase;
pub use search_moments::SearchMomentsUseCase;
pub use share_project::ShareProjectUseCase;
pub use track_search_click::TrackSearchClickUseCase;
pub use update_project::UpdateProjectUseCase;
pub use upload_file::UploadFileUseCase;
