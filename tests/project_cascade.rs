//! Runs against a real Postgres. Skipped unless DATABASE_URL is set.

use memory_finder::config::DatabaseConfig;
use memory_finder::domain::entities::{
    File, Invitation, MomentDraft, ProcessingJob, Project, User, UserRole, VideoMoment,
};
use memory_finder::domain::repositories::{
    FileRepository, InvitationRepository, JobRepository, MomentFilter, MomentRepository,
    ProjectRepository, UserRepository,
};
use memory_finder::domain::value_objects::{FileHash, MomentKind};
use memory_finder::infrastructure::database::repositories::{
    PostgresFileRepository, PostgresInvitationRepository, PostgresJobRepository,
    PostgresMomentRepository, PostgresProjectRepository, PostgresUserRepository,
};
use memory_finder::infrastructure::database::{DbPool, create_connection_pool, run_migrations};
use uuid::Uuid;

fn pool() -> Option<DbPool> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let pool = create_connection_pool(&DatabaseConfig {
        url,
        pool_max_size: 2,
    })
    .expect("connect to test database");
    run_migrations(&pool).expect("run migrations");
    Some(pool)
}

fn draft(file: &File) -> MomentDraft {
    MomentDraft {
        file_id: file.id(),
        project_id: file.project_id(),
        start_time_seconds: 0.0,
        end_time_seconds: 8.0,
        kind: MomentKind::Speech,
        description: "Vows at the altar".to_string(),
        transcript: Some("I promise to love you".to_string()),
        tags: vec!["vows".to_string()],
        confidence: 0.9,
        quality_score: 0.8,
        face_data: None,
        visual_data: None,
        speaker: None,
        thumbnail_path: None,
    }
}

#[tokio::test]
async fn deleting_project_removes_its_files_jobs_moments_and_invitations() {
    let Some(pool) = pool() else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    let users = PostgresUserRepository::new(pool.clone());
    let projects = PostgresProjectRepository::new(pool.clone());
    let files = PostgresFileRepository::new(pool.clone());
    let jobs = PostgresJobRepository::new(pool.clone());
    let moments = PostgresMomentRepository::new(pool.clone());
    let invitations = PostgresInvitationRepository::new(pool.clone());

    let owner = User::new(
        format!("owner-{}@example.com", Uuid::new_v4()),
        Some("Studio".to_string()),
        UserRole::Videographer,
    )
    .unwrap();
    users.save(&owner).await.unwrap();

    let project = Project::new(
        owner.id(),
        "Ada & Grace".to_string(),
        Some("Ada and Grace".to_string()),
        None,
        Some("Lakeside Chapel".to_string()),
    )
    .unwrap();
    projects.save(&project).await.unwrap();

    let file = File::new(
        Uuid::new_v4(),
        project.id(),
        "ceremony.mp4".to_string(),
        format!("{}/ceremony.mp4", project.id()),
        Some("video/mp4".to_string()),
        1024,
        FileHash::of(Uuid::new_v4().as_bytes()),
    );
    files.save(&file).await.unwrap();

    let job = ProcessingJob::new(file.id());
    jobs.save(&job).await.unwrap();

    let moment = VideoMoment::new(draft(&file), None, None).unwrap();
    assert_eq!(moments.replace_for_file(file.id(), &[moment]).await.unwrap(), 1);

    let invitation =
        Invitation::new(project.id(), "guest@example.com", owner.id(), None).unwrap();
    invitations.save(&invitation).await.unwrap();

    assert!(projects.delete(project.id()).await.unwrap());

    assert!(projects.find_by_id(project.id()).await.unwrap().is_none());
    assert!(files.find_by_id(file.id()).await.unwrap().is_none());
    assert!(jobs.find_by_id(job.id()).await.unwrap().is_none());
    let filter = MomentFilter {
        kind: None,
        file_id: None,
        offset: 0,
        limit: 10,
    };
    let (remaining, total) = moments.find_by_project(project.id(), &filter).await.unwrap();
    assert!(remaining.is_empty());
    assert_eq!(total, 0);
    assert!(
        invitations
            .find_by_token(invitation.token())
            .await
            .unwrap()
            .is_none()
    );

    assert!(!projects.delete(project.id()).await.unwrap());
}
