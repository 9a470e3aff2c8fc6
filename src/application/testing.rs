//! In-memory implementations of the repository and port traits for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use pgvector::Vector;
use serde_json::json;
use uuid::Uuid;

use crate::application::ports::email_sender::{EmailError, EmailMessage, EmailSender};
use crate::application::ports::embedding_provider::{
    EmbeddingProvider, EmbeddingProviderError, EmbeddingResponse,
};
use crate::application::ports::file_storage::{FileStorage, FileStorageError, SignedUrl, StoredFile};
use crate::application::ports::job_queue::{JobQueue, JobQueueError};
use crate::application::ports::media_analysis::{
    Analyzed, MediaAnalysisError, MediaAnalysisProvider, TranscriptionState,
};
use crate::application::ports::media_transcoder::{
    ClipSpec, MediaTranscoder, TranscodeState, TranscoderError,
};
use crate::application::ports::search_cache::{SearchCache, SearchCacheKey};
use crate::application::services::search_service::SearchHit;
use crate::domain::entities::{
    AiAnalysis, AnalysisType, Compilation, CompilationMoment, File, Invitation, InvitationStatus,
    ProcessingJob, Project, SearchQuery, SearchResult, User, VideoMoment,
};
use crate::domain::repositories::{
    AnalysisRepository, CompilationRepository, FileRepository, InvitationRepository,
    JobRepository, MomentFilter, MomentRepository, ProjectRepository, RepositoryError,
    ScoredMoment, SearchRepository, UserRepository,
};
use crate::domain::services::cosine_similarity;
use crate::domain::value_objects::{
    DetectedFace, DetectedLabel, FileHash, TranscriptSegment,
};

pub fn sample_file(project_id: Uuid) -> File {
    let id = Uuid::new_v4();
    File::new(
        id,
        project_id,
        "ceremony.mp4".to_string(),
        format!("uploads/{}", id),
        Some("video/mp4".to_string()),
        1024,
        FileHash::of(id.as_bytes()),
    )
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<Uuid, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn save(&self, user: &User) -> Result<(), RepositoryError> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.email() == user.email() && u.id() != user.id()) {
            return Err(RepositoryError::DuplicateError(user.email().to_string()));
        }
        users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let email = email.trim().to_lowercase();
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email() == email)
            .cloned())
    }
}

#[derive(Default)]
pub struct InMemoryInvitationRepository {
    invitations: Mutex<HashMap<Uuid, Invitation>>,
}

impl InMemoryInvitationRepository {
    pub fn all(&self) -> Vec<Invitation> {
        self.invitations.lock().unwrap().values().cloned().collect()
    }
}

#[async_trait]
impl InvitationRepository for InMemoryInvitationRepository {
    async fn save(&self, invitation: &Invitation) -> Result<(), RepositoryError> {
        self.invitations
            .lock()
            .unwrap()
            .insert(invitation.id(), invitation.clone());
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Invitation>, RepositoryError> {
        Ok(self
            .invitations
            .lock()
            .unwrap()
            .values()
            .find(|i| i.token() == token)
            .cloned())
    }

    async fn find_by_project(&self, project_id: Uuid) -> Result<Vec<Invitation>, RepositoryError> {
        Ok(self
            .invitations
            .lock()
            .unwrap()
            .values()
            .filter(|i| i.project_id() == project_id)
            .cloned()
            .collect())
    }

    async fn update(&self, invitation: &Invitation) -> Result<(), RepositoryError> {
        let mut invitations = self.invitations.lock().unwrap();
        if !invitations.contains_key(&invitation.id()) {
            return Err(RepositoryError::NotFound(invitation.id()));
        }
        invitations.insert(invitation.id(), invitation.clone());
        Ok(())
    }

    async fn has_accepted(&self, project_id: Uuid, user_id: Uuid) -> Result<bool, RepositoryError> {
        Ok(self
            .invitations
            .lock()
            .unwrap()
            .values()
            .any(|i| i.project_id() == project_id && i.grants_access_to(user_id)))
    }
}

#[derive(Default)]
pub struct InMemoryProjectRepository {
    projects: Mutex<HashMap<Uuid, Project>>,
    invitations: Option<std::sync::Arc<InMemoryInvitationRepository>>,
}

impl InMemoryProjectRepository {
    /// Resolves shared projects through accepted invitations.
    pub fn with_invitations(invitations: std::sync::Arc<InMemoryInvitationRepository>) -> Self {
        Self {
            projects: Mutex::new(HashMap::new()),
            invitations: Some(invitations),
        }
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn save(&self, project: &Project) -> Result<(), RepositoryError> {
        self.projects
            .lock()
            .unwrap()
            .insert(project.id(), project.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>, RepositoryError> {
        Ok(self.projects.lock().unwrap().get(&id).cloned())
    }

    async fn find_accessible(&self, user_id: Uuid) -> Result<Vec<Project>, RepositoryError> {
        let shared: Vec<Uuid> = self
            .invitations
            .as_ref()
            .map(|inv| {
                inv.all()
                    .into_iter()
                    .filter(|i| i.grants_access_to(user_id))
                    .map(|i| i.project_id())
                    .collect()
            })
            .unwrap_or_default();

        let mut projects: Vec<Project> = self
            .projects
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.is_owned_by(user_id) || shared.contains(&p.id()))
            .cloned()
            .collect();
        projects.sort_by_key(|p| std::cmp::Reverse(p.created_at()));
        Ok(projects)
    }

    async fn update(&self, project: &Project) -> Result<(), RepositoryError> {
        let mut projects = self.projects.lock().unwrap();
        if !projects.contains_key(&project.id()) {
            return Err(RepositoryError::NotFound(project.id()));
        }
        projects.insert(project.id(), project.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        Ok(self.projects.lock().unwrap().remove(&id).is_some())
    }
}

#[derive(Default)]
pub struct InMemoryFileRepository {
    files: Mutex<HashMap<Uuid, File>>,
}

#[async_trait]
impl FileRepository for InMemoryFileRepository {
    async fn save(&self, file: &File) -> Result<(), RepositoryError> {
        self.files.lock().unwrap().insert(file.id(), file.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<File>, RepositoryError> {
        Ok(self.files.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_hash(
        &self,
        project_id: Uuid,
        hash: &FileHash,
    ) -> Result<Option<File>, RepositoryError> {
        Ok(self
            .files
            .lock()
            .unwrap()
            .values()
            .find(|f| f.project_id() == project_id && f.file_hash() == hash)
            .cloned())
    }

    async fn find_by_project(&self, project_id: Uuid) -> Result<Vec<File>, RepositoryError> {
        let mut files: Vec<File> = self
            .files
            .lock()
            .unwrap()
            .values()
            .filter(|f| f.project_id() == project_id)
            .cloned()
            .collect();
        files.sort_by_key(|f| std::cmp::Reverse(f.created_at()));
        Ok(files)
    }

    async fn update(&self, file: &File) -> Result<(), RepositoryError> {
        let mut files = self.files.lock().unwrap();
        if !files.contains_key(&file.id()) {
            return Err(RepositoryError::NotFound(file.id()));
        }
        files.insert(file.id(), file.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        Ok(self.files.lock().unwrap().remove(&id).is_some())
    }
}

#[derive(Default)]
pub struct InMemoryJobRepository {
    jobs: Mutex<HashMap<Uuid, ProcessingJob>>,
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn save(&self, job: &ProcessingJob) -> Result<(), RepositoryError> {
        self.jobs.lock().unwrap().insert(job.id(), job.clone());
        Ok(())
    }

    async fn find_by_id(&self, job_id: Uuid) -> Result<Option<ProcessingJob>, RepositoryError> {
        Ok(self.jobs.lock().unwrap().get(&job_id).cloned())
    }

    async fn find_by_file_id(&self, file_id: Uuid) -> Result<Vec<ProcessingJob>, RepositoryError> {
        let mut jobs: Vec<ProcessingJob> = self
            .jobs
            .lock()
            .unwrap()
            .values()
            .filter(|j| j.file_id() == file_id)
            .cloned()
            .collect();
        jobs.sort_by_key(|j| std::cmp::Reverse(j.created_at()));
        Ok(jobs)
    }

    async fn update(&self, job: &ProcessingJob) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.lock().unwrap();
        if !jobs.contains_key(&job.id()) {
            return Err(RepositoryError::NotFound(job.id()));
        }
        jobs.insert(job.id(), job.clone());
        Ok(())
    }

    async fn update_unless_cancelled(&self, job: &ProcessingJob) -> Result<bool, RepositoryError> {
        let mut jobs = self.jobs.lock().unwrap();
        match jobs.get(&job.id()) {
            None => Err(RepositoryError::NotFound(job.id())),
            Some(stored) if stored.status().is_cancelled() => Ok(false),
            Some(_) => {
                jobs.insert(job.id(), job.clone());
                Ok(true)
            }
        }
    }
}

#[derive(Default)]
pub struct InMemoryMomentRepository {
    moments: Mutex<Vec<VideoMoment>>,
}

impl InMemoryMomentRepository {
    pub fn insert(&self, moment: VideoMoment) {
        self.moments.lock().unwrap().push(moment);
    }

    pub fn count_for_file(&self, file_id: Uuid) -> usize {
        self.moments
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.file_id() == file_id)
            .count()
    }
}

#[async_trait]
impl MomentRepository for InMemoryMomentRepository {
    async fn replace_for_file(
        &self,
        file_id: Uuid,
        moments: &[VideoMoment],
    ) -> Result<usize, RepositoryError> {
        let mut stored = self.moments.lock().unwrap();
        stored.retain(|m| m.file_id() != file_id);
        stored.extend(moments.iter().cloned());
        Ok(moments.len())
    }

    async fn find_by_project(
        &self,
        project_id: Uuid,
        filter: &MomentFilter,
    ) -> Result<(Vec<VideoMoment>, i64), RepositoryError> {
        let mut matching: Vec<VideoMoment> = self
            .moments
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.project_id() == project_id)
            .filter(|m| filter.kind.is_none_or(|k| m.kind() == k))
            .filter(|m| filter.file_id.is_none_or(|f| m.file_id() == f))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.start_time_seconds().total_cmp(&b.start_time_seconds()));
        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(filter.offset.max(0) as usize)
            .take(filter.limit.max(0) as usize)
            .collect();
        Ok((page, total))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<VideoMoment>, RepositoryError> {
        Ok(self
            .moments
            .lock()
            .unwrap()
            .iter()
            .filter(|m| ids.contains(&m.id()))
            .cloned()
            .collect())
    }

    async fn search_similar(
        &self,
        project_id: Uuid,
        query_embedding: &Vector,
        threshold: f64,
        limit: i64,
    ) -> Result<Vec<ScoredMoment>, RepositoryError> {
        let mut scored: Vec<ScoredMoment> = self
            .moments
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.project_id() == project_id)
            .filter_map(|m| {
                let embedding = m.embedding()?;
                let similarity = cosine_similarity(query_embedding.as_slice(), embedding.as_slice());
                (similarity >= threshold).then(|| ScoredMoment {
                    moment: m.clone(),
                    similarity,
                })
            })
            .collect();
        scored.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        scored.truncate(limit.max(0) as usize);
        Ok(scored)
    }

    async fn search_text(
        &self,
        project_id: Uuid,
        query: &str,
    ) -> Result<Vec<VideoMoment>, RepositoryError> {
        let needle = query.to_lowercase();
        Ok(self
            .moments
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.project_id() == project_id)
            .filter(|m| {
                m.description().to_lowercase().contains(&needle)
                    || m.transcript()
                        .is_some_and(|t| t.to_lowercase().contains(&needle))
                    || m.tags().iter().any(|t| t.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryAnalysisRepository {
    analyses: Mutex<Vec<AiAnalysis>>,
}

#[async_trait]
impl AnalysisRepository for InMemoryAnalysisRepository {
    async fn save(&self, analysis: &AiAnalysis) -> Result<(), RepositoryError> {
        self.analyses.lock().unwrap().push(analysis.clone());
        Ok(())
    }

    async fn find_latest(
        &self,
        file_id: Uuid,
        analysis_type: AnalysisType,
    ) -> Result<Option<AiAnalysis>, RepositoryError> {
        Ok(self
            .analyses
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|a| a.file_id() == file_id && a.analysis_type() == analysis_type)
            .cloned())
    }
}

#[derive(Default)]
pub struct InMemorySearchRepository {
    queries: Mutex<HashMap<Uuid, SearchQuery>>,
    results: Mutex<Vec<SearchResult>>,
}

impl InMemorySearchRepository {
    pub fn results(&self) -> Vec<SearchResult> {
        let mut results = self.results.lock().unwrap().clone();
        results.sort_by_key(|r| r.rank());
        results
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl SearchRepository for InMemorySearchRepository {
    async fn record(
        &self,
        query: &SearchQuery,
        results: &[SearchResult],
    ) -> Result<(), RepositoryError> {
        self.queries.lock().unwrap().insert(query.id(), query.clone());
        self.results.lock().unwrap().extend(results.iter().cloned());
        Ok(())
    }

    async fn find_query(&self, id: Uuid) -> Result<Option<SearchQuery>, RepositoryError> {
        Ok(self.queries.lock().unwrap().get(&id).cloned())
    }

    async fn find_result(&self, id: Uuid) -> Result<Option<SearchResult>, RepositoryError> {
        Ok(self
            .results
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id() == id)
            .cloned())
    }

    async fn update_result(&self, result: &SearchResult) -> Result<(), RepositoryError> {
        let mut results = self.results.lock().unwrap();
        let slot = results
            .iter_mut()
            .find(|r| r.id() == result.id())
            .ok_or(RepositoryError::NotFound(result.id()))?;
        *slot = result.clone();
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryCompilationRepository {
    compilations: Mutex<HashMap<Uuid, Compilation>>,
    moments: Mutex<Vec<CompilationMoment>>,
}

#[async_trait]
impl CompilationRepository for InMemoryCompilationRepository {
    async fn save(
        &self,
        compilation: &Compilation,
        moments: &[CompilationMoment],
    ) -> Result<(), RepositoryError> {
        self.compilations
            .lock()
            .unwrap()
            .insert(compilation.id(), compilation.clone());
        self.moments.lock().unwrap().extend(moments.iter().cloned());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Compilation>, RepositoryError> {
        Ok(self.compilations.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_project(&self, project_id: Uuid) -> Result<Vec<Compilation>, RepositoryError> {
        Ok(self
            .compilations
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.project_id() == project_id)
            .cloned()
            .collect())
    }

    async fn find_moments(
        &self,
        compilation_id: Uuid,
    ) -> Result<Vec<CompilationMoment>, RepositoryError> {
        let mut moments: Vec<CompilationMoment> = self
            .moments
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.compilation_id() == compilation_id)
            .cloned()
            .collect();
        moments.sort_by_key(|m| m.position());
        Ok(moments)
    }

    async fn update(&self, compilation: &Compilation) -> Result<(), RepositoryError> {
        self.compilations
            .lock()
            .unwrap()
            .insert(compilation.id(), compilation.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemorySearchCache {
    entries: Mutex<HashMap<SearchCacheKey, Vec<SearchHit>>>,
}

impl SearchCache for InMemorySearchCache {
    fn get(&self, key: &SearchCacheKey) -> Option<Vec<SearchHit>> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn insert(&self, key: SearchCacheKey, hits: Vec<SearchHit>) {
        self.entries.lock().unwrap().insert(key, hits);
    }

    fn invalidate_project(&self, project_id: Uuid) {
        self.entries
            .lock()
            .unwrap()
            .retain(|key, _| key.project_id != project_id);
    }
}

pub const TEST_SIGNATURE: &str = "test-signature";

#[derive(Default)]
pub struct InMemoryFileStorage {
    files: Mutex<HashMap<Uuid, Vec<u8>>>,
}

impl InMemoryFileStorage {
    pub fn contains(&self, file_id: Uuid) -> bool {
        self.files.lock().unwrap().contains_key(&file_id)
    }

    pub fn stored(&self, file_id: Uuid) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(&file_id).cloned()
    }
}

#[async_trait]
impl FileStorage for InMemoryFileStorage {
    async fn store_file(&self, file_id: Uuid, data: &[u8]) -> Result<StoredFile, FileStorageError> {
        self.files.lock().unwrap().insert(file_id, data.to_vec());
        Ok(StoredFile {
            id: file_id,
            path: format!("memory/{}", file_id),
            size: data.len() as u64,
        })
    }

    async fn open_file(&self, file_id: Uuid) -> Result<(tokio::fs::File, u64), FileStorageError> {
        Err(FileStorageError::IoError(format!(
            "in-memory file {} cannot be streamed",
            file_id
        )))
    }

    async fn delete_file(&self, file_id: Uuid) -> Result<bool, FileStorageError> {
        Ok(self.files.lock().unwrap().remove(&file_id).is_some())
    }

    fn signed_url(&self, file_id: Uuid, ttl_secs: i64) -> SignedUrl {
        let expires_at = Utc::now() + Duration::seconds(ttl_secs);
        SignedUrl {
            url: format!(
                "http://localhost:3000/media/{}?expires={}&signature={}",
                file_id,
                expires_at.timestamp(),
                TEST_SIGNATURE
            ),
            expires_at,
        }
    }

    fn verify_signed_url(
        &self,
        _file_id: Uuid,
        expires: i64,
        signature: &str,
    ) -> Result<(), FileStorageError> {
        if signature == TEST_SIGNATURE && expires > Utc::now().timestamp() {
            Ok(())
        } else {
            Err(FileStorageError::InvalidSignature)
        }
    }
}

#[derive(Default)]
pub struct InMemoryJobQueue {
    jobs: Mutex<Vec<ProcessingJob>>,
}

impl InMemoryJobQueue {
    pub fn queued_ids(&self) -> Vec<Uuid> {
        self.jobs.lock().unwrap().iter().map(|j| j.id()).collect()
    }
}

#[async_trait]
impl JobQueue for InMemoryJobQueue {
    async fn enqueue(&self, job: ProcessingJob) -> Result<(), JobQueueError> {
        self.jobs.lock().unwrap().push(job);
        Ok(())
    }

    async fn size(&self) -> Result<usize, JobQueueError> {
        Ok(self.jobs.lock().unwrap().len())
    }

    async fn remove_job(&self, job_id: Uuid) -> Result<bool, JobQueueError> {
        let mut jobs = self.jobs.lock().unwrap();
        let before = jobs.len();
        jobs.retain(|j| j.id() != job_id);
        Ok(jobs.len() != before)
    }
}

pub struct FixedEmbeddingProvider {
    vector: Vec<f32>,
}

impl FixedEmbeddingProvider {
    pub fn new(vector: Vec<f32>) -> Self {
        Self { vector }
    }
}

#[async_trait]
impl EmbeddingProvider for FixedEmbeddingProvider {
    async fn generate_embedding(&self, _text: &str) -> Result<EmbeddingResponse, EmbeddingProviderError> {
        Ok(EmbeddingResponse {
            embedding: Vector::from(self.vector.clone()),
            model_name: "fixed".to_string(),
        })
    }

    fn model_info(&self) -> String {
        "fixed".to_string()
    }

    fn embedding_dimension(&self) -> usize {
        self.vector.len()
    }
}

/// Scripted analysis service. Transcriptions report "in progress" once
/// before settling.
pub struct FakeMediaAnalysis {
    transcript: Result<Vec<TranscriptSegment>, String>,
    labels: Vec<DetectedLabel>,
    faces: Vec<DetectedFace>,
    polls: Mutex<u32>,
}

impl FakeMediaAnalysis {
    pub fn wedding() -> Self {
        Self {
            transcript: Ok(vec![
                TranscriptSegment {
                    start_time: 2.0,
                    end_time: 9.0,
                    text: "I promise to love you every day".to_string(),
                    confidence: 0.95,
                    speaker: Some("groom".to_string()),
                },
                TranscriptSegment {
                    start_time: 11.0,
                    end_time: 18.5,
                    text: "You may now kiss the bride".to_string(),
                    confidence: 0.9,
                    speaker: Some("officiant".to_string()),
                },
            ]),
            labels: vec![DetectedLabel {
                name: "Bouquet".to_string(),
                confidence: 91.0,
                start_time: Some(3.0),
                end_time: Some(8.0),
            }],
            faces: vec![DetectedFace {
                timestamp: 14.0,
                confidence: 0.88,
                bounding_box: None,
                emotions: vec!["happy".to_string()],
            }],
            polls: Mutex::new(0),
        }
    }

    pub fn failing_transcription(message: &str) -> Self {
        Self {
            transcript: Err(message.to_string()),
            ..Self::wedding()
        }
    }
}

#[async_trait]
impl MediaAnalysisProvider for FakeMediaAnalysis {
    async fn start_transcription(
        &self,
        _media_url: &str,
    ) -> Result<Analyzed<String>, MediaAnalysisError> {
        Ok(Analyzed {
            value: "tx-1".to_string(),
            raw: json!({ "jobId": "tx-1" }),
        })
    }

    async fn get_transcription(
        &self,
        _job_id: &str,
    ) -> Result<Analyzed<TranscriptionState>, MediaAnalysisError> {
        let mut polls = self.polls.lock().unwrap();
        *polls += 1;
        if *polls == 1 {
            return Ok(Analyzed {
                value: TranscriptionState::InProgress,
                raw: json!({ "status": "in_progress" }),
            });
        }
        Ok(match &self.transcript {
            Ok(segments) => Analyzed {
                value: TranscriptionState::Completed(segments.clone()),
                raw: json!({ "status": "completed", "segments": segments }),
            },
            Err(message) => Analyzed {
                value: TranscriptionState::Failed(message.clone()),
                raw: json!({ "status": "failed", "error": message }),
            },
        })
    }

    async fn detect_labels(
        &self,
        _media_url: &str,
    ) -> Result<Analyzed<Vec<DetectedLabel>>, MediaAnalysisError> {
        Ok(Analyzed {
            value: self.labels.clone(),
            raw: json!({ "labels": self.labels }),
        })
    }

    async fn detect_faces(
        &self,
        _media_url: &str,
    ) -> Result<Analyzed<Vec<DetectedFace>>, MediaAnalysisError> {
        Ok(Analyzed {
            value: self.faces.clone(),
            raw: json!({ "faces": self.faces }),
        })
    }
}

pub struct FakeTranscoder {
    job_id: String,
    clips: Mutex<usize>,
    output: Mutex<Option<String>>,
}

impl FakeTranscoder {
    pub fn new(job_id: &str) -> Self {
        Self {
            job_id: job_id.to_string(),
            clips: Mutex::new(0),
            output: Mutex::new(None),
        }
    }

    pub fn submitted_clips(&self) -> usize {
        *self.clips.lock().unwrap()
    }

    pub fn finish(&self, output_url: &str) {
        *self.output.lock().unwrap() = Some(output_url.to_string());
    }
}

#[async_trait]
impl MediaTranscoder for FakeTranscoder {
    async fn submit(&self, _name: &str, clips: &[ClipSpec]) -> Result<String, TranscoderError> {
        *self.clips.lock().unwrap() += clips.len();
        Ok(self.job_id.clone())
    }

    async fn status(&self, _job_id: &str) -> Result<TranscodeState, TranscoderError> {
        Ok(match self.output.lock().unwrap().clone() {
            Some(output_url) => TranscodeState::Completed { output_url },
            None => TranscodeState::InProgress,
        })
    }
}

#[derive(Default)]
pub struct RecordingEmailSender {
    sent: Mutex<Vec<EmailMessage>>,
}

impl RecordingEmailSender {
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// An invitation created `days_ago` days in the past.
pub fn aged_invitation(project_id: Uuid, invited_by: Uuid, days_ago: i64) -> Invitation {
    let fresh = Invitation::new(project_id, "couple@example.com", invited_by, None)
        .expect("valid invitation");
    Invitation::from_database(
        fresh.id(),
        project_id,
        fresh.email().to_string(),
        fresh.token().to_string(),
        InvitationStatus::Sent,
        invited_by,
        None,
        None,
        Utc::now() - Duration::days(days_ago),
        None,
    )
}
