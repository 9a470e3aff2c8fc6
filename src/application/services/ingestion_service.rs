use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::application::ports::file_storage::FileStorage;
use crate::application::ports::media_analysis::{
    MediaAnalysisError, MediaAnalysisProvider, TranscriptionState,
};
use crate::application::ports::search_cache::SearchCache;
use crate::application::services::embedding_service::{EmbeddingService, EmbeddingServiceError};
use crate::config::IngestionConfig;
use crate::domain::entities::{AiAnalysis, AnalysisType, File, VideoMoment};
use crate::domain::repositories::{
    AnalysisRepository, FileRepository, MomentRepository, RepositoryError,
};
use crate::domain::services::sampling::{fixed_interval_windows, thumbnail_plan};
use crate::domain::services::segmentation::{SegmentationInput, build_moment_drafts};
use crate::domain::value_objects::{
    DetectedFace, DetectedLabel, Thumbnail, TimeRange, TranscriptSegment,
};

#[derive(Debug, thiserror::Error)]
pub enum IngestionError {
    #[error("File not found: {0}")]
    FileNotFound(Uuid),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),
    #[error("Transcription did not finish after {0} polls")]
    TranscriptionTimedOut(u32),
    #[error(transparent)]
    Analysis(#[from] MediaAnalysisError),
    #[error(transparent)]
    Embedding(#[from] EmbeddingServiceError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentReport {
    pub moments_created: usize,
    pub embeddings_generated: usize,
    pub fallback_embeddings: usize,
    pub thumbnails: usize,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShotWindow {
    start_time: f64,
    end_time: f64,
}

/// The analysis steps of one file, each usable on its own.
///
/// Every step stores what it produced as an `ai_analysis` row; segment
/// building reads the latest row of each kind back.
pub struct IngestionService {
    file_repository: Arc<dyn FileRepository>,
    analysis_repository: Arc<dyn AnalysisRepository>,
    moment_repository: Arc<dyn MomentRepository>,
    analysis_provider: Option<Arc<dyn MediaAnalysisProvider>>,
    file_storage: Arc<dyn FileStorage>,
    embedding_service: Arc<EmbeddingService>,
    search_cache: Arc<dyn SearchCache>,
    config: IngestionConfig,
    url_ttl_secs: i64,
}

impl IngestionService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        file_repository: Arc<dyn FileRepository>,
        analysis_repository: Arc<dyn AnalysisRepository>,
        moment_repository: Arc<dyn MomentRepository>,
        analysis_provider: Option<Arc<dyn MediaAnalysisProvider>>,
        file_storage: Arc<dyn FileStorage>,
        embedding_service: Arc<EmbeddingService>,
        search_cache: Arc<dyn SearchCache>,
        config: IngestionConfig,
        url_ttl_secs: i64,
    ) -> Self {
        Self {
            file_repository,
            analysis_repository,
            moment_repository,
            analysis_provider,
            file_storage,
            embedding_service,
            search_cache,
            config,
            url_ttl_secs,
        }
    }

    pub fn has_analysis_provider(&self) -> bool {
        self.analysis_provider.is_some()
    }

    pub async fn start_transcription(&self, file_id: Uuid) -> Result<String, IngestionError> {
        let file = self.load_file(file_id).await?;
        let provider = self.provider()?;

        let started = provider.start_transcription(&self.media_url(&file)).await?;
        self.record(file_id, AnalysisType::TranscriptionJob, started.raw)
            .await?;

        tracing::info!(%file_id, transcription_job = %started.value, "Transcription started");
        Ok(started.value)
    }

    pub async fn fetch_transcription(
        &self,
        file_id: Uuid,
        job_id: &str,
    ) -> Result<TranscriptionState, IngestionError> {
        self.load_file(file_id).await?;
        let provider = self.provider()?;

        let fetched = provider.get_transcription(job_id).await?;
        if matches!(fetched.value, TranscriptionState::Completed(_)) {
            self.record(file_id, AnalysisType::Transcription, fetched.raw)
                .await?;
        }
        Ok(fetched.value)
    }

    /// Polls a transcription until it settles or the poll budget runs out.
    pub async fn await_transcription(
        &self,
        file_id: Uuid,
        job_id: &str,
    ) -> Result<Vec<TranscriptSegment>, IngestionError> {
        let interval = Duration::from_secs(self.config.transcription_poll_secs);
        for attempt in 0..self.config.transcription_max_polls {
            match self.fetch_transcription(file_id, job_id).await? {
                TranscriptionState::Completed(segments) => return Ok(segments),
                TranscriptionState::Failed(message) => {
                    return Err(IngestionError::TranscriptionFailed(message));
                }
                TranscriptionState::InProgress => {
                    tracing::debug!(%file_id, attempt, "Transcription still running");
                    tokio::time::sleep(interval).await;
                }
            }
        }
        Err(IngestionError::TranscriptionTimedOut(
            self.config.transcription_max_polls,
        ))
    }

    pub async fn detect_labels(&self, file_id: Uuid) -> Result<Vec<DetectedLabel>, IngestionError> {
        let file = self.load_file(file_id).await?;
        let detected = self.provider()?.detect_labels(&self.media_url(&file)).await?;
        self.record(file_id, AnalysisType::Labels, detected.raw).await?;
        Ok(detected.value)
    }

    pub async fn detect_faces(&self, file_id: Uuid) -> Result<Vec<DetectedFace>, IngestionError> {
        let file = self.load_file(file_id).await?;
        let detected = self.provider()?.detect_faces(&self.media_url(&file)).await?;
        self.record(file_id, AnalysisType::Faces, detected.raw).await?;
        Ok(detected.value)
    }

    /// Fixed-interval shot boundaries. No shot detection model is involved.
    pub async fn plan_shots(
        &self,
        file_id: Uuid,
        duration: Option<f64>,
    ) -> Result<Vec<TimeRange>, IngestionError> {
        let mut file = self.load_file(file_id).await?;
        let duration = self.resolve_duration(&mut file, duration).await?;

        let interval = self.config.shot_interval_secs;
        let shots =
            fixed_interval_windows(duration, interval).map_err(IngestionError::ValidationError)?;
        let windows: Vec<ShotWindow> = shots
            .iter()
            .map(|s| ShotWindow {
                start_time: s.start(),
                end_time: s.end(),
            })
            .collect();

        self.record(
            file_id,
            AnalysisType::Shots,
            json!({ "intervalSeconds": interval, "durationSeconds": duration, "shots": windows }),
        )
        .await?;
        Ok(shots)
    }

    /// Names of the frames to extract, one every thumbnail interval.
    pub async fn plan_thumbnails(
        &self,
        file_id: Uuid,
        duration: Option<f64>,
    ) -> Result<Vec<Thumbnail>, IngestionError> {
        let mut file = self.load_file(file_id).await?;
        let duration = self.resolve_duration(&mut file, duration).await?;

        let interval = self.config.thumbnail_interval_secs;
        let thumbnails =
            thumbnail_plan(file_id, duration, interval).map_err(IngestionError::ValidationError)?;

        self.record(
            file_id,
            AnalysisType::Thumbnails,
            json!({ "intervalSeconds": interval, "thumbnails": thumbnails }),
        )
        .await?;
        Ok(thumbnails)
    }

    /// Builds moments from the stored analyses, embeds them one at a time,
    /// replaces the file's moments and marks the file completed.
    pub async fn build_segments(
        &self,
        file_id: Uuid,
        duration: Option<f64>,
    ) -> Result<SegmentReport, IngestionError> {
        let mut file = self.load_file(file_id).await?;
        let duration = self.resolve_duration(&mut file, duration).await?;

        let transcript: Vec<TranscriptSegment> =
            self.stored(file_id, AnalysisType::Transcription, "segments").await?;
        let labels: Vec<DetectedLabel> = self.stored(file_id, AnalysisType::Labels, "labels").await?;
        let faces: Vec<DetectedFace> = self.stored(file_id, AnalysisType::Faces, "faces").await?;

        let stored_shots: Vec<ShotWindow> =
            self.stored(file_id, AnalysisType::Shots, "shots").await?;
        let shots = if stored_shots.is_empty() {
            fixed_interval_windows(duration, self.config.shot_interval_secs)
                .map_err(IngestionError::ValidationError)?
        } else {
            stored_shots
                .into_iter()
                .filter_map(|w| TimeRange::new(w.start_time, w.end_time.min(duration)).ok())
                .collect()
        };

        let mut thumbnails: Vec<Thumbnail> =
            self.stored(file_id, AnalysisType::Thumbnails, "thumbnails").await?;
        if thumbnails.is_empty() {
            thumbnails = thumbnail_plan(file_id, duration, self.config.thumbnail_interval_secs)
                .map_err(IngestionError::ValidationError)?;
        }

        let drafts = build_moment_drafts(SegmentationInput {
            file_id,
            project_id: file.project_id(),
            duration,
            transcript: &transcript,
            labels: &labels,
            faces: &faces,
            shots: &shots,
            thumbnails: &thumbnails,
        });

        let mut report = SegmentReport {
            thumbnails: thumbnails.len(),
            ..SegmentReport::default()
        };
        let dimension = self.embedding_service.dimension();
        let mut moments = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let generated = self.embedding_service.generate(&draft.embedding_text()).await?;
            if generated.is_fallback() {
                report.fallback_embeddings += 1;
            } else {
                report.embeddings_generated += 1;
            }
            let moment = VideoMoment::new(draft, Some(generated.vector), Some(dimension))
                .map_err(IngestionError::ValidationError)?;
            moments.push(moment);
        }

        report.moments_created = self
            .moment_repository
            .replace_for_file(file_id, &moments)
            .await?;

        if !file.status().is_processing() {
            file.start_processing().map_err(IngestionError::ValidationError)?;
        }
        file.complete_processing()
            .map_err(IngestionError::ValidationError)?;
        self.file_repository.update(&file).await?;

        self.search_cache.invalidate_project(file.project_id());

        let summary = serde_json::to_value(report).unwrap_or(Value::Null);
        self.record(file_id, AnalysisType::Segments, summary).await?;

        tracing::info!(
            %file_id,
            moments = report.moments_created,
            fallback_embeddings = report.fallback_embeddings,
            "Segments persisted"
        );
        Ok(report)
    }

    /// Marks a file as being processed by the background pipeline.
    pub async fn begin_file(&self, file_id: Uuid) -> Result<File, IngestionError> {
        let mut file = self.load_file(file_id).await?;
        if !file.status().is_processing() {
            file.start_processing().map_err(IngestionError::ValidationError)?;
            self.file_repository.update(&file).await?;
        }
        Ok(file)
    }

    /// Records a pipeline failure on the file itself.
    pub async fn fail_file(&self, file_id: Uuid, error: &str) -> Result<(), IngestionError> {
        let mut file = self.load_file(file_id).await?;
        if file.status().is_processing() {
            file.fail_processing(error.to_string())
                .map_err(IngestionError::ValidationError)?;
            self.file_repository.update(&file).await?;
        }
        Ok(())
    }

    async fn load_file(&self, file_id: Uuid) -> Result<File, IngestionError> {
        self.file_repository
            .find_by_id(file_id)
            .await?
            .ok_or(IngestionError::FileNotFound(file_id))
    }

    fn provider(&self) -> Result<&Arc<dyn MediaAnalysisProvider>, IngestionError> {
        self.analysis_provider
            .as_ref()
            .ok_or(IngestionError::Analysis(MediaAnalysisError::NotConfigured))
    }

    fn media_url(&self, file: &File) -> String {
        self.file_storage
            .signed_url(file.id(), self.url_ttl_secs)
            .url
    }

    /// Duration from the caller, then the file record, then the latest
    /// timestamp any stored analysis mentions. A caller-supplied value is
    /// saved on the file.
    async fn resolve_duration(
        &self,
        file: &mut File,
        requested: Option<f64>,
    ) -> Result<f64, IngestionError> {
        if let Some(seconds) = requested {
            file.set_duration(seconds)
                .map_err(IngestionError::ValidationError)?;
            self.file_repository.update(file).await?;
            return Ok(seconds);
        }
        if let Some(seconds) = file.duration_seconds() {
            return Ok(seconds);
        }

        let transcript: Vec<TranscriptSegment> =
            self.stored(file.id(), AnalysisType::Transcription, "segments").await?;
        let labels: Vec<DetectedLabel> = self.stored(file.id(), AnalysisType::Labels, "labels").await?;
        let faces: Vec<DetectedFace> = self.stored(file.id(), AnalysisType::Faces, "faces").await?;

        let latest = transcript
            .iter()
            .map(|s| s.end_time)
            .chain(labels.iter().filter_map(|l| l.end_time))
            .chain(faces.iter().map(|f| f.timestamp))
            .filter(|t| t.is_finite())
            .fold(0.0_f64, f64::max);

        if latest > 0.0 {
            Ok(latest)
        } else {
            Err(IngestionError::ValidationError(
                "Video duration is unknown; pass durationSeconds".to_string(),
            ))
        }
    }

    async fn stored<T: DeserializeOwned>(
        &self,
        file_id: Uuid,
        analysis_type: AnalysisType,
        key: &str,
    ) -> Result<Vec<T>, IngestionError> {
        let Some(analysis) = self
            .analysis_repository
            .find_latest(file_id, analysis_type)
            .await?
        else {
            return Ok(Vec::new());
        };
        match analysis.raw_result().get(key) {
            Some(values) => serde_json::from_value(values.clone()).map_err(|e| {
                IngestionError::ValidationError(format!(
                    "Stored {} analysis is malformed: {}",
                    analysis_type.as_str(),
                    e
                ))
            }),
            None => Ok(Vec::new()),
        }
    }

    async fn record(
        &self,
        file_id: Uuid,
        analysis_type: AnalysisType,
        raw: Value,
    ) -> Result<(), IngestionError> {
        let analysis = AiAnalysis::new(file_id, analysis_type, raw);
        self.analysis_repository.save(&analysis).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::embedding_service::EmbeddingSettings;
    use crate::application::testing::{
        FakeMediaAnalysis, FixedEmbeddingProvider, InMemoryAnalysisRepository,
        InMemoryFileRepository, InMemoryFileStorage, InMemoryMomentRepository,
        InMemorySearchCache, sample_file,
    };
    use crate::config::{Config, FallbackPolicy};
    use crate::domain::repositories::MomentFilter;
    use crate::domain::value_objects::MomentKind;

    struct Fixture {
        service: IngestionService,
        files: Arc<InMemoryFileRepository>,
        moments: Arc<InMemoryMomentRepository>,
        analyses: Arc<InMemoryAnalysisRepository>,
        file: File,
    }

    async fn fixture(analysis: Option<Arc<FakeMediaAnalysis>>, fallback: FallbackPolicy) -> Fixture {
        let files = Arc::new(InMemoryFileRepository::default());
        let moments = Arc::new(InMemoryMomentRepository::default());
        let analyses = Arc::new(InMemoryAnalysisRepository::default());
        let file = sample_file(Uuid::new_v4());
        files.save(&file).await.unwrap();

        let embedding_service = Arc::new(EmbeddingService::new(
            Some(Arc::new(FixedEmbeddingProvider::new(vec![0.1; 8]))),
            None,
            EmbeddingSettings {
                dimension: 8,
                max_chars: 8000,
                fallback,
            },
        ));
        let service = IngestionService::new(
            files.clone(),
            analyses.clone(),
            moments.clone(),
            analysis.map(|a| a as Arc<dyn MediaAnalysisProvider>),
            Arc::new(InMemoryFileStorage::default()),
            embedding_service,
            Arc::new(InMemorySearchCache::default()),
            Config::for_tests().ingestion,
            3600,
        );
        Fixture {
            service,
            files,
            moments,
            analyses,
            file,
        }
    }

    #[tokio::test]
    async fn test_full_run_builds_moments_and_completes_file() {
        let analysis = Arc::new(FakeMediaAnalysis::wedding());
        let fx = fixture(Some(analysis), FallbackPolicy::Error).await;
        let file_id = fx.file.id();

        let job = fx.service.start_transcription(file_id).await.unwrap();
        let transcript = fx.service.await_transcription(file_id, &job).await.unwrap();
        assert_eq!(transcript.len(), 2);
        fx.service.detect_labels(file_id).await.unwrap();
        fx.service.detect_faces(file_id).await.unwrap();
        let shots = fx.service.plan_shots(file_id, Some(30.0)).await.unwrap();
        assert_eq!(shots.len(), 3);
        fx.service.plan_thumbnails(file_id, None).await.unwrap();

        let report = fx.service.build_segments(file_id, None).await.unwrap();

        assert!(report.moments_created > 0);
        assert_eq!(report.embeddings_generated, report.moments_created);
        assert_eq!(report.fallback_embeddings, 0);
        assert_eq!(report.thumbnails, 6);

        let (moments, total) = fx
            .moments
            .find_by_project(
                fx.file.project_id(),
                &MomentFilter {
                    kind: Some(MomentKind::Speech),
                    file_id: None,
                    offset: 0,
                    limit: 50,
                },
            )
            .await
            .unwrap();
        assert_eq!(total, 2);
        assert!(moments.iter().all(|m| m.embedding().is_some()));

        let file = fx.files.find_by_id(file_id).await.unwrap().unwrap();
        assert!(file.status().is_completed());
        assert_eq!(file.duration_seconds(), Some(30.0));

        for kind in [
            AnalysisType::TranscriptionJob,
            AnalysisType::Transcription,
            AnalysisType::Labels,
            AnalysisType::Faces,
            AnalysisType::Shots,
            AnalysisType::Thumbnails,
            AnalysisType::Segments,
        ] {
            assert!(
                fx.analyses.find_latest(file_id, kind).await.unwrap().is_some(),
                "missing {} analysis",
                kind.as_str()
            );
        }
    }

    #[tokio::test]
    async fn test_segments_without_analysis_fall_back_to_shots() {
        let fx = fixture(None, FallbackPolicy::Error).await;

        let report = fx.service.build_segments(fx.file.id(), Some(25.0)).await.unwrap();

        // 0-10, 10-20, 20-25 plain shot moments
        assert_eq!(report.moments_created, 3);
    }

    #[tokio::test]
    async fn test_rebuilding_replaces_previous_moments() {
        let fx = fixture(None, FallbackPolicy::Error).await;
        fx.service.build_segments(fx.file.id(), Some(25.0)).await.unwrap();
        fx.service.build_segments(fx.file.id(), Some(25.0)).await.unwrap();

        assert_eq!(fx.moments.count_for_file(fx.file.id()), 3);
    }

    #[tokio::test]
    async fn test_unknown_duration_is_rejected() {
        let fx = fixture(None, FallbackPolicy::Error).await;
        let result = fx.service.plan_shots(fx.file.id(), None).await;
        assert!(matches!(result, Err(IngestionError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_duration_inferred_from_transcript() {
        let analysis = Arc::new(FakeMediaAnalysis::wedding());
        let fx = fixture(Some(analysis), FallbackPolicy::Error).await;
        let file_id = fx.file.id();
        let job = fx.service.start_transcription(file_id).await.unwrap();
        fx.service.await_transcription(file_id, &job).await.unwrap();

        let shots = fx.service.plan_shots(file_id, None).await.unwrap();
        assert_eq!(shots.last().unwrap().end(), 18.5);
    }

    #[tokio::test]
    async fn test_missing_provider_is_reported() {
        let fx = fixture(None, FallbackPolicy::Error).await;
        let result = fx.service.detect_labels(fx.file.id()).await;
        assert!(matches!(
            result,
            Err(IngestionError::Analysis(MediaAnalysisError::NotConfigured))
        ));
    }

    #[tokio::test]
    async fn test_failed_transcription() {
        let analysis = Arc::new(FakeMediaAnalysis::failing_transcription("audio track missing"));
        let fx = fixture(Some(analysis), FallbackPolicy::Error).await;
        let job = fx.service.start_transcription(fx.file.id()).await.unwrap();

        let result = fx.service.await_transcription(fx.file.id(), &job).await;
        assert!(matches!(result, Err(IngestionError::TranscriptionFailed(m)) if m == "audio track missing"));
    }

    #[tokio::test]
    async fn test_unknown_file() {
        let fx = fixture(None, FallbackPolicy::Error).await;
        let missing = Uuid::new_v4();
        assert!(matches!(
            fx.service.build_segments(missing, Some(10.0)).await,
            Err(IngestionError::FileNotFound(id)) if id == missing
        ));
    }
}
