use std::sync::Arc;
use std::time::Instant;

use uuid::Uuid;

use crate::application::services::IngestionService;
use crate::domain::entities::processing_job::{JobResult, ProcessingJob};
use crate::domain::repositories::JobRepository;
use crate::domain::value_objects::JobStep;
use crate::infrastructure::messaging::MpscJobQueueReceiver;

enum PipelineError {
    Cancelled,
    Failed(String),
}

impl<E: std::fmt::Display> From<E> for PipelineError {
    fn from(error: E) -> Self {
        PipelineError::Failed(error.to_string())
    }
}

/// Worker pool that runs the full ingestion pipeline for queued jobs.
pub struct BackgroundProcessor {
    job_receiver: Arc<MpscJobQueueReceiver>,
    job_repository: Arc<dyn JobRepository>,
    ingestion: Arc<IngestionService>,
    worker_count: usize,
}

impl BackgroundProcessor {
    pub fn new(
        job_receiver: Arc<MpscJobQueueReceiver>,
        job_repository: Arc<dyn JobRepository>,
        ingestion: Arc<IngestionService>,
    ) -> Self {
        Self {
            job_receiver,
            job_repository,
            ingestion,
            worker_count: 2,
        }
    }

    pub fn with_worker_count(mut self, count: usize) -> Self {
        self.worker_count = count.max(1); // At least 1 worker
        self
    }

    pub async fn start(&self) {
        tracing::info!(workers = self.worker_count, "Starting background processor");

        let mut handles = Vec::new();
        for worker_id in 0..self.worker_count {
            let processor = self.clone_for_worker();
            handles.push(tokio::spawn(async move {
                processor.worker_loop(worker_id).await;
            }));
        }

        for (i, handle) in handles.into_iter().enumerate() {
            if let Err(e) = handle.await {
                tracing::error!(worker_id = i, error = %e, "Worker panicked");
            }
        }

        tracing::info!("Background processor stopped");
    }

    async fn worker_loop(&self, worker_id: usize) {
        tracing::debug!(worker_id, "Worker started");

        while let Some(job) = self.job_receiver.recv().await {
            tracing::info!(worker_id, job_id = %job.id(), file_id = %job.file_id(), "Picked up job");
            self.process_job(job).await;
        }

        tracing::debug!(worker_id, "Worker stopped");
    }

    async fn process_job(&self, queued: ProcessingJob) {
        let job_id = queued.id();
        let file_id = queued.file_id();
        let start_time = Instant::now();

        // The queued copy can be stale; only a job still pending in storage runs.
        let Some(mut job) = self.load_pending(job_id).await else {
            return;
        };

        if let Err(e) = job.start_processing() {
            tracing::warn!(%job_id, error = %e, "Job cannot be started");
            return;
        }
        match self.job_repository.update_unless_cancelled(&job).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::info!(%job_id, %file_id, "Job cancelled before it started");
                return;
            }
            Err(e) => {
                tracing::error!(%job_id, error = %e, "Failed to mark job as processing");
                return;
            }
        }

        match self.run_pipeline(&mut job, start_time).await {
            Ok(result) => {
                let moments = result.moments_created;
                if let Err(e) = job.complete_processing(result) {
                    tracing::error!(%job_id, error = %e, "Failed to complete job");
                } else {
                    tracing::info!(
                        %job_id,
                        %file_id,
                        moments,
                        elapsed_secs = start_time.elapsed().as_secs_f64(),
                        "Job completed"
                    );
                }
            }
            Err(PipelineError::Cancelled) => {
                tracing::info!(%job_id, %file_id, step = %job.current_step(), "Job cancelled");
                self.release_cancelled_file(file_id).await;
                return;
            }
            Err(PipelineError::Failed(error)) => {
                tracing::warn!(%job_id, %file_id, step = %job.current_step(), error = %error, "Job failed");
                if let Err(e) = self.ingestion.fail_file(file_id, &error).await {
                    tracing::warn!(%file_id, error = %e, "Failed to record failure on file");
                }
                if let Err(e) = job.fail_processing(error) {
                    tracing::error!(%job_id, error = %e, "Failed to fail job");
                }
            }
        }

        match self.job_repository.update_unless_cancelled(&job).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::info!(%job_id, %file_id, "Job cancelled while finishing");
                self.release_cancelled_file(file_id).await;
            }
            Err(e) => tracing::error!(%job_id, error = %e, "Failed to save final job state"),
        }
    }

    async fn load_pending(&self, job_id: Uuid) -> Option<ProcessingJob> {
        match self.job_repository.find_by_id(job_id).await {
            Ok(Some(job)) if job.status().is_pending() => Some(job),
            Ok(Some(job)) => {
                tracing::info!(%job_id, status = %job.status(), "Skipping job that is no longer pending");
                None
            }
            Ok(None) => {
                tracing::warn!(%job_id, "Queued job no longer exists");
                None
            }
            Err(e) => {
                tracing::error!(%job_id, error = %e, "Failed to load queued job");
                None
            }
        }
    }

    async fn release_cancelled_file(&self, file_id: Uuid) {
        if let Err(e) = self.ingestion.fail_file(file_id, "Processing cancelled").await {
            tracing::warn!(%file_id, error = %e, "Failed to reset file after cancellation");
        }
    }

    async fn run_pipeline(
        &self,
        job: &mut ProcessingJob,
        start_time: Instant,
    ) -> Result<JobResult, PipelineError> {
        let file_id = job.file_id();
        self.ingestion.begin_file(file_id).await?;

        let analyze = self.ingestion.has_analysis_provider();
        if !analyze {
            tracing::warn!(
                %file_id,
                "No analysis service configured; building moments from fixed shots only"
            );
        }

        self.checkpoint(job, JobStep::Transcribing).await?;
        if analyze {
            let transcription = self.ingestion.start_transcription(file_id).await?;
            self.ingestion
                .await_transcription(file_id, &transcription)
                .await?;
        }

        self.checkpoint(job, JobStep::DetectingLabels).await?;
        if analyze {
            self.ingestion.detect_labels(file_id).await?;
        }

        self.checkpoint(job, JobStep::DetectingFaces).await?;
        if analyze {
            self.ingestion.detect_faces(file_id).await?;
        }

        self.checkpoint(job, JobStep::DetectingShots).await?;
        self.ingestion.plan_shots(file_id, None).await?;

        self.checkpoint(job, JobStep::ExtractingThumbnails).await?;
        self.ingestion.plan_thumbnails(file_id, None).await?;

        self.checkpoint(job, JobStep::GeneratingEmbeddings).await?;
        let report = self.ingestion.build_segments(file_id, None).await?;

        self.checkpoint(job, JobStep::Finalizing).await?;

        Ok(JobResult {
            moments_created: report.moments_created as i32,
            embeddings_generated: report.embeddings_generated as i32,
            fallback_embeddings: report.fallback_embeddings as i32,
            thumbnails: report.thumbnails as i32,
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        })
    }

    /// Records the next step, or stops the run if the job was cancelled.
    async fn checkpoint(&self, job: &mut ProcessingJob, step: JobStep) -> Result<(), PipelineError> {
        job.advance(step)?;
        if !self.job_repository.update_unless_cancelled(job).await? {
            return Err(PipelineError::Cancelled);
        }
        tracing::debug!(job_id = %job.id(), file_id = %job.file_id(), step = %step, "Job step");
        Ok(())
    }

    fn clone_for_worker(&self) -> Self {
        Self {
            job_receiver: self.job_receiver.clone(),
            job_repository: self.job_repository.clone(),
            ingestion: self.ingestion.clone(),
            worker_count: self.worker_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::media_analysis::MediaAnalysisProvider;
    use crate::application::services::EmbeddingService;
    use crate::application::services::embedding_service::EmbeddingSettings;
    use crate::application::testing::{
        FakeMediaAnalysis, FixedEmbeddingProvider, InMemoryAnalysisRepository,
        InMemoryFileRepository, InMemoryFileStorage, InMemoryJobRepository,
        InMemoryMomentRepository, InMemorySearchCache, sample_file,
    };
    use crate::config::{Config, FallbackPolicy};
    use crate::domain::entities::File;
    use crate::domain::repositories::{FileRepository, RepositoryError};
    use async_trait::async_trait;
    use crate::domain::value_objects::{JobStatus, ProcessingStatus};
    use crate::infrastructure::messaging::MpscJobQueue;

    struct Fixture {
        processor: BackgroundProcessor,
        ingestion: Arc<IngestionService>,
        jobs: Arc<InMemoryJobRepository>,
        files: Arc<InMemoryFileRepository>,
        moments: Arc<InMemoryMomentRepository>,
        file: File,
    }

    async fn fixture(analysis: Option<FakeMediaAnalysis>, duration: Option<f64>) -> Fixture {
        let files = Arc::new(InMemoryFileRepository::default());
        let jobs = Arc::new(InMemoryJobRepository::default());
        let moments = Arc::new(InMemoryMomentRepository::default());

        let mut file = sample_file(Uuid::new_v4());
        if let Some(seconds) = duration {
            file.set_duration(seconds).unwrap();
        }
        files.save(&file).await.unwrap();

        let embedding_service = Arc::new(EmbeddingService::new(
            Some(Arc::new(FixedEmbeddingProvider::new(vec![0.5; 8]))),
            None,
            EmbeddingSettings {
                dimension: 8,
                max_chars: 8000,
                fallback: FallbackPolicy::Error,
            },
        ));
        let ingestion = Arc::new(IngestionService::new(
            files.clone(),
            Arc::new(InMemoryAnalysisRepository::default()),
            moments.clone(),
            analysis.map(|a| Arc::new(a) as Arc<dyn MediaAnalysisProvider>),
            Arc::new(InMemoryFileStorage::default()),
            embedding_service,
            Arc::new(InMemorySearchCache::default()),
            Config::for_tests().ingestion,
            3600,
        ));

        let (_queue, receiver) = MpscJobQueue::create_pair();
        let processor =
            BackgroundProcessor::new(Arc::new(receiver), jobs.clone(), ingestion.clone());

        Fixture {
            processor,
            ingestion,
            jobs,
            files,
            moments,
            file,
        }
    }

    async fn queued_job(fx: &Fixture) -> ProcessingJob {
        let job = ProcessingJob::new(fx.file.id());
        fx.jobs.save(&job).await.unwrap();
        job
    }

    #[tokio::test]
    async fn test_pipeline_completes_job_and_file() {
        let fx = fixture(Some(FakeMediaAnalysis::wedding()), None).await;
        let job = queued_job(&fx).await;

        fx.processor.process_job(job.clone()).await;

        let stored = fx.jobs.find_by_id(job.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), &JobStatus::Completed);
        assert_eq!(stored.progress(), 100);
        let result = stored.result_summary().unwrap();
        assert!(result.moments_created > 0);
        assert_eq!(result.fallback_embeddings, 0);

        let file = fx.files.find_by_id(fx.file.id()).await.unwrap().unwrap();
        assert_eq!(file.status(), &ProcessingStatus::Completed);
        assert_eq!(
            fx.moments.count_for_file(fx.file.id()),
            result.moments_created as usize
        );
    }

    #[tokio::test]
    async fn test_pipeline_without_analysis_uses_shots() {
        let fx = fixture(None, Some(25.0)).await;
        let job = queued_job(&fx).await;

        fx.processor.process_job(job.clone()).await;

        let stored = fx.jobs.find_by_id(job.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), &JobStatus::Completed);
        assert_eq!(fx.moments.count_for_file(fx.file.id()), 3);
    }

    #[tokio::test]
    async fn test_failed_step_fails_job_and_file() {
        let fx = fixture(
            Some(FakeMediaAnalysis::failing_transcription("no audio track")),
            Some(30.0),
        )
        .await;
        let job = queued_job(&fx).await;

        fx.processor.process_job(job.clone()).await;

        let stored = fx.jobs.find_by_id(job.id()).await.unwrap().unwrap();
        assert!(stored.error_message().unwrap().contains("no audio track"));
        assert_eq!(stored.current_step(), JobStep::Transcribing);

        let file = fx.files.find_by_id(fx.file.id()).await.unwrap().unwrap();
        assert!(matches!(file.status(), ProcessingStatus::Failed(_)));
    }

    /// Cancels the stored job the moment the worker tries to record `step`.
    struct CancelAtStep {
        inner: Arc<InMemoryJobRepository>,
        step: JobStep,
    }

    #[async_trait]
    impl JobRepository for CancelAtStep {
        async fn save(&self, job: &ProcessingJob) -> Result<(), RepositoryError> {
            self.inner.save(job).await
        }

        async fn find_by_id(&self, job_id: Uuid) -> Result<Option<ProcessingJob>, RepositoryError> {
            self.inner.find_by_id(job_id).await
        }

        async fn find_by_file_id(&self, file_id: Uuid) -> Result<Vec<ProcessingJob>, RepositoryError> {
            self.inner.find_by_file_id(file_id).await
        }

        async fn update(&self, job: &ProcessingJob) -> Result<(), RepositoryError> {
            self.inner.update(job).await
        }

        async fn update_unless_cancelled(&self, job: &ProcessingJob) -> Result<bool, RepositoryError> {
            if job.current_step() == self.step {
                let mut stored = self.inner.find_by_id(job.id()).await?.unwrap();
                if stored.cancel().is_ok() {
                    self.inner.update(&stored).await?;
                }
            }
            self.inner.update_unless_cancelled(job).await
        }
    }

    fn cancelling_processor(fx: &Fixture, step: JobStep) -> BackgroundProcessor {
        let (_queue, receiver) = MpscJobQueue::create_pair();
        BackgroundProcessor::new(
            Arc::new(receiver),
            Arc::new(CancelAtStep {
                inner: fx.jobs.clone(),
                step,
            }),
            fx.ingestion.clone(),
        )
    }

    #[tokio::test]
    async fn test_cancel_after_pickup_is_not_overwritten() {
        let fx = fixture(Some(FakeMediaAnalysis::wedding()), Some(30.0)).await;
        let job = queued_job(&fx).await;

        // Cancelled in storage while the worker still holds the pending copy.
        let mut cancelled = job.clone();
        cancelled.cancel().unwrap();
        fx.jobs.update(&cancelled).await.unwrap();

        fx.processor.process_job(job.clone()).await;

        let stored = fx.jobs.find_by_id(job.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), &JobStatus::Cancelled);
        assert!(stored.started_at().is_none());
        assert_eq!(fx.moments.count_for_file(fx.file.id()), 0);

        let file = fx.files.find_by_id(fx.file.id()).await.unwrap().unwrap();
        assert_ne!(file.status(), &ProcessingStatus::Completed);
    }

    #[tokio::test]
    async fn test_cancel_between_steps_stops_pipeline() {
        let fx = fixture(Some(FakeMediaAnalysis::wedding()), Some(30.0)).await;
        let job = queued_job(&fx).await;

        cancelling_processor(&fx, JobStep::DetectingShots)
            .process_job(job.clone())
            .await;

        let stored = fx.jobs.find_by_id(job.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), &JobStatus::Cancelled);
        assert_eq!(fx.moments.count_for_file(fx.file.id()), 0);

        let file = fx.files.find_by_id(fx.file.id()).await.unwrap().unwrap();
        assert_eq!(
            file.status(),
            &ProcessingStatus::Failed("Processing cancelled".to_string())
        );
    }

    #[tokio::test]
    async fn test_cancel_while_finishing_keeps_cancelled_status() {
        let fx = fixture(Some(FakeMediaAnalysis::wedding()), Some(30.0)).await;
        let job = queued_job(&fx).await;

        cancelling_processor(&fx, JobStep::Done)
            .process_job(job.clone())
            .await;

        let stored = fx.jobs.find_by_id(job.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), &JobStatus::Cancelled);
        assert!(stored.result_summary().is_none());
    }
}
