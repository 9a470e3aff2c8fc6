use std::sync::Arc;

use uuid::Uuid;

use crate::application::ports::file_storage::FileStorage;
use crate::application::ports::media_transcoder::{
    ClipSpec, MediaTranscoder, TranscodeState, TranscoderError,
};
use crate::config::CompilationConfig;
use crate::domain::entities::{
    Compilation, CompilationMoment, CompilationStatus, TransitionType, VideoMoment,
};
use crate::domain::repositories::{CompilationRepository, MomentRepository, RepositoryError};
use crate::domain::services::moment_selection::{select_for_compilation, total_duration};

#[derive(Debug, thiserror::Error)]
pub enum CompilationServiceError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("No moments match '{0}'")]
    NoMatches(String),
    #[error("No matching moment fits within {0:.1} seconds")]
    NothingFits(f64),
    #[error("Transcoder error: {0}")]
    Transcoder(#[from] TranscoderError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Clone)]
pub struct CompilationDraft {
    pub project_id: Uuid,
    pub created_by: Uuid,
    pub query: String,
    pub name: Option<String>,
    pub max_duration_seconds: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct CompiledReel {
    pub compilation: Compilation,
    pub moments: Vec<VideoMoment>,
    pub entries: Vec<CompilationMoment>,
}

/// Assembles highlight reels from a lexical match over moment text.
pub struct CompilationService {
    moment_repository: Arc<dyn MomentRepository>,
    compilation_repository: Arc<dyn CompilationRepository>,
    file_storage: Arc<dyn FileStorage>,
    transcoder: Option<Arc<dyn MediaTranscoder>>,
    config: CompilationConfig,
    url_ttl_secs: i64,
}

impl CompilationService {
    pub fn new(
        moment_repository: Arc<dyn MomentRepository>,
        compilation_repository: Arc<dyn CompilationRepository>,
        file_storage: Arc<dyn FileStorage>,
        transcoder: Option<Arc<dyn MediaTranscoder>>,
        config: CompilationConfig,
        url_ttl_secs: i64,
    ) -> Self {
        Self {
            moment_repository,
            compilation_repository,
            file_storage,
            transcoder,
            config,
            url_ttl_secs,
        }
    }

    pub async fn create(&self, draft: CompilationDraft) -> Result<CompiledReel, CompilationServiceError> {
        let query = draft.query.trim().to_string();
        if query.is_empty() {
            return Err(CompilationServiceError::ValidationError(
                "Compilation query cannot be empty".to_string(),
            ));
        }
        let max_duration = draft
            .max_duration_seconds
            .unwrap_or(self.config.default_max_duration_secs);
        if !(max_duration.is_finite() && max_duration > 0.0) {
            return Err(CompilationServiceError::ValidationError(format!(
                "Maximum duration must be positive, got {}",
                max_duration
            )));
        }

        let candidates = self
            .moment_repository
            .search_text(draft.project_id, &query)
            .await?;
        if candidates.is_empty() {
            return Err(CompilationServiceError::NoMatches(query));
        }
        let candidate_count = candidates.len();

        let selected = select_for_compilation(candidates, max_duration, self.config.fill_ratio);
        if selected.is_empty() {
            return Err(CompilationServiceError::NothingFits(max_duration));
        }

        let name = draft
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("{} highlights", query));

        let mut compilation = Compilation::new(
            draft.project_id,
            name,
            query,
            max_duration,
            total_duration(&selected),
            draft.created_by,
        )
        .map_err(CompilationServiceError::ValidationError)?;

        let entries: Vec<CompilationMoment> = selected
            .iter()
            .enumerate()
            .map(|(position, moment)| {
                let (transition, duration) = if position == 0 {
                    (TransitionType::Cut, 0.0)
                } else {
                    (self.config.transition, self.config.transition_duration_secs)
                };
                CompilationMoment::new(
                    compilation.id(),
                    moment.id(),
                    position as i32,
                    transition,
                    duration,
                )
            })
            .collect();

        let submission = match &self.transcoder {
            Some(transcoder) => {
                let clips = self.clip_specs(&selected, &entries);
                match transcoder.submit(compilation.name(), &clips).await {
                    Ok(job_id) => {
                        compilation.mark_submitted(job_id);
                        Ok(())
                    }
                    Err(e) => {
                        compilation.mark_failed(e.to_string());
                        Err(e)
                    }
                }
            }
            None => {
                // Without a transcoder the reel is the first clip's source file.
                let first = &selected[0];
                let signed = self.file_storage.signed_url(first.file_id(), self.url_ttl_secs);
                compilation.mark_completed(signed.url);
                Ok(())
            }
        };

        self.compilation_repository
            .save(&compilation, &entries)
            .await?;

        tracing::info!(
            compilation_id = %compilation.id(),
            project_id = %compilation.project_id(),
            candidates = candidate_count,
            selected = selected.len(),
            total_seconds = compilation.total_duration_seconds(),
            status = compilation.status().as_str(),
            "Compilation created"
        );

        submission?;

        Ok(CompiledReel {
            compilation,
            moments: selected,
            entries,
        })
    }

    /// Polls the transcoder for a compilation that is still being rendered.
    pub async fn refresh_status(
        &self,
        mut compilation: Compilation,
    ) -> Result<Compilation, CompilationServiceError> {
        if compilation.status() != CompilationStatus::Processing {
            return Ok(compilation);
        }
        let (Some(transcoder), Some(job_id)) = (&self.transcoder, compilation.transcode_job_id())
        else {
            return Ok(compilation);
        };

        match transcoder.status(job_id).await? {
            TranscodeState::InProgress => return Ok(compilation),
            TranscodeState::Completed { output_url } => compilation.mark_completed(output_url),
            TranscodeState::Failed(error) => compilation.mark_failed(error),
        }
        self.compilation_repository.update(&compilation).await?;
        Ok(compilation)
    }

    fn clip_specs(&self, moments: &[VideoMoment], entries: &[CompilationMoment]) -> Vec<ClipSpec> {
        moments
            .iter()
            .zip(entries)
            .map(|(moment, entry)| ClipSpec {
                source_url: self
                    .file_storage
                    .signed_url(moment.file_id(), self.url_ttl_secs)
                    .url,
                start_seconds: moment.start_time_seconds(),
                end_seconds: moment.end_time_seconds(),
                transition: entry.transition_type().as_str().to_string(),
                transition_duration: entry.transition_duration(),
            })
            .collect()
    }
}
