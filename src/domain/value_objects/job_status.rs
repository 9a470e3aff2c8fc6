use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed(String),
    Cancelled,
}

impl JobStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, JobStatus::Pending)
    }

    pub fn is_processing(&self) -> bool {
        matches!(self, JobStatus::Processing)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, JobStatus::Cancelled)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed(_) | JobStatus::Cancelled
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed(_) => "failed",
            JobStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_parts(status: &str, error_message: Option<&str>) -> Result<Self, String> {
        match status {
            "pending" => Ok(JobStatus::Pending),
            "processing" => Ok(JobStatus::Processing),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed(
                error_message.unwrap_or("Unknown error").to_string(),
            )),
            "cancelled" => Ok(JobStatus::Cancelled),
            other => Err(format!("Unknown job status: {}", other)),
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named stage of the ingestion pipeline, with the progress percentage a job
/// reports once the stage begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStep {
    Queued,
    Transcribing,
    DetectingLabels,
    DetectingFaces,
    DetectingShots,
    ExtractingThumbnails,
    GeneratingEmbeddings,
    Finalizing,
    Done,
}

impl JobStep {
    pub fn progress(&self) -> i32 {
        match self {
            JobStep::Queued => 0,
            JobStep::Transcribing => 10,
            JobStep::DetectingLabels => 35,
            JobStep::DetectingFaces => 50,
            JobStep::DetectingShots => 60,
            JobStep::ExtractingThumbnails => 65,
            JobStep::GeneratingEmbeddings => 70,
            JobStep::Finalizing => 95,
            JobStep::Done => 100,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStep::Queued => "queued",
            JobStep::Transcribing => "transcribing",
            JobStep::DetectingLabels => "detecting_labels",
            JobStep::DetectingFaces => "detecting_faces",
            JobStep::DetectingShots => "detecting_shots",
            JobStep::ExtractingThumbnails => "extracting_thumbnails",
            JobStep::GeneratingEmbeddings => "generating_embeddings",
            JobStep::Finalizing => "finalizing",
            JobStep::Done => "done",
        }
    }

    pub fn parse(value: &str) -> Result<Self, String> {
        match value {
            "queued" => Ok(JobStep::Queued),
            "transcribing" => Ok(JobStep::Transcribing),
            "detecting_labels" => Ok(JobStep::DetectingLabels),
            "detecting_faces" => Ok(JobStep::DetectingFaces),
            "detecting_shots" => Ok(JobStep::DetectingShots),
            "extracting_thumbnails" => Ok(JobStep::ExtractingThumbnails),
            "generating_embeddings" => Ok(JobStep::GeneratingEmbeddings),
            "finalizing" => Ok(JobStep::Finalizing),
            "done" => Ok(JobStep::Done),
            other => Err(format!("Unknown job step: {}", other)),
        }
    }
}

impl std::fmt::Display for JobStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
