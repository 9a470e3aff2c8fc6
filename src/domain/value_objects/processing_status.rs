use serde::{Deserialize, Serialize};

/// Lifecycle of an uploaded source video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProcessingStatus {
    Uploaded,
    Processing,
    Completed,
    Failed(String),
}

impl ProcessingStatus {
    pub fn is_uploaded(&self) -> bool {
        matches!(self, ProcessingStatus::Uploaded)
    }

    pub fn is_processing(&self) -> bool {
        matches!(self, ProcessingStatus::Processing)
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, ProcessingStatus::Completed)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ProcessingStatus::Failed(_))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProcessingStatus::Completed | ProcessingStatus::Failed(_)
        )
    }

    pub fn can_transition_to(&self, new_status: &ProcessingStatus) -> bool {
        match (self, new_status) {
            (ProcessingStatus::Uploaded, ProcessingStatus::Processing) => true,
            (ProcessingStatus::Processing, ProcessingStatus::Completed) => true,
            (ProcessingStatus::Processing, ProcessingStatus::Failed(_)) => true,
            // Reprocessing a finished or failed file starts over.
            (ProcessingStatus::Completed, ProcessingStatus::Processing) => true,
            (ProcessingStatus::Failed(_), ProcessingStatus::Processing) => true,
            _ => false,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ProcessingStatus::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingStatus::Uploaded => "uploaded",
            ProcessingStatus::Processing => "processing",
            ProcessingStatus::Completed => "completed",
            // Error text lives in its own column
            ProcessingStatus::Failed(_) => "failed",
        }
    }

    pub fn from_parts(status: &str, error_message: Option<&str>) -> Result<Self, String> {
        match status.to_lowercase().as_str() {
            "uploaded" => Ok(ProcessingStatus::Uploaded),
            "processing" => Ok(ProcessingStatus::Processing),
            "completed" => Ok(ProcessingStatus::Completed),
            "failed" => Ok(ProcessingStatus::Failed(
                error_message.unwrap_or("Unknown error").to_string(),
            )),
            other => Err(format!("Invalid processing status: {}", other)),
        }
    }
}

impl Default for ProcessingStatus {
    fn default() -> Self {
        ProcessingStatus::Uploaded
    }
}

impl std::fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
