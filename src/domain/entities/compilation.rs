use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompilationStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl CompilationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompilationStatus::Pending => "pending",
            CompilationStatus::Processing => "processing",
            CompilationStatus::Completed => "completed",
            CompilationStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, CompilationStatus::Completed | CompilationStatus::Failed)
    }
}

impl std::str::FromStr for CompilationStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(CompilationStatus::Pending),
            "processing" => Ok(CompilationStatus::Processing),
            "completed" => Ok(CompilationStatus::Completed),
            "failed" => Ok(CompilationStatus::Failed),
            other => Err(format!("Unknown compilation status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionType {
    Cut,
    Crossfade,
    Fade,
}

impl TransitionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionType::Cut => "cut",
            TransitionType::Crossfade => "crossfade",
            TransitionType::Fade => "fade",
        }
    }
}

impl std::str::FromStr for TransitionType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "cut" => Ok(TransitionType::Cut),
            "crossfade" => Ok(TransitionType::Crossfade),
            "fade" => Ok(TransitionType::Fade),
            other => Err(format!("Unknown transition type: {}", other)),
        }
    }
}

/// A highlight reel assembled from moments matching a text query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Compilation {
    id: Uuid,
    project_id: Uuid,
    name: String,
    query: String,
    max_duration_seconds: f64,
    total_duration_seconds: f64,
    status: CompilationStatus,
    transcode_job_id: Option<String>,
    output_url: Option<String>,
    error_message: Option<String>,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Compilation {
    pub fn new(
        project_id: Uuid,
        name: String,
        query: String,
        max_duration_seconds: f64,
        total_duration_seconds: f64,
        created_by: Uuid,
    ) -> Result<Self, String> {
        if !(max_duration_seconds > 0.0) {
            return Err("Maximum duration must be positive".to_string());
        }
        if total_duration_seconds > max_duration_seconds {
            return Err(format!(
                "Selected footage ({:.1}s) exceeds the maximum duration ({:.1}s)",
                total_duration_seconds, max_duration_seconds
            ));
        }
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            project_id,
            name,
            query,
            max_duration_seconds,
            total_duration_seconds,
            status: CompilationStatus::Pending,
            transcode_job_id: None,
            output_url: None,
            error_message: None,
            created_by,
            created_at: now,
            updated_at: now,
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn from_database(
        id: Uuid,
        project_id: Uuid,
        name: String,
        query: String,
        max_duration_seconds: f64,
        total_duration_seconds: f64,
        status: CompilationStatus,
        transcode_job_id: Option<String>,
        output_url: Option<String>,
        error_message: Option<String>,
        created_by: Uuid,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            project_id,
            name,
            query,
            max_duration_seconds,
            total_duration_seconds,
            status,
            transcode_job_id,
            output_url,
            error_message,
            created_by,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn project_id(&self) -> Uuid {
        self.project_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn max_duration_seconds(&self) -> f64 {
        self.max_duration_seconds
    }

    pub fn total_duration_seconds(&self) -> f64 {
        self.total_duration_seconds
    }

    pub fn status(&self) -> CompilationStatus {
        self.status
    }

    pub fn transcode_job_id(&self) -> Option<&str> {
        self.transcode_job_id.as_deref()
    }

    pub fn output_url(&self) -> Option<&str> {
        self.output_url.as_deref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn created_by(&self) -> Uuid {
        self.created_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn mark_submitted(&mut self, transcode_job_id: String) {
        self.status = CompilationStatus::Processing;
        self.transcode_job_id = Some(transcode_job_id);
        self.updated_at = Utc::now();
    }

    pub fn mark_completed(&mut self, output_url: String) {
        self.status = CompilationStatus::Completed;
        self.output_url = Some(output_url);
        self.error_message = None;
        self.updated_at = Utc::now();
    }

    pub fn mark_failed(&mut self, error: String) {
        self.status = CompilationStatus::Failed;
        self.error_message = Some(error);
        self.updated_at = Utc::now();
    }
}

/// Position of a moment inside a compilation, with the transition into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompilationMoment {
    id: Uuid,
    compilation_id: Uuid,
    moment_id: Uuid,
    position: i32,
    transition_type: TransitionType,
    transition_duration: f64,
}

impl CompilationMoment {
    pub fn new(
        compilation_id: Uuid,
        moment_id: Uuid,
        position: i32,
        transition_type: TransitionType,
        transition_duration: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            compilation_id,
            moment_id,
            position,
            transition_type,
            transition_duration,
        }
    }

    pub fn from_database(
        id: Uuid,
        compilation_id: Uuid,
        moment_id: Uuid,
        position: i32,
        transition_type: TransitionType,
        transition_duration: f64,
    ) -> Self {
        Self {
            id,
            compilation_id,
            moment_id,
            position,
            transition_type,
            transition_duration,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn compilation_id(&self) -> Uuid {
        self.compilation_id
    }

    pub fn moment_id(&self) -> Uuid {
        self.moment_id
    }

    pub fn position(&self) -> i32 {
        self.position
    }

    pub fn transition_type(&self) -> TransitionType {
        self.transition_type
    }

    pub fn transition_duration(&self) -> f64 {
        self.transition_duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_cannot_exceed_budget() {
        let result = Compilation::new(
            Uuid::new_v4(),
            "Vows".to_string(),
            "vows".to_string(),
            60.0,
            61.0,
            Uuid::new_v4(),
        );
        assert!(result.is_err());
        assert!(
            Compilation::new(
                Uuid::new_v4(),
                "Vows".to_string(),
                "vows".to_string(),
                0.0,
                0.0,
                Uuid::new_v4()
            )
            .is_err()
        );
    }

    #[test]
    fn test_status_transitions() {
        let mut compilation = Compilation::new(
            Uuid::new_v4(),
            "Toasts".to_string(),
            "toast".to_string(),
            120.0,
            90.0,
            Uuid::new_v4(),
        )
        .unwrap();
        assert_eq!(compilation.status(), CompilationStatus::Pending);

        compilation.mark_submitted("job-17".to_string());
        assert_eq!(compilation.status(), CompilationStatus::Processing);
        assert_eq!(compilation.transcode_job_id(), Some("job-17"));
        assert!(!compilation.status().is_terminal());

        compilation.mark_completed("https://cdn.example.com/out.mp4".to_string());
        assert!(compilation.status().is_terminal());
        assert_eq!(compilation.output_url(), Some("https://cdn.example.com/out.mp4"));
    }
}
