use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisType {
    TranscriptionJob,
    Transcription,
    Labels,
    Faces,
    Shots,
    Thumbnails,
    Segments,
}

impl AnalysisType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::TranscriptionJob => "transcription_job",
            AnalysisType::Transcription => "transcription",
            AnalysisType::Labels => "labels",
            AnalysisType::Faces => "faces",
            AnalysisType::Shots => "shots",
            AnalysisType::Thumbnails => "thumbnails",
            AnalysisType::Segments => "segments",
        }
    }
}

impl std::str::FromStr for AnalysisType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "transcription_job" => Ok(AnalysisType::TranscriptionJob),
            "transcription" => Ok(AnalysisType::Transcription),
            "labels" => Ok(AnalysisType::Labels),
            "faces" => Ok(AnalysisType::Faces),
            "shots" => Ok(AnalysisType::Shots),
            "thumbnails" => Ok(AnalysisType::Thumbnails),
            "segments" => Ok(AnalysisType::Segments),
            other => Err(format!("Unknown analysis type: {}", other)),
        }
    }
}

/// Raw response of one external analysis call, kept for auditing and for
/// rebuilding segments later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiAnalysis {
    id: Uuid,
    file_id: Uuid,
    analysis_type: AnalysisType,
    raw_result: serde_json::Value,
    created_at: DateTime<Utc>,
}

impl AiAnalysis {
    pub fn new(file_id: Uuid, analysis_type: AnalysisType, raw_result: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_id,
            analysis_type,
            raw_result,
            created_at: Utc::now(),
        }
    }

    pub fn from_database(
        id: Uuid,
        file_id: Uuid,
        analysis_type: AnalysisType,
        raw_result: serde_json::Value,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            file_id,
            analysis_type,
            raw_result,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn file_id(&self) -> Uuid {
        self.file_id
    }

    pub fn analysis_type(&self) -> AnalysisType {
        self.analysis_type
    }

    pub fn raw_result(&self) -> &serde_json::Value {
        &self.raw_result
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
