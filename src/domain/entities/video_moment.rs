use chrono::{DateTime, Utc};
use pgvector::Vector;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::{MomentKind, TimeRange};

/// A searchable segment of a source video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMoment {
    id: Uuid,
    file_id: Uuid,
    project_id: Uuid,
    range: TimeRange,
    kind: MomentKind,
    description: String,
    transcript: Option<String>,
    tags: Vec<String>,
    confidence: f32,
    quality_score: f32,
    embedding: Option<Vector>,
    face_data: Option<serde_json::Value>,
    visual_data: Option<serde_json::Value>,
    speaker: Option<String>,
    thumbnail_path: Option<String>,
    created_at: DateTime<Utc>,
}

/// Everything needed to build a moment before it has an identity.
#[derive(Debug, Clone)]
pub struct MomentDraft {
    pub file_id: Uuid,
    pub project_id: Uuid,
    pub start_time_seconds: f64,
    pub end_time_seconds: f64,
    pub kind: MomentKind,
    pub description: String,
    pub transcript: Option<String>,
    pub tags: Vec<String>,
    pub confidence: f32,
    pub quality_score: f32,
    pub face_data: Option<serde_json::Value>,
    pub visual_data: Option<serde_json::Value>,
    pub speaker: Option<String>,
    pub thumbnail_path: Option<String>,
}

impl MomentDraft {
    /// Text sent to the embedding model for this moment.
    pub fn embedding_text(&self) -> String {
        let mut parts = vec![self.description.clone()];
        if let Some(transcript) = &self.transcript {
            if !transcript.trim().is_empty() && transcript != &self.description {
                parts.push(transcript.clone());
            }
        }
        if !self.tags.is_empty() {
            parts.push(self.tags.join(", "));
        }
        parts.join(". ")
    }
}

impl VideoMoment {
    /// Validates the draft. When `expected_dimension` is given, the embedding
    /// must have exactly that many components.
    pub fn new(
        draft: MomentDraft,
        embedding: Option<Vector>,
        expected_dimension: Option<usize>,
    ) -> Result<Self, String> {
        let range = TimeRange::new(draft.start_time_seconds, draft.end_time_seconds)?;

        for (label, score) in [
            ("confidence", draft.confidence),
            ("quality score", draft.quality_score),
        ] {
            if !(0.0..=1.0).contains(&score) {
                return Err(format!("{} must be between 0 and 1, got {}", label, score));
            }
        }

        if draft.description.trim().is_empty() {
            return Err("Moment description cannot be empty".to_string());
        }

        if let (Some(vector), Some(expected)) = (&embedding, expected_dimension) {
            let actual = vector.as_slice().len();
            if actual != expected {
                return Err(format!(
                    "Embedding has {} dimensions, expected {}",
                    actual, expected
                ));
            }
        }

        Ok(Self {
            id: Uuid::new_v4(),
            file_id: draft.file_id,
            project_id: draft.project_id,
            range,
            kind: draft.kind,
            description: draft.description,
            transcript: draft.transcript,
            tags: draft.tags,
            confidence: draft.confidence,
            quality_score: draft.quality_score,
            embedding,
            face_data: draft.face_data,
            visual_data: draft.visual_data,
            speaker: draft.speaker,
            thumbnail_path: draft.thumbnail_path,
            created_at: Utc::now(),
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn from_database(
        id: Uuid,
        file_id: Uuid,
        project_id: Uuid,
        range: TimeRange,
        kind: MomentKind,
        description: String,
        transcript: Option<String>,
        tags: Vec<String>,
        confidence: f32,
        quality_score: f32,
        embedding: Option<Vector>,
        face_data: Option<serde_json::Value>,
        visual_data: Option<serde_json::Value>,
        speaker: Option<String>,
        thumbnail_path: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            file_id,
            project_id,
            range,
            kind,
            description,
            transcript,
            tags,
            confidence,
            quality_score,
            embedding,
            face_data,
            visual_data,
            speaker,
            thumbnail_path,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn file_id(&self) -> Uuid {
        self.file_id
    }

    pub fn project_id(&self) -> Uuid {
        self.project_id
    }

    pub fn range(&self) -> TimeRange {
        self.range
    }

    pub fn start_time_seconds(&self) -> f64 {
        self.range.start()
    }

    pub fn end_time_seconds(&self) -> f64 {
        self.range.end()
    }

    pub fn duration(&self) -> f64 {
        self.range.duration()
    }

    pub fn kind(&self) -> MomentKind {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn transcript(&self) -> Option<&str> {
        self.transcript.as_deref()
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn quality_score(&self) -> f32 {
        self.quality_score
    }

    /// Ranking weight used when packing compilations.
    pub fn weight(&self) -> f32 {
        self.confidence * self.quality_score
    }

    pub fn embedding(&self) -> Option<&Vector> {
        self.embedding.as_ref()
    }

    pub fn face_data(&self) -> Option<&serde_json::Value> {
        self.face_data.as_ref()
    }

    pub fn visual_data(&self) -> Option<&serde_json::Value> {
        self.visual_data.as_ref()
    }

    pub fn speaker(&self) -> Option<&str> {
        self.speaker.as_deref()
    }

    pub fn thumbnail_path(&self) -> Option<&str> {
        self.thumbnail_path.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
pub(crate) fn draft(start: f64, end: f64, confidence: f32, quality: f32) -> MomentDraft {
    MomentDraft {
        file_id: Uuid::new_v4(),
        project_id: Uuid::new_v4(),
        start_time_seconds: start,
        end_time_seconds: end,
        kind: MomentKind::Speech,
        description: "Bride walks down the aisle".to_string(),
        transcript: None,
        tags: vec!["ceremony".to_string()],
        confidence,
        quality_score: quality,
        face_data: None,
        visual_data: None,
        speaker: None,
        thumbnail_path: None,
    }
}
