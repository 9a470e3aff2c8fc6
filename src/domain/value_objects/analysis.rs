//! Results returned by the external transcription and vision services,
//! normalized into the shapes segment building works with.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptSegment {
    pub start_time: f64,
    pub end_time: f64,
    pub text: String,
    #[serde(default = "default_confidence")]
    pub confidence: f32,
    #[serde(default)]
    pub speaker: Option<String>,
}

/// A visual label. Labels without timestamps apply to the whole video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedLabel {
    pub name: String,
    #[serde(default = "default_confidence")]
    pub confidence: f32,
    #[serde(default)]
    pub start_time: Option<f64>,
    #[serde(default)]
    pub end_time: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedFace {
    pub timestamp: f64,
    #[serde(default = "default_confidence")]
    pub confidence: f32,
    #[serde(default)]
    pub bounding_box: Option<serde_json::Value>,
    #[serde(default)]
    pub emotions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thumbnail {
    pub timestamp: f64,
    pub path: String,
}

fn default_confidence() -> f32 {
    1.0
}

/// Services disagree on scale: some report 0..1, some 0..100.
pub fn normalize_confidence(value: f32) -> f32 {
    if !value.is_finite() {
        return 0.0;
    }
    let scaled = if value > 1.0 { value / 100.0 } else { value };
    scaled.clamp(0.0, 1.0)
}
