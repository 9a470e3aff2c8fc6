pub mod analysis_model;
pub mod compilation_model;
pub mod file_model;
pub mod invitation_model;
pub mod job_model;
pub mod moment_model;
pub mod project_model;
pub mod search_model;
pub mod user_model;

pub use analysis_model::*;
pub use compilation_model::*;
pub use file_model::*;
pub use invitation_model::*;
pub use job_model::*;
pub use moment_model::*;
pub use project_model::*;
pub use search_model::*;
pub use user_model::*;

use pgvector::Vector;

/// Embeddings are persisted as JSON number arrays.
pub(crate) fn vector_to_json(vector: &Vector) -> serde_json::Value {
    serde_json::Value::from(vector.as_slice().to_vec())
}

pub(crate) fn vector_from_json(value: serde_json::Value) -> Result<Vector, String> {
    serde_json::from_value::<Vec<f32>>(value)
        .map(Vector::from)
        .map_err(|e| format!("Invalid embedding: {}", e))
}
