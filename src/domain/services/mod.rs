pub mod moment_selection;
pub mod sampling;
pub mod segmentation;
pub mod similarity;

pub use moment_selection::select_for_compilation;
pub use segmentation::{SegmentationInput, build_moment_drafts};
pub use similarity::cosine_similarity;
