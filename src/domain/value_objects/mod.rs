pub mod analysis;
pub mod file_hash;
pub mod job_status;
pub mod moment_kind;
pub mod processing_status;
pub mod time_range;

pub use analysis::{DetectedFace, DetectedLabel, Thumbnail, TranscriptSegment};
pub use file_hash::FileHash;
pub use job_status::{JobStatus, JobStep};
pub use moment_kind::MomentKind;
pub use processing_status::ProcessingStatus;
pub use time_range::TimeRange;
