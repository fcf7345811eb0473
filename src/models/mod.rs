//! Domain models for the acquisition pipeline.

mod institution;
mod job;
mod source;

pub use institution::Institution;
pub use job::{FailureEvent, JobOpening, JobStatus, ParsedJob};
pub use source::{Source, SourceType};
