//! Persistence gateway consumed by the scheduler.
//!
//! The pipeline only needs three operations from its store: list the
//! active sources, insert openings idempotently by fingerprint, and
//! append failure events best-effort. The backing schema is someone
//! else's problem; this module pins down the boundary.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use std::sync::Arc;

use crate::models::{FailureEvent, JobOpening, Source};

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from persistence operations.
///
/// A duplicate fingerprint is *not* an error anywhere in this
/// taxonomy; implementations absorb uniqueness conflicts as
/// "already known".
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Type alias for a shared store handle.
pub type BoxedJobStore = Arc<dyn JobStore>;

/// Storage boundary for the acquisition pipeline.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Snapshot of the sources currently enabled for scraping.
    async fn list_active_sources(&self) -> StoreResult<Vec<Source>>;

    /// Insert openings, silently skipping any whose fingerprint is
    /// already present. Returns the number of newly inserted rows.
    async fn insert_job_openings(&self, openings: &[JobOpening]) -> StoreResult<usize>;

    /// Append a failure event. Best-effort: implementations swallow
    /// their own write errors, so this can never fail the caller.
    async fn record_failure(&self, event: FailureEvent);
}
