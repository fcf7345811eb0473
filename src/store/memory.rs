//! In-memory store for single-process operation.
//!
//! Fast, lock-based store for tests, dry runs, and seed-file-driven
//! invocations. State is not persisted across restarts.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{JobStore, StoreResult};
use crate::models::{FailureEvent, JobOpening, Source};

/// Store keeping everything behind a pair of RwLocks.
#[derive(Default)]
pub struct MemoryStore {
    sources: RwLock<Vec<Source>>,
    /// Openings keyed by fingerprint; insertion order is not retained.
    openings: RwLock<HashMap<String, JobOpening>>,
    failures: RwLock<Vec<FailureEvent>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with sources.
    pub fn with_sources(sources: Vec<Source>) -> Self {
        Self {
            sources: RwLock::new(sources),
            ..Default::default()
        }
    }

    /// Replace the source list.
    pub async fn set_sources(&self, sources: Vec<Source>) {
        *self.sources.write().await = sources;
    }

    /// Number of stored openings.
    pub async fn opening_count(&self) -> usize {
        self.openings.read().await.len()
    }

    /// Snapshot of stored fingerprints, sorted for comparison.
    pub async fn fingerprints(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.openings.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Snapshot of stored openings.
    pub async fn openings(&self) -> Vec<JobOpening> {
        self.openings.read().await.values().cloned().collect()
    }

    /// Snapshot of recorded failure events.
    pub async fn failures(&self) -> Vec<FailureEvent> {
        self.failures.read().await.clone()
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn list_active_sources(&self) -> StoreResult<Vec<Source>> {
        Ok(self
            .sources
            .read()
            .await
            .iter()
            .filter(|s| s.active)
            .cloned()
            .collect())
    }

    async fn insert_job_openings(&self, openings: &[JobOpening]) -> StoreResult<usize> {
        let mut stored = self.openings.write().await;
        let mut inserted = 0;

        for opening in openings {
            // First sighting wins; later refinements of the same
            // posting are treated as already known.
            if !stored.contains_key(&opening.fingerprint) {
                stored.insert(opening.fingerprint.clone(), opening.clone());
                inserted += 1;
            }
        }

        Ok(inserted)
    }

    async fn record_failure(&self, event: FailureEvent) {
        self.failures.write().await.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ParsedJob, SourceType};

    fn source(id: &str, active: bool) -> Source {
        let mut s = Source::new(
            id.into(),
            "inst1".into(),
            SourceType::Careers,
            format!("https://example.edu/{}", id),
        );
        s.active = active;
        s
    }

    fn opening(title: &str) -> JobOpening {
        JobOpening::from_parsed(
            ParsedJob::new(title.into(), "https://example.edu/jobs/1".into(), None),
            &source("s1", true),
        )
    }

    #[tokio::test]
    async fn only_active_sources_are_listed() {
        let store =
            MemoryStore::with_sources(vec![source("a", true), source("b", false), source("c", true)]);

        let listed = store.list_active_sources().await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn duplicate_fingerprints_are_silent_noops() {
        let store = MemoryStore::new();
        let first = store
            .insert_job_openings(&[opening("Registrar"), opening("Librarian")])
            .await
            .unwrap();
        assert_eq!(first, 2);

        let second = store
            .insert_job_openings(&[opening("Registrar"), opening("Dean")])
            .await
            .unwrap();
        assert_eq!(second, 1);
        assert_eq!(store.opening_count().await, 3);
    }

    #[tokio::test]
    async fn failures_accumulate() {
        let store = MemoryStore::new();
        store
            .record_failure(FailureEvent::for_url("https://example.edu", "timeout"))
            .await;
        store
            .record_failure(FailureEvent::for_source(&source("s1", true), "nav error"))
            .await;

        let failures = store.failures().await;
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[1].source_id.as_deref(), Some("s1"));
    }
}
