//! Run orchestration: grouping, pacing, concurrency, failure isolation.
//!
//! Two nested scheduling layers. The outer layer walks institution
//! groups strictly sequentially with a cooldown between them; the
//! inner layer dispatches one group's sources concurrently under a
//! global in-flight cap, staggering same-institution starts. One
//! unreachable or redesigned page must never block collection from
//! the other, uncorrelated targets.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::browser::PageRenderer;
use crate::config::ScrapeConfig;
use crate::extract::extract_jobs;
use crate::models::{FailureEvent, JobOpening, Source};
use crate::store::JobStore;

/// Outcome counts for one scrape run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub sources_attempted: usize,
    pub sources_succeeded: usize,
    pub sources_failed: usize,
    pub jobs_inserted: usize,
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} sources attempted ({} ok, {} failed), {} new openings",
            self.sources_attempted, self.sources_succeeded, self.sources_failed, self.jobs_inserted
        )
    }
}

/// Drives one full visit over every active source.
pub struct ScrapeRunner {
    config: ScrapeConfig,
    renderer: Arc<dyn PageRenderer>,
    store: Arc<dyn JobStore>,
}

impl ScrapeRunner {
    /// Create a runner over the given fetch agent and store.
    pub fn new(
        config: ScrapeConfig,
        renderer: Arc<dyn PageRenderer>,
        store: Arc<dyn JobStore>,
    ) -> Self {
        Self {
            config,
            renderer,
            store,
        }
    }

    /// Visit every active source exactly once.
    ///
    /// The source list is snapshotted up front; sources added mid-run
    /// are not picked up. Per-source failures are logged to the store
    /// and never abort the run. Failed sources are not retried within
    /// a run; re-running is safe because insertion is idempotent by
    /// fingerprint.
    pub async fn run(&self) -> anyhow::Result<RunSummary> {
        let sources = self.store.list_active_sources().await?;
        info!("Found {} active sources", sources.len());

        let groups = group_by_institution(sources);
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency.max(1)));

        let attempted = Arc::new(AtomicUsize::new(0));
        let succeeded = Arc::new(AtomicUsize::new(0));
        let failed = Arc::new(AtomicUsize::new(0));
        let inserted = Arc::new(AtomicUsize::new(0));

        for (institution_id, group) in groups {
            info!(
                "Scraping institution {} with {} source(s)",
                institution_id,
                group.len()
            );

            let mut tasks = Vec::with_capacity(group.len());
            for (index, source) in group.into_iter().enumerate() {
                let semaphore = semaphore.clone();
                let renderer = self.renderer.clone();
                let store = self.store.clone();
                let stagger = self.config.stagger_delay(index);
                let timeout = self.config.fetch_timeout;
                let attempted = attempted.clone();
                let succeeded = succeeded.clone();
                let failed = failed.clone();
                let inserted = inserted.clone();

                tasks.push(tokio::spawn(async move {
                    let _permit = match semaphore.acquire_owned().await {
                        Ok(permit) => permit,
                        Err(_) => return,
                    };

                    if stagger > Duration::ZERO {
                        debug!("Staggering {} by {:?}", source.url, stagger);
                        tokio::time::sleep(stagger).await;
                    }

                    attempted.fetch_add(1, Ordering::Relaxed);
                    match process_source(renderer.as_ref(), store.as_ref(), &source, timeout).await
                    {
                        Ok(count) => {
                            succeeded.fetch_add(1, Ordering::Relaxed);
                            inserted.fetch_add(count, Ordering::Relaxed);
                        }
                        Err(e) => {
                            warn!("Scrape failed for {}: {}", source.url, e);
                            failed.fetch_add(1, Ordering::Relaxed);
                            // Best-effort; the store swallows its own
                            // write errors.
                            store
                                .record_failure(FailureEvent::for_source(&source, e.to_string()))
                                .await;
                        }
                    }
                }));
            }

            for task in tasks {
                if let Err(e) = task.await {
                    warn!("Source task panicked: {}", e);
                }
            }

            debug!(
                "Done institution {}, cooling down {:?}",
                institution_id, self.config.institution_cooldown
            );
            tokio::time::sleep(self.config.institution_cooldown).await;
        }

        let summary = RunSummary {
            sources_attempted: attempted.load(Ordering::Relaxed),
            sources_succeeded: succeeded.load(Ordering::Relaxed),
            sources_failed: failed.load(Ordering::Relaxed),
            jobs_inserted: inserted.load(Ordering::Relaxed),
        };
        info!("Run complete: {}", summary);
        Ok(summary)
    }
}

/// Render, extract, and persist one source.
///
/// The hard timeout wraps the whole render call so a wedged page is a
/// normal failure, not a hang.
async fn process_source(
    renderer: &dyn PageRenderer,
    store: &dyn JobStore,
    source: &Source,
    timeout: Duration,
) -> anyhow::Result<usize> {
    let html = tokio::time::timeout(timeout, renderer.render(&source.url))
        .await
        .map_err(|_| anyhow::anyhow!("Fetch timed out after {:?} for {}", timeout, source.url))??;

    let jobs = extract_jobs(&html, source);
    debug!("Parsed {} job(s) from {}", jobs.len(), source.url);
    if jobs.is_empty() {
        return Ok(0);
    }

    let openings: Vec<JobOpening> = jobs
        .into_iter()
        .map(|job| JobOpening::from_parsed(job, source))
        .collect();

    Ok(store.insert_job_openings(&openings).await?)
}

/// Partition sources by owning institution, preserving the order each
/// institution first appears in the snapshot and each institution's
/// source order within its group.
fn group_by_institution(sources: Vec<Source>) -> Vec<(String, Vec<Source>)> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<Source>> = HashMap::new();

    for source in sources {
        if !groups.contains_key(&source.institution_id) {
            order.push(source.institution_id.clone());
        }
        groups
            .entry(source.institution_id.clone())
            .or_default()
            .push(source);
    }

    order
        .into_iter()
        .filter_map(|id| groups.remove(&id).map(|group| (id, group)))
        .collect()
}
