//! Command-line interface.
//!
//! Thin wrapper over the scheduler: load configuration, run once,
//! print the summary. Recurring execution belongs to an external
//! trigger (cron, systemd timer), not to this binary.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::config::{ScrapeConfig, SeedFile};
use crate::scheduler::ScrapeRunner;
use crate::store::MemoryStore;

#[derive(Parser)]
#[command(name = "jobtrawl", about = "Institutional job posting acquisition pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape every active source once
    Run {
        /// TOML file with institutions and sources
        #[arg(long, env = "JOBTRAWL_SEED")]
        seed: PathBuf,

        /// Global in-flight fetch cap
        #[arg(long)]
        concurrency: Option<usize>,

        /// Per-institution requests per second
        #[arg(long)]
        rate: Option<f64>,

        /// Inter-institution cooldown in milliseconds
        #[arg(long)]
        cooldown_ms: Option<u64>,

        /// Per-fetch hard timeout in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
}

/// Parse arguments and run the requested command.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run {
            seed,
            concurrency,
            rate,
            cooldown_ms,
            timeout_secs,
        } => {
            let mut config = ScrapeConfig::default().with_env_overrides();
            if let Some(n) = concurrency {
                config.max_concurrency = n.max(1);
            }
            if let Some(r) = rate {
                if r > 0.0 {
                    config.requests_per_second = r;
                }
            }
            if let Some(ms) = cooldown_ms {
                config.institution_cooldown = std::time::Duration::from_millis(ms);
            }
            if let Some(secs) = timeout_secs {
                config.fetch_timeout = std::time::Duration::from_secs(secs);
            }

            cmd_run(&seed, config).await
        }
    }
}

#[cfg(feature = "browser")]
async fn cmd_run(seed_path: &PathBuf, config: ScrapeConfig) -> anyhow::Result<()> {
    use crate::browser::{BrowserRenderer, PageRenderer};

    let seed = SeedFile::load(seed_path)?;
    let sources = active_sources(seed);
    if sources.is_empty() {
        anyhow::bail!("Seed file has no active sources");
    }

    let store = Arc::new(MemoryStore::with_sources(sources));
    let renderer = Arc::new(BrowserRenderer::new(
        config.user_agent.clone(),
        config.fetch_timeout,
    ));

    let runner = ScrapeRunner::new(config, renderer.clone(), store.clone());
    let summary = runner.run().await;
    renderer.close().await;
    let summary = summary?;

    println!("{}", summary);
    for failure in store.failures().await {
        println!("  failed: {} ({})", failure.url, failure.message);
    }
    Ok(())
}

#[cfg(not(feature = "browser"))]
async fn cmd_run(_seed_path: &PathBuf, _config: ScrapeConfig) -> anyhow::Result<()> {
    anyhow::bail!("Browser support not compiled. Rebuild with: cargo build --features browser")
}

/// Drop sources whose owning institution is missing or inactive, and
/// inactive sources themselves.
fn active_sources(seed: SeedFile) -> Vec<crate::models::Source> {
    let active_institutions: std::collections::HashSet<&str> = seed
        .institutions
        .iter()
        .filter(|i| i.active)
        .map(|i| i.id.as_str())
        .collect();

    seed.sources
        .into_iter()
        .filter(|s| {
            if !active_institutions.contains(s.institution_id.as_str()) {
                tracing::warn!(
                    "Skipping source {}: institution {} missing or inactive",
                    s.id,
                    s.institution_id
                );
                return false;
            }
            s.active
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Institution, Source, SourceType};

    #[test]
    fn sources_of_inactive_institutions_are_dropped() {
        let mut inactive = Institution::new("ghost".into(), "Ghost College".into());
        inactive.active = false;

        let seed = SeedFile {
            institutions: vec![Institution::new("inst1".into(), "Example".into()), inactive],
            sources: vec![
                Source::new(
                    "s1".into(),
                    "inst1".into(),
                    SourceType::Careers,
                    "https://example.edu/careers".into(),
                ),
                Source::new(
                    "s2".into(),
                    "ghost".into(),
                    SourceType::News,
                    "https://ghost.edu/news".into(),
                ),
                Source::new(
                    "s3".into(),
                    "unknown".into(),
                    SourceType::News,
                    "https://unknown.edu/news".into(),
                ),
            ],
        };

        let sources = active_sources(seed);
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].id, "s1");
    }
}
