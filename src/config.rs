//! Run-level configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::models::{Institution, Source};

/// Default user agent for rendered fetches.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Pacing and resource limits for one scrape run.
///
/// The per-source stagger (derived from `requests_per_second`) spaces
/// requests against a single institution; `institution_cooldown` and
/// `max_concurrency` bound load across all institutions and on the
/// fetch agent itself.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Maximum concurrent in-flight fetches across the whole run.
    pub max_concurrency: usize,
    /// Request rate within an institution; source N in a group starts
    /// no earlier than `N * (1000ms / rate)` after dispatch.
    pub requests_per_second: f64,
    /// Pause between institution groups.
    pub institution_cooldown: Duration,
    /// Hard cap on a single page render.
    pub fetch_timeout: Duration,
    /// User agent presented by the fetch agent.
    pub user_agent: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 5,
            requests_per_second: 1.0,
            institution_cooldown: Duration::from_secs(5),
            fetch_timeout: Duration::from_secs(60),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ScrapeConfig {
    /// Apply environment variable overrides:
    ///
    /// - `JOBTRAWL_CONCURRENCY` - global in-flight fetch cap
    /// - `JOBTRAWL_RATE` - per-institution requests per second
    /// - `JOBTRAWL_COOLDOWN_MS` - inter-institution cooldown
    /// - `JOBTRAWL_TIMEOUT_SECS` - per-fetch hard timeout
    /// - `JOBTRAWL_USER_AGENT` - user agent string
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(n) = env_parse::<usize>("JOBTRAWL_CONCURRENCY") {
            self.max_concurrency = n.max(1);
        }
        if let Some(rate) = env_parse::<f64>("JOBTRAWL_RATE") {
            if rate > 0.0 {
                self.requests_per_second = rate;
            }
        }
        if let Some(ms) = env_parse::<u64>("JOBTRAWL_COOLDOWN_MS") {
            self.institution_cooldown = Duration::from_millis(ms);
        }
        if let Some(secs) = env_parse::<u64>("JOBTRAWL_TIMEOUT_SECS") {
            self.fetch_timeout = Duration::from_secs(secs);
        }
        if let Ok(ua) = std::env::var("JOBTRAWL_USER_AGENT") {
            if !ua.is_empty() {
                self.user_agent = ua;
            }
        }
        self
    }

    /// Start offset for the source at `index` within its group.
    pub fn stagger_delay(&self, index: usize) -> Duration {
        let rate = self.requests_per_second.max(0.001);
        Duration::from_millis((index as f64 * 1000.0 / rate) as u64)
    }
}

fn env_parse<T: std::str::FromStr>(var: &str) -> Option<T> {
    std::env::var(var).ok().and_then(|s| s.parse().ok())
}

/// Institutions and sources loaded from a TOML seed file, for running
/// against the in-memory store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub institutions: Vec<Institution>,
    #[serde(default)]
    pub sources: Vec<Source>,
}

impl SeedFile {
    /// Load and parse a seed file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Tests that modify environment variables must be serialized
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn defaults() {
        let config = ScrapeConfig::default();
        assert_eq!(config.max_concurrency, 5);
        assert_eq!(config.requests_per_second, 1.0);
        assert_eq!(config.institution_cooldown, Duration::from_secs(5));
        assert_eq!(config.fetch_timeout, Duration::from_secs(60));
    }

    #[test]
    fn env_overrides_applied() {
        let _guard = ENV_MUTEX.lock().unwrap();

        std::env::set_var("JOBTRAWL_CONCURRENCY", "2");
        std::env::set_var("JOBTRAWL_COOLDOWN_MS", "250");
        std::env::set_var("JOBTRAWL_TIMEOUT_SECS", "30");

        let config = ScrapeConfig::default().with_env_overrides();
        assert_eq!(config.max_concurrency, 2);
        assert_eq!(config.institution_cooldown, Duration::from_millis(250));
        assert_eq!(config.fetch_timeout, Duration::from_secs(30));

        std::env::remove_var("JOBTRAWL_CONCURRENCY");
        std::env::remove_var("JOBTRAWL_COOLDOWN_MS");
        std::env::remove_var("JOBTRAWL_TIMEOUT_SECS");
    }

    #[test]
    fn invalid_env_values_ignored() {
        let _guard = ENV_MUTEX.lock().unwrap();

        std::env::set_var("JOBTRAWL_CONCURRENCY", "lots");
        std::env::set_var("JOBTRAWL_RATE", "-3");

        let config = ScrapeConfig::default().with_env_overrides();
        assert_eq!(config.max_concurrency, 5);
        assert_eq!(config.requests_per_second, 1.0);

        std::env::remove_var("JOBTRAWL_CONCURRENCY");
        std::env::remove_var("JOBTRAWL_RATE");
    }

    #[test]
    fn stagger_scales_with_index_and_rate() {
        let config = ScrapeConfig::default();
        assert_eq!(config.stagger_delay(0), Duration::ZERO);
        assert_eq!(config.stagger_delay(3), Duration::from_secs(3));

        let fast = ScrapeConfig {
            requests_per_second: 4.0,
            ..Default::default()
        };
        assert_eq!(fast.stagger_delay(2), Duration::from_millis(500));
    }

    #[test]
    fn seed_file_parses() {
        let raw = r#"
            [[institutions]]
            id = "inst1"
            name = "Example University"
            city = "Pune"

            [[sources]]
            id = "s1"
            institution_id = "inst1"
            source_type = "careers"
            url = "https://example.edu/careers"
            title_selector = ".job-title"
        "#;
        let seed: SeedFile = toml::from_str(raw).unwrap();
        assert_eq!(seed.institutions.len(), 1);
        assert_eq!(seed.sources.len(), 1);
        assert_eq!(seed.sources[0].title_selector.as_deref(), Some(".job-title"));
        assert!(seed.sources[0].active);
    }
}
