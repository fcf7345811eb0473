//! Institution model.

use serde::{Deserialize, Serialize};

/// An organization owning one or more scrape sources.
///
/// Institutions are provisioned out-of-band and treated as read-only
/// input by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Institution {
    /// Unique identifier for this institution.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// City, if known.
    #[serde(default)]
    pub city: Option<String>,
    /// State or region, if known.
    #[serde(default)]
    pub state: Option<String>,
    /// Main website, if known.
    #[serde(default)]
    pub website_url: Option<String>,
    /// Whether the institution participates in scraping at all.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Institution {
    /// Create a new active institution.
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            city: None,
            state: None,
            website_url: None,
            active: true,
        }
    }
}
