//! Source models for scrapeable endpoints.

use serde::{Deserialize, Serialize};

/// Type of page a source points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Careers,
    News,
    Linkedin,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Careers => "careers",
            Self::News => "news",
            Self::Linkedin => "linkedin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "careers" => Some(Self::Careers),
            "news" => Some(Self::News),
            "linkedin" => Some(Self::Linkedin),
            _ => None,
        }
    }
}

/// One scrapeable endpoint belonging to exactly one institution.
///
/// The three selectors are independent configuration data; the
/// extractor is a single engine parameterized by them, with no
/// per-institution code branches. A source with no title selector
/// never yields job records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    /// Unique identifier for this source.
    pub id: String,
    /// Owning institution.
    pub institution_id: String,
    /// What kind of listing page this is.
    pub source_type: SourceType,
    /// Page URL to render, also the base for resolving relative hrefs.
    pub url: String,
    /// CSS selector for job title elements. Required for extraction.
    #[serde(default)]
    pub title_selector: Option<String>,
    /// CSS selector locating the apply link relative to a title element.
    #[serde(default)]
    pub link_selector: Option<String>,
    /// CSS selector locating the posted-date text near a title element.
    #[serde(default)]
    pub date_selector: Option<String>,
    /// Only active sources are scheduled.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Source {
    /// Create a new active source with no selectors configured.
    pub fn new(id: String, institution_id: String, source_type: SourceType, url: String) -> Self {
        Self {
            id,
            institution_id,
            source_type,
            url,
            title_selector: None,
            link_selector: None,
            date_selector: None,
            active: true,
        }
    }

    /// Set the title selector.
    pub fn with_title_selector(mut self, selector: impl Into<String>) -> Self {
        self.title_selector = Some(selector.into());
        self
    }

    /// Set the link selector.
    pub fn with_link_selector(mut self, selector: impl Into<String>) -> Self {
        self.link_selector = Some(selector.into());
        self
    }

    /// Set the date selector.
    pub fn with_date_selector(mut self, selector: impl Into<String>) -> Self {
        self.date_selector = Some(selector.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_type_round_trip() {
        for t in [SourceType::Careers, SourceType::News, SourceType::Linkedin] {
            assert_eq!(SourceType::from_str(t.as_str()), Some(t));
        }
        assert_eq!(SourceType::from_str("rss"), None);
    }

    #[test]
    fn builder_sets_selectors() {
        let source = Source::new(
            "s1".into(),
            "inst1".into(),
            SourceType::Careers,
            "https://example.edu/careers".into(),
        )
        .with_title_selector(".job-title")
        .with_link_selector("a.apply");

        assert_eq!(source.title_selector.as_deref(), Some(".job-title"));
        assert_eq!(source.link_selector.as_deref(), Some("a.apply"));
        assert!(source.date_selector.is_none());
        assert!(source.active);
    }
}
