//! Job posting models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::Source;
use crate::fingerprint::job_fingerprint;

/// A job record extracted from a rendered page.
///
/// Ephemeral: created and consumed within a single fetch cycle. The
/// deadline and enrichment fields are left unset by extraction and
/// filled by later stages, if at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedJob {
    /// Posting title, non-empty after trimming.
    pub title: String,
    /// Absolute URL to apply at (falls back to the listing page).
    pub apply_url: String,
    /// Date the posting went up, when a date selector matched.
    pub posted_date: Option<NaiveDate>,
    /// Application deadline. Never derived from page content here.
    pub last_date: Option<NaiveDate>,
    pub role_type: Option<String>,
    pub location: Option<String>,
    pub department: Option<String>,
    pub description: Option<String>,
}

impl ParsedJob {
    /// Create a parsed job with only the extracted fields set.
    pub fn new(title: String, apply_url: String, posted_date: Option<NaiveDate>) -> Self {
        Self {
            title,
            apply_url,
            posted_date,
            last_date: None,
            role_type: None,
            location: None,
            department: None,
            description: None,
        }
    }
}

/// Lifecycle status of a persisted job opening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Active,
    Expired,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
        }
    }
}

/// A persisted job opening.
///
/// Created once per unique fingerprint; the pipeline never updates an
/// existing opening. Two extraction runs that observe the same logical
/// posting produce the same fingerprint regardless of incidental
/// formatting differences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobOpening {
    pub institution_id: String,
    pub source_id: String,
    pub title: String,
    pub apply_url: String,
    pub posted_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub role_type: Option<String>,
    pub location: Option<String>,
    pub department: Option<String>,
    pub description: Option<String>,
    /// Dedup key over (institution, title, last date, apply URL).
    pub fingerprint: String,
    /// The listing page the record was extracted from.
    pub raw_source_url: String,
    pub status: JobStatus,
    pub first_seen: DateTime<Utc>,
}

impl JobOpening {
    /// Build a persistable opening from an extracted job, computing its
    /// fingerprint from the source's institution and the job's
    /// normalized identity fields.
    pub fn from_parsed(job: ParsedJob, source: &Source) -> Self {
        let fingerprint = job_fingerprint(
            &source.institution_id,
            &job.title,
            job.last_date,
            &job.apply_url,
        );

        Self {
            institution_id: source.institution_id.clone(),
            source_id: source.id.clone(),
            title: job.title,
            apply_url: job.apply_url,
            posted_date: job.posted_date,
            last_date: job.last_date,
            role_type: job.role_type,
            location: job.location,
            department: job.department,
            description: job.description,
            fingerprint,
            raw_source_url: source.url.clone(),
            status: JobStatus::Active,
            first_seen: Utc::now(),
        }
    }
}

/// An append-only record of a failed scrape stage.
///
/// Institution and source are optional because failures can occur
/// before a source is resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureEvent {
    pub institution_id: Option<String>,
    pub source_id: Option<String>,
    pub url: String,
    pub message: String,
    pub occurred_at: DateTime<Utc>,
}

impl FailureEvent {
    /// Record a failure for a known source.
    pub fn for_source(source: &Source, message: impl Into<String>) -> Self {
        Self {
            institution_id: Some(source.institution_id.clone()),
            source_id: Some(source.id.clone()),
            url: source.url.clone(),
            message: message.into(),
            occurred_at: Utc::now(),
        }
    }

    /// Record a failure with no resolved source.
    pub fn for_url(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            institution_id: None,
            source_id: None,
            url: url.into(),
            message: message.into(),
            occurred_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceType;

    fn source() -> Source {
        Source::new(
            "s1".into(),
            "inst1".into(),
            SourceType::Careers,
            "https://example.edu/careers".into(),
        )
    }

    #[test]
    fn opening_carries_source_refs() {
        let job = ParsedJob::new(
            "Registrar".into(),
            "https://example.edu/jobs/42".into(),
            None,
        );
        let opening = JobOpening::from_parsed(job, &source());

        assert_eq!(opening.institution_id, "inst1");
        assert_eq!(opening.source_id, "s1");
        assert_eq!(opening.raw_source_url, "https://example.edu/careers");
        assert_eq!(opening.status, JobStatus::Active);
        assert_eq!(opening.fingerprint.len(), 64);
    }

    #[test]
    fn failure_event_without_source() {
        let event = FailureEvent::for_url("https://example.edu", "boom");
        assert!(event.institution_id.is_none());
        assert!(event.source_id.is_none());
        assert_eq!(event.url, "https://example.edu");
    }
}
