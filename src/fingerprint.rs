//! Deduplication fingerprint for job postings.
//!
//! The fingerprint is a deterministic function of (institution,
//! normalized title, normalized deadline date, normalized apply URL).
//! It deliberately excludes posted date and the enrichment fields so
//! that re-extractions which refine those are not treated as new
//! postings.

use chrono::NaiveDate;
use sha2::{Digest, Sha256};

/// Delimiter between normalized fields. Not expected to appear in an
/// institution id, and harmless in title/URL since positions stay
/// fixed.
const FIELD_DELIMITER: &str = "|";

/// Compute the dedup fingerprint for a job posting.
///
/// Title and URL are trimmed and lower-cased; the deadline is rendered
/// as `YYYY-MM-DD` or the empty string. The concatenation is hashed
/// with SHA-256 and returned hex-encoded.
pub fn job_fingerprint(
    institution_id: &str,
    title: &str,
    last_date: Option<NaiveDate>,
    apply_url: &str,
) -> String {
    let date = last_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();

    let payload = [
        institution_id,
        &title.trim().to_lowercase(),
        &date,
        &apply_url.trim().to_lowercase(),
    ]
    .join(FIELD_DELIMITER);

    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    hex::encode(hasher.finalize())
}
