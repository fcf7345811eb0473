//! jobtrawl - institutional job posting acquisition pipeline.
//!
//! Periodically visits a configured set of career/news pages, extracts
//! postings from rendered HTML, deduplicates them by fingerprint, and
//! persists new ones while isolating per-target failures.

// Model types use `from_str` methods that return Self (infallible parse),
// not Result<Self, Error> as std::str::FromStr requires.
#![allow(clippy::should_implement_trait)]

pub mod browser;
pub mod cli;
pub mod config;
pub mod extract;
pub mod fingerprint;
pub mod models;
pub mod scheduler;
pub mod store;
