//! Selector-driven extraction of job postings from rendered HTML.
//!
//! A single engine parameterized by per-source selector configuration.
//! Pure: no I/O, no concurrency concerns. Field-level problems (empty
//! title, missing href, unparseable date) skip or null that field and
//! keep going; they are never errors.

mod dates;

pub use dates::parse_date_loose;

use scraper::{ElementRef, Html, Selector};
use tracing::warn;
use url::Url;

use crate::models::{ParsedJob, Source};

/// Extract job records from a rendered page, in document order of the
/// matched title elements.
///
/// A source with no title selector yields nothing; that is an explicit
/// no-op, not an error. No deduplication happens here — identical
/// records collapse downstream on their fingerprint.
pub fn extract_jobs(html: &str, source: &Source) -> Vec<ParsedJob> {
    let Some(title_selector) = parse_selector(source.title_selector.as_deref(), source) else {
        return Vec::new();
    };
    let link_selector = parse_selector(source.link_selector.as_deref(), source);
    let date_selector = parse_selector(source.date_selector.as_deref(), source);

    let document = Html::parse_document(html);
    let mut jobs = Vec::new();

    for element in document.select(&title_selector) {
        let title = element_text(&element);
        if title.is_empty() {
            continue;
        }

        let apply_url = resolve_apply_url(&element, link_selector.as_ref(), &source.url);

        let posted_date = date_selector
            .as_ref()
            .and_then(|sel| date_text(&element, sel))
            .and_then(|text| parse_date_loose(&text));

        jobs.push(ParsedJob::new(title, apply_url, posted_date));
    }

    jobs
}

/// Parse an optional selector string; invalid selectors behave as
/// absent and are logged once per extraction call.
fn parse_selector(selector: Option<&str>, source: &Source) -> Option<Selector> {
    let selector = selector?;
    match Selector::parse(selector) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!(
                "Invalid selector {:?} on source {}: {}",
                selector, source.id, e
            );
            None
        }
    }
}

/// Concatenated descendant text, whitespace-trimmed.
fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// The element itself if it matches, else its nearest matching
/// ancestor.
fn closest<'a>(element: &ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    if selector.matches(element) {
        return Some(*element);
    }
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| selector.matches(ancestor))
}

/// First sibling matching the selector, in document order.
fn nearest_sibling<'a>(element: &ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    let parent = element.parent()?;
    let own_id = element.id();

    parent
        .children()
        .filter(|node| node.id() != own_id)
        .filter_map(ElementRef::wrap)
        .find(|sibling| selector.matches(sibling))
}

/// Resolve the apply URL for one title element.
///
/// With a link selector: closest self-or-ancestor match, else the
/// first matching descendant, taking its `href`. Without one, or when
/// that match carries no `href`, the title element's own `href` is
/// used. Whatever href was found resolves against the source URL; no
/// href at all means the posting links back to the listing page.
fn resolve_apply_url(element: &ElementRef, link_selector: Option<&Selector>, base: &str) -> String {
    let href = link_selector
        .and_then(|sel| {
            closest(element, sel).or_else(|| element.select(sel).next())
        })
        .and_then(|link| link.value().attr("href"))
        .or_else(|| element.value().attr("href"));

    match href {
        Some(href) => resolve_url(base, href),
        None => base.to_string(),
    }
}

/// Posted-date text for one title element: closest self-or-ancestor
/// match, else the nearest sibling match.
fn date_text(element: &ElementRef, date_selector: &Selector) -> Option<String> {
    let from_ancestor = closest(element, date_selector)
        .map(|el| element_text(&el))
        .filter(|text| !text.is_empty());

    from_ancestor.or_else(|| {
        nearest_sibling(element, date_selector)
            .map(|el| element_text(&el))
            .filter(|text| !text.is_empty())
    })
}

/// Resolve a possibly-relative href against a base URL, falling back
/// to the base when either side is unparseable.
fn resolve_url(base: &str, href: &str) -> String {
    match Url::parse(base).and_then(|b| b.join(href)) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => base.to_string(),
    }
}
