//! Relevance scoring for free-text search.
//!
//! Deterministic and side-effect free: the same listing and query always
//! produce the same score. The store cannot evaluate this function, which
//! is why relevance mode fetches an oversized window and ranks in memory.

use crate::domain::Listing;

const TITLE_CONTAINS: f64 = 10.0;
const TITLE_EXACT_BONUS: f64 = 5.0;
const TAG_CONTAINS: f64 = 8.0;
const KEYWORD_CONTAINS: f64 = 7.0;
const PROVINCE_CONTAINS: f64 = 6.0;
const DISTRICT_CONTAINS: f64 = 5.0;
const STREET_CONTAINS: f64 = 4.0;
const DESCRIPTION_CONTAINS: f64 = 3.0;
const FEATURED_BOOST: f64 = 2.0;
const URGENT_BOOST: f64 = 1.0;

/// Popularity contributes viewCount/100, capped so a heavily viewed
/// listing can nudge ranking but never outweigh a text match.
const POPULARITY_CAP: f64 = 3.0;

/// Score a candidate listing against a free-text query. Higher is more
/// relevant; all text checks are case-insensitive substring matches.
pub fn relevance_score(listing: &Listing, query: &str) -> f64 {
    let q = query.to_lowercase();
    let mut score = 0.0;

    let title = listing.title.to_lowercase();
    if title.contains(&q) {
        score += TITLE_CONTAINS;
        if title == q {
            score += TITLE_EXACT_BONUS;
        }
    }

    for tag in &listing.tags {
        if tag.to_lowercase().contains(&q) {
            score += TAG_CONTAINS;
        }
    }
    for keyword in &listing.keywords {
        if keyword.to_lowercase().contains(&q) {
            score += KEYWORD_CONTAINS;
        }
    }

    if field_contains(&listing.province, &q) {
        score += PROVINCE_CONTAINS;
    }
    if field_contains(&listing.district, &q) {
        score += DISTRICT_CONTAINS;
    }
    if field_contains(&listing.street, &q) {
        score += STREET_CONTAINS;
    }
    if listing.description.to_lowercase().contains(&q) {
        score += DESCRIPTION_CONTAINS;
    }

    if listing.featured {
        score += FEATURED_BOOST;
    }
    if listing.urgent {
        score += URGENT_BOOST;
    }

    score += (listing.view_count as f64 / 100.0).min(POPULARITY_CAP);

    score
}

/// Stable descending sort by score. Stability is the tie-break policy:
/// equal scores keep the underlying most-recent-first fetch order.
pub fn sort_by_score_desc(scored: &mut [(Listing, f64)]) {
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
}

fn field_contains(field: &Option<String>, needle: &str) -> bool {
    field
        .as_deref()
        .map(|f| f.to_lowercase().contains(needle))
        .unwrap_or(false)
}
