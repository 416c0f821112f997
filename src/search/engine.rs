//! Ranking and pagination orchestration: the one place that decides how a
//! request is sorted, fetched, counted, and sliced.

use serde::Serialize;

use crate::db::{listings, Database};
use crate::domain::{Filters, GeoQuery, Listing, SearchRequest, SearchResult, SortKey};
use crate::errors::ServerError;

use super::assemble::assemble_results;
use super::predicate::Predicate;
use super::score::{relevance_score, sort_by_score_desc};

/// Relevance mode fetches `page_size * RELEVANCE_WINDOW_FACTOR` candidates
/// from offset zero and ranks them in memory, because the store cannot
/// order by the application's scoring function.
///
/// A best-effort heuristic, not a completeness guarantee: when the
/// predicate matches more rows than the window holds, a high-relevance
/// match beyond the window is missed. The factor is a tunable trade-off
/// between that boundary and the memory cap on broad queries.
pub const RELEVANCE_WINDOW_FACTOR: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortMode {
    /// Store-native nearest-first ordering, used verbatim.
    Nearest,
    /// Oversized window, in-memory score-and-slice.
    Relevance,
    /// Store-native field sort with direct offset/limit paging.
    Field(SortKey),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    fn new(page: u32, page_size: u32, total: i64) -> Self {
        let total_pages = (total + page_size as i64 - 1) / page_size as i64;
        Pagination {
            page,
            page_size,
            total,
            total_pages,
        }
    }
}

/// Echo of what the request actually asked for, for client-side display.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedFilters {
    #[serde(flatten)]
    pub filters: Filters,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_center: Option<GeoQuery>,
    pub sort_by: SortKey,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub pagination: Pagination,
    pub applied_filters: AppliedFilters,
}

/// Run one search request end to end. Read-only; nothing is retained
/// across requests.
pub fn run_search(db: &Database, req: &SearchRequest) -> Result<SearchResponse, ServerError> {
    if let Some(geo_query) = &req.geo {
        validate_geocenter(geo_query)?;
    }

    let mode = choose_mode(req);

    let mut predicate = Predicate::build(&req.filters);
    if let Some(text) = &req.search_text {
        // In relevance mode the scorer owns text matching; folding the
        // text clause in would change what the predicate counts.
        if mode != SortMode::Relevance {
            predicate.add_text_filter(text);
        }
    }
    if let Some(geo_query) = &req.geo {
        predicate.add_geo_filter(geo_query);
    }

    db.with_conn(|conn| {
        // Counted against the predicate alone, never against a fetched
        // window, so pagination metadata holds in every mode.
        let total = listings::count_listings(conn, &predicate)?;

        let (page, scores): (Vec<Listing>, Option<Vec<f64>>) = match mode {
            SortMode::Nearest => {
                let center = req.geo.as_ref().ok_or(ServerError::InternalError)?;
                let rows = listings::find_nearest(
                    conn,
                    &predicate,
                    center,
                    req.page_size,
                    req.page_offset(),
                )?;
                (rows, None)
            }
            SortMode::Field(sort) => {
                let rows = listings::find_sorted(
                    conn,
                    &predicate,
                    sort,
                    req.page_size,
                    req.page_offset(),
                )?;
                (rows, None)
            }
            SortMode::Relevance => {
                let text = req.search_text.as_deref().unwrap_or_default();
                let window = req.page_size * RELEVANCE_WINDOW_FACTOR;
                let candidates =
                    listings::find_sorted(conn, &predicate, SortKey::Newest, window, 0)?;

                let mut scored: Vec<(Listing, f64)> = candidates
                    .into_iter()
                    .map(|l| {
                        let s = relevance_score(&l, text);
                        (l, s)
                    })
                    .collect();
                sort_by_score_desc(&mut scored);

                let (rows, scores): (Vec<Listing>, Vec<f64>) = scored
                    .into_iter()
                    .skip(req.page_offset() as usize)
                    .take(req.page_size as usize)
                    .unzip();
                (rows, Some(scores))
            }
        };

        // Scores ride along whenever free text was supplied, even when the
        // ordering was native (annotation only, never a re-sort there).
        let scores = scores.or_else(|| {
            req.search_text
                .as_deref()
                .map(|text| page.iter().map(|l| relevance_score(l, text)).collect())
        });

        let results = assemble_results(conn, page, req.geo.as_ref(), scores.as_deref())?;

        Ok(SearchResponse {
            results,
            pagination: Pagination::new(req.page, req.page_size, total),
            applied_filters: AppliedFilters {
                filters: req.filters.clone(),
                search_text: req.search_text.clone(),
                search_center: req.geo,
                sort_by: req.sort_by,
            },
        })
    })
}

// Request parsing validates too, but the engine guards for itself: an
// out-of-range geocenter must never reach the store.
fn validate_geocenter(geo_query: &GeoQuery) -> Result<(), ServerError> {
    if !(-90.0..=90.0).contains(&geo_query.latitude) {
        return Err(ServerError::BadRequest(format!(
            "latitude {} out of range (-90..=90)",
            geo_query.latitude
        )));
    }
    if !(-180.0..=180.0).contains(&geo_query.longitude) {
        return Err(ServerError::BadRequest(format!(
            "longitude {} out of range (-180..=180)",
            geo_query.longitude
        )));
    }
    Ok(())
}

/// Sort-mode decision, evaluated once per request:
/// a distance sort with a geocenter defers to the store's nearest-first
/// ordering; otherwise free text switches on relevance ranking; otherwise
/// the explicit field sort (default newest) runs natively in the store.
fn choose_mode(req: &SearchRequest) -> SortMode {
    if req.sort_by == SortKey::Distance && req.geo.is_some() {
        SortMode::Nearest
    } else if req.search_text.is_some() {
        SortMode::Relevance
    } else {
        SortMode::Field(req.sort_by)
    }
}
