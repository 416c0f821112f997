//! Final packaging of a result page: owner resolution and the per-request
//! computed annotations.

use rusqlite::Connection;

use crate::db::users;
use crate::domain::{GeoQuery, Listing, SearchResult};
use crate::errors::ServerError;

use super::geo;

/// Turn fetched listings into response results, in order.
///
/// Owners are resolved in one batched lookup; a missing or dangling
/// owner reference becomes `null`, never an error. When `scores` is
/// supplied it must be index-aligned with `listings`.
pub fn assemble_results(
    conn: &Connection,
    listings: Vec<Listing>,
    center: Option<&GeoQuery>,
    scores: Option<&[f64]>,
) -> Result<Vec<SearchResult>, ServerError> {
    let mut owner_ids: Vec<String> = listings
        .iter()
        .filter_map(|l| l.owner_id.clone())
        .collect();
    owner_ids.sort();
    owner_ids.dedup();

    let owners = users::get_owner_summaries(conn, &owner_ids)?;

    let results = listings
        .into_iter()
        .enumerate()
        .map(|(i, listing)| {
            let owner = listing
                .owner_id
                .as_ref()
                .and_then(|id| owners.get(id))
                .cloned();

            // Distance is always measured to the single reference point,
            // recomputed here regardless of how the store filtered.
            let distance_meters = center.and_then(|c| {
                match (listing.latitude, listing.longitude) {
                    (Some(lat), Some(lon)) => {
                        Some(geo::haversine_meters(c.latitude, c.longitude, lat, lon))
                    }
                    _ => None,
                }
            });

            let relevance_score = scores.map(|s| s[i]);

            SearchResult {
                id: listing.id,
                title: listing.title,
                description: listing.description,
                tags: listing.tags,
                keywords: listing.keywords,
                province: listing.province,
                district: listing.district,
                street: listing.street,
                latitude: listing.latitude,
                longitude: listing.longitude,
                price: listing.price,
                floor_area: listing.floor_area,
                land_area: listing.land_area,
                property_type: listing.property_type,
                listing_type: listing.listing_type,
                condition_grade: listing.condition_grade,
                bedrooms: listing.bedrooms,
                bathrooms: listing.bathrooms,
                featured: listing.featured,
                urgent: listing.urgent,
                view_count: listing.view_count,
                created_at: listing.created_at,
                owner,
                distance_meters,
                relevance_score,
            }
        })
        .collect();

    Ok(results)
}
