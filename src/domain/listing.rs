use chrono::NaiveDateTime;
use serde::Serialize;

/// A marketplace listing as read from the store. This subsystem never
/// writes listings; moderation and CRUD live elsewhere.
#[derive(Debug, Clone)]
pub struct Listing {
    pub id: String,
    pub owner_id: Option<String>,

    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub keywords: Vec<String>,

    pub province: Option<String>,
    pub district: Option<String>,
    pub street: Option<String>,

    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    pub price: i64,
    pub floor_area: Option<f64>,
    pub land_area: Option<f64>,

    pub property_type: String,
    pub listing_type: String,
    pub condition_grade: Option<String>,

    pub bedrooms: Option<i64>,
    pub bathrooms: Option<i64>,
    pub road_access: Option<bool>,
    pub water_source: Option<bool>,
    pub has_electricity: Option<bool>,

    pub featured: bool,
    pub urgent: bool,
    pub view_count: i64,

    pub status: String,
    pub created_at: NaiveDateTime,
}

/// Display data for a listing's owner, resolved in a batched lookup.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSummary {
    pub id: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

/// Public projection of a listing plus per-request computed fields.
///
/// `distance_meters` is present iff the request carried a geocenter;
/// `relevance_score` is present iff it carried free text. Scores are only
/// comparable within a single response page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub keywords: Vec<String>,

    pub province: Option<String>,
    pub district: Option<String>,
    pub street: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    pub price: i64,
    pub floor_area: Option<f64>,
    pub land_area: Option<f64>,

    pub property_type: String,
    pub listing_type: String,
    pub condition_grade: Option<String>,

    pub bedrooms: Option<i64>,
    pub bathrooms: Option<i64>,
    pub featured: bool,
    pub urgent: bool,
    pub view_count: i64,

    pub created_at: NaiveDateTime,

    /// Null when the owner reference is missing or dangling.
    pub owner: Option<OwnerSummary>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,
}
