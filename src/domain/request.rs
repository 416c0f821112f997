use std::collections::HashMap;

use serde::Serialize;

use crate::errors::ServerError;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_RADIUS_METERS: f64 = 5000.0;

/// Explicit sort keys a client may request. `Distance` only takes effect
/// when a geocenter is also supplied; otherwise the default applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Newest,
    Oldest,
    PriceAsc,
    PriceDesc,
    AreaAsc,
    AreaDesc,
    Distance,
}

impl SortKey {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "newest" => Some(SortKey::Newest),
            "oldest" => Some(SortKey::Oldest),
            "price_asc" => Some(SortKey::PriceAsc),
            "price_desc" => Some(SortKey::PriceDesc),
            "area_asc" => Some(SortKey::AreaAsc),
            "area_desc" => Some(SortKey::AreaDesc),
            "distance" => Some(SortKey::Distance),
            _ => None,
        }
    }
}

/// Sparse filter set. Absent fields mean "no constraint", never
/// "match empty". Ranges are inclusive on both bounds and either bound
/// may be omitted independently.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub road_access: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water_source: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_electricity: Option<bool>,
}

/// Validated latitude/longitude center plus radius in meters.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_meters: f64,
}

#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub page: u32,
    pub page_size: u32,
    pub filters: Filters,
    pub search_text: Option<String>,
    pub geo: Option<GeoQuery>,
    pub sort_by: SortKey,
}

impl SearchRequest {
    /// Build a request from decoded query-string pairs.
    ///
    /// Malformed numeric and boolean values are dropped silently, as is
    /// an unknown `sortBy`. The geocenter is the one thing validated
    /// strictly: a lone or out-of-range coordinate is a client error,
    /// rejected before any store access.
    pub fn from_query_pairs(params: &HashMap<String, String>) -> Result<Self, ServerError> {
        let page = parse_num::<u32>(params, "page").unwrap_or(1).max(1);
        let page_size = parse_num::<u32>(params, "pageSize")
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        let filters = Filters {
            property_type: get_text(params, "propertyType"),
            listing_type: get_text(params, "listingType"),
            province: get_text(params, "province"),
            district: get_text(params, "district"),
            min_price: parse_num(params, "minPrice"),
            max_price: parse_num(params, "maxPrice"),
            min_area: parse_num(params, "minArea"),
            max_area: parse_num(params, "maxArea"),
            bedrooms: parse_num(params, "bedrooms"),
            bathrooms: parse_num(params, "bathrooms"),
            condition: get_text(params, "condition"),
            featured: parse_bool(params, "featured"),
            urgent: parse_bool(params, "urgent"),
            road_access: parse_bool(params, "roadAccess"),
            water_source: parse_bool(params, "waterSource"),
            has_electricity: parse_bool(params, "hasElectricity"),
        };

        let geo = parse_geocenter(params)?;

        let sort_by = params
            .get("sortBy")
            .and_then(|s| SortKey::parse(s))
            .unwrap_or(SortKey::Newest);

        Ok(SearchRequest {
            page,
            page_size,
            filters,
            search_text: get_text(params, "searchText"),
            geo,
            sort_by,
        })
    }

    pub fn page_offset(&self) -> u32 {
        (self.page - 1) * self.page_size
    }
}

/// Coordinates must come as a pair and lie inside ±90 / ±180. The radius
/// is ignored entirely when no geocenter is present.
fn parse_geocenter(params: &HashMap<String, String>) -> Result<Option<GeoQuery>, ServerError> {
    let lat = params.get("latitude");
    let lon = params.get("longitude");

    let (lat, lon) = match (lat, lon) {
        (None, None) => return Ok(None),
        (Some(lat), Some(lon)) => (lat, lon),
        _ => {
            return Err(ServerError::BadRequest(
                "latitude and longitude must be supplied together".into(),
            ))
        }
    };

    let lat: f64 = lat
        .parse()
        .map_err(|_| ServerError::BadRequest("latitude is not a number".into()))?;
    let lon: f64 = lon
        .parse()
        .map_err(|_| ServerError::BadRequest("longitude is not a number".into()))?;

    if !(-90.0..=90.0).contains(&lat) {
        return Err(ServerError::BadRequest(format!(
            "latitude {lat} out of range (-90..=90)"
        )));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(ServerError::BadRequest(format!(
            "longitude {lon} out of range (-180..=180)"
        )));
    }

    let radius_meters = parse_num::<f64>(params, "radiusMeters")
        .filter(|r| *r > 0.0)
        .unwrap_or(DEFAULT_RADIUS_METERS);

    Ok(Some(GeoQuery {
        latitude: lat,
        longitude: lon,
        radius_meters,
    }))
}

fn get_text(params: &HashMap<String, String>, key: &str) -> Option<String> {
    params
        .get(key)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_num<T: std::str::FromStr>(params: &HashMap<String, String>, key: &str) -> Option<T> {
    params.get(key).and_then(|s| s.trim().parse().ok())
}

fn parse_bool(params: &HashMap<String, String>, key: &str) -> Option<bool> {
    match params.get(key).map(|s| s.trim()) {
        Some("true") | Some("1") => Some(true),
        Some("false") | Some("0") => Some(false),
        _ => None,
    }
}
