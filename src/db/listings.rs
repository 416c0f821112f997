use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};

use crate::domain::{GeoQuery, Listing, SortKey};
use crate::errors::ServerError;
use crate::search::predicate::Predicate;

const LISTING_COLUMNS: &str = r#"
    id, owner_id, title, description, tags, keywords,
    province, district, street, latitude, longitude,
    price, floor_area, land_area,
    property_type, listing_type, condition_grade,
    bedrooms, bathrooms, road_access, water_source, has_electricity,
    featured, urgent, view_count, status, created_at
"#;

/// Count matches against the predicate alone. Pagination totals come from
/// here, never from a fetched window.
pub fn count_listings(conn: &Connection, predicate: &Predicate) -> Result<i64, ServerError> {
    let sql = format!("SELECT COUNT(*) FROM listings {}", predicate.where_sql());
    let count = conn.query_row(&sql, params_from_iter(predicate.params()), |row| row.get(0))?;
    Ok(count)
}

/// Fetch one window of listings under a store-native field sort.
pub fn find_sorted(
    conn: &Connection,
    predicate: &Predicate,
    sort: SortKey,
    limit: u32,
    offset: u32,
) -> Result<Vec<Listing>, ServerError> {
    let sql = format!(
        "SELECT {LISTING_COLUMNS} FROM listings {} ORDER BY {} LIMIT ? OFFSET ?",
        predicate.where_sql(),
        order_sql(sort),
    );

    let mut sql_params = predicate.params();
    sql_params.push(Value::from(limit as i64));
    sql_params.push(Value::from(offset as i64));

    query_listings(conn, &sql, sql_params)
}

/// Fetch one page in the store's native nearest-first order. The distance
/// cutoff itself lives in the predicate; only the ordering is added here.
pub fn find_nearest(
    conn: &Connection,
    predicate: &Predicate,
    center: &GeoQuery,
    limit: u32,
    offset: u32,
) -> Result<Vec<Listing>, ServerError> {
    let sql = format!(
        "SELECT {LISTING_COLUMNS} FROM listings {} \
         ORDER BY haversine_m(?, ?, latitude, longitude) ASC, id ASC LIMIT ? OFFSET ?",
        predicate.where_sql(),
    );

    let mut sql_params = predicate.params();
    sql_params.push(Value::from(center.latitude));
    sql_params.push(Value::from(center.longitude));
    sql_params.push(Value::from(limit as i64));
    sql_params.push(Value::from(offset as i64));

    query_listings(conn, &sql, sql_params)
}

// The trailing id key pins a total order, so identical requests always
// page identically.
fn order_sql(sort: SortKey) -> &'static str {
    match sort {
        SortKey::Newest => "created_at DESC, id DESC",
        SortKey::Oldest => "created_at ASC, id ASC",
        SortKey::PriceAsc => "price ASC, id ASC",
        SortKey::PriceDesc => "price DESC, id DESC",
        SortKey::AreaAsc => "COALESCE(floor_area, land_area) ASC, id ASC",
        SortKey::AreaDesc => "COALESCE(floor_area, land_area) DESC, id DESC",
        // Distance ordering is built by `find_nearest`; a bare distance
        // sort without a geocenter falls back to the default.
        SortKey::Distance => "created_at DESC, id DESC",
    }
}

fn query_listings(
    conn: &Connection,
    sql: &str,
    sql_params: Vec<Value>,
) -> Result<Vec<Listing>, ServerError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params_from_iter(sql_params), listing_from_row)?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

fn listing_from_row(row: &Row<'_>) -> rusqlite::Result<Listing> {
    Ok(Listing {
        id: row.get("id")?,
        owner_id: row.get("owner_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        tags: string_list(row.get::<_, String>("tags")?),
        keywords: string_list(row.get::<_, String>("keywords")?),
        province: row.get("province")?,
        district: row.get("district")?,
        street: row.get("street")?,
        latitude: row.get("latitude")?,
        longitude: row.get("longitude")?,
        price: row.get("price")?,
        floor_area: row.get("floor_area")?,
        land_area: row.get("land_area")?,
        property_type: row.get("property_type")?,
        listing_type: row.get("listing_type")?,
        condition_grade: row.get("condition_grade")?,
        bedrooms: row.get("bedrooms")?,
        bathrooms: row.get("bathrooms")?,
        road_access: row.get("road_access")?,
        water_source: row.get("water_source")?,
        has_electricity: row.get("has_electricity")?,
        featured: row.get("featured")?,
        urgent: row.get("urgent")?,
        view_count: row.get("view_count")?,
        status: row.get("status")?,
        created_at: row.get("created_at")?,
    })
}

/// Tags and keywords are stored as JSON array text; anything unreadable
/// degrades to an empty list rather than failing the row.
fn string_list(raw: String) -> Vec<String> {
    serde_json::from_str(&raw).unwrap_or_default()
}
