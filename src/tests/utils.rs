use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::params;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::db::connection::init_db;
use crate::db::Database;
use crate::domain::{Filters, SearchRequest, SortKey};

/// An unfiltered default request: page 1, ten per page, newest first.
pub fn base_request() -> SearchRequest {
    SearchRequest {
        page: 1,
        page_size: 10,
        filters: Filters::default(),
        search_text: None,
        geo: None,
        sort_by: SortKey::Newest,
    }
}

/// Returns a fresh test database using the production schema.
pub fn make_db(prefix: &str) -> Database {
    let path = std::env::temp_dir().join(format!(
        "{prefix}_{}.sqlite",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    let db = Database::new(path.to_string_lossy().to_string());
    init_db(&db, "sql/schema.sql").expect("Failed to initialize DB");
    db
}

/// Deterministic timestamps for ordering tests: a fixed base plus an
/// offset in seconds.
pub fn ts(offset_secs: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        + chrono::Duration::seconds(offset_secs)
}

/// One seedable listing row with sensible defaults: an approved house for
/// sale in Vientiane with no coordinates, no owner, and zero views.
#[derive(Debug, Clone)]
pub struct SeedListing {
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

impl SeedListing {
    pub fn new(id: &str) -> Self {
        SeedListing {
            id: id.to_string(),
            owner_id: None,
            title: format!("Listing {id}"),
            description: String::new(),
            tags: Vec::new(),
            keywords: Vec::new(),
            province: Some("Vientiane Capital".to_string()),
            district: Some("Chanthabouly".to_string()),
            street: None,
            latitude: None,
            longitude: None,
            price: 500_000_000,
            floor_area: Some(120.0),
            land_area: None,
            property_type: "house".to_string(),
            listing_type: "sale".to_string(),
            condition_grade: None,
            bedrooms: None,
            bathrooms: None,
            road_access: None,
            water_source: None,
            has_electricity: None,
            featured: false,
            urgent: false,
            view_count: 0,
            status: "approved".to_string(),
            created_at: ts(0),
        }
    }

    pub fn insert(&self, db: &Database) {
        db.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO listings (
                    id, owner_id, title, description, tags, keywords,
                    province, district, street, latitude, longitude,
                    price, floor_area, land_area,
                    property_type, listing_type, condition_grade,
                    bedrooms, bathrooms, road_access, water_source, has_electricity,
                    featured, urgent, view_count, status, created_at
                ) VALUES (
                    ?1, ?2, ?3, ?4, ?5, ?6,
                    ?7, ?8, ?9, ?10, ?11,
                    ?12, ?13, ?14,
                    ?15, ?16, ?17,
                    ?18, ?19, ?20, ?21, ?22,
                    ?23, ?24, ?25, ?26, ?27
                )
                "#,
                params![
                    self.id,
                    self.owner_id,
                    self.title,
                    self.description,
                    serde_json::to_string(&self.tags).unwrap(),
                    serde_json::to_string(&self.keywords).unwrap(),
                    self.province,
                    self.district,
                    self.street,
                    self.latitude,
                    self.longitude,
                    self.price,
                    self.floor_area,
                    self.land_area,
                    self.property_type,
                    self.listing_type,
                    self.condition_grade,
                    self.bedrooms,
                    self.bathrooms,
                    self.road_access,
                    self.water_source,
                    self.has_electricity,
                    self.featured,
                    self.urgent,
                    self.view_count,
                    self.status,
                    self.created_at,
                ],
            )?;
            Ok(())
        })
        .expect("Failed to insert seed listing");
    }
}

pub fn seed_owner(db: &Database, id: &str, display_name: &str, avatar_url: Option<&str>) {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO users (id, display_name, avatar_url) VALUES (?1, ?2, ?3)",
            params![id, display_name, avatar_url],
        )?;
        Ok(())
    })
    .expect("Failed to insert seed owner");
}
