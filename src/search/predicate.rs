//! Turns a sparse filter set into one composable SQL predicate.
//!
//! Pure construction: nothing here touches a connection. The store layer
//! appends ordering and paging around the WHERE clause built here.

use rusqlite::types::Value;

use crate::domain::{Filters, GeoQuery};

use super::geo;

/// A WHERE clause under construction: conjunctive clauses plus their
/// positional parameters, in matching order.
#[derive(Debug, Default)]
pub struct Predicate {
    clauses: Vec<String>,
    params: Vec<Value>,
}

impl Predicate {
    /// Build the filter predicate for a request. Only approved listings
    /// are ever searchable, so that clause is unconditional; every other
    /// clause appears only when its filter was supplied.
    pub fn build(filters: &Filters) -> Self {
        let mut p = Predicate::default();

        p.push("status = ?", Value::from("approved".to_string()));

        if let Some(v) = &filters.property_type {
            p.push("property_type = ?", Value::from(v.clone()));
        }
        if let Some(v) = &filters.listing_type {
            p.push("listing_type = ?", Value::from(v.clone()));
        }
        if let Some(v) = &filters.condition {
            p.push("condition_grade = ?", Value::from(v.clone()));
        }
        if let Some(v) = filters.bedrooms {
            p.push("bedrooms = ?", Value::from(v));
        }
        if let Some(v) = filters.bathrooms {
            p.push("bathrooms = ?", Value::from(v));
        }
        if let Some(v) = filters.featured {
            p.push("featured = ?", Value::from(v as i64));
        }
        if let Some(v) = filters.urgent {
            p.push("urgent = ?", Value::from(v as i64));
        }
        if let Some(v) = filters.road_access {
            p.push("road_access = ?", Value::from(v as i64));
        }
        if let Some(v) = filters.water_source {
            p.push("water_source = ?", Value::from(v as i64));
        }
        if let Some(v) = filters.has_electricity {
            p.push("has_electricity = ?", Value::from(v as i64));
        }

        // Administrative areas match as substrings: "Vientiane" should hit
        // "Vientiane Capital" too.
        if let Some(v) = &filters.province {
            p.push_like("province", v);
        }
        if let Some(v) = &filters.district {
            p.push_like("district", v);
        }

        // Inclusive on both bounds; each bound independent.
        if let Some(v) = filters.min_price {
            p.push("price >= ?", Value::from(v));
        }
        if let Some(v) = filters.max_price {
            p.push("price <= ?", Value::from(v));
        }
        if let Some(v) = filters.min_area {
            p.push("COALESCE(floor_area, land_area) >= ?", Value::from(v));
        }
        if let Some(v) = filters.max_area {
            p.push("COALESCE(floor_area, land_area) <= ?", Value::from(v));
        }

        p
    }

    /// Legacy simple-text mode: OR a case-insensitive substring match
    /// across the descriptive fields. Used only when relevance ranking is
    /// not active (the scorer owns text matching otherwise).
    pub fn add_text_filter(&mut self, text: &str) {
        let pattern = Value::from(format!("%{}%", text.to_lowercase()));
        let fields = [
            "title",
            "description",
            "street",
            "district",
            "province",
            "tags",
            "keywords",
        ];
        let clause = fields
            .iter()
            .map(|f| format!("lower(COALESCE({f}, '')) LIKE ?"))
            .collect::<Vec<_>>()
            .join(" OR ");
        self.clauses.push(format!("({clause})"));
        for _ in fields {
            self.params.push(pattern.clone());
        }
    }

    /// Fold the proximity filter into the predicate: an index-friendly
    /// bounding-box prefilter plus the exact distance cutoff. Count and
    /// fetch queries share this, which is what keeps pagination totals
    /// honest for geo searches.
    pub fn add_geo_filter(&mut self, geo_query: &GeoQuery) {
        let bbox = geo::bounding_box(geo_query.latitude, geo_query.longitude, geo_query.radius_meters);

        self.push("latitude BETWEEN ? AND ?", Value::from(bbox.min_lat));
        self.params.push(Value::from(bbox.max_lat));
        self.push("longitude BETWEEN ? AND ?", Value::from(bbox.min_lon));
        self.params.push(Value::from(bbox.max_lon));

        self.clauses
            .push("haversine_m(?, ?, latitude, longitude) <= ?".to_string());
        self.params.push(Value::from(geo_query.latitude));
        self.params.push(Value::from(geo_query.longitude));
        self.params.push(Value::from(geo_query.radius_meters));
    }

    fn push(&mut self, clause: &str, param: Value) {
        self.clauses.push(clause.to_string());
        self.params.push(param);
    }

    fn push_like(&mut self, column: &str, needle: &str) {
        self.clauses
            .push(format!("lower(COALESCE({column}, '')) LIKE ?"));
        self.params
            .push(Value::from(format!("%{}%", needle.to_lowercase())));
    }

    /// The full `WHERE ...` fragment (never empty: status is always bound).
    pub fn where_sql(&self) -> String {
        format!("WHERE {}", self.clauses.join(" AND "))
    }

    /// Positional parameters matching `where_sql`, cloned so callers can
    /// append ordering/paging parameters of their own.
    pub fn params(&self) -> Vec<Value> {
        self.params.clone()
    }
}
