//! Geospatial helpers: great-circle distance, the approximate bounding box
//! used to prefilter proximity queries, and the SQL function that lets the
//! store order rows nearest-first.

use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

/// Mean Earth radius in meters, the conventional haversine constant.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Kilometers per degree of latitude (and of longitude at the equator).
const KM_PER_DEGREE: f64 = 111.32;

/// Great-circle distance between two points, in meters rounded to the
/// nearest integer.
///
/// The exact formula matters: result annotation recomputes this value
/// independently of however the store filtered, and the two must agree.
pub fn haversine_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> i64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let d = 2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt());

    d.round() as i64
}

/// Axis-aligned box approximating a circle of `radius_meters` around a
/// center point. Latitude uses a fixed km-per-degree factor; longitude is
/// corrected by the cosine of the center latitude. An approximation only,
/// always paired with an exact distance cutoff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

pub fn bounding_box(center_lat: f64, center_lon: f64, radius_meters: f64) -> BoundingBox {
    let radius_km = radius_meters / 1000.0;
    let lat_delta = radius_km / KM_PER_DEGREE;
    // cos() shrinks toward the poles; keep the box finite near them.
    let lon_scale = center_lat.to_radians().cos().abs().max(1e-9);
    let lon_delta = radius_km / (KM_PER_DEGREE * lon_scale);

    BoundingBox {
        min_lat: center_lat - lat_delta,
        max_lat: center_lat + lat_delta,
        min_lon: center_lon - lon_delta,
        max_lon: center_lon + lon_delta,
    }
}

/// Register `haversine_m(lat1, lon1, lat2, lon2)` on a connection.
///
/// This is what makes the store's "native nearest-first, distance-capped
/// query" real: proximity SQL both filters on and orders by this function.
/// NULL coordinates yield NULL, so unlocated listings drop out of
/// proximity queries instead of erroring.
pub fn register_haversine(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "haversine_m",
        4,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let lat1: Option<f64> = ctx.get(0)?;
            let lon1: Option<f64> = ctx.get(1)?;
            let lat2: Option<f64> = ctx.get(2)?;
            let lon2: Option<f64> = ctx.get(3)?;
            Ok(match (lat1, lon1, lat2, lon2) {
                (Some(lat1), Some(lon1), Some(lat2), Some(lon2)) => {
                    Some(haversine_meters(lat1, lon1, lat2, lon2) as f64)
                }
                _ => None,
            })
        },
    )
}
