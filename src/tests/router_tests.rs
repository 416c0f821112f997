use std::io::Read;

use astra::Body;
use http::Method;
use serde_json::Value;

use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{make_db, SeedListing};

fn get(uri: &str) -> astra::Request {
    http::Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn body_json(resp: &mut astra::Response) -> Value {
    let mut bytes = Vec::new();
    resp.body_mut().reader().read_to_end(&mut bytes).unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[test]
fn unknown_route_is_not_found() {
    let db = make_db("router_404");
    let err = handle(get("/api/unknown"), &db).unwrap_err();
    assert!(matches!(err, ServerError::NotFound));
}

#[test]
fn search_returns_the_envelope() {
    let db = make_db("router_envelope");
    SeedListing::new("one").insert(&db);

    let mut resp = handle(get("/api/listings/search"), &db).unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap(),
        "application/json"
    );

    let body = body_json(&mut resp);
    assert_eq!(body["results"].as_array().unwrap().len(), 1);
    assert_eq!(body["pagination"]["page"], 1);
    assert_eq!(body["pagination"]["pageSize"], 10);
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["pagination"]["totalPages"], 1);
    assert!(body["appliedFilters"].is_object());
}

#[test]
fn filters_round_trip_into_the_echo() {
    let db = make_db("router_echo");

    let mut resp = handle(
        get("/api/listings/search?propertyType=land&minPrice=200000000&sortBy=price_asc"),
        &db,
    )
    .unwrap();
    let body = body_json(&mut resp);

    assert_eq!(body["appliedFilters"]["propertyType"], "land");
    assert_eq!(body["appliedFilters"]["minPrice"], 200000000i64);
    assert_eq!(body["appliedFilters"]["sortBy"], "price_asc");
}

#[test]
fn malformed_numeric_filters_are_dropped_silently() {
    let db = make_db("router_tolerant");
    SeedListing::new("one").insert(&db);

    let mut resp = handle(
        get("/api/listings/search?minPrice=abc&bedrooms=many&pageSize=ten"),
        &db,
    )
    .unwrap();
    assert_eq!(resp.status(), 200);

    // The broken filters vanish instead of constraining anything.
    let body = body_json(&mut resp);
    assert_eq!(body["pagination"]["total"], 1);
    assert!(body["appliedFilters"].get("minPrice").is_none());
    assert!(body["appliedFilters"].get("bedrooms").is_none());
}

#[test]
fn unknown_sort_key_falls_back_to_newest() {
    let db = make_db("router_sort_fallback");

    let mut resp = handle(get("/api/listings/search?sortBy=shiniest"), &db).unwrap();
    let body = body_json(&mut resp);
    assert_eq!(body["appliedFilters"]["sortBy"], "newest");
}

#[test]
fn out_of_range_latitude_is_a_bad_request() {
    let db = make_db("router_bad_lat");

    let err = handle(
        get("/api/listings/search?latitude=999&longitude=102.6331"),
        &db,
    )
    .unwrap_err();
    assert!(matches!(err, ServerError::BadRequest(_)));
}

#[test]
fn lone_coordinate_is_a_bad_request() {
    let db = make_db("router_lone_lat");

    let err = handle(get("/api/listings/search?latitude=17.9757"), &db).unwrap_err();
    assert!(matches!(err, ServerError::BadRequest(_)));
}

#[test]
fn search_text_is_percent_decoded() {
    let db = make_db("router_decode");
    let mut l = SeedListing::new("hit");
    l.title = "House near morning market".to_string();
    l.insert(&db);

    let mut resp = handle(
        get("/api/listings/search?searchText=morning%20market"),
        &db,
    )
    .unwrap();
    let body = body_json(&mut resp);

    assert_eq!(body["appliedFilters"]["searchText"], "morning market");
    let first = &body["results"][0];
    assert_eq!(first["id"], "hit");
    assert!(first["relevanceScore"].as_f64().unwrap() >= 10.0);
}

#[test]
fn optional_annotations_are_absent_without_their_inputs() {
    let db = make_db("router_absent_fields");
    SeedListing::new("one").insert(&db);

    let mut resp = handle(get("/api/listings/search"), &db).unwrap();
    let body = body_json(&mut resp);

    let first = &body["results"][0];
    assert!(first.get("distanceMeters").is_none());
    assert!(first.get("relevanceScore").is_none());
}

#[test]
fn health_route_answers() {
    let db = make_db("router_health");
    let mut resp = handle(get("/"), &db).unwrap();
    assert_eq!(resp.status(), 200);
    let body = body_json(&mut resp);
    assert_eq!(body["status"], "ok");
}
