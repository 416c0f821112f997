use std::collections::HashMap;

use astra::Request;
use serde_json::json;
use url::form_urlencoded;

use crate::db::Database;
use crate::domain::SearchRequest;
use crate::errors::ServerError;
use crate::responses::{json_response, ResultResp};
use crate::search;

pub fn handle(req: Request, db: &Database) -> ResultResp {
    let method = req.method().as_str();
    let path = req.uri().path();

    match (method, path) {
        ("GET", "/") => json_response(&json!({ "service": "homefind", "status": "ok" })),

        ("GET", "/api/listings/search") => {
            let params = parse_query(&req);
            let search_req = SearchRequest::from_query_pairs(&params)?;
            let response = search::run_search(db, &search_req)?;
            json_response(&response)
        }

        _ => Err(ServerError::NotFound),
    }
}

/// Decode the query string into a key/value map. Repeated keys keep the
/// last value; unknown keys are simply ignored downstream.
fn parse_query(req: &Request) -> HashMap<String, String> {
    let mut map = HashMap::new();

    if let Some(q) = req.uri().query() {
        for (k, v) in form_urlencoded::parse(q.as_bytes()) {
            map.insert(k.into_owned(), v.into_owned());
        }
    }

    map
}
