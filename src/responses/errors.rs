use astra::{Body, Response, ResponseBuilder};
use serde_json::json;

use crate::errors::ServerError;

pub type ResultResp = Result<Response, ServerError>;

/// Convert a ServerError into a proper JSON response.
pub fn error_to_response(err: ServerError) -> Response {
    match err {
        ServerError::NotFound => json_error_response(404, "not_found", "Not Found"),
        ServerError::BadRequest(msg) => json_error_response(400, "bad_request", &msg),
        ServerError::DbError(msg) => json_error_response(500, "db_error", &msg),
        ServerError::InternalError => {
            json_error_response(500, "internal_error", "Internal Server Error")
        }
    }
}

/// Build a JSON error body with the matching status code.
pub fn json_error_response(status: u16, error: &str, message: &str) -> Response {
    let body = json!({ "error": error, "message": message }).to_string();

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", mime::APPLICATION_JSON.as_ref())
        .body(Body::from(body))
        .unwrap()
}
