use astra::{Body, Response, ResponseBuilder};
use serde::Serialize;

use crate::responses::ResultResp;

pub fn json_response<T: Serialize>(payload: &T) -> ResultResp {
    let body = serde_json::to_string(payload)?;

    let resp = ResponseBuilder::new()
        .status(200)
        .header("Content-Type", mime::APPLICATION_JSON.as_ref())
        .body(Body::from(body))
        .unwrap();

    Ok(resp)
}
