pub mod errors;
pub mod json;

pub use errors::{error_to_response, ResultResp};
pub use json::json_response;
