pub mod assemble;
pub mod engine;
pub mod geo;
pub mod predicate;
pub mod score;

pub use engine::{run_search, SearchResponse};
