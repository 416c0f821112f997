pub mod listing;
pub mod request;

pub use listing::{Listing, OwnerSummary, SearchResult};
pub use request::{Filters, GeoQuery, SearchRequest, SortKey};
