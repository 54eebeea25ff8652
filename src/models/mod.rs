// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod history;
pub mod request;
pub mod search_result;

pub use history::{HistoryEntry, SearchHistory};
pub use request::{Model, SearchRequest};
pub use search_result::{Citation, ResultItem, SearchResult, SourceCard, UNKNOWN_SOURCE};
