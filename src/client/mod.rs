// file: src/client/mod.rs
// description: query client for the hosted file_search capability
// reference: internal module structure

pub mod parse;
pub mod query;
pub mod transport;
pub mod wire;

pub use query::QueryClient;
pub use transport::{HttpTransport, Transport};
pub use wire::{ResponsesRequest, ResponsesResponse};
