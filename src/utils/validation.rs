// file: src/utils/validation.rs
// description: input and configuration validation helpers
// reference: input validation patterns

use crate::error::{AppError, Result, SearchError};
use lazy_static::lazy_static;
use regex::Regex;

/// Upper bound the provider accepts for `max_num_results`.
pub const MAX_RESULTS_LIMIT: i64 = 50;

lazy_static! {
    static ref VECTOR_STORE_ID: Regex =
        Regex::new(r"^vs_[A-Za-z0-9_]+$").expect("valid vector store id pattern");
}

pub struct Validator;

impl Validator {
    pub fn validate_query(query: &str) -> std::result::Result<(), SearchError> {
        if query.trim().is_empty() {
            return Err(SearchError::InvalidRequest(
                "Query must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_max_results(max_results: i64) -> std::result::Result<u32, SearchError> {
        if max_results < 1 {
            return Err(SearchError::InvalidRequest(format!(
                "max_results must be at least 1 (got {})",
                max_results
            )));
        }

        if max_results > MAX_RESULTS_LIMIT {
            return Err(SearchError::InvalidRequest(format!(
                "max_results must be at most {} (got {})",
                MAX_RESULTS_LIMIT, max_results
            )));
        }

        Ok(max_results as u32)
    }

    pub fn validate_vector_store_id(id: &str) -> Result<()> {
        if id.trim().is_empty() {
            return Err(AppError::Validation(
                "Vector store id is required".to_string(),
            ));
        }

        if !VECTOR_STORE_ID.is_match(id) {
            return Err(AppError::Validation(format!(
                "Malformed vector store id: {}",
                id
            )));
        }

        Ok(())
    }

    pub fn validate_url(url: &str) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(AppError::Validation(format!("Invalid URL format: {}", url)));
        }
        Ok(())
    }

    pub fn validate_port(port: u16) -> Result<()> {
        if port == 0 {
            return Err(AppError::Validation("Port cannot be 0".to_string()));
        }
        Ok(())
    }

    /// Truncates on a character boundary and appends an ellipsis.
    pub fn truncate_text(text: &str, max_chars: usize) -> String {
        match text.char_indices().nth(max_chars) {
            Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
            None => text.to_string(),
        }
    }
}
