// file: src/models/request.rs
// description: search request model and supported model identifiers
// reference: OpenAI Responses API model names

use crate::error::SearchError;
use crate::utils::Validator;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Models the front-end offers. The first entry is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Model {
    #[default]
    #[serde(rename = "gpt-4o")]
    Gpt4o,
    #[serde(rename = "gpt-4o-mini")]
    Gpt4oMini,
    #[serde(rename = "gpt-3.5-turbo")]
    Gpt35Turbo,
}

impl Model {
    pub const ALL: [Model; 3] = [Model::Gpt4o, Model::Gpt4oMini, Model::Gpt35Turbo];

    pub fn as_str(&self) -> &'static str {
        match self {
            Model::Gpt4o => "gpt-4o",
            Model::Gpt4oMini => "gpt-4o-mini",
            Model::Gpt35Turbo => "gpt-3.5-turbo",
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Model {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Model::ALL
            .into_iter()
            .find(|m| m.as_str() == s.trim())
            .ok_or_else(|| SearchError::InvalidRequest(format!("Unsupported model: {}", s)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub model: Model,
    pub max_results: u32,
    pub include_results: bool,
}

impl SearchRequest {
    /// Checked constructor. Accepts a signed count so callers can pass raw input through.
    pub fn new(
        query: impl Into<String>,
        model: Model,
        max_results: i64,
        include_results: bool,
    ) -> Result<Self, SearchError> {
        let query = query.into();
        Validator::validate_query(&query)?;
        let max_results = Validator::validate_max_results(max_results)?;

        Ok(Self {
            query: query.trim().to_string(),
            model,
            max_results,
            include_results,
        })
    }

    pub fn validate(&self) -> Result<(), SearchError> {
        Validator::validate_query(&self.query)?;
        Validator::validate_max_results(i64::from(self.max_results))?;
        Ok(())
    }
}
