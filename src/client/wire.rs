// file: src/client/wire.rs
// description: Responses API request and response payloads for file_search
// reference: https://platform.openai.com/docs/api-reference/responses

use crate::models::SearchRequest;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// `include` entry that asks the provider to return the raw retrieved passages.
pub const INCLUDE_SEARCH_RESULTS: &str = "file_search_call.results";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponsesRequest {
    pub model: String,
    pub input: String,
    pub tools: Vec<FileSearchTool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileSearchTool {
    #[serde(rename = "type")]
    pub kind: String,
    pub vector_store_ids: Vec<String>,
    pub max_num_results: u32,
}

impl ResponsesRequest {
    pub fn file_search(request: &SearchRequest, vector_store_id: &str) -> Self {
        let include = if request.include_results {
            vec![INCLUDE_SEARCH_RESULTS.to_string()]
        } else {
            Vec::new()
        };

        Self {
            model: request.model.as_str().to_string(),
            input: request.query.clone(),
            tools: vec![FileSearchTool {
                kind: "file_search".to_string(),
                vector_store_ids: vec![vector_store_id.to_string()],
                max_num_results: request.max_results,
            }],
            include,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponsesResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub error: Option<ProviderErrorBody>,
    #[serde(default)]
    pub output: Vec<OutputItem>,
}

/// Error object, either top-level in a completed body or wrapped in an error envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ProviderErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputItem {
    FileSearchCall(FileSearchCall),
    Message(MessageItem),
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileSearchCall {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub queries: Option<Vec<String>>,
    #[serde(default, alias = "search_results")]
    pub results: Option<Vec<SearchHit>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub file_id: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub score: Option<f32>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub content: Vec<HitContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HitContent {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageItem {
    #[serde(default)]
    pub content: Vec<ContentPart>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    OutputText {
        text: String,
        #[serde(default, deserialize_with = "lenient_annotations")]
        annotations: Vec<Annotation>,
    },
    Refusal {
        refusal: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Annotation {
    FileCitation {
        #[serde(default, deserialize_with = "lenient_offset")]
        index: Option<i64>,
        #[serde(default)]
        file_id: Option<String>,
        #[serde(default)]
        filename: Option<String>,
        #[serde(default)]
        quote: Option<String>,
    },
    ContainerFileCitation {
        #[serde(default, deserialize_with = "lenient_offset")]
        end_index: Option<i64>,
        #[serde(default)]
        file_id: Option<String>,
        #[serde(default)]
        filename: Option<String>,
    },
    UrlCitation {
        #[serde(default, deserialize_with = "lenient_offset")]
        end_index: Option<i64>,
        #[serde(default)]
        url: Option<String>,
    },
    #[serde(other)]
    Other,
}

/// Annotations that fail to decode are skipped instead of failing the response.
fn lenient_annotations<'de, D>(deserializer: D) -> Result<Vec<Annotation>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<Annotation>(value) {
            Ok(annotation) => Some(annotation),
            Err(e) => {
                warn!("Skipping malformed annotation: {}", e);
                None
            }
        })
        .collect())
}

/// Offsets beyond `i64` saturate so they clamp later. Numeric strings are accepted.
fn lenient_offset<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let offset = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_u64().map(|_| i64::MAX)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        Some(_) => None,
    };
    Ok(offset)
}
