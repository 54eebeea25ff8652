// file: src/client/parse.rs
// description: normalizes a Responses API payload into a SearchResult
// reference: file_search output items and output_text annotations

use crate::client::wire::{Annotation, ContentPart, OutputItem, ResponsesResponse, SearchHit};
use crate::error::SearchError;
use crate::models::{Citation, ResultItem, SearchResult, UNKNOWN_SOURCE};
use tracing::{debug, warn};

pub fn normalize(
    response: ResponsesResponse,
    include_results: bool,
) -> Result<SearchResult, SearchError> {
    if let Some(error) = response.error {
        return Err(SearchError::Provider {
            status: 200,
            message: error
                .message
                .or(error.code)
                .unwrap_or_else(|| "Provider reported an error".to_string()),
        });
    }

    let mut answer_part: Option<(String, Vec<Annotation>)> = None;
    let mut queries = Vec::new();
    let mut hits = Vec::new();

    for item in response.output {
        match item {
            OutputItem::FileSearchCall(call) => {
                debug!(
                    "file_search_call {} finished with status {}",
                    call.id.as_deref().unwrap_or("?"),
                    call.status.as_deref().unwrap_or("unknown")
                );
                queries.extend(call.queries.unwrap_or_default());
                hits.extend(call.results.unwrap_or_default());
            }
            OutputItem::Message(message) if answer_part.is_none() => {
                answer_part = first_text(message.content);
            }
            _ => {}
        }
    }

    let (answer, annotations) = answer_part.ok_or_else(|| {
        SearchError::Parse(format!(
            "Response {} contained no output_text",
            response.id.as_deref().unwrap_or("?")
        ))
    })?;

    let citations = build_citations(&answer, annotations);

    let results = if include_results {
        hits.into_iter().map(result_item).collect()
    } else {
        if !hits.is_empty() {
            debug!("Discarding {} raw results that were not requested", hits.len());
        }
        Vec::new()
    };

    Ok(SearchResult {
        answer,
        citations,
        results,
        queries,
    })
}

/// First output_text part, falling back to a refusal.
fn first_text(content: Vec<ContentPart>) -> Option<(String, Vec<Annotation>)> {
    let mut refusal = None;
    for part in content {
        match part {
            ContentPart::OutputText { text, annotations } => return Some((text, annotations)),
            ContentPart::Refusal { refusal: text } if refusal.is_none() => refusal = Some(text),
            _ => {}
        }
    }
    refusal.map(|text| (text, Vec::new()))
}

fn build_citations(answer: &str, annotations: Vec<Annotation>) -> Vec<Citation> {
    let answer_len = answer.chars().count();
    let mut citations = Vec::with_capacity(annotations.len());

    for annotation in annotations {
        let (file, file_id, quoted_text, raw_offset) = match annotation {
            Annotation::FileCitation {
                index,
                file_id,
                filename,
                quote,
            } => (non_empty(filename).or_else(|| file_id.clone()), file_id, quote, index),
            Annotation::ContainerFileCitation {
                end_index,
                file_id,
                filename,
            } => (non_empty(filename).or_else(|| file_id.clone()), file_id, None, end_index),
            Annotation::UrlCitation { end_index, url } => (non_empty(url), None, None, end_index),
            Annotation::Other => {
                debug!("Skipping unsupported annotation type");
                continue;
            }
        };

        let index = citations.len();
        citations.push(Citation {
            index,
            file: file.unwrap_or_else(|| UNKNOWN_SOURCE.to_string()),
            file_id,
            quoted_text,
            offset: clamp_offset(raw_offset, answer_len, index),
        });
    }

    citations
}

/// Negative offsets are dropped; offsets past the end are clamped to it.
fn clamp_offset(raw: Option<i64>, answer_len: usize, index: usize) -> Option<usize> {
    let raw = raw?;
    if raw < 0 {
        warn!("Citation {} has negative offset {}, omitting marker", index, raw);
        return None;
    }

    let offset = raw as usize;
    if offset > answer_len {
        warn!(
            "Citation {} offset {} is past answer length {}, clamping",
            index, offset, answer_len
        );
        return Some(answer_len);
    }

    Some(offset)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn result_item(hit: SearchHit) -> ResultItem {
    let snippet = match hit.text {
        Some(text) => text,
        None => hit
            .content
            .into_iter()
            .filter_map(|c| c.text)
            .collect::<Vec<_>>()
            .join("\n\n"),
    };

    ResultItem {
        file: non_empty(hit.filename)
            .or_else(|| hit.file_id.clone())
            .unwrap_or_else(|| UNKNOWN_SOURCE.to_string()),
        file_id: hit.file_id,
        snippet,
        score: hit.score.filter(|s| s.is_finite()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn response(value: Value) -> ResponsesResponse {
        serde_json::from_value(value).unwrap()
    }

    fn message(text: &str, annotations: Value) -> Value {
        json!({
            "type": "message",
            "id": "msg_1",
            "role": "assistant",
            "content": [{"type": "output_text", "text": text, "annotations": annotations}]
        })
    }

    #[test]
    fn test_citations_follow_emission_order() {
        let body = response(json!({
            "output": [message("Deep research is an agent.", json!([
                {"type": "file_citation", "index": 10, "file_id": "file-a", "filename": "a.pdf"},
                {"type": "file_citation", "index": 20, "file_id": "file-b", "filename": "b.pdf"},
                {"type": "file_citation", "index": 26, "file_id": "file-a", "filename": "a.pdf"}
            ]))]
        }));

        let result = normalize(body, false).unwrap();
        let pairs: Vec<(usize, &str)> = result
            .citations
            .iter()
            .map(|c| (c.index, c.file.as_str()))
            .collect();

        assert_eq!(pairs, vec![(0, "a.pdf"), (1, "b.pdf"), (2, "a.pdf")]);
        assert_eq!(result.citations[1].file_id.as_deref(), Some("file-b"));
        assert_eq!(result.citations[2].offset, Some(26));
    }

    #[test]
    fn test_no_annotations_is_not_an_error() {
        let body = response(json!({"output": [message("plain answer", json!([]))]}));
        let result = normalize(body, true).unwrap();
        assert_eq!(result.answer, "plain answer");
        assert!(result.citations.is_empty());
    }

    #[test]
    fn test_out_of_range_offsets_are_clamped() {
        let body = response(json!({
            "output": [message("short", json!([
                {"type": "file_citation", "index": 500, "filename": "a.pdf"},
                {"type": "file_citation", "index": -4, "filename": "b.pdf"},
                {"type": "file_citation", "filename": "c.pdf"}
            ]))]
        }));

        let result = normalize(body, false).unwrap();
        assert_eq!(result.citations.len(), 3);
        assert_eq!(result.citations[0].offset, Some(5));
        assert_eq!(result.citations[1].offset, None);
        assert_eq!(result.citations[2].offset, None);
    }

    #[test]
    fn test_malformed_annotations_keep_the_answer() {
        let body = response(json!({
            "output": [message("Deep research is an agent.", json!([
                {"type": "file_citation", "index": 10, "file_id": "file-a", "filename": "a.pdf"},
                {"type": "file_citation", "index": 18446744073709551615u64, "filename": "b.pdf"},
                {"type": "file_citation", "index": "7", "filename": "c.pdf"},
                {"type": "url_citation", "start_index": 0, "end_index": 4},
                {"type": "file_citation", "index": 3, "filename": ["not", "a", "name"]}
            ]))]
        }));

        let result = normalize(body, false).unwrap();
        assert_eq!(result.answer, "Deep research is an agent.");

        let cited: Vec<(&str, Option<usize>)> = result
            .citations
            .iter()
            .map(|c| (c.file.as_str(), c.offset))
            .collect();
        assert_eq!(
            cited,
            vec![
                ("a.pdf", Some(10)),
                ("b.pdf", Some(26)),
                ("c.pdf", Some(7)),
                (UNKNOWN_SOURCE, Some(4)),
            ]
        );
        assert_eq!(result.citations[0].file_id.as_deref(), Some("file-a"));
    }

    #[test]
    fn test_offsets_count_characters() {
        let body = response(json!({
            "output": [message("café", json!([
                {"type": "file_citation", "index": 4, "filename": "menu.pdf"}
            ]))]
        }));

        let result = normalize(body, false).unwrap();
        assert_eq!(result.citations[0].offset, Some(4));
    }

    #[test]
    fn test_missing_filename_falls_back() {
        let body = response(json!({
            "output": [message("text", json!([
                {"type": "file_citation", "index": 1, "file_id": "file-xyz", "filename": ""},
                {"type": "file_citation", "index": 2},
                {"type": "url_citation", "start_index": 0, "end_index": 3, "url": "https://example.com", "title": "Example"},
                {"type": "file_path", "file_id": "file-generated"}
            ]))]
        }));

        let result = normalize(body, false).unwrap();
        let files: Vec<&str> = result.citations.iter().map(|c| c.file.as_str()).collect();
        assert_eq!(files, vec!["file-xyz", UNKNOWN_SOURCE, "https://example.com"]);
    }

    #[test]
    fn test_results_only_when_requested() {
        let body = json!({
            "output": [
                {"type": "file_search_call", "id": "fs_1", "status": "completed",
                 "queries": ["deep research"],
                 "results": [
                    {"file_id": "file-a", "filename": "a.pdf", "score": 0.92, "text": "first"},
                    {"file_id": "file-b", "filename": "b.pdf", "score": 0.41,
                     "content": [{"type": "text", "text": "second"}, {"type": "text", "text": "third"}]}
                 ]},
                message("answer", json!([]))
            ]
        });

        let with = normalize(response(body.clone()), true).unwrap();
        assert_eq!(with.results.len(), 2);
        assert_eq!(with.results[0].file, "a.pdf");
        assert_eq!(with.results[0].score, Some(0.92));
        assert_eq!(with.results[1].snippet, "second\n\nthird");
        assert_eq!(with.queries, vec!["deep research"]);

        let without = normalize(response(body), false).unwrap();
        assert!(without.results.is_empty());
    }

    #[test]
    fn test_missing_answer_is_parse_error() {
        let body = response(json!({
            "id": "resp_9",
            "output": [{"type": "file_search_call", "id": "fs_1", "status": "failed"}]
        }));

        let err = normalize(body, true).unwrap_err();
        assert!(matches!(err, SearchError::Parse(ref m) if m.contains("resp_9")));
    }

    #[test]
    fn test_refusal_becomes_answer() {
        let body = response(json!({
            "output": [{"type": "message", "content": [{"type": "refusal", "refusal": "I can't help with that."}]}]
        }));

        let result = normalize(body, true).unwrap();
        assert_eq!(result.answer, "I can't help with that.");
        assert!(result.citations.is_empty());
    }

    #[test]
    fn test_error_object_is_provider_error() {
        let body = response(json!({
            "error": {"code": "vector_store_not_found", "message": "Vector store vs_x not found"},
            "output": []
        }));

        assert_eq!(
            normalize(body, true).unwrap_err(),
            SearchError::Provider {
                status: 200,
                message: "Vector store vs_x not found".to_string()
            }
        );
    }
}
