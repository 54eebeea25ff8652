// file: src/models/search_result.rs
// description: normalized search result with citations and raw retrieved passages
// reference: Used for rendering answers returned by the provider

use crate::utils::Validator;
use serde::{Deserialize, Serialize};

pub const UNKNOWN_SOURCE: &str = "Unknown Source";

const SNIPPETS_PER_RESULT: usize = 2;
const SNIPPETS_PER_SOURCE: usize = 3;

/// One provider annotation linking a point in the answer to a source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    /// Sequential position in provider emission order, starting at 0
    pub index: usize,

    /// Filename, or the provider file id when no filename was sent
    pub file: String,

    pub file_id: Option<String>,

    pub quoted_text: Option<String>,

    /// Character offset into the answer where the marker belongs
    pub offset: Option<usize>,
}

/// One raw passage returned by the vector store search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultItem {
    pub file: String,

    pub file_id: Option<String>,

    pub snippet: String,

    /// Relevance score (higher is more relevant, typically 0.0-1.0)
    pub score: Option<f32>,
}

impl ResultItem {
    /// Format as a summary string for display
    pub fn format_summary(&self, max_content_len: usize) -> String {
        let score = self
            .score
            .map(|s| format!("{:.4}", s))
            .unwrap_or_else(|| "n/a".to_string());

        format!(
            "Score: {} | {}\n{}\n",
            score,
            self.file,
            Validator::truncate_text(&self.snippet, max_content_len)
        )
    }
}

/// A cited file with the passages that support it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceCard {
    /// 1-based number shown in the answer badges
    pub number: usize,
    pub file: String,
    pub snippets: Vec<String>,
    pub score: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub answer: String,
    pub citations: Vec<Citation>,
    pub results: Vec<ResultItem>,
    /// Queries the provider reports it ran against the vector store
    #[serde(default)]
    pub queries: Vec<String>,
}

impl SearchResult {
    /// Distinct cited files in first-appearance order.
    pub fn sources(&self) -> Vec<&str> {
        let mut sources: Vec<&str> = Vec::new();
        for citation in &self.citations {
            if !sources.contains(&citation.file.as_str()) {
                sources.push(&citation.file);
            }
        }
        sources
    }

    /// 1-based badge number for a cited file.
    pub fn source_number(&self, file: &str) -> Option<usize> {
        self.sources()
            .iter()
            .position(|source| *source == file)
            .map(|pos| pos + 1)
    }

    pub fn source_cards(&self) -> Vec<SourceCard> {
        self.sources()
            .into_iter()
            .enumerate()
            .map(|(pos, file)| {
                let matching: Vec<&ResultItem> =
                    self.results.iter().filter(|r| r.file == file).collect();

                let snippets = matching
                    .iter()
                    .flat_map(|r| snippet_paragraphs(&r.snippet).take(SNIPPETS_PER_RESULT))
                    .take(SNIPPETS_PER_SOURCE)
                    .collect();

                let score = matching
                    .iter()
                    .filter_map(|r| r.score)
                    .fold(None, |best: Option<f32>, s| Some(best.map_or(s, |b| b.max(s))));

                SourceCard {
                    number: pos + 1,
                    file: file.to_string(),
                    snippets,
                    score,
                }
            })
            .collect()
    }
}

fn snippet_paragraphs(snippet: &str) -> impl Iterator<Item = String> + '_ {
    snippet
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn citation(index: usize, file: &str) -> Citation {
        Citation {
            index,
            file: file.to_string(),
            file_id: None,
            quoted_text: None,
            offset: None,
        }
    }

    fn item(file: &str, snippet: &str, score: Option<f32>) -> ResultItem {
        ResultItem {
            file: file.to_string(),
            file_id: None,
            snippet: snippet.to_string(),
            score,
        }
    }

    #[test]
    fn test_sources_keep_first_appearance_order() {
        let result = SearchResult {
            answer: "answer".into(),
            citations: vec![
                citation(0, "b.pdf"),
                citation(1, "a.pdf"),
                citation(2, "b.pdf"),
            ],
            ..Default::default()
        };

        assert_eq!(result.sources(), vec!["b.pdf", "a.pdf"]);
        assert_eq!(result.source_number("a.pdf"), Some(2));
        assert_eq!(result.source_number("c.pdf"), None);
    }

    #[test]
    fn test_source_cards_limit_snippets_and_pick_best_score() {
        let result = SearchResult {
            answer: "answer".into(),
            citations: vec![citation(0, "a.pdf")],
            results: vec![
                item("a.pdf", "one\n\ntwo\n\nthree", Some(0.41)),
                item("other.pdf", "unrelated", Some(0.99)),
                item("a.pdf", "four\n\nfive", Some(0.87)),
            ],
            queries: vec![],
        };

        let cards = result.source_cards();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].number, 1);
        assert_eq!(cards[0].snippets, vec!["one", "two", "four"]);
        assert_eq!(cards[0].score, Some(0.87));
    }

    #[test]
    fn test_source_cards_without_results() {
        let result = SearchResult {
            answer: "answer".into(),
            citations: vec![citation(0, "a.pdf")],
            ..Default::default()
        };

        let cards = result.source_cards();
        assert!(cards[0].snippets.is_empty());
        assert_eq!(cards[0].score, None);
    }

    #[test]
    fn test_format_summary() {
        let summary = item("docs/guide.pdf", "This is a very long passage that will be truncated", Some(0.87))
            .format_summary(20);
        assert!(summary.contains("0.8700"));
        assert!(summary.contains("docs/guide.pdf"));
        assert!(summary.contains("..."));
    }
}
