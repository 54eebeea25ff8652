// file: src/models/history.rs
// description: append-only in-memory search history for one session

use crate::models::{SearchRequest, SearchResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub request: SearchRequest,
    pub result: SearchResult,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(request: SearchRequest, result: SearchResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            request,
            result,
            timestamp: Utc::now(),
        }
    }

    /// `2025-03-12 14:03:51 - query` as shown in the history panel.
    pub fn label(&self) -> String {
        format!(
            "{} - {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.request.query
        )
    }
}

/// Entries are only ever appended; nothing is evicted or persisted.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct SearchHistory {
    entries: Vec<HistoryEntry>,
}

impl SearchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, request: SearchRequest, result: SearchResult) -> &HistoryEntry {
        self.entries.push(HistoryEntry::new(request, result));
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn newest_first(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
