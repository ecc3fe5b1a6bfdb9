// Bounded per-document revision history.

use std::collections::VecDeque;

use chrono::Utc;
use markpad_common::types::HistoryEntry;

/// Maximum number of snapshots retained per document.
pub const HISTORY_LIMIT: usize = 50;

/// Number of entries returned by the history query.
pub const HISTORY_QUERY_LIMIT: usize = 10;

/// Append-only list of pre-change snapshots, oldest first.
///
/// Entries past [`HISTORY_LIMIT`] are dropped from the front, so a
/// `version` is not an index into the retained window.
#[derive(Debug, Clone, Default)]
pub struct HistoryLedger {
    entries: VecDeque<HistoryEntry>,
    recorded: u64,
}

impl HistoryLedger {
    /// Append the content a document held before a change by `author`.
    pub fn record(&mut self, prior_content: String, author: &str) -> u64 {
        self.recorded += 1;
        self.entries.push_back(HistoryEntry {
            version: self.recorded,
            content: prior_content,
            author: author.to_string(),
            timestamp: Utc::now(),
        });
        while self.entries.len() > HISTORY_LIMIT {
            self.entries.pop_front();
        }
        self.recorded
    }

    /// Full retained history, most recent last.
    pub fn list(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    /// The last `limit` entries, most recent last.
    pub fn recent(&self, limit: usize) -> Vec<HistoryEntry> {
        let skip = self.entries.len().saturating_sub(limit);
        self.entries.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
