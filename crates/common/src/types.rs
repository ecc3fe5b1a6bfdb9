// Core domain types shared between the relay and its clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A comment anchored to a character offset inside a document.
///
/// `position` is recorded at authoring time and is never re-anchored, so it
/// may point past the end of the content after later edits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub text: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
    pub position: u64,
}

/// A snapshot of document content taken just before a change was applied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// 1-based sequence number within the document's history. Only the
    /// relative order is meaningful once old entries have been evicted.
    pub version: u64,
    pub content: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
}

/// Read-only summary of a live document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    pub id: String,
    pub member_count: usize,
    pub created_at: DateTime<Utc>,
    pub last_modified_at: DateTime<Utc>,
    pub revision: u64,
    pub comment_count: usize,
}
