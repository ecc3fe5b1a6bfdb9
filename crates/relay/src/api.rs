// Read-only HTTP surface: health and per-document inspection.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use markpad_common::types::{Comment, DocumentInfo, HistoryEntry};
use serde::Serialize;

use crate::document::history::HISTORY_QUERY_LIMIT;
use crate::error::RelayError;
use crate::Relay;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub active_documents: usize,
    pub connected_users: usize,
}

pub fn router() -> Router<Relay> {
    Router::new()
        .route("/health", get(health))
        .route("/api/document/{document_id}", get(document_info))
        .route("/api/document/{document_id}/history", get(document_history))
        .route("/api/document/{document_id}/comments", get(document_comments))
}

async fn health(State(relay): State<Relay>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
        active_documents: relay.registry.len().await,
        connected_users: relay.sessions.connected_count().await,
    })
}

async fn document_info(
    State(relay): State<Relay>,
    Path(document_id): Path<String>,
) -> Result<Json<DocumentInfo>, RelayError> {
    relay
        .registry
        .info(&document_id)
        .await
        .map(Json)
        .ok_or_else(|| RelayError::document_not_found(&document_id))
}

/// The most recent snapshots, oldest first.
async fn document_history(
    State(relay): State<Relay>,
    Path(document_id): Path<String>,
) -> Result<Json<Vec<HistoryEntry>>, RelayError> {
    relay
        .registry
        .recent_history(&document_id, HISTORY_QUERY_LIMIT)
        .await
        .map(Json)
        .ok_or_else(|| RelayError::document_not_found(&document_id))
}

async fn document_comments(
    State(relay): State<Relay>,
    Path(document_id): Path<String>,
) -> Result<Json<Vec<Comment>>, RelayError> {
    relay
        .registry
        .comments(&document_id)
        .await
        .map(Json)
        .ok_or_else(|| RelayError::document_not_found(&document_id))
}
