// Event types exchanged over the Markpad WebSocket.

use serde::{Deserialize, Serialize};

use crate::types::Comment;

/// Error code sent when a frame cannot be decoded.
pub const INVALID_MESSAGE: &str = "INVALID_MESSAGE";
/// Error code sent when a join names an empty document id.
pub const INVALID_DOCUMENT_ID: &str = "INVALID_DOCUMENT_ID";

/// Client -> Server events.
///
/// Connection termination is not a frame: the transport reports it and the
/// relay treats it as an implicit leave.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// Enter a document room, leaving any room the connection is already in.
    Join { document_id: String },

    /// Replace the whole content of the document the connection is in.
    ///
    /// `documentId` may be absent or null; the relay drops such changes
    /// the same way it drops one naming another document.
    Change {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        document_id: Option<String>,
        content: String,
    },

    /// Attach a comment to the current document.
    AddComment { text: String, position: u64 },

    TypingStart,

    TypingStop,
}

impl ClientMessage {
    /// Boundary checks that serde cannot express.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        match self {
            Self::Join { document_id } if document_id.is_empty() => {
                Err(ProtocolError::EmptyDocumentId)
            }
            _ => Ok(()),
        }
    }

    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Join { .. } => "join",
            Self::Change { .. } => "change",
            Self::AddComment { .. } => "add-comment",
            Self::TypingStart => "typing-start",
            Self::TypingStop => "typing-stop",
        }
    }
}

/// Server -> Client events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// Sent only to the connection that joined.
    DocumentContent { content: String },

    /// Relayed to every member except the author of the change.
    DocumentUpdate { content: String },

    UserJoined { identity: String, member_count: usize },

    UserLeft { identity: String, member_count: usize },

    /// Sent to a joining connection with the room size it observed.
    UserCountUpdate { member_count: usize },

    /// Sent to every member, including the author.
    NewComment { comment: Comment },

    UserTyping { identity: String },

    UserStoppedTyping { identity: String },

    Error { code: String, message: String },
}

impl ServerMessage {
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Self::Error { code: code.to_string(), message: message.into() }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("invalid websocket frame payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("document id must not be empty")]
    EmptyDocumentId,
}

impl ProtocolError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Decode(_) => INVALID_MESSAGE,
            Self::EmptyDocumentId => INVALID_DOCUMENT_ID,
        }
    }

    pub fn to_message(&self) -> ServerMessage {
        ServerMessage::error(self.code(), self.to_string())
    }
}
