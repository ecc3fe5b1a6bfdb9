// Inline comments attached to a document.

use chrono::Utc;
use markpad_common::types::Comment;
use uuid::Uuid;

/// Ordered comment list. Comments are never edited or removed.
#[derive(Debug, Clone, Default)]
pub struct CommentStore {
    comments: Vec<Comment>,
}

impl CommentStore {
    /// Append a comment with a fresh id and the current time.
    ///
    /// `position` is stored as given; it is not clamped to the content length.
    pub fn add(&mut self, text: String, author: &str, position: u64) -> Comment {
        let comment = Comment {
            id: Uuid::new_v4(),
            text,
            author: author.to_string(),
            timestamp: Utc::now(),
            position,
        };
        self.comments.push(comment.clone());
        comment
    }

    pub fn list(&self) -> &[Comment] {
        &self.comments
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }
}
