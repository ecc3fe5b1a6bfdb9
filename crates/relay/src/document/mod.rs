// Live document registry.
//
// Each document sits behind its own mutex so that mutations on one document
// are serialized without blocking any other document. The registry map is
// only locked for lookups, inserts and evictions.
//
// Lock order: the registry map lock is always taken before a document lock
// and held until that document lock is granted. No code path requests the
// map lock while holding a document lock.

pub mod comments;
pub mod history;

use std::collections::{hash_map::Entry, HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use markpad_common::types::{Comment, DocumentInfo, HistoryEntry};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use self::comments::CommentStore;
use self::history::HistoryLedger;
use crate::ConnectionId;

pub type DocumentHandle = Arc<Mutex<Document>>;

/// Guard over a document that was live in the registry when locked.
pub type DocumentGuard = OwnedMutexGuard<Document>;

#[derive(Debug)]
pub struct Document {
    id: String,
    content: String,
    revision: u64,
    members: HashSet<ConnectionId>,
    created_at: DateTime<Utc>,
    last_modified_at: DateTime<Utc>,
    history: HistoryLedger,
    comments: CommentStore,
}

impl Document {
    fn new(id: &str) -> Self {
        let now = Utc::now();
        Self {
            id: id.to_string(),
            content: String::new(),
            revision: 0,
            members: HashSet::new(),
            created_at: now,
            last_modified_at: now,
            history: HistoryLedger::default(),
            comments: CommentStore::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn members(&self) -> &HashSet<ConnectionId> {
        &self.members
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_member(&self, connection_id: ConnectionId) -> bool {
        self.members.contains(&connection_id)
    }

    pub fn history(&self) -> &HistoryLedger {
        &self.history
    }

    pub fn comments(&self) -> &CommentStore {
        &self.comments
    }

    /// Replace the content wholesale, recording the previous snapshot.
    /// Returns the new revision.
    pub fn apply_change(&mut self, content: String, author: &str) -> u64 {
        let prior = std::mem::replace(&mut self.content, content);
        self.history.record(prior, author);
        self.revision += 1;
        self.last_modified_at = Utc::now();
        self.revision
    }

    pub fn add_comment(&mut self, text: String, author: &str, position: u64) -> Comment {
        self.comments.add(text, author, position)
    }

    pub fn info(&self) -> DocumentInfo {
        DocumentInfo {
            id: self.id.clone(),
            member_count: self.members.len(),
            created_at: self.created_at,
            last_modified_at: self.last_modified_at,
            revision: self.revision,
            comment_count: self.comments.len(),
        }
    }

    // Membership is only changed through `PresenceCoordinator`.

    pub(crate) fn insert_member(&mut self, connection_id: ConnectionId) -> bool {
        self.members.insert(connection_id)
    }

    pub(crate) fn remove_member(&mut self, connection_id: ConnectionId) -> bool {
        self.members.remove(&connection_id)
    }
}

#[derive(Debug, Default)]
pub struct DocumentRegistry {
    documents: RwLock<HashMap<String, DocumentHandle>>,
}

impl DocumentRegistry {
    /// Return the live document for `document_id`, creating an empty one if
    /// none exists.
    ///
    /// The handle is unlocked. Once every member leaves the document can be
    /// evicted, and the handle then points at a detached copy that a later
    /// join will not see. Session code goes through [`Self::acquire`], which
    /// locks while the map lock is still held.
    pub async fn get_or_create(&self, document_id: &str) -> DocumentHandle {
        if let Some(existing) = self.documents.read().await.get(document_id) {
            return Arc::clone(existing);
        }

        let mut documents = self.documents.write().await;
        match documents.entry(document_id.to_string()) {
            Entry::Occupied(occupied) => Arc::clone(occupied.get()),
            Entry::Vacant(vacant) => {
                Arc::clone(vacant.insert(Arc::new(Mutex::new(Document::new(document_id)))))
            }
        }
    }

    /// Look up the live document without locking it. Same staleness caveat
    /// as [`Self::get_or_create`]; use [`Self::lock_existing`] to read state.
    pub async fn get(&self, document_id: &str) -> Option<DocumentHandle> {
        self.documents.read().await.get(document_id).cloned()
    }

    /// Lock the live document for `document_id`, creating it if needed.
    ///
    /// The map lock is held until the document lock is granted, so an
    /// eviction cannot remove the document between lookup and lock.
    pub async fn acquire(&self, document_id: &str) -> DocumentGuard {
        {
            let documents = self.documents.read().await;
            if let Some(handle) = documents.get(document_id) {
                return Arc::clone(handle).lock_owned().await;
            }
        }

        let mut documents = self.documents.write().await;
        let handle = documents
            .entry(document_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(Document::new(document_id))));
        Arc::clone(handle).lock_owned().await
    }

    /// Lock the live document for `document_id` if it exists.
    pub async fn lock_existing(&self, document_id: &str) -> Option<DocumentGuard> {
        let documents = self.documents.read().await;
        let handle = Arc::clone(documents.get(document_id)?);
        Some(handle.lock_owned().await)
    }

    /// Remove `document_id` from the registry if it has no members left.
    ///
    /// Must be called without holding the document's lock. The map write
    /// lock is held across the membership check and the removal, so a join
    /// either lands before the check or finds the document gone and starts
    /// a fresh one. Returns true only on the call that actually evicts.
    pub async fn evict_if_empty(&self, document_id: &str) -> bool {
        let mut documents = self.documents.write().await;
        let Some(handle) = documents.get(document_id) else {
            return false;
        };
        let empty = handle.lock().await.members.is_empty();
        if empty {
            documents.remove(document_id);
        }
        empty
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn info(&self, document_id: &str) -> Option<DocumentInfo> {
        let document = self.lock_existing(document_id).await?;
        Some(document.info())
    }

    /// The last `limit` history entries of a document, most recent last.
    pub async fn recent_history(&self, document_id: &str, limit: usize) -> Option<Vec<HistoryEntry>> {
        let document = self.lock_existing(document_id).await?;
        Some(document.history.recent(limit))
    }

    pub async fn comments(&self, document_id: &str) -> Option<Vec<Comment>> {
        let document = self.lock_existing(document_id).await?;
        Some(document.comments.list().to_vec())
    }
}
