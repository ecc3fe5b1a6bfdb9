// Per-connection session state machine.
//
// A session is either unjoined or joined to exactly one document. Every
// inbound event from a connection is routed through `SessionManager`, which
// validates it against the session's current document before touching
// shared document state.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use markpad_common::protocol::{ClientMessage, ServerMessage};
use markpad_common::types::Comment;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::broadcast::{BroadcastRouter, OutboundSender};
use crate::document::DocumentRegistry;
use crate::presence::PresenceCoordinator;
use crate::ConnectionId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub connection_id: ConnectionId,
    pub identity: String,
    pub current_document: Option<String>,
    pub typing: bool,
    pub connected_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unjoined,
    Joined(String),
}

impl Session {
    pub fn state(&self) -> SessionState {
        match &self.current_document {
            Some(document_id) => SessionState::Joined(document_id.clone()),
            None => SessionState::Unjoined,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("connection {0} has no session")]
    UnknownConnection(ConnectionId),

    #[error("connection {0} already has a session")]
    AlreadyConnected(ConnectionId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeOutcome {
    Applied { revision: u64, recipients: usize },
    /// The change did not target the session's current document.
    Ignored,
}

/// Session records keyed by connection id.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<ConnectionId, Session>>,
}

impl SessionStore {
    async fn insert(&self, session: Session) -> Result<(), SessionError> {
        let mut guard = self.sessions.write().await;
        if guard.contains_key(&session.connection_id) {
            return Err(SessionError::AlreadyConnected(session.connection_id));
        }
        guard.insert(session.connection_id, session);
        Ok(())
    }

    pub async fn get(&self, connection_id: ConnectionId) -> Option<Session> {
        self.sessions.read().await.get(&connection_id).cloned()
    }

    async fn set_document(&self, connection_id: ConnectionId, document_id: Option<String>) {
        if let Some(session) = self.sessions.write().await.get_mut(&connection_id) {
            session.current_document = document_id;
            session.typing = false;
        }
    }

    async fn set_typing(&self, connection_id: ConnectionId, typing: bool) {
        if let Some(session) = self.sessions.write().await.get_mut(&connection_id) {
            session.typing = typing;
        }
    }

    /// Remove and return the session. Only the first call for a connection
    /// gets `Some`.
    async fn remove(&self, connection_id: ConnectionId) -> Option<Session> {
        self.sessions.write().await.remove(&connection_id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[derive(Debug)]
pub struct SessionManager {
    sessions: SessionStore,
    registry: Arc<DocumentRegistry>,
    router: Arc<BroadcastRouter>,
    presence: PresenceCoordinator,
}

impl SessionManager {
    pub fn new(registry: Arc<DocumentRegistry>) -> Self {
        let router = Arc::new(BroadcastRouter::default());
        let presence = PresenceCoordinator::new(Arc::clone(&registry), Arc::clone(&router));
        Self { sessions: SessionStore::default(), registry, router, presence }
    }

    pub async fn session(&self, connection_id: ConnectionId) -> Option<Session> {
        self.sessions.get(connection_id).await
    }

    pub async fn connected_count(&self) -> usize {
        self.sessions.len().await
    }

    /// Create an unjoined session whose events are delivered to `outbound`.
    pub async fn connect(
        &self,
        connection_id: ConnectionId,
        identity: String,
        outbound: OutboundSender,
    ) -> Result<Session, SessionError> {
        let session = Session {
            connection_id,
            identity,
            current_document: None,
            typing: false,
            connected_at: Utc::now(),
        };
        self.sessions.insert(session.clone()).await?;
        self.router.register(connection_id, outbound).await;
        info!(connection_id = %connection_id, identity = %session.identity, "connection established");
        Ok(session)
    }

    /// Dispatch one validated inbound event.
    pub async fn handle(
        &self,
        connection_id: ConnectionId,
        message: ClientMessage,
    ) -> Result<(), SessionError> {
        match message {
            ClientMessage::Join { document_id } => self.join(connection_id, &document_id).await,
            ClientMessage::Change { document_id, content } => {
                self.change(connection_id, document_id.as_deref(), content).await.map(|_| ())
            }
            ClientMessage::AddComment { text, position } => {
                self.add_comment(connection_id, text, position).await.map(|_| ())
            }
            ClientMessage::TypingStart => self.set_typing(connection_id, true).await,
            ClientMessage::TypingStop => self.set_typing(connection_id, false).await,
        }
    }

    /// Move the connection into `document_id`.
    ///
    /// Joining the document the connection is already in re-sends the
    /// content and the connection's own count without announcing again.
    pub async fn join(
        &self,
        connection_id: ConnectionId,
        document_id: &str,
    ) -> Result<(), SessionError> {
        let session = self.require(connection_id).await?;

        match session.current_document.as_deref() {
            Some(current) if current == document_id => {
                if let Some(document) = self.registry.lock_existing(document_id).await {
                    if document.is_member(connection_id) {
                        self.router
                            .send_to(
                                connection_id,
                                ServerMessage::DocumentContent {
                                    content: document.content().to_string(),
                                },
                            )
                            .await;
                        self.router
                            .send_to(
                                connection_id,
                                ServerMessage::UserCountUpdate {
                                    member_count: document.member_count(),
                                },
                            )
                            .await;
                        debug!(connection_id = %connection_id, document_id = %document_id, "re-join of current document");
                        return Ok(());
                    }
                }
            }
            Some(previous) => {
                self.presence.leave(connection_id, &session.identity, previous).await;
                self.sessions.set_document(connection_id, None).await;
            }
            None => {}
        }

        let mut document = self.registry.acquire(document_id).await;
        let member_count = self.presence.admit(&mut document, connection_id);
        self.sessions.set_document(connection_id, Some(document_id.to_string())).await;
        self.router
            .send_to(
                connection_id,
                ServerMessage::DocumentContent { content: document.content().to_string() },
            )
            .await;
        self.presence.announce_join(&document, &session.identity, connection_id).await;

        info!(
            connection_id = %connection_id,
            identity = %session.identity,
            document_id = %document_id,
            member_count,
            "joined document"
        );
        Ok(())
    }

    /// Replace the content of the connection's current document.
    ///
    /// A change naming any other document, or naming none, is dropped
    /// without error and without touching state.
    pub async fn change(
        &self,
        connection_id: ConnectionId,
        document_id: Option<&str>,
        content: String,
    ) -> Result<ChangeOutcome, SessionError> {
        let session = self.require(connection_id).await?;
        let document_id = match document_id {
            Some(document_id) if session.current_document.as_deref() == Some(document_id) => {
                document_id
            }
            _ => {
                debug!(
                    connection_id = %connection_id,
                    document_id = ?document_id,
                    current_document = ?session.current_document,
                    "dropping change for a document the connection has not joined"
                );
                return Ok(ChangeOutcome::Ignored);
            }
        };

        let Some(mut document) = self.registry.lock_existing(document_id).await else {
            return Ok(ChangeOutcome::Ignored);
        };
        let revision = document.apply_change(content.clone(), &session.identity);
        let recipients = self
            .router
            .fan_out(
                document.members(),
                Some(connection_id),
                &ServerMessage::DocumentUpdate { content },
            )
            .await;

        debug!(
            connection_id = %connection_id,
            document_id = %document_id,
            revision,
            recipients,
            "document updated"
        );
        Ok(ChangeOutcome::Applied { revision, recipients })
    }

    /// Attach a comment to the connection's current document and send it to
    /// every member, the author included. Unjoined connections are ignored.
    pub async fn add_comment(
        &self,
        connection_id: ConnectionId,
        text: String,
        position: u64,
    ) -> Result<Option<Comment>, SessionError> {
        let session = self.require(connection_id).await?;
        let Some(document_id) = session.current_document.as_deref() else {
            debug!(connection_id = %connection_id, "dropping comment from unjoined connection");
            return Ok(None);
        };
        let Some(mut document) = self.registry.lock_existing(document_id).await else {
            return Ok(None);
        };

        let comment = document.add_comment(text, &session.identity, position);
        self.router
            .fan_out(
                document.members(),
                None,
                &ServerMessage::NewComment { comment: comment.clone() },
            )
            .await;

        debug!(connection_id = %connection_id, document_id = %document_id, comment_id = %comment.id, "comment added");
        Ok(Some(comment))
    }

    pub async fn set_typing(
        &self,
        connection_id: ConnectionId,
        is_typing: bool,
    ) -> Result<(), SessionError> {
        let session = self.require(connection_id).await?;
        let Some(document_id) = session.current_document.as_deref() else {
            return Ok(());
        };
        self.sessions.set_typing(connection_id, is_typing).await;
        self.presence.set_typing(connection_id, &session.identity, document_id, is_typing).await;
        Ok(())
    }

    /// Leave the current document and destroy the session.
    ///
    /// Safe to call any number of times; only the first call has an effect.
    pub async fn disconnect(&self, connection_id: ConnectionId) -> bool {
        let Some(session) = self.sessions.remove(connection_id).await else {
            return false;
        };
        if let Some(document_id) = session.current_document.as_deref() {
            self.presence.leave(connection_id, &session.identity, document_id).await;
        }
        self.router.unregister(connection_id).await;
        info!(connection_id = %connection_id, identity = %session.identity, "connection closed");
        true
    }

    async fn require(&self, connection_id: ConnectionId) -> Result<Session, SessionError> {
        self.sessions.get(connection_id).await.ok_or(SessionError::UnknownConnection(connection_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::{self, UnboundedReceiver};
    use uuid::Uuid;

    struct Client {
        id: ConnectionId,
        rx: UnboundedReceiver<ServerMessage>,
    }

    impl Client {
        fn drain(&mut self) -> Vec<ServerMessage> {
            std::iter::from_fn(|| self.rx.try_recv().ok()).collect()
        }
    }

    fn manager() -> (Arc<DocumentRegistry>, SessionManager) {
        let registry = Arc::new(DocumentRegistry::default());
        let manager = SessionManager::new(Arc::clone(&registry));
        (registry, manager)
    }

    async fn connect(manager: &SessionManager, identity: &str) -> Client {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        manager.connect(id, identity.to_string(), tx).await.unwrap();
        Client { id, rx }
    }

    #[tokio::test]
    async fn new_session_is_unjoined() {
        let (_, manager) = manager();
        let client = connect(&manager, "alice").await;
        let session = manager.session(client.id).await.unwrap();
        assert_eq!(session.state(), SessionState::Unjoined);
        assert!(!session.typing);
    }

    #[tokio::test]
    async fn duplicate_connect_is_rejected() {
        let (_, manager) = manager();
        let client = connect(&manager, "alice").await;
        let (tx, _rx) = mpsc::unbounded_channel();
        let error = manager.connect(client.id, "again".into(), tx).await.unwrap_err();
        assert_eq!(error, SessionError::AlreadyConnected(client.id));
    }

    #[tokio::test]
    async fn events_from_unknown_connections_are_errors() {
        let (_, manager) = manager();
        let stranger = Uuid::new_v4();
        assert_eq!(
            manager.join(stranger, "demo").await.unwrap_err(),
            SessionError::UnknownConnection(stranger)
        );
    }

    #[tokio::test]
    async fn demo_scenario() {
        let (registry, manager) = manager();
        let mut a = connect(&manager, "alice").await;
        let mut b = connect(&manager, "bob").await;

        manager.join(a.id, "demo").await.unwrap();
        assert_eq!(
            a.drain(),
            vec![
                ServerMessage::DocumentContent { content: String::new() },
                ServerMessage::UserCountUpdate { member_count: 1 },
            ]
        );

        manager.join(b.id, "demo").await.unwrap();
        assert_eq!(
            a.drain(),
            vec![ServerMessage::UserJoined { identity: "bob".into(), member_count: 2 }]
        );
        b.drain();

        let outcome = manager.change(a.id, Some("demo"), "hello".into()).await.unwrap();
        assert_eq!(outcome, ChangeOutcome::Applied { revision: 1, recipients: 1 });
        assert_eq!(b.drain(), vec![ServerMessage::DocumentUpdate { content: "hello".into() }]);
        assert!(a.drain().is_empty());

        let history = registry.recent_history("demo", 10).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].content, "");
        assert_eq!(history[0].author, "alice");

        assert!(manager.disconnect(b.id).await);
        assert_eq!(
            a.drain(),
            vec![ServerMessage::UserLeft { identity: "bob".into(), member_count: 1 }]
        );

        assert!(manager.disconnect(a.id).await);
        assert!(registry.info("demo").await.is_none());
    }

    #[tokio::test]
    async fn mismatched_change_is_silently_dropped() {
        let (registry, manager) = manager();
        let mut a = connect(&manager, "alice").await;
        let mut b = connect(&manager, "bob").await;
        manager.join(a.id, "demo").await.unwrap();
        manager.join(b.id, "other").await.unwrap();
        a.drain();
        b.drain();

        let outcome = manager.change(b.id, Some("demo"), "hijack".into()).await.unwrap();
        assert_eq!(outcome, ChangeOutcome::Ignored);
        assert!(a.drain().is_empty());
        assert!(b.drain().is_empty());

        let info = registry.info("demo").await.unwrap();
        assert_eq!(info.revision, 0);
        assert!(registry.recent_history("demo", 10).await.unwrap().is_empty());
        let document = registry.lock_existing("demo").await.unwrap();
        assert_eq!(document.content(), "");
    }

    #[tokio::test]
    async fn change_without_target_is_silently_dropped() {
        let (registry, manager) = manager();
        let mut a = connect(&manager, "alice").await;
        let mut b = connect(&manager, "bob").await;
        manager.join(a.id, "demo").await.unwrap();
        manager.join(b.id, "demo").await.unwrap();
        a.drain();
        b.drain();

        manager
            .handle(a.id, ClientMessage::Change { document_id: None, content: "x".into() })
            .await
            .unwrap();

        assert!(a.drain().is_empty());
        assert!(b.drain().is_empty());
        assert_eq!(registry.info("demo").await.unwrap().revision, 0);
    }

    #[tokio::test]
    async fn change_before_join_is_ignored() {
        let (registry, manager) = manager();
        let a = connect(&manager, "alice").await;
        let outcome = manager.change(a.id, Some("demo"), "text".into()).await.unwrap();
        assert_eq!(outcome, ChangeOutcome::Ignored);
        assert!(registry.get("demo").await.is_none());
    }

    #[tokio::test]
    async fn rejoin_resends_content_without_announcing() {
        let (_, manager) = manager();
        let mut a = connect(&manager, "alice").await;
        let mut b = connect(&manager, "bob").await;
        manager.join(a.id, "demo").await.unwrap();
        manager.join(b.id, "demo").await.unwrap();
        manager.change(a.id, Some("demo"), "draft".into()).await.unwrap();
        a.drain();
        b.drain();

        manager.join(b.id, "demo").await.unwrap();

        assert_eq!(
            b.drain(),
            vec![
                ServerMessage::DocumentContent { content: "draft".into() },
                ServerMessage::UserCountUpdate { member_count: 2 },
            ]
        );
        assert!(a.drain().is_empty());
    }

    #[tokio::test]
    async fn switching_documents_leaves_the_previous_one() {
        let (registry, manager) = manager();
        let mut a = connect(&manager, "alice").await;
        let mut b = connect(&manager, "bob").await;
        manager.join(a.id, "first").await.unwrap();
        manager.join(b.id, "first").await.unwrap();
        a.drain();
        b.drain();

        manager.join(b.id, "second").await.unwrap();

        assert_eq!(
            a.drain(),
            vec![ServerMessage::UserLeft { identity: "bob".into(), member_count: 1 }]
        );
        assert_eq!(
            b.drain(),
            vec![
                ServerMessage::DocumentContent { content: String::new() },
                ServerMessage::UserCountUpdate { member_count: 1 },
            ]
        );
        let session = manager.session(b.id).await.unwrap();
        assert_eq!(session.state(), SessionState::Joined("second".into()));
        assert_eq!(registry.info("first").await.unwrap().member_count, 1);
        assert_eq!(registry.info("second").await.unwrap().member_count, 1);
    }

    #[tokio::test]
    async fn switching_away_from_a_solo_document_evicts_it() {
        let (registry, manager) = manager();
        let a = connect(&manager, "alice").await;
        manager.join(a.id, "first").await.unwrap();
        manager.change(a.id, Some("first"), "scratch".into()).await.unwrap();

        manager.join(a.id, "second").await.unwrap();

        assert!(registry.get("first").await.is_none());
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn comment_reaches_every_member_including_author() {
        let (registry, manager) = manager();
        let mut a = connect(&manager, "alice").await;
        let mut b = connect(&manager, "bob").await;
        manager.join(a.id, "demo").await.unwrap();
        manager.join(b.id, "demo").await.unwrap();
        a.drain();
        b.drain();

        let comment = manager.add_comment(a.id, "typo here".into(), 4).await.unwrap().unwrap();

        let expected = vec![ServerMessage::NewComment { comment: comment.clone() }];
        assert_eq!(a.drain(), expected);
        assert_eq!(b.drain(), expected);
        assert_eq!(comment.author, "alice");
        assert_eq!(comment.position, 4);
        assert_eq!(registry.comments("demo").await.unwrap(), vec![comment]);
    }

    #[tokio::test]
    async fn comment_position_is_not_reanchored_by_later_edits() {
        let (registry, manager) = manager();
        let a = connect(&manager, "alice").await;
        manager.join(a.id, "demo").await.unwrap();
        manager.change(a.id, Some("demo"), "a long paragraph of text".into()).await.unwrap();
        manager.add_comment(a.id, "end".into(), 20).await.unwrap();

        manager.change(a.id, Some("demo"), "short".into()).await.unwrap();

        let comments = registry.comments("demo").await.unwrap();
        assert_eq!(comments[0].position, 20);
    }

    #[tokio::test]
    async fn comment_from_unjoined_connection_is_ignored() {
        let (_, manager) = manager();
        let mut a = connect(&manager, "alice").await;
        assert!(manager.add_comment(a.id, "hello".into(), 0).await.unwrap().is_none());
        assert!(a.drain().is_empty());
    }

    #[tokio::test]
    async fn typing_flag_follows_events() {
        let (_, manager) = manager();
        let a = connect(&manager, "alice").await;
        let mut b = connect(&manager, "bob").await;
        manager.join(a.id, "demo").await.unwrap();
        manager.join(b.id, "demo").await.unwrap();
        b.drain();

        manager.handle(a.id, ClientMessage::TypingStart).await.unwrap();
        assert!(manager.session(a.id).await.unwrap().typing);
        manager.handle(a.id, ClientMessage::TypingStop).await.unwrap();
        assert!(!manager.session(a.id).await.unwrap().typing);

        assert_eq!(
            b.drain(),
            vec![
                ServerMessage::UserTyping { identity: "alice".into() },
                ServerMessage::UserStoppedTyping { identity: "alice".into() },
            ]
        );
    }

    #[tokio::test]
    async fn restoring_a_version_goes_through_the_change_pipeline() {
        let (registry, manager) = manager();
        let a = connect(&manager, "alice").await;
        let mut b = connect(&manager, "bob").await;
        manager.join(a.id, "demo").await.unwrap();
        manager.join(b.id, "demo").await.unwrap();
        manager.change(a.id, Some("demo"), "v1".into()).await.unwrap();
        manager.change(a.id, Some("demo"), "v2".into()).await.unwrap();
        b.drain();

        let restored = registry.recent_history("demo", 10).await.unwrap()[1].content.clone();
        assert_eq!(restored, "v1");
        manager.change(a.id, Some("demo"), restored).await.unwrap();

        assert_eq!(b.drain(), vec![ServerMessage::DocumentUpdate { content: "v1".into() }]);
        let history = registry.recent_history("demo", 10).await.unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[2].content, "v2");
        assert_eq!(registry.info("demo").await.unwrap().revision, 3);
    }

    #[tokio::test]
    async fn fifty_one_changes_keep_fifty_entries() {
        let (registry, manager) = manager();
        let a = connect(&manager, "alice").await;
        manager.join(a.id, "demo").await.unwrap();
        for i in 1..=51 {
            manager.change(a.id, Some("demo"), format!("content {i}")).await.unwrap();
        }

        let document = registry.lock_existing("demo").await.unwrap();
        let history = document.history().list();
        assert_eq!(history.len(), 50);
        assert!(history.iter().all(|entry| entry.version != 1));
        assert_eq!(history.last().unwrap().content, "content 50");
    }

    #[tokio::test]
    async fn disconnect_is_idempotent() {
        let (registry, manager) = manager();
        let a = connect(&manager, "alice").await;
        let mut b = connect(&manager, "bob").await;
        manager.join(a.id, "demo").await.unwrap();
        manager.join(b.id, "demo").await.unwrap();
        b.drain();

        assert!(manager.disconnect(a.id).await);
        assert!(!manager.disconnect(a.id).await);

        assert_eq!(
            b.drain(),
            vec![ServerMessage::UserLeft { identity: "alice".into(), member_count: 1 }]
        );
        assert_eq!(registry.info("demo").await.unwrap().member_count, 1);
        assert_eq!(manager.connected_count().await, 1);
    }

    #[tokio::test]
    async fn disconnect_of_unjoined_session_touches_no_document() {
        let (registry, manager) = manager();
        let a = connect(&manager, "alice").await;
        assert!(manager.disconnect(a.id).await);
        assert_eq!(registry.len().await, 0);
        assert!(manager.session(a.id).await.is_none());
    }

    #[tokio::test]
    async fn rejoin_after_eviction_starts_fresh() {
        let (registry, manager) = manager();
        let a = connect(&manager, "alice").await;
        manager.join(a.id, "demo").await.unwrap();
        manager.change(a.id, Some("demo"), "gone soon".into()).await.unwrap();
        manager.add_comment(a.id, "also gone".into(), 0).await.unwrap();
        manager.disconnect(a.id).await;

        let mut b = connect(&manager, "bob").await;
        manager.join(b.id, "demo").await.unwrap();

        assert_eq!(b.drain()[0], ServerMessage::DocumentContent { content: String::new() });
        let info = registry.info("demo").await.unwrap();
        assert_eq!(info.revision, 0);
        assert_eq!(info.comment_count, 0);
        assert!(registry.recent_history("demo", 10).await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_changes_are_observed_in_commit_order() {
        let registry = Arc::new(DocumentRegistry::default());
        let manager = Arc::new(SessionManager::new(Arc::clone(&registry)));
        let mut observer = connect(&manager, "observer").await;
        manager.join(observer.id, "demo").await.unwrap();

        let mut writers = Vec::new();
        for w in 0..4 {
            let client = connect(&manager, &format!("writer-{w}")).await;
            manager.join(client.id, "demo").await.unwrap();
            writers.push(client);
        }
        observer.drain();

        let mut tasks = Vec::new();
        for (w, writer) in writers.iter().enumerate() {
            let manager = Arc::clone(&manager);
            let id = writer.id;
            tasks.push(tokio::spawn(async move {
                for i in 0..25 {
                    manager.change(id, Some("demo"), format!("{w}:{i}")).await.unwrap();
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let updates: Vec<String> = observer
            .drain()
            .into_iter()
            .filter_map(|message| match message {
                ServerMessage::DocumentUpdate { content } => Some(content),
                _ => None,
            })
            .collect();
        assert_eq!(updates.len(), 100);

        let document = registry.lock_existing("demo").await.unwrap();
        assert_eq!(document.revision(), 100);
        assert_eq!(document.content(), updates.last().unwrap());

        // Each retained snapshot is the content the observer saw just before it.
        let history = document.history().list();
        let tail = &updates[updates.len() - history.len()..];
        for (entry, pair) in history.iter().skip(1).zip(tail.windows(2)) {
            assert_eq!(entry.content, pair[0]);
        }
    }
}
