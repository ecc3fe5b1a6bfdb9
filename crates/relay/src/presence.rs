// Presence: room membership changes and typing notices.
//
// All membership mutations go through here. A leave and its broadcast happen
// under the document lock; the eviction check runs after that lock is
// released, under the registry's map lock.

use std::sync::Arc;

use markpad_common::protocol::ServerMessage;
use tracing::{debug, info};

use crate::broadcast::BroadcastRouter;
use crate::document::{Document, DocumentRegistry};
use crate::ConnectionId;

#[derive(Debug, Clone)]
pub struct PresenceCoordinator {
    registry: Arc<DocumentRegistry>,
    router: Arc<BroadcastRouter>,
}

impl PresenceCoordinator {
    pub fn new(registry: Arc<DocumentRegistry>, router: Arc<BroadcastRouter>) -> Self {
        Self { registry, router }
    }

    /// Add `connection_id` to a locked document. Returns the member count.
    pub fn admit(&self, document: &mut Document, connection_id: ConnectionId) -> usize {
        document.insert_member(connection_id);
        document.member_count()
    }

    /// Tell the rest of the room about a join, and the joiner its count.
    pub async fn announce_join(
        &self,
        document: &Document,
        identity: &str,
        joiner: ConnectionId,
    ) -> usize {
        let member_count = document.member_count();
        let notified = self
            .router
            .fan_out(
                document.members(),
                Some(joiner),
                &ServerMessage::UserJoined { identity: identity.to_string(), member_count },
            )
            .await;
        self.router.send_to(joiner, ServerMessage::UserCountUpdate { member_count }).await;
        notified
    }

    /// Remove `connection_id` from `document_id`, notify the remaining
    /// members and evict the document if it is now empty.
    ///
    /// Returns the remaining member count, or `None` when the connection
    /// was not a member.
    pub async fn leave(
        &self,
        connection_id: ConnectionId,
        identity: &str,
        document_id: &str,
    ) -> Option<usize> {
        let member_count = {
            let mut document = self.registry.lock_existing(document_id).await?;
            if !document.remove_member(connection_id) {
                return None;
            }

            let member_count = document.member_count();
            self.router
                .fan_out(
                    document.members(),
                    None,
                    &ServerMessage::UserLeft { identity: identity.to_string(), member_count },
                )
                .await;
            member_count
        };

        if member_count == 0 && self.registry.evict_if_empty(document_id).await {
            info!(document_id = %document_id, "document evicted after last member left");
        }
        Some(member_count)
    }

    /// Relay a typing start/stop notice to the rest of the room.
    pub async fn set_typing(
        &self,
        connection_id: ConnectionId,
        identity: &str,
        document_id: &str,
        is_typing: bool,
    ) -> usize {
        let Some(document) = self.registry.lock_existing(document_id).await else {
            return 0;
        };
        let identity = identity.to_string();
        let message = if is_typing {
            ServerMessage::UserTyping { identity }
        } else {
            ServerMessage::UserStoppedTyping { identity }
        };
        debug!(connection_id = %connection_id, document_id = %document_id, is_typing, "typing notice");
        self.router.fan_out(document.members(), Some(connection_id), &message).await
    }
}
