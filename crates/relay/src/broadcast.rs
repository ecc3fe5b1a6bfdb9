// Fan-out of server events to connections.
//
// Every connection owns an unbounded outbound queue drained by its socket
// task. Enqueueing never blocks, so callers may fan out while holding a
// document lock; the order in which events are enqueued is the order each
// connection receives them.

use std::collections::HashMap;

use markpad_common::protocol::ServerMessage;
use tokio::sync::{mpsc, RwLock};

use crate::ConnectionId;

pub type OutboundSender = mpsc::UnboundedSender<ServerMessage>;

#[derive(Debug, Default)]
pub struct BroadcastRouter {
    outbound: RwLock<HashMap<ConnectionId, OutboundSender>>,
}

impl BroadcastRouter {
    pub async fn register(&self, connection_id: ConnectionId, sender: OutboundSender) {
        self.outbound.write().await.insert(connection_id, sender);
    }

    pub async fn unregister(&self, connection_id: ConnectionId) -> bool {
        self.outbound.write().await.remove(&connection_id).is_some()
    }

    /// Point-to-point delivery. Returns false when the connection is gone.
    pub async fn send_to(&self, connection_id: ConnectionId, message: ServerMessage) -> bool {
        self.outbound
            .read()
            .await
            .get(&connection_id)
            .is_some_and(|sender| sender.send(message).is_ok())
    }

    /// Deliver `message` to every member except `exclude`.
    ///
    /// Members whose queue has closed are skipped; there is no redelivery.
    /// Returns the number of queues the message was placed on.
    pub async fn fan_out<'a, I>(
        &self,
        members: I,
        exclude: Option<ConnectionId>,
        message: &ServerMessage,
    ) -> usize
    where
        I: IntoIterator<Item = &'a ConnectionId>,
    {
        let outbound = self.outbound.read().await;
        let mut sent_count = 0;
        for member in members {
            if Some(*member) == exclude {
                continue;
            }
            if let Some(sender) = outbound.get(member) {
                if sender.send(message.clone()).is_ok() {
                    sent_count += 1;
                }
            }
        }
        sent_count
    }

    pub async fn len(&self) -> usize {
        self.outbound.read().await.len()
    }
}
