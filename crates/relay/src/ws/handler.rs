use axum::{
    extract::{
        ws::{close_code, CloseFrame, Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::HeaderMap,
    response::IntoResponse,
};
use markpad_common::protocol::ServerMessage;
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

use super::protocol as ws_protocol;
use crate::error::{current_request_id, request_id_from_headers_or_generate, with_request_id_scope};
use crate::Relay;

/// Query parameters accepted on the upgrade request.
#[derive(Debug, Default, Deserialize)]
pub struct ConnectParams {
    pub username: Option<String>,
}

pub async fn ws_upgrade(
    State(relay): State<Relay>,
    Query(params): Query<ConnectParams>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let identity = relay.identity.identify(params.username.as_deref());
    let request_id = request_id_from_headers_or_generate(&headers);
    let max_frame_bytes = relay.max_frame_bytes;

    ws.max_message_size(max_frame_bytes).max_frame_size(max_frame_bytes).on_upgrade(
        move |socket| async move {
            with_request_id_scope(request_id, handle_socket(relay, identity, socket)).await;
        },
    )
}

fn is_frame_size_violation(error: &axum::Error) -> bool {
    let message = error.to_string().to_ascii_lowercase();
    message.contains("message too long")
        || message.contains("frame too long")
        || message.contains("too large")
        || message.contains("too big")
        || message.contains("size limit")
}

async fn close_frame_too_large(socket: &mut WebSocket, max_frame_bytes: usize) {
    let _ = socket
        .send(Message::Close(Some(CloseFrame {
            code: close_code::SIZE,
            reason: format!("websocket message exceeds maximum size of {max_frame_bytes} bytes")
                .into(),
        })))
        .await;
}

async fn handle_socket(relay: Relay, identity: String, mut socket: WebSocket) {
    let request_id = current_request_id().unwrap_or_else(|| "unknown".to_string());
    let connection_id = Uuid::new_v4();

    let (outbound_sender, mut outbound_receiver) = mpsc::unbounded_channel::<ServerMessage>();
    if let Err(error) = relay.sessions.connect(connection_id, identity, outbound_sender).await {
        warn!(connection_id = %connection_id, request_id = %request_id, error = %error, "failed to register connection");
        return;
    }

    loop {
        tokio::select! {
            maybe_outbound = outbound_receiver.recv() => {
                match maybe_outbound {
                    Some(outbound_message) => {
                        if ws_protocol::send_ws_message(&mut socket, &outbound_message).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }
            maybe_message = socket.recv() => {
                let Some(message) = maybe_message else {
                    break;
                };

                match message {
                    Ok(Message::Text(raw_message)) => {
                        let inbound = match ws_protocol::decode_message(&raw_message) {
                            Ok(message) => message,
                            Err(error) => {
                                warn!(
                                    connection_id = %connection_id,
                                    request_id = %request_id,
                                    error = %error,
                                    "rejecting inbound frame"
                                );
                                if ws_protocol::send_ws_message(&mut socket, &error.to_message())
                                    .await
                                    .is_err()
                                {
                                    break;
                                }
                                continue;
                            }
                        };

                        debug!(connection_id = %connection_id, kind = inbound.kind(), "inbound event");
                        if let Err(error) = relay.sessions.handle(connection_id, inbound).await {
                            warn!(
                                connection_id = %connection_id,
                                request_id = %request_id,
                                error = %error,
                                "dropping connection after session error"
                            );
                            break;
                        }
                    }
                    Ok(Message::Ping(payload)) => {
                        if socket.send(Message::Pong(payload)).await.is_err() {
                            break;
                        }
                    }
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(error) => {
                        if is_frame_size_violation(&error) {
                            close_frame_too_large(&mut socket, relay.max_frame_bytes).await;
                        }
                        break;
                    }
                }
            }
        }
    }

    relay.sessions.disconnect(connection_id).await;
}
