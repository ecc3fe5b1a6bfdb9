use axum::extract::ws::{Message, WebSocket};
use markpad_common::protocol::{ClientMessage, ProtocolError, ServerMessage};

/// Decode one text frame and apply the boundary checks serde cannot express.
pub fn decode_message(raw: &str) -> Result<ClientMessage, ProtocolError> {
    let message = serde_json::from_str::<ClientMessage>(raw)?;
    message.validate()?;
    Ok(message)
}

pub fn encode_message(message: &ServerMessage) -> Result<String, serde_json::Error> {
    serde_json::to_string(message)
}

pub async fn send_ws_message(socket: &mut WebSocket, message: &ServerMessage) -> Result<(), ()> {
    let encoded = encode_message(message).map_err(|_| ())?;
    socket.send(Message::Text(encoded.into())).await.map_err(|_| ())
}
