// WebSocket transport: one socket per connection, JSON text frames.

mod handler;
pub mod protocol;

use axum::{routing::get, Router};

use crate::Relay;

pub use handler::ConnectParams;

pub fn router() -> Router<Relay> {
    Router::new().route("/ws", get(handler::ws_upgrade))
}
