// Wire protocol for the Markpad document session relay.

pub mod events;

pub use events::{ClientMessage, ProtocolError, ServerMessage};
