// markpad-common: wire protocol and shared types for the Markpad relay.

pub mod protocol;
pub mod types;
