//! Broadcast chat over WebSocket.
//!
//! Runs on its own port, independent of the HTTP API and of the store.
//! Every text or binary frame a client sends is forwarded as-is to all other
//! connected clients. There are no rooms, no identities and no history.

mod relay;
pub mod server;

pub use relay::ChatRelay;
