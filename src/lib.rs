//! # channel-relay
//!
//! Multi-channel WebSocket relay. Every configured channel is a URL path;
//! a message sent by any connection on a channel is delivered, in order,
//! to every connection on that channel, the sender included.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket, HTTP)
//!     │
//!     ├── WS fallback handler (ws/) ── resolver (domain/)
//!     ├── REST status handlers (api/)
//!     │
//!     ├── Session per connection (relay/)
//!     ├── FanoutPump per channel (relay/)
//!     ├── AuditLog (relay/)
//!     │
//!     └── ChannelRegistry (domain/)
//! ```
//!
//! A path that matches no channel is refused with `404` before the
//! WebSocket upgrade. A member that fails or misses its write deadline is
//! evicted without holding up delivery to the rest of the channel.

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod relay;
pub mod server;
pub mod ws;

#[cfg(test)]
mod testutil;
