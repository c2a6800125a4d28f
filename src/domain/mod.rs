//! Domain layer: channel names, connection identity, payloads, and the
//! channel registry.
//!
//! This module holds the relay's core model: the [`ChannelRegistry`] that
//! owns every channel's member set and pending-message queue, the endpoint
//! [`resolver`] that maps request paths to channels, and the [`Member`]
//! seam through which the fan-out pump writes to connections.

pub mod channel;
pub mod channel_name;
pub mod connection_id;
pub mod member;
pub mod payload;
pub mod registry;
pub mod resolver;

pub use channel::ChannelSummary;
pub use channel_name::ChannelName;
pub use connection_id::ConnectionId;
pub use member::Member;
pub use payload::Payload;
pub use registry::ChannelRegistry;
