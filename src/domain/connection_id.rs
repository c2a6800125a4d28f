//! Opaque per-connection identity.
//!
//! [`ConnectionId`] is a newtype wrapper around [`uuid::Uuid`] (v4). A fresh
//! id is minted for every accepted WebSocket, so a client that reconnects is
//! a different member from the registry's point of view.

use std::fmt;

/// Unique identifier for one live subscriber connection.
///
/// Used as the key of a channel's member set in
/// [`super::ChannelRegistry`]. Two simultaneously-open connections never
/// compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(uuid::Uuid);

impl ConnectionId {
    /// Creates a new random `ConnectionId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Returns the inner [`uuid::Uuid`].
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
