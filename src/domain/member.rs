//! Write side of a subscriber connection, as seen by the registry.
//!
//! The registry and the fan-out pump only ever talk to members through this
//! trait; the WebSocket binding lives in [`crate::ws::connection`].

use std::fmt;

use async_trait::async_trait;

use super::Payload;
use crate::error::RelayError;

/// A channel member that can receive relayed payloads.
///
/// Implementations must make [`Member::close`] idempotent: the session's
/// own teardown and the pump's eviction path may both reach it.
#[async_trait]
pub trait Member: Send + Sync + fmt::Debug {
    /// Writes one payload to the member.
    ///
    /// Callers bound this with a deadline; implementations need not.
    ///
    /// # Errors
    ///
    /// Returns a [`RelayError`] if the member is closed or the write fails.
    async fn send(&self, payload: Payload) -> Result<(), RelayError>;

    /// Closes the member's transport. Closing twice is a no-op.
    async fn close(&self);

    /// Resolves once [`Member::close`] has been called.
    async fn closed(&self);
}
