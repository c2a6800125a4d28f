//! Connection session state machine.
//!
//! ```text
//! Connecting ──admit──▶ Admitted ──run──▶ Active ──▶ Closed
//!      │                                              ▲
//!      └──────────── channel missing ─────────────────┘
//! ```
//!
//! An active session forwards every inbound payload to its channel's queue
//! until the peer goes away, the transport fails, or the fan-out pump
//! evicts the connection. Teardown runs exactly once whichever way the
//! session ends.

use std::sync::Arc;

use futures_util::{Stream, StreamExt};

use super::audit::AuditLog;
use crate::domain::{ChannelName, ChannelRegistry, ConnectionId, Member, Payload};
use crate::error::RelayError;

/// Lifecycle state of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, not yet a channel member.
    Connecting,
    /// Registered as a member of its channel.
    Admitted,
    /// Reading inbound messages.
    Active,
    /// Membership removed and transport released.
    Closed,
}

/// Why a session ended.
#[derive(Debug)]
pub enum CloseReason {
    /// Admission failed; the connection never became a member.
    Rejected,
    /// The peer sent a close frame or the stream ended.
    PeerClosed,
    /// Receiving from the peer failed.
    ReceiveFailed(RelayError),
    /// The fan-out pump evicted the connection after a failed write.
    Evicted,
    /// The channel queue refused the message.
    ChannelUnavailable,
}

/// One subscriber connection bound to one channel.
#[derive(Debug)]
pub struct Session {
    id: ConnectionId,
    channel: ChannelName,
    registry: Arc<ChannelRegistry>,
    audit: AuditLog,
    member: Arc<dyn Member>,
    state: SessionState,
}

impl Session {
    /// Creates a session in the [`SessionState::Connecting`] state with a
    /// fresh [`ConnectionId`].
    #[must_use]
    pub fn new(
        registry: Arc<ChannelRegistry>,
        audit: AuditLog,
        channel: ChannelName,
        member: Arc<dyn Member>,
    ) -> Self {
        Self {
            id: ConnectionId::new(),
            channel,
            registry,
            audit,
            member,
            state: SessionState::Connecting,
        }
    }

    /// Returns the connection identity.
    #[must_use]
    pub const fn id(&self) -> ConnectionId {
        self.id
    }

    /// Returns the channel this session was admitted to.
    #[must_use]
    pub const fn channel(&self) -> &ChannelName {
        &self.channel
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Registers the connection as a member of its channel.
    ///
    /// On failure the transport is closed and the session moves straight
    /// to [`SessionState::Closed`]. Calling this outside
    /// [`SessionState::Connecting`] only reports whether the session is
    /// still a member.
    pub async fn admit(&mut self) -> bool {
        if self.state != SessionState::Connecting {
            return matches!(self.state, SessionState::Admitted | SessionState::Active);
        }
        let admitted = self
            .registry
            .add_member(&self.channel, self.id, Arc::clone(&self.member))
            .await;
        if admitted {
            self.state = SessionState::Admitted;
            tracing::debug!(
                channel = %self.channel,
                conn_id = %self.id,
                audited = self.audit.is_enabled(&self.channel),
                "session admitted"
            );
        } else {
            tracing::warn!(
                channel = %self.channel,
                conn_id = %self.id,
                "channel not registered; rejecting connection"
            );
            self.member.close().await;
            self.state = SessionState::Closed;
        }
        admitted
    }

    /// Admits the session if needed, then relays `inbound` until the
    /// connection ends.
    ///
    /// A session that is already closed returns [`CloseReason::Rejected`]
    /// without reading.
    pub async fn run<S>(&mut self, mut inbound: S) -> CloseReason
    where
        S: Stream<Item = Result<Payload, RelayError>> + Unpin,
    {
        match self.state {
            SessionState::Connecting => {
                if !self.admit().await {
                    return CloseReason::Rejected;
                }
            }
            SessionState::Admitted => {}
            SessionState::Active | SessionState::Closed => return CloseReason::Rejected,
        }
        self.state = SessionState::Active;

        let reason = loop {
            tokio::select! {
                () = self.member.closed() => break CloseReason::Evicted,
                next = inbound.next() => match next {
                    Some(Ok(payload)) => {
                        self.audit.record(&self.channel, &payload);
                        if !self.registry.enqueue(&self.channel, payload).await {
                            break CloseReason::ChannelUnavailable;
                        }
                    }
                    Some(Err(RelayError::PeerClosed)) | None => break CloseReason::PeerClosed,
                    Some(Err(err)) => break CloseReason::ReceiveFailed(err),
                },
            }
        };

        self.teardown().await;
        tracing::debug!(
            channel = %self.channel,
            conn_id = %self.id,
            reason = ?reason,
            "session closed"
        );
        reason
    }

    /// Leaves the channel and, if still a member, closes the transport.
    ///
    /// Safe to race with the pump's eviction: only the caller that removes
    /// the member closes it.
    async fn teardown(&mut self) {
        if let Some(member) = self.registry.remove_member(&self.channel, self.id).await {
            member.close().await;
        }
        self.state = SessionState::Closed;
    }
}
