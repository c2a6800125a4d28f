//! Per-channel state owned by the registry.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;

use super::{ChannelName, ConnectionId, Member, Payload};

/// Member set and pending-message queue of one channel.
///
/// Only reachable through [`super::ChannelRegistry`], which guards it with
/// the registry lock.
#[derive(Debug)]
pub(crate) struct Channel {
    pub(crate) members: HashMap<ConnectionId, Arc<dyn Member>>,
    pub(crate) sender: mpsc::Sender<Payload>,
    /// Taken exactly once by the channel's fan-out pump.
    pub(crate) receiver: Option<mpsc::Receiver<Payload>>,
    pub(crate) created_at: DateTime<Utc>,
}

impl Channel {
    pub(crate) fn new(queue_capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(queue_capacity);
        Self {
            members: HashMap::new(),
            sender,
            receiver: Some(receiver),
            created_at: Utc::now(),
        }
    }

    pub(crate) fn summary(&self, name: &ChannelName) -> ChannelSummary {
        let capacity = self.sender.max_capacity();
        ChannelSummary {
            name: name.to_string(),
            members: self.members.len(),
            queued: capacity.saturating_sub(self.sender.capacity()),
            capacity,
            created_at: self.created_at,
        }
    }
}

/// Point-in-time view of a channel for status endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelSummary {
    /// Canonical channel name.
    pub name: String,
    /// Number of connected members.
    pub members: usize,
    /// Messages waiting for fan-out.
    pub queued: usize,
    /// Queue capacity.
    pub capacity: usize,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}
