//! Channel registry: channel set, member sets and pending-message queues.
//!
//! [`ChannelRegistry`] stores every channel in a `HashMap` behind a single
//! [`tokio::sync::RwLock`]. Structural operations (admit, remove, snapshot)
//! take the lock briefly and never hold it across I/O: fan-out works on a
//! snapshot of the member set, and `enqueue` clones the queue sender before
//! waiting for capacity.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};

use super::channel::{Channel, ChannelSummary};
use super::{ChannelName, ConnectionId, Member, Payload, resolver};

/// Central store for all channels.
///
/// Channels are registered once at startup and never removed; their member
/// sets and queues change continuously while the relay runs.
///
/// # Concurrency
///
/// - Snapshots, resolution and enqueue only take the read lock.
/// - Membership changes take the write lock for a single map operation.
/// - A full queue blocks the publisher in [`ChannelRegistry::enqueue`]
///   without holding any lock.
#[derive(Debug)]
pub struct ChannelRegistry {
    channels: RwLock<HashMap<ChannelName, Channel>>,
    queue_capacity: usize,
}

impl ChannelRegistry {
    /// Creates an empty registry whose channels queue up to
    /// `queue_capacity` pending messages (at least one).
    #[must_use]
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            queue_capacity: queue_capacity.max(1),
        }
    }

    /// Returns the per-channel queue capacity.
    #[must_use]
    pub const fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    /// Registers a channel, allocating its bounded queue.
    ///
    /// Idempotent: returns `false` and changes nothing if the channel
    /// already exists.
    pub async fn register(&self, name: ChannelName) -> bool {
        let mut map = self.channels.write().await;
        if map.contains_key(&name) {
            return false;
        }
        tracing::info!(
            channel = %name,
            capacity = self.queue_capacity,
            "channel registered"
        );
        map.insert(name, Channel::new(self.queue_capacity));
        true
    }

    #[cfg(test)]
    pub(crate) async fn contains(&self, name: &ChannelName) -> bool {
        self.channels.read().await.contains_key(name)
    }

    /// Adds `member` to channel `name` under `id`.
    ///
    /// Returns `false` and changes nothing if the channel is not registered.
    pub async fn add_member(
        &self,
        name: &ChannelName,
        id: ConnectionId,
        member: Arc<dyn Member>,
    ) -> bool {
        let mut map = self.channels.write().await;
        let Some(channel) = map.get_mut(name) else {
            return false;
        };
        channel.members.insert(id, member);
        tracing::debug!(
            channel = %name,
            conn_id = %id,
            members = channel.members.len(),
            "member added"
        );
        true
    }

    /// Removes member `id` from channel `name`.
    ///
    /// Returns the removed handle to the one caller that actually removed
    /// it; every later or concurrent call gets `None` and does nothing.
    pub async fn remove_member(
        &self,
        name: &ChannelName,
        id: ConnectionId,
    ) -> Option<Arc<dyn Member>> {
        let mut map = self.channels.write().await;
        let channel = map.get_mut(name)?;
        let removed = channel.members.remove(&id);
        if removed.is_some() {
            tracing::debug!(
                channel = %name,
                conn_id = %id,
                members = channel.members.len(),
                "member removed"
            );
        }
        removed
    }

    /// Appends `payload` to channel `name`'s queue.
    ///
    /// Blocks while the queue is full, throttling the publisher instead of
    /// dropping messages. Returns `false` if the channel is not registered.
    pub async fn enqueue(&self, name: &ChannelName, payload: Payload) -> bool {
        let sender = {
            let map = self.channels.read().await;
            let Some(channel) = map.get(name) else {
                return false;
            };
            channel.sender.clone()
        };
        if sender.send(payload).await.is_err() {
            tracing::warn!(channel = %name, "channel queue closed; message dropped");
            return false;
        }
        true
    }

    /// Returns a point-in-time copy of channel `name`'s member set.
    ///
    /// Unknown channels yield an empty snapshot.
    pub async fn snapshot_members(
        &self,
        name: &ChannelName,
    ) -> Vec<(ConnectionId, Arc<dyn Member>)> {
        let map = self.channels.read().await;
        map.get(name)
            .map(|channel| {
                channel
                    .members
                    .iter()
                    .map(|(id, member)| (*id, Arc::clone(member)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Resolves a request path to a registered channel name.
    ///
    /// See [`resolver::resolve`] for the precedence rules.
    pub async fn resolve(&self, path: &str) -> Option<ChannelName> {
        let map = self.channels.read().await;
        resolver::resolve(map.keys(), path).cloned()
    }

    /// Hands channel `name`'s queue receiver to its fan-out pump.
    ///
    /// Returns `None` if the channel is unknown or the queue was already
    /// taken.
    pub async fn take_queue(&self, name: &ChannelName) -> Option<mpsc::Receiver<Payload>> {
        let mut map = self.channels.write().await;
        map.get_mut(name)?.receiver.take()
    }

    /// Returns the number of members of channel `name`.
    pub async fn member_count(&self, name: &ChannelName) -> Option<usize> {
        let map = self.channels.read().await;
        map.get(name).map(|channel| channel.members.len())
    }

    /// Returns all registered channel names, sorted.
    pub async fn channel_names(&self) -> Vec<ChannelName> {
        let map = self.channels.read().await;
        let mut names: Vec<ChannelName> = map.keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns a status summary of channel `name`.
    pub async fn summary(&self, name: &ChannelName) -> Option<ChannelSummary> {
        let map = self.channels.read().await;
        map.get(name).map(|channel| channel.summary(name))
    }

    /// Returns status summaries of all channels, sorted by name.
    pub async fn summaries(&self) -> Vec<ChannelSummary> {
        let map = self.channels.read().await;
        let mut summaries: Vec<ChannelSummary> = map
            .iter()
            .map(|(name, channel)| channel.summary(name))
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        summaries
    }

    /// Returns the number of registered channels.
    pub async fn len(&self) -> usize {
        self.channels.read().await.len()
    }

    /// Returns `true` if no channel is registered.
    pub async fn is_empty(&self) -> bool {
        self.channels.read().await.is_empty()
    }
}

impl Default for ChannelRegistry {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_QUEUE_CAPACITY)
    }
}
