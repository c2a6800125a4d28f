//! Per-channel fan-out pump.
//!
//! One [`FanoutPump`] runs per channel for the life of the process. It
//! drains the channel's queue in order and writes each payload to every
//! member in a fresh snapshot. Writes run concurrently, each bounded by the
//! write deadline; a member that errors or stalls past the deadline is
//! removed from the channel and closed, and nobody else waits on it.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::{ChannelName, ChannelRegistry, ConnectionId, Payload};
use crate::error::RelayError;

/// Outcome of fanning out one payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Members that accepted the payload.
    pub delivered: usize,
    /// Members whose write failed or timed out.
    pub evicted: usize,
}

/// Drains one channel's queue and delivers to its members.
#[derive(Debug)]
pub struct FanoutPump {
    registry: Arc<ChannelRegistry>,
    channel: ChannelName,
    queue: mpsc::Receiver<Payload>,
    write_timeout: Duration,
}

impl FanoutPump {
    /// Creates the pump for `channel`, taking ownership of its queue.
    ///
    /// Returns `None` if the channel is not registered or already has a
    /// pump.
    pub async fn new(
        registry: Arc<ChannelRegistry>,
        channel: ChannelName,
        write_timeout: Duration,
    ) -> Option<Self> {
        let queue = registry.take_queue(&channel).await?;
        Some(Self {
            registry,
            channel,
            queue,
            write_timeout,
        })
    }

    /// Runs the pump on a background task.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Delivers queued payloads until the queue closes.
    ///
    /// The registry keeps every queue open, so in practice this only
    /// returns at process shutdown.
    pub async fn run(mut self) {
        tracing::debug!(channel = %self.channel, "fan-out pump started");
        while let Some(payload) = self.queue.recv().await {
            let bytes = payload.len();
            let text = payload.is_text();
            let report = self.deliver(payload).await;
            tracing::trace!(
                channel = %self.channel,
                bytes,
                text,
                delivered = report.delivered,
                evicted = report.evicted,
                "payload fanned out"
            );
        }
        tracing::warn!(channel = %self.channel, "channel queue closed; fan-out pump stopped");
    }

    /// Writes `payload` to every current member and evicts failures.
    ///
    /// All members in the snapshot are attempted before this returns.
    pub async fn deliver(&self, payload: Payload) -> DeliveryReport {
        let members = self.registry.snapshot_members(&self.channel).await;
        let write_timeout = self.write_timeout;

        let attempts = members.into_iter().map(|(id, member)| {
            let payload = payload.clone();
            async move {
                let outcome = match tokio::time::timeout(write_timeout, member.send(payload)).await
                {
                    Ok(result) => result,
                    Err(_) => Err(RelayError::WriteTimeout),
                };
                (id, outcome)
            }
        });

        let mut report = DeliveryReport::default();
        for (id, outcome) in join_all(attempts).await {
            match outcome {
                Ok(()) => report.delivered += 1,
                Err(err) => {
                    report.evicted += 1;
                    self.evict(id, &err).await;
                }
            }
        }
        report
    }

    /// Removes a failed member; closes it only if this call removed it.
    async fn evict(&self, id: ConnectionId, err: &RelayError) {
        tracing::warn!(
            channel = %self.channel,
            conn_id = %id,
            error = %err,
            "write to member failed; evicting"
        );
        if let Some(member) = self.registry.remove_member(&self.channel, id).await {
            tokio::spawn(async move { member.close().await });
        }
    }
}
