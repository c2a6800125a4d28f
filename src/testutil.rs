//! In-memory [`Member`] used by unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::domain::{Member, Payload};
use crate::error::RelayError;

/// How a [`RecordingMember`] reacts to writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Behavior {
    Accept,
    Fail,
    /// Sleeps this long before accepting.
    Stall(Duration),
}

/// Records every delivered payload and counts close calls.
#[derive(Debug)]
pub(crate) struct RecordingMember {
    behavior: Behavior,
    received: Mutex<Vec<Payload>>,
    close_calls: AtomicUsize,
    closed: watch::Sender<bool>,
}

impl RecordingMember {
    pub(crate) fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            received: Mutex::new(Vec::new()),
            close_calls: AtomicUsize::new(0),
            closed: watch::Sender::new(false),
        })
    }

    pub(crate) fn accepting() -> Arc<Self> {
        Self::new(Behavior::Accept)
    }

    pub(crate) fn received(&self) -> Vec<Payload> {
        self.received
            .lock()
            .map(|received| received.clone())
            .unwrap_or_default()
    }

    pub(crate) fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }
}

#[async_trait]
impl Member for RecordingMember {
    async fn send(&self, payload: Payload) -> Result<(), RelayError> {
        if self.is_closed() {
            return Err(RelayError::PeerClosed);
        }
        match self.behavior {
            Behavior::Accept => {}
            Behavior::Fail => return Err(RelayError::Transport("broken pipe".to_string())),
            Behavior::Stall(delay) => tokio::time::sleep(delay).await,
        }
        if let Ok(mut received) = self.received.lock() {
            received.push(payload);
        }
        Ok(())
    }

    async fn close(&self) {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        self.closed.send_replace(true);
    }

    async fn closed(&self) {
        let mut rx = self.closed.subscribe();
        let _ = rx.wait_for(|closed| *closed).await;
    }
}

/// Coerces a recording member into the trait object the registry stores.
pub(crate) fn as_member(member: &Arc<RecordingMember>) -> Arc<dyn Member> {
    Arc::clone(member) as Arc<dyn Member>
}
