//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::{ChannelSpec, RelayConfig};
use crate::domain::ChannelRegistry;
use crate::error::RelayError;
use crate::relay::{AuditLog, FanoutPump};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Channel registry shared by sessions and pumps.
    pub registry: Arc<ChannelRegistry>,
    /// Per-channel audit log.
    pub audit: AuditLog,
}

impl AppState {
    /// Registers every configured channel, opens audit destinations and
    /// starts one fan-out pump per channel.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Config`] if `channels` is empty, or
    /// [`RelayError::Internal`] if a pump cannot take its channel queue.
    pub async fn bootstrap(
        config: &RelayConfig,
        channels: &[ChannelSpec],
    ) -> Result<Self, RelayError> {
        if channels.is_empty() {
            return Err(RelayError::Config("no channels configured".to_string()));
        }

        let registry = Arc::new(ChannelRegistry::new(config.queue_capacity));
        let mut registered = Vec::with_capacity(channels.len());
        for spec in channels {
            if registry.register(spec.name.clone()).await {
                registered.push(spec);
            }
        }

        let audit = AuditLog::open(
            registered.iter().filter_map(|spec| {
                spec.audit_log
                    .clone()
                    .map(|path| (spec.name.clone(), path))
            }),
            config.audit_buffer,
        );

        for spec in &registered {
            let pump = FanoutPump::new(
                Arc::clone(&registry),
                spec.name.clone(),
                config.write_timeout,
            )
            .await
            .ok_or_else(|| {
                RelayError::Internal(format!("queue for {} already taken", spec.name))
            })?;
            pump.spawn();
        }

        tracing::info!(
            channels = registered.len(),
            write_timeout_ms =
                u64::try_from(config.write_timeout.as_millis()).unwrap_or(u64::MAX),
            queue_capacity = registry.queue_capacity(),
            "relay bootstrapped"
        );

        Ok(Self { registry, audit })
    }
}
