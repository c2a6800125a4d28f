//! Relay configuration loaded from environment variables and the channel
//! list file.
//!
//! Scalar settings follow 12-factor style: they come from environment
//! variables (or a `.env` file via `dotenvy`). The set of channels comes
//! from a plain-text file, one channel per line:
//!
//! ```text
//! # comment
//! /chat/
//! /clonos/containers   /var/log/relay/containers.log
//! ```
//!
//! The first token is the channel name (normalized to end with `/`); an
//! optional second token is the channel's audit-log destination.

use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::ChannelName;
use crate::error::RelayError;

/// Default per-channel queue capacity.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Default write deadline for one member, in milliseconds.
pub const DEFAULT_WRITE_TIMEOUT_MS: u64 = 5_000;

/// Default number of buffered audit records per channel.
pub const DEFAULT_AUDIT_BUFFER: usize = 1_024;

/// Top-level relay configuration.
///
/// Loaded once at startup via [`RelayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:8023`).
    pub listen_addr: SocketAddr,

    /// Channel list file, if set through `CHANNELS_FILE`.
    pub channels_file: Option<PathBuf>,

    /// Pending messages a channel queues before publishers block.
    pub queue_capacity: usize,

    /// Deadline for writing one message to one member.
    pub write_timeout: Duration,

    /// Audit records buffered per channel before new ones are dropped.
    pub audit_buffer: usize,

    /// Emit logs as JSON lines instead of human-readable text.
    pub log_json: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8023)),
            channels_file: None,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            write_timeout: Duration::from_millis(DEFAULT_WRITE_TIMEOUT_MS),
            audit_buffer: DEFAULT_AUDIT_BUFFER,
            log_json: false,
        }
    }
}

impl RelayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults when a variable is not set. Calls
    /// `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Config`] if `LISTEN_ADDR` is set but cannot be
    /// parsed as a [`SocketAddr`].
    pub fn from_env() -> Result<Self, RelayError> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let listen_addr = match std::env::var("LISTEN_ADDR") {
            Ok(raw) => raw
                .parse()
                .map_err(|err| RelayError::Config(format!("LISTEN_ADDR={raw}: {err}")))?,
            Err(_) => defaults.listen_addr,
        };

        let channels_file = std::env::var_os("CHANNELS_FILE").map(PathBuf::from);
        let queue_capacity = parse_env("CHANNEL_QUEUE_CAPACITY", defaults.queue_capacity).max(1);
        let write_timeout =
            Duration::from_millis(parse_env("WRITE_TIMEOUT_MS", DEFAULT_WRITE_TIMEOUT_MS));
        let audit_buffer = parse_env("AUDIT_BUFFER_CAPACITY", defaults.audit_buffer).max(1);
        let log_json = std::env::var("LOG_FORMAT")
            .map(|format| format.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Ok(Self {
            listen_addr,
            channels_file,
            queue_capacity,
            write_timeout,
            audit_buffer,
            log_json,
        })
    }
}

/// One configured channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSpec {
    /// Normalized channel name.
    pub name: ChannelName,
    /// Optional audit-log destination.
    pub audit_log: Option<PathBuf>,
}

/// Reads and parses a channel list file.
///
/// # Errors
///
/// Returns [`RelayError::Io`] if the file cannot be read, or the errors of
/// [`parse_channels`].
pub fn load_channels(path: &Path) -> Result<Vec<ChannelSpec>, RelayError> {
    let contents = std::fs::read_to_string(path)?;
    parse_channels(&contents)
}

/// Parses channel list text.
///
/// Blank lines and `#` comments are skipped. A channel listed twice keeps
/// its first entry.
///
/// # Errors
///
/// Returns [`RelayError::InvalidChannelName`] for a malformed name,
/// [`RelayError::Config`] for a line with more than two fields, and
/// [`RelayError::Config`] if no channel is listed.
pub fn parse_channels(contents: &str) -> Result<Vec<ChannelSpec>, RelayError> {
    let mut specs = Vec::new();
    let mut seen = HashSet::new();

    for (index, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split_whitespace();
        let (Some(raw_name), audit_log, None) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(RelayError::Config(format!(
                "line {}: expected `<channel> [audit-log]`, got `{line}`",
                index + 1
            )));
        };
        let name = ChannelName::new(raw_name)?;
        if !seen.insert(name.clone()) {
            tracing::warn!(channel = %name, line = index + 1, "duplicate channel ignored");
            continue;
        }
        specs.push(ChannelSpec {
            name,
            audit_log: audit_log.map(PathBuf::from),
        });
    }

    if specs.is_empty() {
        return Err(RelayError::Config("no channels configured".to_string()));
    }
    Ok(specs)
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
