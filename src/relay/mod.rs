//! Relay engine: connection sessions, per-channel fan-out pumps, and the
//! optional audit log.
//!
//! Sessions push inbound payloads onto their channel's queue through the
//! [`crate::domain::ChannelRegistry`]; each channel's [`FanoutPump`] drains
//! that queue and writes to every member.

pub mod audit;
pub mod pump;
pub mod session;

pub use audit::AuditLog;
pub use pump::{DeliveryReport, FanoutPump};
pub use session::{CloseReason, Session, SessionState};
