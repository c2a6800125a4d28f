//! Channel status DTOs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ChannelSummary;

/// Status of one channel.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChannelDto {
    /// Canonical channel name (always ends with `/`).
    pub name: String,
    /// Currently connected members.
    pub members: usize,
    /// Messages waiting for fan-out.
    pub queued: usize,
    /// Queue capacity before publishers are throttled.
    pub capacity: usize,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<ChannelSummary> for ChannelDto {
    fn from(summary: ChannelSummary) -> Self {
        Self {
            name: summary.name,
            members: summary.members,
            queued: summary.queued,
            capacity: summary.capacity,
            created_at: summary.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::channel_name::with_separator;

    #[test]
    fn converts_from_summary() {
        let created_at = Utc::now();
        let summary = ChannelSummary {
            name: with_separator("/chat"),
            members: 3,
            queued: 1,
            capacity: 256,
            created_at,
        };
        let dto = ChannelDto::from(summary);
        assert_eq!(dto.name, "/chat/");
        assert_eq!(dto.members, 3);
        assert_eq!(dto.queued, 1);
        assert_eq!(dto.capacity, 256);
        assert_eq!(dto.created_at, created_at);
    }
}
