//! Opaque message payloads.

use axum::extract::ws::Utf8Bytes;
use bytes::Bytes;

/// One relayed message, carried verbatim from publisher to members.
///
/// The frame kind is preserved so a text frame is delivered as text and a
/// binary frame as binary. Both variants are reference counted, so cloning
/// a payload for every member of a channel does not copy the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// UTF-8 text frame.
    Text(Utf8Bytes),
    /// Binary frame.
    Binary(Bytes),
}

impl Payload {
    /// Builds a text payload.
    #[must_use]
    pub fn text(text: impl Into<Utf8Bytes>) -> Self {
        Self::Text(text.into())
    }

    /// Builds a binary payload.
    #[must_use]
    pub fn binary(data: impl Into<Bytes>) -> Self {
        Self::Binary(data.into())
    }

    /// Returns the raw payload bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_str().as_bytes(),
            Self::Binary(data) => data.as_ref(),
        }
    }

    /// Returns the payload length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Returns `true` if the payload carries no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` for text frames.
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }
}
