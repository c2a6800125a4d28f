//! Canonical channel names.
//!
//! Channel names are request paths configured with a trailing `/` by
//! convention. [`ChannelName`] enforces that form once, at construction, so
//! registry keys are always canonical no matter how a transport presents
//! the path.

use std::fmt;
use std::str::FromStr;

use crate::error::RelayError;

/// Path separator used by channel names.
pub const SEPARATOR: char = '/';

/// Normalized channel name: starts and ends with [`SEPARATOR`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelName(String);

impl ChannelName {
    /// Parses and normalizes a raw channel name.
    ///
    /// Surrounding whitespace is trimmed and a trailing separator is
    /// appended when absent.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::InvalidChannelName`] if the name is empty,
    /// does not start with `/`, or contains whitespace.
    pub fn new(raw: &str) -> Result<Self, RelayError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(RelayError::InvalidChannelName(
                "channel name is empty".to_string(),
            ));
        }
        if !trimmed.starts_with(SEPARATOR) {
            return Err(RelayError::InvalidChannelName(format!(
                "{trimmed} (must start with '{SEPARATOR}')"
            )));
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(RelayError::InvalidChannelName(format!(
                "{trimmed} (contains whitespace)"
            )));
        }
        Ok(Self(with_separator(trimmed)))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Returns `path` with a trailing separator, appending one if absent.
#[must_use]
pub fn with_separator(path: &str) -> String {
    if path.ends_with(SEPARATOR) {
        path.to_string()
    } else {
        format!("{path}{SEPARATOR}")
    }
}

impl FromStr for ChannelName {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ChannelName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn appends_trailing_separator() {
        let Ok(name) = ChannelName::new("/chat") else {
            panic!("valid name");
        };
        assert_eq!(name.as_str(), "/chat/");
    }

    #[test]
    fn keeps_existing_separator() {
        let Ok(name) = ChannelName::new("  /clonos/containers/ ") else {
            panic!("valid name");
        };
        assert_eq!(name.as_str(), "/clonos/containers/");
    }

    #[test]
    fn root_is_valid() {
        let Ok(name) = "/".parse::<ChannelName>() else {
            panic!("valid name");
        };
        assert_eq!(name.as_str(), "/");
    }

    #[test]
    fn rejects_malformed_names() {
        assert!(ChannelName::new("").is_err());
        assert!(ChannelName::new("   ").is_err());
        assert!(ChannelName::new("chat/").is_err());
        assert!(ChannelName::new("/a b/").is_err());
    }

    #[test]
    fn normalized_variants_compare_equal() {
        let a = ChannelName::new("/a/b").ok();
        let b = ChannelName::new("/a/b/").ok();
        assert!(a.is_some());
        assert_eq!(a, b);
    }
}
