//! Endpoint resolution: request path → registered channel.
//!
//! Transports differ on whether they keep the trailing `/` of a path, and
//! clients may address a sub-path of a channel's namespace. Resolution
//! absorbs both so registry keys stay canonical. Rules, first match wins:
//!
//! 1. exact match against a registered name;
//! 2. match against the path with a trailing `/` appended;
//! 3. longest registered name that prefixes the normalized path, ties
//!    broken by the lexicographically smaller name.

use super::ChannelName;
use super::channel_name::with_separator;

/// Resolves `path` against `names`, returning the matching channel.
///
/// Returns `None` when no rule matches; the caller must reject the
/// connection without admitting it.
pub fn resolve<'a, I>(names: I, path: &str) -> Option<&'a ChannelName>
where
    I: IntoIterator<Item = &'a ChannelName>,
{
    let names: Vec<&'a ChannelName> = names.into_iter().collect();

    if let Some(exact) = names.iter().copied().find(|name| name.as_str() == path) {
        return Some(exact);
    }

    let normalized = with_separator(path);
    if let Some(exact) = names
        .iter()
        .copied()
        .find(|name| name.as_str() == normalized)
    {
        return Some(exact);
    }

    names
        .into_iter()
        .filter(|name| normalized.starts_with(name.as_str()))
        .max_by(|a, b| {
            a.as_str()
                .len()
                .cmp(&b.as_str().len())
                .then_with(|| b.as_str().cmp(a.as_str()))
        })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn names(raw: &[&str]) -> Vec<ChannelName> {
        raw.iter()
            .map(|n| {
                let Ok(name) = ChannelName::new(n) else {
                    panic!("valid name {n}");
                };
                name
            })
            .collect()
    }

    fn resolved(registered: &[ChannelName], path: &str) -> Option<String> {
        resolve(registered, path).map(ToString::to_string)
    }

    #[test]
    fn exact_match() {
        let registered = names(&["/a/b/"]);
        assert_eq!(resolved(&registered, "/a/b/").as_deref(), Some("/a/b/"));
    }

    #[test]
    fn missing_trailing_separator() {
        let registered = names(&["/a/b/"]);
        assert_eq!(resolved(&registered, "/a/b").as_deref(), Some("/a/b/"));
    }

    #[test]
    fn sub_path_matches_by_prefix() {
        let registered = names(&["/a/b/"]);
        assert_eq!(
            resolved(&registered, "/a/b/extra").as_deref(),
            Some("/a/b/")
        );
    }

    #[test]
    fn sibling_path_does_not_resolve() {
        let registered = names(&["/a/b/"]);
        assert_eq!(resolved(&registered, "/a/c/"), None);
        assert_eq!(resolved(&registered, "/a/"), None);
        assert_eq!(resolved(&registered, "/a/bc"), None);
    }

    #[test]
    fn longest_prefix_wins() {
        let registered = names(&["/x/", "/x/y/"]);
        assert_eq!(resolved(&registered, "/x/y/z").as_deref(), Some("/x/y/"));
        assert_eq!(resolved(&registered, "/x/q").as_deref(), Some("/x/"));
    }

    #[test]
    fn exact_beats_prefix() {
        let registered = names(&["/x/", "/x/y/"]);
        assert_eq!(resolved(&registered, "/x/").as_deref(), Some("/x/"));
        assert_eq!(resolved(&registered, "/x").as_deref(), Some("/x/"));
    }

    #[test]
    fn empty_registry_never_resolves() {
        assert_eq!(resolved(&[], "/anything/"), None);
    }
}
