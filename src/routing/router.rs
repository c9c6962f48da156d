//! Upstream lookup by path prefix.
//!
//! # Responsibilities
//! - Store the compiled upstream table
//! - Match a request path against pattern prefixes
//! - Strip the matched prefix from the forwarded path

use crate::config::schema::UpstreamConfig;

/// Result of a successful route lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// Upstream `host:port` to forward to.
    pub addr: String,
    /// Request path with the matched prefix removed. May be empty or
    /// start mid-segment (pattern "/" leaves "anything"); the forwarder
    /// re-roots it with a leading slash when building the outbound URI.
    pub rewritten_path: String,
}

/// Immutable path-prefix router.
///
/// Built once from validated configuration. When several patterns are
/// prefixes of the same path, the longest pattern wins.
#[derive(Debug)]
pub struct Router {
    /// Pattern table sorted by pattern length, longest first. The sort is
    /// stable, so entries with equal-length patterns keep declaration order.
    routes: Vec<(String, String)>,
}

impl Router {
    /// Compile the upstream table into a router.
    pub fn from_config(upstreams: &[UpstreamConfig]) -> Self {
        let mut routes: Vec<(String, String)> = upstreams
            .iter()
            .map(|u| (u.pattern.clone(), u.addr.clone()))
            .collect();
        routes.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        tracing::debug!(routes = routes.len(), "Router compiled");
        Self { routes }
    }

    /// Look up the upstream for `path`.
    ///
    /// Returns `None` when no pattern is a prefix of the path; the caller
    /// serves the built-in fallback in that case.
    pub fn match_path(&self, path: &str) -> Option<RouteMatch> {
        self.routes
            .iter()
            .find(|(pattern, _)| path.starts_with(pattern.as_str()))
            .map(|(pattern, addr)| RouteMatch {
                addr: addr.clone(),
                rewritten_path: path[pattern.len()..].to_string(),
            })
    }

    /// Number of compiled routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// True when the table has no routes.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
