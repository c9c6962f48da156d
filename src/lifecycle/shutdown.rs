//! Shutdown coordination for the proxy.

use tokio_util::sync::CancellationToken;

/// Coordinator for server-wide shutdown.
///
/// Owns the root cancellation token. Every in-flight request derives a
/// child token from it, so one `trigger` cancels them all top-down.
#[derive(Clone)]
pub struct Shutdown {
    token: CancellationToken,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// Derive a cancellation token for a single request.
    pub fn request_token(&self) -> CancellationToken {
        self.token.child_token()
    }

    /// Trigger shutdown. Safe to call more than once.
    pub fn trigger(&self) {
        self.token.cancel();
    }

    /// True once shutdown has been triggered.
    pub fn is_triggered(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolve once shutdown has been triggered.
    pub async fn triggered(&self) {
        self.token.cancelled().await;
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn trigger_cancels_derived_tokens() {
        let shutdown = Shutdown::new();
        let request = shutdown.request_token();
        assert!(!request.is_cancelled());

        shutdown.trigger();
        assert!(shutdown.is_triggered());
        assert!(request.is_cancelled());
        request.cancelled().await;
    }

    #[tokio::test]
    async fn trigger_is_idempotent() {
        let shutdown = Shutdown::new();
        shutdown.trigger();
        shutdown.trigger();
        assert!(shutdown.is_triggered());
    }

    #[test]
    fn request_tokens_are_independent_of_each_other() {
        let shutdown = Shutdown::new();
        let a = shutdown.request_token();
        let b = shutdown.request_token();

        a.cancel();
        assert!(a.is_cancelled());
        assert!(!b.is_cancelled());
        assert!(!shutdown.is_triggered());
    }
}
