//! Outbound transport subsystem.
//!
//! # Data Flow
//! ```text
//! Outbound request (built by the forwarder)
//!     → Transport::send
//!     → pooled.rs (real network client, connection reuse)
//!       or fixed.rs (deterministic stand-in, no network I/O)
//!     → Response (status, headers, streamed body) or TransportError
//! ```
//!
//! # Design Decisions
//! - The forwarder depends only on `dyn Transport`, never on a concrete
//!   client, so stand-ins substitute transparently
//! - Connection pooling lives entirely behind this boundary
//! - One attempt per call; retries are a caller policy and there are none

pub mod fixed;
pub mod pooled;

use axum::body::Body;
use axum::http::{Request, Response};

pub use fixed::FixedTransport;
pub use pooled::PooledTransport;

/// Error type for outbound calls.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connect, handshake, timeout or body-read failure on the wire.
    #[error("outbound request failed: {0}")]
    Send(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Capability to send one outbound request and receive a response.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: Request<Body>) -> Result<Response<Body>, TransportError>;
}
