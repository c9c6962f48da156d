//! Prefix-routed HTTP reverse proxy.
//!
//! # Architecture Overview
//!
//! ```text
//! Client Request
//!     → http/server.rs   (Axum wildcard route, one task per request)
//!     → routing/router.rs (longest path-prefix match, prefix strip)
//!     → http/forward.rs  (outbound request build, 60s deadline,
//!                         cancellation via lifecycle token)
//!     → transport        (pooled hyper client, or a fixed stand-in)
//!     → response streamed back to client
//!
//! Shutdown:
//!     SIGINT/SIGTERM → lifecycle::Shutdown::trigger()
//!     → listener closed immediately (no drain)
//!     → per-request child tokens observe cancellation
//! ```

// Core subsystems
pub mod config;
pub mod http;
pub mod routing;
pub mod transport;

// Cross-cutting concerns
pub mod lifecycle;

pub use config::loader::load_config;
pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::Router;
pub use transport::{FixedTransport, PooledTransport, Transport};
