//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, wildcard route, one task per request)
//!     → router lookup (match or built-in fallback)
//!     → forward.rs (outbound build, deadline + cancellation, transport call)
//!     → response streamed to client
//! ```

pub mod forward;
pub mod server;

pub use server::HttpServer;
