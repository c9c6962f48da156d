//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → router.rs (longest-prefix lookup over the upstream table)
//!     → Return: matched upstream + prefix-stripped path, or NoMatch
//!
//! Table Compilation (at startup):
//!     UpstreamConfig[]
//!     → Sort by prefix length, longest first (stable)
//!     → Freeze as immutable Router
//! ```
//!
//! # Design Decisions
//! - Table compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: longest matching prefix wins; equal-length patterns
//!   that both match are identical strings, so declaration order is moot
//! - Explicit NoMatch; the HTTP layer serves the fallback

pub mod router;

pub use router::{RouteMatch, Router};
