//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Build transport/router → Bind → Serve
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Shutdown::trigger()
//!     → listener closed, new connections refused
//!     → per-request child tokens observe cancellation
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → trigger shutdown once
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, no serving begins
//! - Shutdown closes the listener immediately; there is no drain phase
//! - In-flight requests are bounded by their own per-request deadline

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
