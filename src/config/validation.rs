//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject upstream entries with empty pattern or empty addr
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before the server starts serving

use crate::config::schema::ProxyConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("upstream {index}: empty pattern (addr {addr:?})")]
    EmptyPattern { index: usize, addr: String },

    #[error("upstream {index}: empty addr (pattern {pattern:?})")]
    EmptyAddr { index: usize, pattern: String },
}

/// Check the configuration for semantic errors.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (index, upstream) in config.upstreams.iter().enumerate() {
        if upstream.pattern.is_empty() {
            errors.push(ValidationError::EmptyPattern {
                index,
                addr: upstream.addr.clone(),
            });
        }
        if upstream.addr.is_empty() {
            errors.push(ValidationError::EmptyAddr {
                index,
                pattern: upstream.pattern.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
