//! Gateway to the external generative provider.
//!
//! The provider is an opaque oracle: each request kind sends a prompt plus
//! a JSON response schema and gets back one structured document. This
//! module owns the transport seam ([`Oracle`]), the per-kind operations
//! with memoization ([`OracleGateway`]), and failure classification.

pub mod cli_model;
pub mod gateway;
pub mod prompts;
pub mod schema;
pub mod trait_def;

pub use cli_model::CliOracle;
pub use gateway::OracleGateway;
pub use trait_def::{Oracle, OracleRequest};

use thiserror::Error;

/// Failures surfaced by oracle operations.
#[derive(Debug, Error)]
pub enum OracleError {
    /// Provider-side quota or rate-limit condition, reported with
    /// actionable guidance.
    #[error(
        "provider quota exceeded while trying to {action}: {message}. \
         Check your provider plan and billing details, then try again later."
    )]
    Quota { action: String, message: String },

    /// Transport-level failure (process, network, provider outage).
    #[error("failed to {action}: {message}. Check your connection and try again.")]
    Transport { action: String, message: String },

    /// The provider answered, but the payload does not conform to the
    /// request kind's schema.
    #[error("failed to {action}: provider returned a malformed response ({message})")]
    Parse { action: String, message: String },
}

/// Classify a raw transport failure.
///
/// Quota and rate-limit conditions are recognized by markers in the
/// failure signal and reported distinctly; everything else is a generic
/// transport failure for the given action.
pub(crate) fn classify_failure(action: &str, message: String) -> OracleError {
    let lower = message.to_lowercase();
    let quota = message.contains("429")
        || lower.contains("quota")
        || lower.contains("rate limit")
        || lower.contains("resource exhausted");
    if quota {
        OracleError::Quota {
            action: action.to_string(),
            message,
        }
    } else {
        OracleError::Transport {
            action: action.to_string(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_429_is_quota() {
        let err = classify_failure("get travel suggestions", "HTTP 429 from provider".into());
        assert!(matches!(err, OracleError::Quota { .. }));
        assert!(err.to_string().contains("billing"));
    }

    #[test]
    fn quota_markers_are_case_insensitive() {
        for message in [
            "Quota exceeded for model",
            "RATE LIMIT reached",
            "RESOURCE EXHAUSTED",
        ] {
            assert!(matches!(
                classify_failure("a", message.to_string()),
                OracleError::Quota { .. }
            ));
        }
    }

    #[test]
    fn other_failures_are_transport() {
        let err = classify_failure("create a travel plan for Italy", "connection reset".into());
        assert!(matches!(err, OracleError::Transport { .. }));
        assert!(
            err.to_string()
                .starts_with("failed to create a travel plan for Italy")
        );
    }
}
