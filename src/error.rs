//! Error taxonomy shared across the crate.
//!
//! Every failure surfaces to the immediate caller with a specific kind and
//! message; nothing is swallowed. None of these trigger automatic retries.

use http::StatusCode;
use thiserror::Error;

/// Startup configuration problems. Fatal: the process must not come up with
/// a partial client identity.
#[derive(Debug, Error)]
#[error("invalid configuration, total errors: {}\n{}", .issues.len(), .issues.join("\n"))]
pub struct ConfigError {
    pub issues: Vec<String>,
}

/// The authorization endpoint rejected the client-credentials exchange, or
/// returned a body the provider could not use.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("token endpoint returned {0}")]
    Status(StatusCode),

    #[error("token response missing '{0}' field")]
    MissingField(&'static str),
}

/// Acquisition task outcomes beyond the provider's own failures.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("token acquisition did not complete within {0} seconds")]
    Timeout(u64),

    #[error("token acquisition task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// A presented bearer token was rejected. Surfaced to HTTP callers as 401.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("malformed bearer token: {0}")]
    Malformed(String),

    #[error("token audience '{got}' does not match expected '{expected}'")]
    InvalidAudience { expected: String, got: String },

    #[error("token expired at {exp}, now {now}")]
    Expired { exp: i64, now: i64 },
}

/// A verification request violated the staged contract. Exactly one of
/// these per rejected request: the earliest failing stage.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("missing required headers")]
    MissingHeaders,

    #[error("invalid register type '{0}'")]
    InvalidRegisterType(String),

    #[error("{0}")]
    BadBody(String),
}
