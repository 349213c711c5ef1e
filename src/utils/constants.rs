//! Shared constants and invariants

/// Cached credentials live exactly this long, regardless of what the
/// authorization endpoint advertises.
pub const TOKEN_TTL_SECONDS: u64 = 900;

/// Upper bound on how long a caller waits for a detached acquisition.
pub const ACQUIRE_WAIT_SECONDS: u64 = 10;

/// Cache key for the single configured client identity.
pub const OAUTH_TOKEN_KEY: &str = "oauth_token";

/// The only register type the verification endpoint accepts.
pub const REGISTER_TYPE_VERIFIED_IDENTITY: &str = "verified-identity";
