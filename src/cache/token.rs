use crate::helpers::time::now_i64;

/// Bearer credential with its computed hard expiry.
#[derive(Debug, Clone)]
pub struct Token {
    pub value: String,
    pub expires_at: i64, // UNIX timestamp
}

impl Token {
    pub fn new(value: String, expires_at: i64) -> Self {
        Self { value, expires_at }
    }

    /// Build a token expiring `ttl_seconds` from now.
    pub fn with_ttl(value: String, ttl_seconds: u64) -> Self {
        Self::new(value, now_i64() + ttl_seconds as i64)
    }

    pub fn is_expired(&self) -> bool {
        now_i64() >= self.expires_at
    }
}
