use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

use crate::cache::token::Token;
use crate::config::settings::AuthConfig;
use crate::error::AuthError;
use crate::utils::constants::TOKEN_TTL_SECONDS;

const GRANT_TYPE: &str = "client_credentials";

/// OAuth2 client-credentials token provider.
///
/// Exchanges the configured client identity for an access token against
/// `https://<issuer-host>/<tenant>/oauth2/v2.0/token`. The returned token
/// always carries the fixed 900 second TTL; whatever lifetime the endpoint
/// advertises is ignored.
#[derive(Debug, Clone)]
pub struct OAuth2Provider {
    cfg: AuthConfig,
    client: Client,
}

impl OAuth2Provider {
    pub fn new(cfg: AuthConfig) -> Self {
        Self {
            cfg,
            client: Client::new(),
        }
    }

    pub async fn acquire(&self) -> Result<Token, AuthError> {
        let url = self.cfg.token_url();
        let form = [
            ("client_id", self.cfg.client_id.as_str()),
            ("client_secret", self.cfg.client_secret.as_str()),
            ("grant_type", GRANT_TYPE),
            ("scope", self.cfg.scope.as_str()),
        ];

        debug!("requesting token from {}", url);
        let response = self.client.post(&url).form(&form).send().await?;
        if !response.status().is_success() {
            return Err(AuthError::Status(response.status()));
        }

        let body: Value = response.json().await?;
        let access_token = body
            .get("access_token")
            .and_then(Value::as_str)
            .ok_or(AuthError::MissingField("access_token"))?;

        info!("token acquired, ttl {}s", TOKEN_TTL_SECONDS);
        Ok(Token::with_ttl(access_token.to_owned(), TOKEN_TTL_SECONDS))
    }
}
