use serde::Deserialize;

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub settings: SettingsConfig,
    pub auth: AuthConfig,
    pub mock: MockConfig,
    pub client: ClientConfig,
}

/// ================================
/// Global service-wide settings
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct SettingsConfig {
    pub server: ServerConfig,
    pub metrics: MetricsConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_path")]
    pub path: String,
    #[serde(default)]
    pub is_enabled: bool,
}

/// ================================
/// Client identity / token endpoint
/// ================================
///
/// The identity tuple is immutable for the process lifetime; the loader
/// rejects any missing field before the service comes up.
#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_issuer_host")]
    pub issuer_host: String,
    #[serde(default = "default_scope")]
    pub scope: String,
    /// Full token endpoint URL override. When absent the URL is built from
    /// `issuer_host` and `tenant_id`.
    pub token_url: Option<String>,
}

impl AuthConfig {
    pub fn token_url(&self) -> String {
        self.token_url.clone().unwrap_or_else(|| {
            format!(
                "https://{}/{}/oauth2/v2.0/token",
                self.issuer_host, self.tenant_id
            )
        })
    }
}

/// ================================
/// Mock verification endpoint
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct MockConfig {
    /// `aud` claim the endpoint accepts when claims checking is on.
    pub expected_audience: String,
    /// Literal token the endpoint accepts when claims checking is off.
    #[serde(default = "default_static_token")]
    pub static_token: String,
    /// Decode and check bearer-token claims (audience + expiry). When false
    /// the endpoint only compares against `static_token`.
    #[serde(default = "default_claims")]
    pub claims: bool,
}

/// ================================
/// Verification client
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub client_name: String,
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

fn default_issuer_host() -> String {
    "login.microsoftonline.com".to_string()
}

fn default_scope() -> String {
    "https://graph.microsoft.com/.default".to_string()
}

fn default_static_token() -> String {
    "mock_token_123".to_string()
}

fn default_claims() -> bool {
    true
}
