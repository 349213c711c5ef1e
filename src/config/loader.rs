use std::fs;
use std::path::Path;

use anyhow::Result;
use regex::Regex;
use tracing::{debug, error};

use crate::config::settings::{LogFormat, LoggingConfig, ServiceConfig};
use crate::error::ConfigError;

/// Load and validate config from YAML file.
///
/// Secrets reach the file through `${VAR}` / `${VAR:default}` placeholders,
/// expanded from the environment before parsing.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ServiceConfig> {
    let raw = fs::read_to_string(path)?;
    let expanded = expand_env_vars(&raw);
    parse_config(&expanded)
}

pub fn parse_config(content: &str) -> Result<ServiceConfig> {
    let mut config: ServiceConfig = serde_yaml::from_str(content)
        .inspect_err(|e| error!("parse config error: {}", e))?;

    // Apply defaults
    if config.settings.logging.is_none() {
        config.settings.logging = Some(LoggingConfig::new("info".into(), LogFormat::Compact));
    }

    debug!("validating config ...");
    validate_service_config(&config)?;
    Ok(config)
}

fn expand_env_vars(input: &str) -> String {
    let re = Regex::new(r"\$\{(\w+)(?::([^\}]+))?\}").unwrap();
    re.replace_all(input, |caps: &regex::Captures| {
        let var = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        std::env::var(var).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

/// Validate the whole config, aggregating every issue before failing.
fn validate_service_config(cfg: &ServiceConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    // client identity: every field of the tuple must be present
    for (field, value) in [
        ("auth.tenant_id", &cfg.auth.tenant_id),
        ("auth.client_id", &cfg.auth.client_id),
        ("auth.client_secret", &cfg.auth.client_secret),
    ] {
        if value.trim().is_empty() {
            errors.push(format!("{} must be provided", field));
        }
    }
    if cfg.auth.scope.trim().is_empty() {
        errors.push("auth.scope cannot be empty".to_string());
    }

    if cfg.settings.server.host.is_empty() {
        errors.push("settings.server.host must be valid".to_string());
    }
    if cfg.settings.server.port.parse::<u16>().is_err() {
        errors.push(format!(
            "settings.server.port '{}' must be an integer in range 1-65535",
            cfg.settings.server.port
        ));
    }

    // metrics endpoint starts with '/'
    if !cfg.settings.metrics.path.starts_with('/') {
        errors.push(format!(
            "settings.metrics.path '{}' must start with '/'",
            cfg.settings.metrics.path
        ));
    }

    // logging level
    if let Some(logging) = &cfg.settings.logging {
        let valid = ["trace", "debug", "info", "warn", "error"];
        if !valid.contains(&logging.level.as_str()) {
            errors.push(format!(
                "settings.logging.level '{}' invalid; allowed: {:?}",
                logging.level, valid
            ));
        }
    }

    if cfg.mock.claims && cfg.mock.expected_audience.trim().is_empty() {
        errors.push("mock.expected_audience required when mock.claims is enabled".to_string());
    }
    if !cfg.mock.claims && cfg.mock.static_token.trim().is_empty() {
        errors.push("mock.static_token required when mock.claims is disabled".to_string());
    }

    if cfg.client.base_url.trim().is_empty() {
        errors.push("client.base_url cannot be empty".to_string());
    }
    if cfg.client.client_name.trim().is_empty() {
        errors.push("client.client_name cannot be empty".to_string());
    }

    if errors.is_empty() {
        debug!("config valid");
        Ok(())
    } else {
        error!("configuration validation errors ({}):", errors.len());
        for e in &errors {
            error!(" - {}", e);
        }
        Err(ConfigError { issues: errors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn sample_yaml(client_id: &str) -> String {
        format!(
            r#"
settings:
  server:
    host: 127.0.0.1
    port: "5001"
  metrics:
    path: /metrics
    is_enabled: true
  logging:
    level: info
    format: compact
auth:
  tenant_id: t1
  client_id: "{client_id}"
  client_secret: s1
mock:
  expected_audience: api://identity-verification
client:
  base_url: http://localhost:5001
  client_name: my-client
"#
        )
    }

    #[test]
    fn parses_complete_config_with_defaults() {
        let cfg = parse_config(&sample_yaml("c1")).unwrap();
        assert_eq!(cfg.auth.client_id, "c1");
        assert_eq!(
            cfg.auth.token_url(),
            "https://login.microsoftonline.com/t1/oauth2/v2.0/token"
        );
        assert_eq!(cfg.auth.scope, "https://graph.microsoft.com/.default");
        assert!(cfg.mock.claims);
        assert_eq!(cfg.mock.static_token, "mock_token_123");
    }

    #[test]
    fn missing_client_id_is_named() {
        let err = parse_config(&sample_yaml("")).unwrap_err();
        let config_err = err.downcast::<ConfigError>().unwrap();
        assert!(config_err
            .issues
            .iter()
            .any(|i| i.contains("auth.client_id")));
    }

    #[test]
    #[serial]
    fn expands_env_vars_with_defaults() {
        std::env::set_var("IDV_TEST_CLIENT_ID", "from-env");
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(sample_yaml("${IDV_TEST_CLIENT_ID}").as_bytes())
            .unwrap();

        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.auth.client_id, "from-env");
        std::env::remove_var("IDV_TEST_CLIENT_ID");

        let expanded = expand_env_vars("${IDV_TEST_UNSET:fallback}");
        assert_eq!(expanded, "fallback");
    }

    #[test]
    fn token_url_override_wins() {
        let yaml = sample_yaml("c1").replace(
            "  client_secret: s1",
            "  client_secret: s1\n  token_url: http://127.0.0.1:9999/token",
        );
        let cfg = parse_config(&yaml).unwrap();
        assert_eq!(cfg.auth.token_url(), "http://127.0.0.1:9999/token");
    }
}
