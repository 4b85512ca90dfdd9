//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::{EditorConfig, LogFormat};
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the control API base URL.
pub const ENV_CADDY_API: &str = "CADDY_API";
/// Environment variable overriding the Caddyfile location.
pub const ENV_CADDYFILE_PATH: &str = "CADDYFILE_PATH";
/// Environment variable overriding the static assets root.
pub const ENV_STATIC_DIR: &str = "STATIC_DIR";
/// Environment variable overriding the listener address.
pub const ENV_BIND_ADDRESS: &str = "BIND_ADDRESS";
/// Environment variable selecting `pretty` or `json` logs.
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration: optional TOML file, then environment overrides,
/// then validation.
pub fn load_config(path: Option<&Path>) -> Result<EditorConfig, ConfigError> {
    let mut config = match path {
        Some(path) => parse_config_file(path)?,
        None => EditorConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Parse a TOML settings file without validating it.
pub fn parse_config_file(path: &Path) -> Result<EditorConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Overlay environment values onto `config`. Empty values are ignored.
pub fn apply_env_overrides<F>(config: &mut EditorConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = get(ENV_CADDY_API) {
        config.control_api.base_url = url;
    }
    if let Some(path) = get(ENV_CADDYFILE_PATH) {
        config.storage.caddyfile_path = path;
    }
    if let Some(dir) = get(ENV_STATIC_DIR) {
        config.storage.static_dir = dir;
    }
    if let Some(addr) = get(ENV_BIND_ADDRESS) {
        config.listener.bind_address = addr;
    }
    if let Some(format) = get(ENV_LOG_FORMAT) {
        match format.to_ascii_lowercase().as_str() {
            "json" => config.observability.log_format = LogFormat::Json,
            "pretty" => config.observability.log_format = LogFormat::Pretty,
            // Logging is not up yet, so this can only go to stderr.
            other => eprintln!("ignoring unknown {ENV_LOG_FORMAT} value '{other}'"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides() {
        let mut config = EditorConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                (ENV_CADDY_API, "http://caddy:2019"),
                (ENV_CADDYFILE_PATH, "/tmp/Caddyfile"),
                (ENV_LOG_FORMAT, "JSON"),
            ]),
        );

        assert_eq!(config.control_api.base_url, "http://caddy:2019");
        assert_eq!(config.storage.caddyfile_path, "/tmp/Caddyfile");
        assert_eq!(config.storage.static_dir, "/static");
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }

    #[test]
    fn test_empty_env_value_is_ignored() {
        let mut config = EditorConfig::default();
        config.control_api.base_url = "http://from-file:2019".into();
        apply_env_overrides(&mut config, env(&[(ENV_CADDY_API, "  ")]));
        assert_eq!(config.control_api.base_url, "http://from-file:2019");
    }

    #[test]
    fn test_parse_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[control_api]
base_url = "http://127.0.0.1:2019"
request_timeout_secs = 3

[limits]
max_body_bytes = 1024
"#
        )
        .unwrap();

        let config = parse_config_file(file.path()).unwrap();
        assert_eq!(config.control_api.base_url, "http://127.0.0.1:2019");
        assert_eq!(config.control_api.request_timeout_secs, 3);
        assert_eq!(config.control_api.connect_timeout_secs, 5);
        assert_eq!(config.limits.max_body_bytes, 1024);
        assert_eq!(config.storage.caddyfile_path, "/config/Caddyfile");
    }

    #[test]
    fn test_parse_error_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[limits]\nmax_body_bytes = \"lots\"").unwrap();
        assert!(matches!(
            parse_config_file(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = parse_config_file(Path::new("/nonexistent/editor.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
