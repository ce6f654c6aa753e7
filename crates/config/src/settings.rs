//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::constants::{endpoints, env, models, sampling, timeouts};
use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - relaxed validation, warnings only
    #[default]
    Development,
    /// Staging mode - stricter validation
    Staging,
    /// Production mode - all validations enforced
    Production,
}

impl RuntimeEnvironment {
    /// Check if this is a production environment
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if strict validation should be applied
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Completion collaborator configuration
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_completion()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port must be non-zero".to_string(),
            });
        }

        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.request_timeout_secs".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        if self.environment.is_strict() && !self.server.cors_enabled {
            tracing::warn!(
                environment = ?self.environment,
                "CORS is disabled in a strict environment"
            );
        }

        Ok(())
    }

    fn validate_completion(&self) -> Result<(), ConfigError> {
        let completion = &self.completion;

        if !(0.0..=2.0).contains(&completion.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "completion.temperature".to_string(),
                message: format!("Must be between 0.0 and 2.0, got {}", completion.temperature),
            });
        }

        if completion.max_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                field: "completion.max_tokens".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        if completion.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "completion.timeout_secs".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        if completion.endpoint.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "completion.endpoint".to_string(),
                message: "Endpoint must not be empty".to_string(),
            });
        }

        // Completion has to finish before the server gives up on the request.
        if completion.timeout_secs >= self.server.request_timeout_secs {
            tracing::warn!(
                completion_timeout = completion.timeout_secs,
                server_timeout = self.server.request_timeout_secs,
                "completion.timeout_secs is not shorter than server.request_timeout_secs"
            );
        }

        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// CORS allowed origins
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    timeouts::SERVER_REQUEST_SECS
}

fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
            cors_enabled: true,
            cors_origins: Vec::new(),
        }
    }
}

/// Completion collaborator configuration
///
/// Defaults fall back to the completion service's own environment variables
/// so an existing `.env` keeps working without the `EXPENSE_PARSER__` prefix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Consult the completion service at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Provider name: "modelscope", "openai" or "local"
    #[serde(default = "default_provider")]
    pub provider: String,

    /// OpenAI-compatible base URL
    #[serde(default = "default_completion_endpoint")]
    pub endpoint: String,

    /// Model identifier
    #[serde(default = "default_completion_model")]
    pub model: String,

    /// API key (MODELSCOPE_API_KEY, then OPENAI_API_KEY)
    #[serde(default = "default_completion_api_key", skip_serializing)]
    pub api_key: Option<String>,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// Request timeout in seconds
    #[serde(default = "default_completion_timeout")]
    pub timeout_secs: u64,
}

fn default_provider() -> String {
    "modelscope".to_string()
}

fn default_completion_endpoint() -> String {
    std::env::var(env::MODELSCOPE_BASE_URL)
        .ok()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| endpoints::MODELSCOPE_DEFAULT.to_string())
}

fn default_completion_model() -> String {
    std::env::var(env::MODELSCOPE_MODEL_ID)
        .ok()
        .filter(|model| !model.trim().is_empty())
        .unwrap_or_else(|| models::MODELSCOPE_DEFAULT.to_string())
}

fn default_completion_api_key() -> Option<String> {
    [env::MODELSCOPE_API_KEY, env::OPENAI_API_KEY]
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|key| !key.trim().is_empty())
}

fn default_temperature() -> f32 {
    sampling::TEMPERATURE
}

fn default_max_tokens() -> usize {
    sampling::MAX_TOKENS
}

fn default_completion_timeout() -> u64 {
    timeouts::COMPLETION_REQUEST_SECS
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: default_provider(),
            endpoint: default_completion_endpoint(),
            model: default_completion_model(),
            api_key: default_completion_api_key(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_completion_timeout(),
        }
    }
}

impl CompletionConfig {
    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Non-empty API key, if any
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

/// Load settings from files and environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (EXPENSE_PARSER__ prefix)
/// 2. config/{env}.yaml (if env specified)
/// 3. config/default.yaml
/// 4. Built-in defaults
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from(Path::new("config"), env)
}

/// Load settings with an explicit configuration directory
pub fn load_settings_from(dir: &Path, env_name: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    let default_path = dir.join("default");
    builder = builder.add_source(File::with_name(&default_path.to_string_lossy()).required(false));

    if let Some(name) = env_name {
        if name.is_empty() || name.contains(|c| matches!(c, '/' | '\\' | '.')) {
            return Err(ConfigError::Environment(format!(
                "Invalid environment name: {:?}",
                name
            )));
        }
        let env_path = dir.join(name);
        builder = builder.add_source(File::with_name(&env_path.to_string_lossy()).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix(env::SETTINGS_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert!(settings.completion.enabled);
        assert_eq!(settings.completion.temperature, 0.3);
        assert_eq!(settings.observability.log_level, "info");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_completion_validation() {
        let mut settings = Settings::default();

        settings.completion.temperature = 2.5;
        assert!(settings.validate_completion().is_err());
        settings.completion.temperature = 0.3;

        settings.completion.timeout_secs = 0;
        assert!(settings.validate_completion().is_err());
        settings.completion.timeout_secs = 10;

        settings.completion.max_tokens = 0;
        assert!(settings.validate_completion().is_err());
        settings.completion.max_tokens = 128;

        settings.completion.endpoint = "  ".to_string();
        assert!(settings.validate_completion().is_err());
    }

    #[test]
    fn test_server_validation() {
        let mut settings = Settings::default();
        settings.server.port = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_api_key_blank_is_none() {
        let mut completion = CompletionConfig::default();
        completion.api_key = Some("   ".to_string());
        assert!(completion.api_key().is_none());

        completion.api_key = Some("sk-test".to_string());
        assert_eq!(completion.api_key(), Some("sk-test"));
        assert_eq!(completion.timeout(), Duration::from_secs(completion.timeout_secs));
    }

    #[test]
    fn test_runtime_environment() {
        assert!(RuntimeEnvironment::Production.is_production());
        assert!(RuntimeEnvironment::Staging.is_strict());
        assert!(!RuntimeEnvironment::Development.is_strict());
    }

    #[test]
    fn test_load_settings_layers_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.yaml"),
            "server:\n  port: 9000\ncompletion:\n  model: test-model\n  timeout_secs: 5\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("staging.yaml"),
            "environment: staging\nserver:\n  port: 9100\n",
        )
        .unwrap();

        let base = load_settings_from(dir.path(), None).unwrap();
        assert_eq!(base.server.port, 9000);
        assert_eq!(base.completion.model, "test-model");
        assert_eq!(base.completion.timeout_secs, 5);

        let staging = load_settings_from(dir.path(), Some("staging")).unwrap();
        assert_eq!(staging.environment, RuntimeEnvironment::Staging);
        assert_eq!(staging.server.port, 9100);
        assert_eq!(staging.completion.model, "test-model");
    }

    #[test]
    fn test_load_settings_rejects_invalid_file_values() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.yaml"),
            "completion:\n  temperature: 3.0\n",
        )
        .unwrap();

        let err = load_settings_from(dir.path(), None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_load_settings_rejects_path_like_env_name() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_settings_from(dir.path(), Some("../secrets")).unwrap_err();
        assert!(matches!(err, ConfigError::Environment(_)));
    }

    #[test]
    fn test_missing_directory_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_from(&dir.path().join("absent"), None).unwrap();
        assert_eq!(settings.server.port, 8080);
    }
}
