use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_FILE_CANDIDATES: [&str; 2] = ["supportdesk.toml", "config/supportdesk.toml"];

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub logging: LoggingConfig,
    pub routing: RoutingConfig,
}

#[derive(Clone, Debug)]
pub struct LlmConfig {
    pub api_key: Option<SecretString>,
    pub base_url: Option<String>,
    pub model: String,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    pub file: Option<PathBuf>,
}

/// Thresholds used by the guardrail and the handoff decision.
#[derive(Clone, Debug, PartialEq)]
pub struct RoutingConfig {
    pub long_message_chars: usize,
    pub caps_ratio: f64,
    pub caps_min_chars: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
    pub log_file: Option<PathBuf>,
    pub llm_api_key: Option<String>,
    pub llm_model: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig {
                api_key: None,
                base_url: Some("https://generativelanguage.googleapis.com/v1beta/openai/".to_string()),
                model: "gemini-2.0-flash".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: LogFormat::Compact,
                file: None,
            },
            routing: RoutingConfig::default(),
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self { long_message_chars: 300, caps_ratio: 0.6, caps_min_chars: 10 }
    }
}

impl LlmConfig {
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_ref().map(|key| !key.expose_secret().trim().is_empty()).unwrap_or(false)
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_CANDIDATES[0]));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(llm) = patch.llm {
            if let Some(llm_api_key_value) = llm.api_key {
                self.llm.api_key = Some(secret_value(llm_api_key_value));
            }
            if let Some(base_url) = llm.base_url {
                self.llm.base_url = Some(base_url);
            }
            if let Some(model) = llm.model {
                self.llm.model = model;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
            if let Some(file) = logging.file {
                self.logging.file = Some(file);
            }
        }

        if let Some(routing) = patch.routing {
            if let Some(long_message_chars) = routing.long_message_chars {
                self.routing.long_message_chars = long_message_chars;
            }
            if let Some(caps_ratio) = routing.caps_ratio {
                self.routing.caps_ratio = caps_ratio;
            }
            if let Some(caps_min_chars) = routing.caps_min_chars {
                self.routing.caps_min_chars = caps_min_chars;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        let api_key = read_env("SUPPORTDESK_LLM_API_KEY").or_else(|| read_env("GEMINI_API_KEY"));
        if let Some(value) = api_key {
            self.llm.api_key = Some(secret_value(value));
        }
        let base_url =
            read_env("SUPPORTDESK_LLM_BASE_URL").or_else(|| read_env("GEMINI_BASE_PATH"));
        if let Some(value) = base_url {
            self.llm.base_url = Some(value);
        }
        let model = read_env("SUPPORTDESK_LLM_MODEL").or_else(|| read_env("GEMINI_MODEL_NAME"));
        if let Some(value) = model {
            self.llm.model = value;
        }

        let log_level =
            read_env("SUPPORTDESK_LOGGING_LEVEL").or_else(|| read_env("SUPPORTDESK_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("SUPPORTDESK_LOGGING_FORMAT").or_else(|| read_env("SUPPORTDESK_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }
        let log_file =
            read_env("SUPPORTDESK_LOGGING_FILE").or_else(|| read_env("SUPPORTDESK_LOG_FILE"));
        if let Some(value) = log_file {
            self.logging.file = Some(PathBuf::from(value));
        }

        if let Some(value) = read_env("SUPPORTDESK_ROUTING_LONG_MESSAGE_CHARS") {
            self.routing.long_message_chars =
                parse_usize("SUPPORTDESK_ROUTING_LONG_MESSAGE_CHARS", &value)?;
        }
        if let Some(value) = read_env("SUPPORTDESK_ROUTING_CAPS_RATIO") {
            self.routing.caps_ratio = parse_f64("SUPPORTDESK_ROUTING_CAPS_RATIO", &value)?;
        }
        if let Some(value) = read_env("SUPPORTDESK_ROUTING_CAPS_MIN_CHARS") {
            self.routing.caps_min_chars =
                parse_usize("SUPPORTDESK_ROUTING_CAPS_MIN_CHARS", &value)?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
        if let Some(log_file) = overrides.log_file {
            self.logging.file = Some(log_file);
        }
        if let Some(llm_api_key) = overrides.llm_api_key {
            self.llm.api_key = Some(secret_value(llm_api_key));
        }
        if let Some(llm_model) = overrides.llm_model {
            self.llm.model = llm_model;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_llm(&self.llm)?;
        validate_logging(&self.logging)?;
        validate_routing(&self.routing)?;
        Ok(())
    }
}

/// First existing config file, preferring an explicit path.
pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    CONFIG_FILE_CANDIDATES.into_iter().map(PathBuf::from).find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_llm(llm: &LlmConfig) -> Result<(), ConfigError> {
    if llm.model.trim().is_empty() {
        return Err(ConfigError::Validation(
            "llm.model must not be empty (set SUPPORTDESK_LLM_MODEL or GEMINI_MODEL_NAME)"
                .to_string(),
        ));
    }

    if let Some(base_url) = &llm.base_url {
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::Validation(
                "llm.base_url must start with http:// or https://".to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn validate_routing(routing: &RoutingConfig) -> Result<(), ConfigError> {
    if routing.long_message_chars == 0 {
        return Err(ConfigError::Validation(
            "routing.long_message_chars must be greater than zero".to_string(),
        ));
    }

    if !(routing.caps_ratio > 0.0 && routing.caps_ratio <= 1.0) {
        return Err(ConfigError::Validation(
            "routing.caps_ratio must be in range (0, 1]".to_string(),
        ));
    }

    Ok(())
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_f64(key: &str, value: &str) -> Result<f64, ConfigError> {
    value.parse::<f64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    llm: Option<LlmPatch>,
    logging: Option<LoggingPatch>,
    routing: Option<RoutingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct LlmPatch {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
    file: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct RoutingPatch {
    long_message_chars: Option<usize>,
    caps_ratio: Option<f64>,
    caps_min_chars: Option<usize>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};

    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    use super::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    const ALL_VARS: [&str; 15] = [
        "SUPPORTDESK_LLM_API_KEY",
        "SUPPORTDESK_LLM_BASE_URL",
        "SUPPORTDESK_LLM_MODEL",
        "GEMINI_API_KEY",
        "GEMINI_BASE_PATH",
        "GEMINI_MODEL_NAME",
        "SUPPORTDESK_LOGGING_LEVEL",
        "SUPPORTDESK_LOG_LEVEL",
        "SUPPORTDESK_LOGGING_FORMAT",
        "SUPPORTDESK_LOG_FORMAT",
        "SUPPORTDESK_LOGGING_FILE",
        "SUPPORTDESK_LOG_FILE",
        "SUPPORTDESK_ROUTING_LONG_MESSAGE_CHARS",
        "SUPPORTDESK_ROUTING_CAPS_RATIO",
        "SUPPORTDESK_ROUTING_CAPS_MIN_CHARS",
    ];

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    #[test]
    fn defaults_load_without_file_or_env() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&ALL_VARS);

        let config = AppConfig::load(LoadOptions {
            config_path: Some(PathBuf::from("does-not-exist/supportdesk.toml")),
            ..LoadOptions::default()
        })
        .map_err(|err| format!("config load failed: {err}"))?;

        ensure(!config.llm.has_api_key(), "api key should be unset by default")?;
        ensure(config.routing.long_message_chars == 300, "long message threshold should be 300")?;
        ensure(config.routing.caps_min_chars == 10, "caps minimum should be 10")?;
        ensure(matches!(config.logging.format, LogFormat::Compact), "compact is the default")?;
        Ok(())
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&ALL_VARS);

        env::set_var("TEST_SUPPORTDESK_KEY", "key-from-env");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("supportdesk.toml");
            fs::write(
                &path,
                r#"
[llm]
api_key = "${TEST_SUPPORTDESK_KEY}"
model = "gemini-test"

[routing]
long_message_chars = 120
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.llm.api_key.as_ref().map(|key| key.expose_secret() == "key-from-env")
                    == Some(true),
                "api key should be interpolated from environment",
            )?;
            ensure(config.llm.model == "gemini-test", "model should come from file")?;
            ensure(
                config.routing.long_message_chars == 120,
                "routing threshold should come from file",
            )?;
            Ok(())
        })();

        clear_vars(&["TEST_SUPPORTDESK_KEY"]);
        result
    }

    #[test]
    fn gemini_env_aliases_are_supported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&ALL_VARS);

        env::set_var("GEMINI_API_KEY", "gemini-key");
        env::set_var("GEMINI_BASE_PATH", "https://gemini.example.test/v1/");
        env::set_var("GEMINI_MODEL_NAME", "gemini-alias");
        env::set_var("SUPPORTDESK_LOG_LEVEL", "warn");
        env::set_var("SUPPORTDESK_LOG_FORMAT", "pretty");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.llm.has_api_key(), "gemini api key alias should be honored")?;
            ensure(
                config.llm.base_url.as_deref() == Some("https://gemini.example.test/v1/"),
                "gemini base path alias should be honored",
            )?;
            ensure(config.llm.model == "gemini-alias", "gemini model alias should be honored")?;
            ensure(config.logging.level == "warn", "warning log level should be set from env")?;
            ensure(
                matches!(config.logging.format, LogFormat::Pretty),
                "pretty logging format should be set from env",
            )?;
            Ok(())
        })();

        clear_vars(&ALL_VARS);
        result
    }

    #[test]
    fn log_file_env_key_wins_over_short_alias() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&ALL_VARS);

        env::set_var("SUPPORTDESK_LOGGING_FILE", "logs/primary.log");
        env::set_var("SUPPORTDESK_LOG_FILE", "logs/alias.log");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;
            ensure(
                config.logging.file == Some(PathBuf::from("logs/primary.log")),
                "SUPPORTDESK_LOGGING_FILE should take precedence",
            )?;
            Ok(())
        })();

        clear_vars(&ALL_VARS);
        ensure(
            env::var_os("SUPPORTDESK_LOGGING_FILE").is_none(),
            "log file variable should be cleared between tests",
        )?;
        result
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&ALL_VARS);

        env::set_var("SUPPORTDESK_LLM_MODEL", "model-from-env");
        env::set_var("GEMINI_MODEL_NAME", "model-from-alias");
        env::set_var("SUPPORTDESK_ROUTING_CAPS_RATIO", "0.75");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("supportdesk.toml");
            fs::write(
                &path,
                r#"
[llm]
model = "model-from-file"

[logging]
level = "warn"

[routing]
caps_ratio = 0.9
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.llm.model == "model-from-env", "prefixed env var should win")?;
            ensure(config.logging.level == "debug", "overridden log level should be debug")?;
            ensure(
                (config.routing.caps_ratio - 0.75).abs() < f64::EPSILON,
                "env caps ratio should win over file",
            )?;
            Ok(())
        })();

        clear_vars(&ALL_VARS);
        result
    }

    #[test]
    fn validation_fails_fast_with_actionable_error() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&ALL_VARS);

        env::set_var("SUPPORTDESK_ROUTING_CAPS_RATIO", "1.5");

        let result = match AppConfig::load(LoadOptions::default()) {
            Ok(_) => Err("expected validation failure but config load succeeded".to_string()),
            Err(ConfigError::Validation(message)) => {
                ensure(message.contains("routing.caps_ratio"), "message should name the field")
            }
            Err(other) => Err(format!("unexpected error: {other}")),
        };

        clear_vars(&ALL_VARS);
        result
    }

    #[test]
    fn malformed_numeric_env_override_is_rejected() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&ALL_VARS);

        env::set_var("SUPPORTDESK_ROUTING_LONG_MESSAGE_CHARS", "lots");

        let result = match AppConfig::load(LoadOptions::default()) {
            Err(ConfigError::InvalidEnvOverride { key, value }) => ensure(
                key == "SUPPORTDESK_ROUTING_LONG_MESSAGE_CHARS" && value == "lots",
                "error should carry key and value",
            ),
            Ok(_) => Err("expected invalid override error".to_string()),
            Err(other) => Err(format!("unexpected error: {other}")),
        };

        clear_vars(&ALL_VARS);
        result
    }

    #[test]
    fn required_file_must_exist() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&ALL_VARS);

        let missing = PathBuf::from("missing/supportdesk.toml");
        match AppConfig::load(LoadOptions {
            config_path: Some(missing.clone()),
            require_file: true,
            ..LoadOptions::default()
        }) {
            Err(ConfigError::MissingConfigFile(path)) => {
                ensure(path == missing, "missing path should be reported")
            }
            Ok(_) => Err("expected missing file error".to_string()),
            Err(other) => Err(format!("unexpected error: {other}")),
        }
    }
}
