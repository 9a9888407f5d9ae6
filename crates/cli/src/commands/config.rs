use std::env;
use std::fs;
use std::path::Path;

use secrecy::ExposeSecret;
use supportdesk_core::config::{resolve_config_path, AppConfig, LoadOptions};
use toml::Value;

struct ConfigField<'a> {
    key_path: &'a str,
    env_keys: &'a [&'a str],
    value: String,
}

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = resolve_config_path(None);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let api_key = config
        .llm
        .api_key
        .as_ref()
        .map(|key| redact_token(key.expose_secret()))
        .unwrap_or_else(|| "<unset>".to_string());
    let log_file = config
        .logging
        .file
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<unset>".to_string());

    let fields = [
        ConfigField {
            key_path: "llm.api_key",
            env_keys: &["SUPPORTDESK_LLM_API_KEY", "GEMINI_API_KEY"],
            value: api_key,
        },
        ConfigField {
            key_path: "llm.base_url",
            env_keys: &["SUPPORTDESK_LLM_BASE_URL", "GEMINI_BASE_PATH"],
            value: config.llm.base_url.clone().unwrap_or_else(|| "<unset>".to_string()),
        },
        ConfigField {
            key_path: "llm.model",
            env_keys: &["SUPPORTDESK_LLM_MODEL", "GEMINI_MODEL_NAME"],
            value: config.llm.model.clone(),
        },
        ConfigField {
            key_path: "logging.level",
            env_keys: &["SUPPORTDESK_LOGGING_LEVEL", "SUPPORTDESK_LOG_LEVEL"],
            value: config.logging.level.clone(),
        },
        ConfigField {
            key_path: "logging.format",
            env_keys: &["SUPPORTDESK_LOGGING_FORMAT", "SUPPORTDESK_LOG_FORMAT"],
            value: format!("{:?}", config.logging.format),
        },
        ConfigField {
            key_path: "logging.file",
            env_keys: &["SUPPORTDESK_LOGGING_FILE", "SUPPORTDESK_LOG_FILE"],
            value: log_file,
        },
        ConfigField {
            key_path: "routing.long_message_chars",
            env_keys: &["SUPPORTDESK_ROUTING_LONG_MESSAGE_CHARS"],
            value: config.routing.long_message_chars.to_string(),
        },
        ConfigField {
            key_path: "routing.caps_ratio",
            env_keys: &["SUPPORTDESK_ROUTING_CAPS_RATIO"],
            value: config.routing.caps_ratio.to_string(),
        },
        ConfigField {
            key_path: "routing.caps_min_chars",
            env_keys: &["SUPPORTDESK_ROUTING_CAPS_MIN_CHARS"],
            value: config.routing.caps_min_chars.to_string(),
        },
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for field in &fields {
        lines.push(render_line(
            field.key_path,
            &field.value,
            field_source(
                field.key_path,
                field.env_keys,
                config_file_doc.as_ref(),
                config_file_path.as_deref(),
            ),
        ));
    }

    lines.join("\n")
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env_value_is_set(key)) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

/// Blank values are ignored by the loader, so they do not count as an env source.
fn env_value_is_set(key: &str) -> bool {
    env::var(key).map(|value| !value.trim().is_empty()).unwrap_or(false)
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

/// Keeps the last four characters of long keys so operators can tell keys apart.
fn redact_token(token: &str) -> String {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    let chars = trimmed.chars().count();
    if chars >= 12 {
        let suffix: String = trimmed.chars().skip(chars - 4).collect();
        return format!("***{suffix}");
    }

    "<redacted>".to_string()
}
