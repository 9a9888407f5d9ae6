pub mod ask;
pub mod config;
pub mod demo;
pub mod doctor;
pub mod faq;
pub mod order;

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use supportdesk_agent::llm::StubCompletionClient;
use supportdesk_agent::AgentRuntime;
use supportdesk_core::config::{AppConfig, LoadOptions};
use supportdesk_core::knowledge::KnowledgeBase;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

impl CommandResult {
    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    /// Emits a command-specific JSON document instead of the generic outcome envelope.
    pub fn json<T: Serialize>(command: &str, exit_code: u8, payload: &T) -> Self {
        match serde_json::to_string(payload) {
            Ok(output) => Self { exit_code, output },
            Err(error) => Self::failure(command, "serialization", error.to_string(), 1),
        }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

pub(crate) fn load_config(command: &str) -> Result<AppConfig, CommandResult> {
    AppConfig::load(LoadOptions::default()).map_err(|error| {
        CommandResult::failure(
            command,
            "config_validation",
            format!("configuration issue: {error}"),
            2,
        )
    })
}

pub(crate) fn build_agent_runtime(config: &AppConfig) -> AgentRuntime {
    AgentRuntime::new(
        Arc::new(KnowledgeBase::seeded()),
        &config.routing,
        Arc::new(StubCompletionClient),
    )
}

pub(crate) fn block_on<F: Future>(command: &str, future: F) -> Result<F::Output, CommandResult> {
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().map_err(
        |error| {
            CommandResult::failure(
                command,
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                4,
            )
        },
    )?;
    Ok(runtime.block_on(future))
}
