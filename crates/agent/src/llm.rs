use anyhow::Result;
use async_trait::async_trait;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompletionRequest<'a> {
    pub agent_name: &'a str,
    pub instructions: &'a str,
    pub message: &'a str,
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String>;
}

/// Offline completion client. Echoes the message back under the agent's name, which is
/// all the routing layer needs to assemble a result.
#[derive(Clone, Debug, Default)]
pub struct StubCompletionClient;

#[async_trait]
impl LlmClient for StubCompletionClient {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String> {
        Ok(format!("Response from {}: {}", request.agent_name, request.message))
    }
}
