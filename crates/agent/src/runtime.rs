use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use supportdesk_core::config::RoutingConfig;
use supportdesk_core::domain::order::OrderId;
use supportdesk_core::errors::{ApplicationError, TECHNICAL_DIFFICULTY_MESSAGE};
use supportdesk_core::knowledge::KnowledgeBase;
use tracing::Instrument;
use uuid::Uuid;

use crate::agents::{AgentProfile, AgentRole, AgentRoster, HUMAN_HANDOFF_TOOL};
use crate::guardrails::{ContentGuardrail, GuardrailDecision, OutputGuardrail};
use crate::handoff::{HandoffDecision, HandoffPolicy};
use crate::llm::{CompletionRequest, LlmClient, StubCompletionClient};
use crate::tools::{
    faq_input, order_input, ToolContext, ToolOutcome, ToolRegistry, FAQ_SEARCH_TOOL,
    ORDER_STATUS_TOOL,
};

pub const CONTENT_FILTER_AGENT: &str = "content_filter";
pub const ERROR_HANDLER_AGENT: &str = "error_handler";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QueryResult {
    pub response: String,
    pub agent_used: String,
    pub handoff_occurred: bool,
    pub handoff_reason: Option<String>,
    pub tools_called: Vec<String>,
    pub success: bool,
    pub filtered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub correlation_id: String,
}

impl QueryResult {
    fn filtered(response: String, correlation_id: String) -> Self {
        Self {
            response,
            agent_used: CONTENT_FILTER_AGENT.to_string(),
            handoff_occurred: false,
            handoff_reason: None,
            tools_called: Vec::new(),
            success: true,
            filtered: true,
            error: None,
            correlation_id,
        }
    }

    fn failed(error: &anyhow::Error, correlation_id: String) -> Self {
        let response = error
            .downcast_ref::<ApplicationError>()
            .map(ApplicationError::user_message)
            .unwrap_or(TECHNICAL_DIFFICULTY_MESSAGE);
        Self {
            response: response.to_string(),
            agent_used: ERROR_HANDLER_AGENT.to_string(),
            handoff_occurred: false,
            handoff_reason: None,
            tools_called: Vec::new(),
            success: false,
            filtered: false,
            error: Some(format!("{error:#}")),
            correlation_id,
        }
    }
}

struct AgentReply {
    response: String,
    tools_called: Vec<String>,
}

pub struct AgentRuntime {
    guardrail: ContentGuardrail,
    output_guardrail: OutputGuardrail,
    handoff: HandoffPolicy,
    roster: AgentRoster,
    tools: ToolRegistry,
    llm: Arc<dyn LlmClient>,
}

impl AgentRuntime {
    pub fn new(
        knowledge: Arc<KnowledgeBase>,
        routing: &RoutingConfig,
        llm: Arc<dyn LlmClient>,
    ) -> Self {
        Self {
            guardrail: ContentGuardrail::from_routing(routing),
            output_guardrail: OutputGuardrail,
            handoff: HandoffPolicy::from_routing(routing),
            roster: AgentRoster::default(),
            tools: ToolRegistry::with_builtin_tools(knowledge),
            llm,
        }
    }

    /// Default thresholds and the offline completion client.
    pub fn offline(knowledge: Arc<KnowledgeBase>) -> Self {
        Self::new(knowledge, &RoutingConfig::default(), Arc::new(StubCompletionClient))
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Never fails: unexpected errors come back as a `success = false` result.
    pub async fn process_query(&self, message: &str, customer_id: Option<&str>) -> QueryResult {
        let correlation_id = Uuid::new_v4().to_string();
        let span = tracing::info_span!(
            "query",
            correlation_id = %correlation_id,
            customer_id = customer_id.unwrap_or("anonymous")
        );

        async {
            let preview = message.chars().take(100).collect::<String>();
            tracing::info!(
                event_name = "agent.query.received",
                message_preview = %preview,
                "processing customer query"
            );

            match self.route_query(message, customer_id, &correlation_id).await {
                Ok(result) => result,
                Err(error) => {
                    tracing::error!(
                        event_name = "agent.query.failed",
                        error = %error,
                        "error processing query"
                    );
                    QueryResult::failed(&error, correlation_id.clone())
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn route_query(
        &self,
        message: &str,
        customer_id: Option<&str>,
        correlation_id: &str,
    ) -> Result<QueryResult> {
        if let GuardrailDecision::Deflect { reason_code, user_message, .. } =
            self.guardrail.check(message)
        {
            tracing::info!(
                event_name = "agent.query.filtered",
                reason_code,
                "message blocked by content filter"
            );
            return Ok(QueryResult::filtered(user_message, correlation_id.to_string()));
        }

        let decision = self.handoff.decide(message);
        let agent = self.roster.select(&decision);
        let context = ToolContext { message, customer_id };

        let reply = match agent.role {
            AgentRole::Bot => self.respond_as_bot(agent, &context).await?,
            AgentRole::Human => self.respond_as_human(agent, &context, &decision).await?,
        };

        let response = match self.output_guardrail.check(&reply.response) {
            GuardrailDecision::Allow => reply.response,
            GuardrailDecision::Deflect { user_message, .. } => user_message,
        };

        tracing::info!(
            event_name = "agent.query.responded",
            agent = agent.name,
            handoff = decision.needs_handoff(),
            "response generated"
        );

        Ok(QueryResult {
            response,
            agent_used: agent.name.to_string(),
            handoff_occurred: decision.needs_handoff(),
            handoff_reason: decision.needs_handoff().then(|| decision.reason()),
            tools_called: reply.tools_called,
            success: true,
            filtered: false,
            error: None,
            correlation_id: correlation_id.to_string(),
        })
    }

    /// Order lookup when an order id is present and the order tool is enabled, otherwise
    /// FAQ search, otherwise a plain completion.
    async fn respond_as_bot(
        &self,
        agent: &AgentProfile,
        context: &ToolContext<'_>,
    ) -> Result<AgentReply> {
        let mut tools_called = Vec::new();

        let order_id = OrderId::find_in(context.message)
            .filter(|_| self.tools.is_enabled(ORDER_STATUS_TOOL, context));
        if let Some(order_id) = order_id {
            let input = order_input(order_id.as_str());
            let outcome = self.tools.invoke(ORDER_STATUS_TOOL, context, input).await?;
            tools_called.push(ORDER_STATUS_TOOL.to_string());
            match outcome {
                ToolOutcome::Completed(value) => {
                    return Ok(AgentReply { response: describe_order(&value), tools_called });
                }
                ToolOutcome::Recovered(message) => {
                    return Ok(AgentReply { response: message, tools_called });
                }
                ToolOutcome::Disabled => {}
            }
        }

        if agent.can_use(FAQ_SEARCH_TOOL) {
            let outcome =
                self.tools.invoke(FAQ_SEARCH_TOOL, context, faq_input(context.message)).await?;
            if let ToolOutcome::Completed(value) = outcome {
                tools_called.push(FAQ_SEARCH_TOOL.to_string());
                if let Some(answer) = describe_faq(&value) {
                    return Ok(AgentReply { response: answer, tools_called });
                }
            }
        }

        let response = self.complete(agent, context.message).await?;
        Ok(AgentReply { response, tools_called })
    }

    async fn respond_as_human(
        &self,
        agent: &AgentProfile,
        context: &ToolContext<'_>,
        decision: &HandoffDecision,
    ) -> Result<AgentReply> {
        tracing::info!(
            event_name = "agent.handoff.initiated",
            customer_id = context.customer_id.unwrap_or("unknown"),
            reason = %decision.reason(),
            target = agent.name,
            "transferring customer to human support representative"
        );

        let response = self.complete(agent, context.message).await?;
        Ok(AgentReply { response, tools_called: vec![HUMAN_HANDOFF_TOOL.to_string()] })
    }

    async fn complete(&self, agent: &AgentProfile, message: &str) -> Result<String> {
        self.llm
            .complete(CompletionRequest {
                agent_name: agent.name,
                instructions: agent.instructions,
                message,
            })
            .await
            .map_err(|error| ApplicationError::Integration(format!("{error:#}")).into())
    }
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

fn describe_order(value: &Value) -> String {
    let order_id = str_field(value, "order_id").unwrap_or("unknown");
    let status = str_field(value, "status").unwrap_or("unknown");
    let date = str_field(value, "order_date").unwrap_or("unknown");
    let amount = str_field(value, "amount").unwrap_or("unknown");
    let tracking = match str_field(value, "tracking_number") {
        Some(tracking) => format!("Tracking number: {tracking}."),
        None => "No tracking number is available yet.".to_string(),
    };
    format!("Order {order_id} is currently {status}. {tracking} Ordered on {date} for {amount}.")
}

fn describe_faq(value: &Value) -> Option<String> {
    let results = value.get("results").and_then(Value::as_array)?;
    let lines = results
        .iter()
        .filter_map(|hit| {
            let topic = str_field(hit, "topic")?;
            let answer = str_field(hit, "answer")?;
            Some(format!("{topic}: {answer}"))
        })
        .collect::<Vec<_>>();
    (!lines.is_empty()).then(|| lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use supportdesk_core::config::RoutingConfig;
    use supportdesk_core::errors::{ORDER_NOT_FOUND_MESSAGE, TECHNICAL_DIFFICULTY_MESSAGE};
    use supportdesk_core::knowledge::KnowledgeBase;

    use super::{AgentRuntime, CONTENT_FILTER_AGENT, ERROR_HANDLER_AGENT};
    use crate::agents::{BOT_AGENT_NAME, HUMAN_AGENT_NAME, HUMAN_HANDOFF_TOOL};
    use crate::guardrails::{PROFESSIONAL_REWRITE, RESPECTFUL_DEFLECTION};
    use crate::llm::{CompletionRequest, LlmClient};
    use crate::tools::{FAQ_SEARCH_TOOL, ORDER_STATUS_TOOL};

    struct FailingLlm;

    #[async_trait]
    impl LlmClient for FailingLlm {
        async fn complete(&self, _request: CompletionRequest<'_>) -> Result<String> {
            Err(anyhow!("completion backend unavailable"))
        }
    }

    struct DismissiveLlm;

    #[async_trait]
    impl LlmClient for DismissiveLlm {
        async fn complete(&self, _request: CompletionRequest<'_>) -> Result<String> {
            Ok("Sorry, that's not my job.".to_string())
        }
    }

    fn runtime() -> AgentRuntime {
        AgentRuntime::offline(Arc::new(KnowledgeBase::seeded()))
    }

    fn runtime_with(llm: Arc<dyn LlmClient>) -> AgentRuntime {
        AgentRuntime::new(Arc::new(KnowledgeBase::seeded()), &RoutingConfig::default(), llm)
    }

    #[tokio::test]
    async fn offensive_message_is_filtered_before_routing() {
        let result = runtime()
            .process_query("This service is absolutely terrible and useless!", Some("CUST003"))
            .await;
        assert!(result.filtered);
        assert!(result.success);
        assert!(!result.handoff_occurred);
        assert_eq!(result.agent_used, CONTENT_FILTER_AGENT);
        assert_eq!(result.response, RESPECTFUL_DEFLECTION);
        assert!(result.tools_called.is_empty());
    }

    #[tokio::test]
    async fn valid_order_is_looked_up_by_bot() {
        let result = runtime()
            .process_query("Hi, I'd like to check my order status for ORD002", Some("CUST001"))
            .await;
        assert!(result.success);
        assert!(!result.handoff_occurred);
        assert_eq!(result.agent_used, BOT_AGENT_NAME);
        assert_eq!(result.tools_called, vec![ORDER_STATUS_TOOL.to_string()]);
        assert!(result.response.contains("ORD002"));
        assert!(result.response.contains("shipped"));
        assert!(result.response.contains("TRK789012"));
    }

    #[tokio::test]
    async fn unknown_order_gets_scripted_apology() {
        let result = runtime().process_query("Can you check order ORD999?", Some("CUST005")).await;
        assert!(result.success);
        assert_eq!(result.response, ORDER_NOT_FOUND_MESSAGE);
        assert_eq!(result.tools_called, vec![ORDER_STATUS_TOOL.to_string()]);
    }

    #[tokio::test]
    async fn faq_question_is_answered_from_table() {
        let result = runtime().process_query("What's your return policy?", Some("CUST002")).await;
        assert!(result.success);
        assert!(!result.handoff_occurred);
        assert_eq!(result.handoff_reason, None);
        assert_eq!(result.tools_called, vec![FAQ_SEARCH_TOOL.to_string()]);
        assert!(result.response.contains("Return Policy: Our return policy allows returns"));
    }

    #[tokio::test]
    async fn refund_request_is_handed_to_human() {
        let result = runtime()
            .process_query(
                "I need a refund for my order and I'm very frustrated with your service",
                Some("CUST004"),
            )
            .await;
        assert!(result.success);
        assert!(result.handoff_occurred);
        assert_eq!(result.agent_used, HUMAN_AGENT_NAME);
        assert_eq!(result.handoff_reason.as_deref(), Some("Complex query detected: refund"));
        assert_eq!(result.tools_called, vec![HUMAN_HANDOFF_TOOL.to_string()]);
        assert!(result.response.starts_with("Response from Human Support Representative: "));
    }

    #[tokio::test]
    async fn unmatched_question_falls_back_to_completion() {
        let result = runtime().process_query("xyz123", None).await;
        assert!(result.success);
        assert_eq!(result.agent_used, BOT_AGENT_NAME);
        assert_eq!(result.tools_called, vec![FAQ_SEARCH_TOOL.to_string()]);
        assert_eq!(result.response, "Response from Customer Support Bot: xyz123");
    }

    #[tokio::test]
    async fn completion_failure_becomes_error_result() {
        let result = runtime_with(Arc::new(FailingLlm)).process_query("xyz123", None).await;
        assert!(!result.success);
        assert!(!result.filtered);
        assert_eq!(result.agent_used, ERROR_HANDLER_AGENT);
        assert_eq!(result.response, TECHNICAL_DIFFICULTY_MESSAGE);
        assert_eq!(
            result.error.as_deref(),
            Some("integration failure: completion backend unavailable")
        );
        assert!(result.tools_called.is_empty());
    }

    #[tokio::test]
    async fn unprofessional_completion_is_rewritten() {
        let result = runtime_with(Arc::new(DismissiveLlm)).process_query("xyz123", None).await;
        assert!(result.success);
        assert_eq!(result.response, PROFESSIONAL_REWRITE);
    }

    #[tokio::test]
    async fn each_query_gets_a_fresh_correlation_id() {
        let runtime = runtime();
        let first = runtime.process_query("xyz123", None).await;
        let second = runtime.process_query("xyz123", None).await;
        assert_ne!(first.correlation_id, second.correlation_id);
        assert_eq!(first.response, second.response);
    }

    #[tokio::test]
    async fn error_field_is_omitted_from_successful_payloads() {
        let result = runtime().process_query("xyz123", None).await;
        let value = serde_json::to_value(&result).unwrap_or_default();
        assert!(value.get("error").is_none());
        assert_eq!(value["success"], true);
    }
}
