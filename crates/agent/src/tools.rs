use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use supportdesk_core::errors::DomainError;
use supportdesk_core::knowledge::KnowledgeBase;

pub const ORDER_STATUS_TOOL: &str = "get_order_status";
pub const FAQ_SEARCH_TOOL: &str = "search_faq";

pub const ORDER_KEYWORDS: [&str; 6] = ["order", "track", "status", "shipped", "delivery", "ord"];

/// What a tool can see about the conversation when deciding whether it is enabled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ToolContext<'a> {
    pub message: &'a str,
    pub customer_id: Option<&'a str>,
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn is_enabled(&self, _context: &ToolContext<'_>) -> bool {
        true
    }

    async fn execute(&self, input: Value) -> Result<Value>;

    /// Converts a failure into customer-facing text. `None` lets the error propagate.
    fn on_error(&self, _error: &anyhow::Error) -> Option<String> {
        None
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ToolOutcome {
    Completed(Value),
    Recovered(String),
    Disabled,
}

#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn with_builtin_tools(knowledge: Arc<KnowledgeBase>) -> Self {
        let mut registry = Self::default();
        registry.register(OrderStatusTool::new(Arc::clone(&knowledge)));
        registry.register(FaqSearchTool::new(knowledge));
        registry
    }

    pub fn register<T>(&mut self, tool: T)
    where
        T: Tool + 'static,
    {
        self.tools.insert(tool.name().to_string(), Box::new(tool));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|tool| &**tool)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names = self.tools.keys().map(String::as_str).collect::<Vec<_>>();
        names.sort_unstable();
        names
    }

    pub fn is_enabled(&self, name: &str, context: &ToolContext<'_>) -> bool {
        self.get(name).map(|tool| tool.is_enabled(context)).unwrap_or(false)
    }

    /// Runs an enabled tool, routing failures through the tool's own error handler first.
    pub async fn invoke(
        &self,
        name: &str,
        context: &ToolContext<'_>,
        input: Value,
    ) -> Result<ToolOutcome> {
        let tool = self.get(name).ok_or_else(|| anyhow!("tool `{name}` is not registered"))?;

        if !tool.is_enabled(context) {
            tracing::debug!(event_name = "agent.tool.disabled", tool = name, "tool not enabled");
            return Ok(ToolOutcome::Disabled);
        }

        tracing::info!(
            event_name = "agent.tool.invoked",
            tool = name,
            input = %input,
            "tool invocation"
        );
        match tool.execute(input).await {
            Ok(output) => Ok(ToolOutcome::Completed(output)),
            Err(error) => match tool.on_error(&error) {
                Some(message) => {
                    tracing::warn!(
                        event_name = "agent.tool.recovered",
                        tool = name,
                        error = %error,
                        "tool failure converted by error handler"
                    );
                    Ok(ToolOutcome::Recovered(message))
                }
                None => Err(error),
            },
        }
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

pub struct OrderStatusTool {
    knowledge: Arc<KnowledgeBase>,
}

impl OrderStatusTool {
    pub fn new(knowledge: Arc<KnowledgeBase>) -> Self {
        Self { knowledge }
    }
}

#[async_trait]
impl Tool for OrderStatusTool {
    fn name(&self) -> &'static str {
        ORDER_STATUS_TOOL
    }

    fn description(&self) -> &'static str {
        "Get order status and tracking information for a given order ID"
    }

    fn is_enabled(&self, context: &ToolContext<'_>) -> bool {
        let message = context.message.to_lowercase();
        !message.is_empty() && ORDER_KEYWORDS.iter().any(|keyword| message.contains(*keyword))
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let order_id = input
            .get("order_id")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                anyhow!("`{ORDER_STATUS_TOOL}` requires a string `order_id` argument")
            })?;

        match self.knowledge.lookup_order(order_id) {
            Ok(found) => {
                tracing::info!(
                    event_name = "agent.tool.order_found",
                    order_id = %found.order_id,
                    status = %found.status,
                    "order found"
                );
                Ok(serde_json::to_value(found)?)
            }
            Err(error) => {
                tracing::warn!(
                    event_name = "agent.tool.order_missing",
                    error = %error,
                    "order not found"
                );
                Err(error.into())
            }
        }
    }

    fn on_error(&self, error: &anyhow::Error) -> Option<String> {
        error.downcast_ref::<DomainError>().map(|domain| domain.user_message().to_string())
    }
}

pub struct FaqSearchTool {
    knowledge: Arc<KnowledgeBase>,
}

impl FaqSearchTool {
    pub fn new(knowledge: Arc<KnowledgeBase>) -> Self {
        Self { knowledge }
    }
}

#[async_trait]
impl Tool for FaqSearchTool {
    fn name(&self) -> &'static str {
        FAQ_SEARCH_TOOL
    }

    fn description(&self) -> &'static str {
        "Search FAQ database for answers to common customer questions"
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let query = input
            .get("query")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("`{FAQ_SEARCH_TOOL}` requires a string `query` argument"))?;

        let search = self.knowledge.search_faq(query);
        tracing::info!(
            event_name = "agent.tool.faq_searched",
            matches = search.results().len(),
            "faq search complete"
        );
        Ok(serde_json::to_value(search)?)
    }
}

pub fn order_input(order_id: &str) -> Value {
    json!({ "order_id": order_id })
}

pub fn faq_input(query: &str) -> Value {
    json!({ "query": query })
}
