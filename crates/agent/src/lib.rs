//! Agent Runtime - deterministic routing for customer support conversations
//!
//! This crate decides, for each customer message, whether it is answered at all, who answers
//! it, and which tools are used along the way:
//! - Screens input for offensive language, hostile phrasing, and shouting
//! - Scores sentiment from a fixed list of negative indicators
//! - Routes complex, negative, or very long messages to a human representative
//! - Answers the rest with the order-status and FAQ tools
//!
//! # Architecture
//!
//! Every query follows the same constrained path:
//! 1. **Input Guardrail** (`guardrails`) - deflect before any routing happens
//! 2. **Handoff Decision** (`handoff`) - `Stay` with the bot or `Handoff` to a human
//! 3. **Tool Execution** (`tools`) - order lookup / FAQ search over the static knowledge base
//! 4. **Response Generation** (`llm`) - completion fallback, then the output guardrail
//!
//! # Key Types
//!
//! - `AgentRuntime` - Main orchestrator (see `runtime` module)
//! - `LlmClient` - Pluggable completion trait; `StubCompletionClient` runs offline
//! - `ToolRegistry` - Named capabilities with enablement and error handlers
//!
//! # Failure Principle
//!
//! `AgentRuntime::process_query` always returns a well-formed `QueryResult`. Order misses are
//! recovered by the order tool's error handler; anything else becomes a `success = false`
//! result carrying the error text.

pub mod agents;
pub mod guardrails;
pub mod handoff;
pub mod llm;
pub mod runtime;
pub mod sentiment;
pub mod tools;

pub use runtime::{AgentRuntime, QueryResult};
