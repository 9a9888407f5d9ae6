use serde::Serialize;
use supportdesk_agent::{AgentRuntime, QueryResult};

use super::{block_on, build_agent_runtime, load_config, CommandResult};

#[derive(Clone, Copy, Debug)]
pub struct DemoScenario {
    pub customer_id: &'static str,
    pub message: &'static str,
    pub description: &'static str,
}

pub const DEMO_SCENARIOS: [DemoScenario; 6] = [
    DemoScenario {
        customer_id: "CUST001",
        message: "Hi, I'd like to check my order status for ORD002",
        description: "valid order lookup",
    },
    DemoScenario {
        customer_id: "CUST002",
        message: "What's your return policy?",
        description: "FAQ search",
    },
    DemoScenario {
        customer_id: "CUST003",
        message: "This service is absolutely terrible and useless!",
        description: "offensive language guardrail",
    },
    DemoScenario {
        customer_id: "CUST004",
        message: "I need a refund for my order and I'm very frustrated with your service",
        description: "complex query handed to a human",
    },
    DemoScenario {
        customer_id: "CUST005",
        message: "Can you check order ORD999?",
        description: "unknown order error handler",
    },
    DemoScenario {
        customer_id: "CUST006",
        message: "What are your store hours and payment methods?",
        description: "multi-topic FAQ search",
    },
];

#[derive(Debug, Serialize)]
struct DemoSummary {
    command: &'static str,
    status: &'static str,
    scenarios: usize,
    succeeded: usize,
    handoffs: usize,
    filtered: usize,
}

pub fn run() -> CommandResult {
    let config = match load_config("demo") {
        Ok(config) => config,
        Err(result) => return result,
    };

    if !config.llm.has_api_key() {
        return CommandResult::failure(
            "demo",
            "config_validation",
            "llm.api_key is not set; export GEMINI_API_KEY or SUPPORTDESK_LLM_API_KEY",
            2,
        );
    }

    tracing::info!(
        event_name = "cli.demo.start",
        model = %config.llm.model,
        scenarios = DEMO_SCENARIOS.len(),
        "running demo scenarios"
    );

    let runtime = build_agent_runtime(&config);
    let results = match block_on("demo", run_scenarios(&runtime)) {
        Ok(results) => results,
        Err(result) => return result,
    };

    let mut lines = Vec::new();
    for (index, (scenario, result)) in DEMO_SCENARIOS.iter().zip(&results).enumerate() {
        lines.extend(render_scenario(index + 1, scenario, result));
    }

    let summary = DemoSummary {
        command: "demo",
        status: "ok",
        scenarios: results.len(),
        succeeded: results.iter().filter(|result| result.success).count(),
        handoffs: results.iter().filter(|result| result.handoff_occurred).count(),
        filtered: results.iter().filter(|result| result.filtered).count(),
    };
    let summary = CommandResult::json("demo", 0, &summary);
    lines.push(summary.output);

    CommandResult { exit_code: summary.exit_code, output: lines.join("\n") }
}

pub async fn run_scenarios(runtime: &AgentRuntime) -> Vec<QueryResult> {
    let mut results = Vec::with_capacity(DEMO_SCENARIOS.len());
    for scenario in &DEMO_SCENARIOS {
        results.push(runtime.process_query(scenario.message, Some(scenario.customer_id)).await);
    }
    results
}

fn render_scenario(number: usize, scenario: &DemoScenario, result: &QueryResult) -> Vec<String> {
    let mut lines = vec![
        format!("--- scenario {number}: {} ---", scenario.description),
        format!("customer: {}", scenario.message),
        format!("agent: {}", result.agent_used),
        format!("response: {}", result.response),
    ];
    if result.handoff_occurred {
        let reason = result.handoff_reason.as_deref().unwrap_or("not specified");
        lines.push(format!("handoff reason: {reason}"));
    }
    if !result.tools_called.is_empty() {
        lines.push(format!("tools called: {}", result.tools_called.join(", ")));
    }
    if result.filtered {
        lines.push("content filtered by guardrail".to_string());
    }
    lines
}
