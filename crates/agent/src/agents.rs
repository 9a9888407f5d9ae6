use crate::handoff::HandoffDecision;
use crate::tools::{FAQ_SEARCH_TOOL, ORDER_STATUS_TOOL};

pub const BOT_AGENT_NAME: &str = "Customer Support Bot";
pub const HUMAN_AGENT_NAME: &str = "Human Support Representative";
pub const HUMAN_HANDOFF_TOOL: &str = "transfer_to_human_support";

const BOT_INSTRUCTIONS: &str = "You are a friendly and professional customer support bot. \
Answer frequently asked questions about products, shipping, returns, and policies. Look up \
order statuses when customers provide order IDs, and ask for the order ID if it is missing. \
Transfer to human support when the query is too complex, the customer seems frustrated or \
angry, technical issues need human intervention, the request involves refunds or account \
modifications, or you cannot find the information requested. If you are unsure, transfer \
rather than guess.";

const HUMAN_INSTRUCTIONS: &str = "You are a human customer support representative handling \
escalated cases: the issue was too complex for the bot, the customer expressed frustration or \
negative sentiment, or specialized assistance is needed. Be extra empathetic and thorough, take \
ownership of the issue, and acknowledge the customer's frustration while resolving it.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgentRole {
    Bot,
    Human,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgentProfile {
    pub role: AgentRole,
    pub name: &'static str,
    pub instructions: &'static str,
    pub tools: Vec<&'static str>,
    pub handoffs: Vec<&'static str>,
}

impl AgentProfile {
    pub fn support_bot() -> Self {
        Self {
            role: AgentRole::Bot,
            name: BOT_AGENT_NAME,
            instructions: BOT_INSTRUCTIONS,
            tools: vec![ORDER_STATUS_TOOL, FAQ_SEARCH_TOOL],
            handoffs: vec![HUMAN_HANDOFF_TOOL],
        }
    }

    pub fn human_representative() -> Self {
        Self {
            role: AgentRole::Human,
            name: HUMAN_AGENT_NAME,
            instructions: HUMAN_INSTRUCTIONS,
            tools: Vec::new(),
            handoffs: Vec::new(),
        }
    }

    pub fn can_use(&self, tool_name: &str) -> bool {
        self.tools.iter().any(|tool| *tool == tool_name)
    }
}

/// The two agents a query can be routed to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgentRoster {
    bot: AgentProfile,
    human: AgentProfile,
}

impl Default for AgentRoster {
    fn default() -> Self {
        Self { bot: AgentProfile::support_bot(), human: AgentProfile::human_representative() }
    }
}

impl AgentRoster {
    pub fn select(&self, decision: &HandoffDecision) -> &AgentProfile {
        match decision {
            HandoffDecision::Stay => &self.bot,
            HandoffDecision::Handoff(_) => &self.human,
        }
    }

    pub fn bot(&self) -> &AgentProfile {
        &self.bot
    }

    pub fn human(&self) -> &AgentProfile {
        &self.human
    }
}
