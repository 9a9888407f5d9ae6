use std::fmt;

use supportdesk_core::config::RoutingConfig;

use crate::sentiment::{self, SentimentLevel};

pub const COMPLEX_KEYWORDS: [&str; 14] = [
    "refund",
    "cancel order",
    "change order",
    "billing issue",
    "account problem",
    "technical support",
    "complaint",
    "manager",
    "legal",
    "lawsuit",
    "fraud",
    "dispute",
    "damaged",
    "broken",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandoffReason {
    ComplexQuery { keyword: &'static str },
    NegativeSentiment { level: SentimentLevel },
    LongMessage { chars: usize },
}

impl fmt::Display for HandoffReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ComplexQuery { keyword } => write!(f, "Complex query detected: {keyword}"),
            Self::NegativeSentiment { level } => write!(f, "Negative sentiment detected: {level}"),
            Self::LongMessage { .. } => {
                f.write_str("Long complex message requiring human attention")
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandoffDecision {
    Stay,
    Handoff(HandoffReason),
}

impl HandoffDecision {
    pub fn needs_handoff(&self) -> bool {
        matches!(self, Self::Handoff(_))
    }

    /// Reason text, empty when the query stays with the bot.
    pub fn reason(&self) -> String {
        match self {
            Self::Stay => String::new(),
            Self::Handoff(reason) => reason.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HandoffPolicy {
    long_message_chars: usize,
}

impl Default for HandoffPolicy {
    fn default() -> Self {
        Self::from_routing(&RoutingConfig::default())
    }
}

impl HandoffPolicy {
    pub fn from_routing(routing: &RoutingConfig) -> Self {
        Self { long_message_chars: routing.long_message_chars }
    }

    /// Complex keywords, then sentiment, then length; the first rule that fires wins.
    pub fn decide(&self, message: &str) -> HandoffDecision {
        let lowered = message.to_lowercase();

        if let Some(keyword) = COMPLEX_KEYWORDS.iter().copied().find(|kw| lowered.contains(*kw)) {
            return HandoffDecision::Handoff(HandoffReason::ComplexQuery { keyword });
        }

        let level = sentiment::classify(message);
        if level.is_negative() {
            return HandoffDecision::Handoff(HandoffReason::NegativeSentiment { level });
        }

        let chars = message.chars().count();
        if chars > self.long_message_chars {
            return HandoffDecision::Handoff(HandoffReason::LongMessage { chars });
        }

        HandoffDecision::Stay
    }
}
