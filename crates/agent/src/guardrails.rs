use supportdesk_core::config::RoutingConfig;

pub const OFFENSIVE_WORDS: [&str; 13] = [
    "stupid", "idiot", "hate", "terrible", "worst", "awful", "useless", "garbage", "damn", "crap",
    "sucks", "fuck", "shit",
];

pub const NEGATIVE_PHRASES: [&str; 9] = [
    "i hate",
    "you suck",
    "this is terrible",
    "worst service",
    "complete garbage",
    "totally useless",
    "absolutely awful",
    "hate this company",
    "worst experience",
];

pub const INAPPROPRIATE_RESPONSES: [&str; 5] = [
    "i don't know",
    "i can't help",
    "that's not my job",
    "figure it out yourself",
    "not my problem",
];

pub const RESPECTFUL_DEFLECTION: &str = "I understand you might be frustrated, but let's keep our conversation respectful. How can I help you resolve your issue today?";
pub const ESCALATION_APOLOGY: &str = "I'm sorry to hear you're having a difficult experience. Let me connect you with someone who can help make this right for you.";
pub const DE_ESCALATION_PROMPT: &str = "I can see this is important to you. Let me help you resolve this issue. Could you please provide more details about your concern?";
pub const PROFESSIONAL_REWRITE: &str = "I want to help you with your request. Let me check what options are available or connect you with someone who can better assist you.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardrailDecision {
    Allow,
    Deflect { reason_code: &'static str, trigger: String, user_message: String },
}

impl GuardrailDecision {
    pub fn user_message(&self) -> Option<&str> {
        match self {
            Self::Allow => None,
            Self::Deflect { user_message, .. } => Some(user_message),
        }
    }

    pub fn is_allow(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Input filter: offensive words take priority over negative phrases, which take priority
/// over the shouting (capital-letter ratio) check.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentGuardrail {
    caps_ratio: f64,
    caps_min_chars: usize,
}

impl Default for ContentGuardrail {
    fn default() -> Self {
        Self::from_routing(&RoutingConfig::default())
    }
}

impl ContentGuardrail {
    pub fn from_routing(routing: &RoutingConfig) -> Self {
        Self { caps_ratio: routing.caps_ratio, caps_min_chars: routing.caps_min_chars }
    }

    pub fn check(&self, message: &str) -> GuardrailDecision {
        if message.is_empty() {
            return GuardrailDecision::Allow;
        }

        let lowered = message.to_lowercase();

        if let Some(word) = first_match(&lowered, &OFFENSIVE_WORDS) {
            tracing::warn!(
                event_name = "agent.guardrail.offensive_language",
                trigger = word,
                "offensive language detected"
            );
            return deflect("offensive_language", word, RESPECTFUL_DEFLECTION);
        }

        if let Some(phrase) = first_match(&lowered, &NEGATIVE_PHRASES) {
            tracing::warn!(
                event_name = "agent.guardrail.negative_phrase",
                trigger = phrase,
                "negative phrase detected"
            );
            return deflect("negative_phrase", phrase, ESCALATION_APOLOGY);
        }

        let (ratio, length) = uppercase_ratio(message);
        if ratio > self.caps_ratio && length > self.caps_min_chars {
            tracing::warn!(
                event_name = "agent.guardrail.excessive_caps",
                caps_ratio = ratio,
                "excessive capitals detected"
            );
            return deflect("excessive_caps", &format!("{ratio:.2}"), DE_ESCALATION_PROMPT);
        }

        GuardrailDecision::Allow
    }
}

/// Output filter applied to generated responses before they reach the customer.
#[derive(Clone, Debug, Default)]
pub struct OutputGuardrail;

impl OutputGuardrail {
    pub fn check(&self, response: &str) -> GuardrailDecision {
        let lowered = response.to_lowercase();
        match first_match(&lowered, &INAPPROPRIATE_RESPONSES) {
            Some(phrase) => {
                tracing::warn!(
                    event_name = "agent.guardrail.inappropriate_response",
                    trigger = phrase,
                    "inappropriate response rewritten"
                );
                deflect("inappropriate_response", phrase, PROFESSIONAL_REWRITE)
            }
            None => GuardrailDecision::Allow,
        }
    }
}

/// Share of upper-case characters over the total character count, plus that count.
pub fn uppercase_ratio(message: &str) -> (f64, usize) {
    let length = message.chars().count();
    if length == 0 {
        return (0.0, 0);
    }
    let upper = message.chars().filter(|ch| ch.is_uppercase()).count();
    (upper as f64 / length as f64, length)
}

fn first_match(haystack: &str, needles: &[&'static str]) -> Option<&'static str> {
    needles.iter().copied().find(|needle| haystack.contains(*needle))
}

fn deflect(reason_code: &'static str, trigger: &str, user_message: &str) -> GuardrailDecision {
    GuardrailDecision::Deflect {
        reason_code,
        trigger: trigger.to_string(),
        user_message: user_message.to_string(),
    }
}
