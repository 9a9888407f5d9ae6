use serde::Serialize;

use crate::domain::faq::FaqEntry;

pub const NO_FAQ_MATCH_MESSAGE: &str = "No relevant FAQ found for your query.";

/// Read-only FAQ table; iteration order is the seed order.
#[derive(Clone, Debug, Default)]
pub struct FaqBook {
    entries: Vec<FaqEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FaqMatch {
    pub topic: String,
    pub answer: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FaqSearch {
    Found { found: bool, results: Vec<FaqMatch> },
    NotFound { found: bool, message: String },
}

impl FaqSearch {
    pub fn found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    pub fn results(&self) -> &[FaqMatch] {
        match self {
            Self::Found { results, .. } => results,
            Self::NotFound { .. } => &[],
        }
    }
}

impl FaqBook {
    pub fn new(entries: impl IntoIterator<Item = FaqEntry>) -> Self {
        Self { entries: entries.into_iter().collect() }
    }

    pub fn seeded() -> Self {
        Self::new([
            FaqEntry::new(
                "return_policy",
                "Our return policy allows returns within 30 days of purchase with original receipt.",
            ),
            FaqEntry::new(
                "shipping_time",
                "Standard shipping takes 3-5 business days, express shipping takes 1-2 business days.",
            ),
            FaqEntry::new(
                "payment_methods",
                "We accept Visa, MasterCard, American Express, PayPal, and Apple Pay.",
            ),
            FaqEntry::new("warranty", "All products come with a 1-year manufacturer warranty."),
            FaqEntry::new(
                "contact_hours",
                "Customer service is available Monday-Friday 9AM-6PM EST.",
            ),
            FaqEntry::new(
                "store_locations",
                "We have stores in New York, Los Angeles, Chicago, and Miami.",
            ),
        ])
    }

    /// A topic matches when any whitespace-separated query word occurs inside the topic
    /// key or inside the answer text, both compared lower-case.
    pub fn search(&self, query: &str) -> FaqSearch {
        let query = query.to_lowercase();
        let words = query.split_whitespace().collect::<Vec<_>>();

        let results = self
            .entries
            .iter()
            .filter(|entry| {
                let answer = entry.answer.to_lowercase();
                words.iter().any(|word| entry.topic.contains(word) || answer.contains(word))
            })
            .map(|entry| FaqMatch { topic: entry.title(), answer: entry.answer.clone() })
            .collect::<Vec<_>>();

        if results.is_empty() {
            FaqSearch::NotFound { found: false, message: NO_FAQ_MATCH_MESSAGE.to_string() }
        } else {
            FaqSearch::Found { found: true, results }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
