use std::fmt;

use serde::Serialize;

pub const NEGATIVE_INDICATORS: [&str; 16] = [
    "frustrated",
    "angry",
    "upset",
    "disappointed",
    "terrible",
    "awful",
    "worst",
    "horrible",
    "unacceptable",
    "ridiculous",
    "stupid",
    "useless",
    "refund",
    "cancel",
    "complaint",
    "manager",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLevel {
    Neutral,
    Negative,
    VeryNegative,
}

impl SentimentLevel {
    pub fn from_indicator_count(count: usize) -> Self {
        match count {
            0 => Self::Neutral,
            1 => Self::Negative,
            _ => Self::VeryNegative,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Negative => "negative",
            Self::VeryNegative => "very_negative",
        }
    }

    pub fn is_negative(&self) -> bool {
        !matches!(self, Self::Neutral)
    }
}

impl fmt::Display for SentimentLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of distinct negative indicators present in `message` (each counted once).
pub fn negative_indicator_count(message: &str) -> usize {
    let lowered = message.to_lowercase();
    NEGATIVE_INDICATORS.iter().filter(|word| lowered.contains(*word)).count()
}

pub fn classify(message: &str) -> SentimentLevel {
    SentimentLevel::from_indicator_count(negative_indicator_count(message))
}

#[cfg(test)]
mod tests {
    use super::{classify, negative_indicator_count, SentimentLevel};

    #[test]
    fn no_indicator_is_neutral() {
        assert_eq!(classify("Where is my parcel?"), SentimentLevel::Neutral);
    }

    #[test]
    fn single_indicator_is_negative() {
        assert_eq!(classify("I am quite UPSET about this"), SentimentLevel::Negative);
    }

    #[test]
    fn two_or_more_indicators_are_very_negative() {
        assert_eq!(classify("angry and disappointed"), SentimentLevel::VeryNegative);
        assert_eq!(
            classify("frustrated, angry, upset and I want a manager"),
            SentimentLevel::VeryNegative
        );
    }

    #[test]
    fn classification_is_monotonic_in_indicator_count() {
        let messages = ["hello there", "hello angry", "hello angry upset", "angry upset refund"];
        let levels = messages.iter().map(|message| classify(message)).collect::<Vec<_>>();
        assert!(levels.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(
            messages.iter().map(|message| negative_indicator_count(message)).collect::<Vec<_>>(),
            vec![0, 1, 2, 3]
        );
    }

    #[test]
    fn repeated_word_counts_once() {
        assert_eq!(negative_indicator_count("angry angry angry"), 1);
        assert_eq!(classify("angry angry angry"), SentimentLevel::Negative);
    }

    #[test]
    fn labels_match_wire_names() {
        assert_eq!(SentimentLevel::VeryNegative.to_string(), "very_negative");
        assert!(SentimentLevel::Negative.is_negative());
        assert!(!SentimentLevel::Neutral.is_negative());
    }
}
