use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FaqEntry {
    /// Snake-case key, e.g. `return_policy`.
    pub topic: String,
    pub answer: String,
}

impl FaqEntry {
    pub fn new(topic: impl Into<String>, answer: impl Into<String>) -> Self {
        Self { topic: topic.into(), answer: answer.into() }
    }

    /// `return_policy` -> `Return Policy`.
    pub fn title(&self) -> String {
        self.topic
            .split('_')
            .filter(|word| !word.is_empty())
            .map(title_case_word)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::FaqEntry;

    #[test]
    fn title_replaces_underscores_and_capitalizes() {
        let entry = FaqEntry::new("store_locations", "");
        assert_eq!(entry.title(), "Store Locations");
    }

    #[test]
    fn title_of_single_word_topic() {
        assert_eq!(FaqEntry::new("warranty", "").title(), "Warranty");
    }
}
