use supportdesk_core::knowledge::KnowledgeBase;

use super::CommandResult;

pub fn run(query: &str) -> CommandResult {
    let search = KnowledgeBase::seeded().search_faq(query);
    tracing::info!(
        event_name = "cli.faq.search",
        found = search.found(),
        results = search.results().len(),
        "faq search completed"
    );
    CommandResult::json("faq", 0, &search)
}
