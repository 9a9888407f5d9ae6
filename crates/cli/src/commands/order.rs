use supportdesk_core::knowledge::KnowledgeBase;

use super::CommandResult;

pub fn run(order_id: &str) -> CommandResult {
    let knowledge = KnowledgeBase::seeded();

    match knowledge.lookup_order(order_id) {
        Ok(lookup) => {
            tracing::info!(
                event_name = "cli.order.lookup",
                order_id = %lookup.order_id,
                status = %lookup.status,
                "order found"
            );
            CommandResult::json("order", 0, &lookup)
        }
        Err(error) => {
            tracing::warn!(event_name = "cli.order.lookup", error = %error, "order lookup missed");
            CommandResult::failure("order", "order_not_found", error.user_message(), 3)
        }
    }
}
