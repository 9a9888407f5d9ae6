use super::{block_on, build_agent_runtime, load_config, CommandResult};

pub fn run(message: &str, customer_id: Option<&str>) -> CommandResult {
    let config = match load_config("ask") {
        Ok(config) => config,
        Err(result) => return result,
    };

    if message.trim().is_empty() {
        return CommandResult::failure("ask", "invalid_input", "message must not be empty", 2);
    }

    let runtime = build_agent_runtime(&config);
    let result = match block_on("ask", runtime.process_query(message, customer_id)) {
        Ok(result) => result,
        Err(result) => return result,
    };

    let exit_code = if result.success { 0 } else { 5 };
    CommandResult::json("ask", exit_code, &result)
}
