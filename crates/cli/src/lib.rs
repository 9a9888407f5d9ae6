pub mod commands;
pub mod logging;

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use supportdesk_core::config::{AppConfig, LoadOptions};

#[derive(Debug, Parser)]
#[command(
    name = "supportdesk",
    about = "Supportdesk customer support bot CLI",
    long_about = "Answer customer messages through guardrails, handoff routing, and the order/FAQ tools, and inspect runtime readiness.",
    after_help = "Examples:\n  supportdesk ask \"What's your return policy?\"\n  supportdesk order ORD002\n  supportdesk demo\n  supportdesk doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Process one customer message and print the query result as JSON")]
    Ask {
        message: String,
        #[arg(long, help = "Customer identifier attached to logs")]
        customer_id: Option<String>,
    },
    #[command(about = "Look up an order in the knowledge base")]
    Order { order_id: String },
    #[command(about = "Search the FAQ table")]
    Faq { query: String },
    #[command(about = "Run the six demonstration scenarios (requires an LLM API key)")]
    Demo,
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, API key readiness, and knowledge base checks")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

impl Command {
    fn emits_logs(&self) -> bool {
        matches!(self, Self::Ask { .. } | Self::Order { .. } | Self::Faq { .. } | Self::Demo)
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    if cli.command.emits_logs() {
        // Config errors are reported by the command itself.
        if let Ok(config) = AppConfig::load(LoadOptions::default()) {
            if let Err(error) = logging::init(&config.logging) {
                eprintln!("logging disabled: {error}");
            }
        }
    }

    let result = match cli.command {
        Command::Ask { message, customer_id } => {
            commands::ask::run(&message, customer_id.as_deref())
        }
        Command::Order { order_id } => commands::order::run(&order_id),
        Command::Faq { query } => commands::faq::run(&query),
        Command::Demo => commands::demo::run(),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => commands::doctor::run(json),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
