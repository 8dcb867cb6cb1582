pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "siteline",
    about = "Siteline operator CLI",
    long_about = "Ask the site analytics and audit agents a question, or inspect the effective configuration.",
    after_help = "Examples:\n  siteline ask \"page views last 7 days\" --property-id 123456\n  siteline ask \"pages missing meta description\"\n  siteline config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Route one query through the agents and print the response envelope")]
    Ask {
        #[arg(help = "Natural-language question")]
        query: String,
        #[arg(long, help = "Analytics property id; omit to ask the site audit agent")]
        property_id: Option<String>,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Ask { query, property_id } => commands::ask::run(&query, property_id),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
