use siteline_agent::AgentRuntime;
use siteline_core::config::{AppConfig, LoadOptions};
use siteline_core::Query;

use crate::commands::CommandResult;

/// Runs one query. A failed envelope is still printed but exits with 1.
pub fn run(query: &str, property_id: Option<String>) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "ask",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };
    init_logging(&config);

    let agent_runtime = match AgentRuntime::from_config(&config) {
        Ok(agent_runtime) => agent_runtime,
        Err(error) => {
            return CommandResult::failure("ask", "runtime_assembly", format!("{error:#}"), 4);
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "ask",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let envelope = runtime.block_on(agent_runtime.handle(&Query::new(query, property_id)));
    let exit_code = if envelope.is_failed() { 1 } else { 0 };
    match serde_json::to_string_pretty(&envelope) {
        Ok(output) => CommandResult { exit_code, output },
        Err(error) => CommandResult::failure("ask", "serialization", error.to_string(), 5),
    }
}

// Logs go to stderr so stdout stays a single envelope.
fn init_logging(config: &AppConfig) {
    use siteline_core::config::LogFormat::*;
    use tracing_subscriber::filter::LevelFilter;

    let log_level = config.logging.level.parse::<LevelFilter>().unwrap_or(LevelFilter::WARN);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    let _ = match config.logging.format {
        Compact => builder.compact().try_init(),
        Pretty => builder.pretty().try_init(),
        Json => builder.json().try_init(),
    };
}
