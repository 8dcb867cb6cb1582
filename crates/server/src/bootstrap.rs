use siteline_agent::AgentRuntime;
use siteline_core::config::{AppConfig, ConfigError};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub agent_runtime: AgentRuntime,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("agent runtime could not be assembled: {0}")]
    Runtime(#[source] anyhow::Error),
}

#[cfg(test)]
pub fn bootstrap(options: siteline_core::config::LoadOptions) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );
    bootstrap_with_config(AppConfig::load(options)?)
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    let agent_runtime = AgentRuntime::from_config(&config).map_err(BootstrapError::Runtime)?;
    info!(
        event_name = "system.bootstrap.runtime_ready",
        correlation_id = "bootstrap",
        llm_provider = config.llm.provider.as_str(),
        seo_configured = agent_runtime.seo_configured(),
        "agent runtime assembled"
    );

    Ok(Application { config, agent_runtime })
}
