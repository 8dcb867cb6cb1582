//! Text-completion boundary.
//!
//! Transport implementations return `anyhow::Result`; pipeline code only sees
//! [`LlmOutcome`] from a single [`complete_once`] attempt.

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::json;
use siteline_core::config::{LlmConfig, LlmProvider};
use tracing::warn;

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LlmOutcome {
    Completed(String),
    Unavailable,
}

/// One attempt, no retry. Any transport error or blank completion is
/// reported as `Unavailable`.
pub async fn complete_once(client: &dyn LlmClient, prompt: &str, purpose: &str) -> LlmOutcome {
    match client.complete(prompt).await {
        Ok(text) if !text.trim().is_empty() => LlmOutcome::Completed(text),
        Ok(_) => {
            warn!(event_name = "agent.llm.empty_completion", purpose, "model returned no text");
            LlmOutcome::Unavailable
        }
        Err(error) => {
            warn!(
                event_name = "agent.llm.unavailable",
                purpose,
                error = %error,
                "model call failed, using deterministic fallback"
            );
            LlmOutcome::Unavailable
        }
    }
}

/// Client used when no model is configured. Every call fails.
#[derive(Clone, Debug, Default)]
pub struct DisabledLlm;

#[async_trait]
impl LlmClient for DisabledLlm {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        bail!("language model is disabled")
    }
}

const OPENAI_DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const ANTHROPIC_DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const ANTHROPIC_MAX_TOKENS: u32 = 1024;

/// Chat-completion client for OpenAI-compatible endpoints (OpenAI, LiteLLM
/// proxies, Ollama) and the Anthropic messages endpoint.
pub struct HttpLlmClient {
    client: reqwest::Client,
    provider: LlmProvider,
    endpoint: String,
    api_key: Option<SecretString>,
    model: String,
}

impl HttpLlmClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let base_url = config.base_url.as_deref().map(|url| url.trim_end_matches('/'));
        let endpoint = match config.provider {
            LlmProvider::OpenAi => {
                format!("{}/chat/completions", base_url.unwrap_or(OPENAI_DEFAULT_BASE_URL))
            }
            LlmProvider::Ollama => {
                let base_url = base_url.context("llm.base_url is required for ollama")?;
                format!("{base_url}/v1/chat/completions")
            }
            LlmProvider::Anthropic => {
                format!("{}/v1/messages", base_url.unwrap_or(ANTHROPIC_DEFAULT_BASE_URL))
            }
            LlmProvider::Disabled => bail!("disabled provider has no http client"),
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build llm http client")?;

        Ok(Self {
            client,
            provider: config.provider,
            endpoint,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn chat_completion(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage { role: "user", content: prompt }],
        };
        let mut builder = self.client.post(&self.endpoint).json(&request);
        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key.expose_secret());
        }

        let response = builder.send().await.context("chat completion request failed")?;
        let status = response.status();
        if !status.is_success() {
            bail!("chat completion endpoint returned {status}");
        }

        let body: ChatResponse =
            response.json().await.context("failed to decode chat completion response")?;
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("chat completion response had no content"))
    }

    async fn anthropic_message(&self, prompt: &str) -> Result<String> {
        let api_key = self.api_key.as_ref().context("anthropic provider requires an api key")?;
        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", api_key.expose_secret())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&json!({
                "model": self.model,
                "max_tokens": ANTHROPIC_MAX_TOKENS,
                "messages": [{ "role": "user", "content": prompt }],
            }))
            .send()
            .await
            .context("anthropic messages request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("anthropic messages endpoint returned {status}");
        }

        let body: AnthropicResponse =
            response.json().await.context("failed to decode anthropic response")?;
        let text = body
            .content
            .into_iter()
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("");
        Ok(text)
    }
}

#[async_trait]
impl LlmClient for HttpLlmClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        match self.provider {
            LlmProvider::Anthropic => self.anthropic_message(prompt).await,
            _ => self.chat_completion(prompt).await,
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<AnthropicBlock>,
}

#[derive(Deserialize)]
struct AnthropicBlock {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use anyhow::{bail, Result};
    use async_trait::async_trait;
    use siteline_core::config::{LlmConfig, LlmProvider};

    use super::{complete_once, DisabledLlm, HttpLlmClient, LlmClient, LlmOutcome};

    struct Scripted {
        reply: Option<&'static str>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LlmClient for Scripted {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Some(reply) => Ok(reply.to_string()),
                None => bail!("connection reset"),
            }
        }
    }

    #[tokio::test]
    async fn failure_is_unavailable_after_a_single_attempt() {
        let client = Scripted { reply: None, calls: AtomicUsize::new(0) };
        assert_eq!(complete_once(&client, "hi", "test").await, LlmOutcome::Unavailable);
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn blank_completion_is_unavailable() {
        let client = Scripted { reply: Some("  \n"), calls: AtomicUsize::new(0) };
        assert_eq!(complete_once(&client, "hi", "test").await, LlmOutcome::Unavailable);
    }

    #[tokio::test]
    async fn disabled_client_never_completes() {
        assert_eq!(complete_once(&DisabledLlm, "hi", "test").await, LlmOutcome::Unavailable);
    }

    #[test]
    fn endpoints_follow_provider_conventions() {
        let mut config = LlmConfig {
            provider: LlmProvider::Ollama,
            api_key: None,
            base_url: Some("http://localhost:11434/".to_string()),
            model: "llama3.1".to_string(),
            timeout_secs: 5,
        };
        let ollama = HttpLlmClient::from_config(&config).expect("ollama client");
        assert_eq!(ollama.endpoint(), "http://localhost:11434/v1/chat/completions");

        config.provider = LlmProvider::OpenAi;
        config.base_url = None;
        let openai = HttpLlmClient::from_config(&config).expect("openai client");
        assert_eq!(openai.endpoint(), "https://api.openai.com/v1/chat/completions");

        config.provider = LlmProvider::Anthropic;
        let anthropic = HttpLlmClient::from_config(&config).expect("anthropic client");
        assert_eq!(anthropic.endpoint(), "https://api.anthropic.com/v1/messages");

        config.provider = LlmProvider::Disabled;
        assert!(HttpLlmClient::from_config(&config).is_err());
    }
}
