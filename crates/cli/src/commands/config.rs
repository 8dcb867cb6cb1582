use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use siteline_core::config::{AppConfig, LoadOptions};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let entries = [
        ("llm.provider", config.llm.provider.as_str().to_string()),
        ("llm.api_key", redact_secret(config.llm.api_key.as_ref())),
        ("llm.base_url", config.llm.base_url.clone().unwrap_or_else(|| "<provider default>".to_string())),
        ("llm.model", config.llm.model.clone()),
        ("llm.timeout_secs", config.llm.timeout_secs.to_string()),
        ("analytics.base_url", config.analytics.base_url.clone()),
        ("analytics.access_token", redact_secret(config.analytics.access_token.as_ref())),
        ("analytics.timeout_secs", config.analytics.timeout_secs.to_string()),
        ("seo.spreadsheet_id", config.seo.spreadsheet_id.clone().unwrap_or_else(|| "<unset>".to_string())),
        ("seo.base_url", config.seo.base_url.clone()),
        ("seo.access_token", redact_secret(config.seo.access_token.as_ref())),
        ("seo.api_key", redact_secret(config.seo.api_key.as_ref())),
        ("seo.timeout_secs", config.seo.timeout_secs.to_string()),
        ("server.bind_address", config.server.bind_address.clone()),
        ("server.port", config.server.port.to_string()),
        ("server.graceful_shutdown_secs", config.server.graceful_shutdown_secs.to_string()),
        ("logging.level", config.logging.level.clone()),
        ("logging.format", format!("{:?}", config.logging.format)),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for (key_path, value) in &entries {
        let env_key = env_key_for(key_path);
        lines.push(render_line(
            key_path,
            value,
            field_source(key_path, &env_key, config_file_doc.as_ref(), config_file_path.as_deref()),
        ));
    }
    lines.join("\n")
}

fn env_key_for(key_path: &str) -> String {
    format!("SITELINE_{}", key_path.replace('.', "_").to_ascii_uppercase())
}

fn detect_config_path() -> Option<PathBuf> {
    let root = PathBuf::from("siteline.toml");
    if root.exists() {
        return Some(root);
    }
    let nested = PathBuf::from("config/siteline.toml");
    if nested.exists() {
        return Some(nested);
    }
    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: &str,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if env::var_os(env_key).is_some() {
        return format!("env ({env_key})");
    }
    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }
    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

fn redact_secret(secret: Option<&SecretString>) -> String {
    let Some(secret) = secret else {
        return "<unset>".to_string();
    };
    let trimmed = secret.expose_secret().trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }
    if let Some((prefix, _)) = trimmed.split_once('-') {
        return format!("{prefix}-***");
    }
    "<redacted>".to_string()
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::{env_key_for, redact_secret};

    #[test]
    fn env_keys_follow_section_and_field() {
        assert_eq!(env_key_for("seo.spreadsheet_id"), "SITELINE_SEO_SPREADSHEET_ID");
        assert_eq!(env_key_for("server.graceful_shutdown_secs"), "SITELINE_SERVER_GRACEFUL_SHUTDOWN_SECS");
    }

    #[test]
    fn secrets_never_render_in_full() {
        let key = SecretString::from("sk-live-abcdef".to_string());
        assert_eq!(redact_secret(Some(&key)), "sk-***");
        let token = SecretString::from("ya29.opaque".to_string());
        assert_eq!(redact_secret(Some(&token)), "<redacted>");
        assert_eq!(redact_secret(None), "<unset>");
    }
}
