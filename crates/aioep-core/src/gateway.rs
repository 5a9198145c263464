//! LLM completion gateway — one synchronous network call per invocation,
//! no retry, no streaming. Two provider wire shapes reduce to the same
//! `complete(system, user) -> text` contract.
//!
//! The call sends the caller's input text to a third-party service; nothing
//! here redacts or rewrites it.

use crate::error::{Result, StrategyError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";

const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";
const ANTHROPIC_VERSION: &str = "2023-06-01";

const DEFAULT_TEMPERATURE: f32 = 0.3;
const DEFAULT_MAX_TOKENS: u32 = 4096;
const DEFAULT_TIMEOUT_SECONDS: u64 = 120;

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    OpenAi,
    Anthropic,
}

impl Provider {
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Provider {
    type Err = StrategyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "openai" => Ok(Provider::OpenAi),
            "anthropic" => Ok(Provider::Anthropic),
            other => Err(StrategyError::InvalidProvider(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// GatewayConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub provider: Provider,
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_seconds: u64,
}

impl GatewayConfig {
    pub fn openai() -> Self {
        Self {
            provider: Provider::OpenAi,
            api_key: None,
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }

    pub fn anthropic() -> Self {
        Self {
            provider: Provider::Anthropic,
            api_key: None,
            base_url: DEFAULT_ANTHROPIC_BASE_URL.to_string(),
            model: DEFAULT_ANTHROPIC_MODEL.to_string(),
            ..Self::openai()
        }
    }

    /// Resolve configuration from the environment. `AIOEP_PROVIDER` selects
    /// the backend (default `openai`); per-provider key, base URL, and model
    /// come from the provider's conventional variables.
    pub fn from_env() -> Self {
        let provider = std::env::var("AIOEP_PROVIDER")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(Provider::OpenAi);

        let mut config = match provider {
            Provider::OpenAi => {
                let mut c = Self::openai();
                if let Ok(url) = std::env::var("OPENAI_BASE_URL") {
                    c.base_url = url;
                }
                if let Ok(model) = std::env::var("OPENAI_MODEL") {
                    c.model = model;
                }
                c.api_key = std::env::var("OPENAI_API_KEY").ok();
                c
            }
            Provider::Anthropic => {
                let mut c = Self::anthropic();
                if let Ok(url) = std::env::var("ANTHROPIC_BASE_URL") {
                    c.base_url = url;
                }
                if let Ok(model) = std::env::var("ANTHROPIC_MODEL") {
                    c.model = model;
                }
                c.api_key = std::env::var("ANTHROPIC_API_KEY").ok();
                c
            }
        };
        // Treat an empty key the same as an unset one.
        if config.api_key.as_deref() == Some("") {
            config.api_key = None;
        }
        config
    }
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

/// Raw result of one completion call. `model` and `usage` are echoed from
/// the upstream response for boundary metadata; absent on providers that
/// omit them.
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub model: Option<String>,
    pub usage: Option<Value>,
}

// ---------------------------------------------------------------------------
// LlmGateway
// ---------------------------------------------------------------------------

pub struct LlmGateway {
    config: GatewayConfig,
    client: reqwest::blocking::Client,
}

impl LlmGateway {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self { config, client })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(GatewayConfig::from_env())
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Whether a credential is configured. Callers degrade to a mock
    /// response when this is false instead of failing the request.
    pub fn has_credential(&self) -> bool {
        self.config.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    /// Execute one completion call. Exactly one request; any failure is
    /// surfaced to the caller for human-initiated retry.
    pub fn complete(&self, system_prompt: &str, user_message: &str) -> Result<Completion> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(StrategyError::CredentialMissing)?;

        let response = match self.config.provider {
            Provider::OpenAi => self
                .client
                .post(format!("{}/chat/completions", self.config.base_url))
                .bearer_auth(api_key)
                .json(&json!({
                    "model": self.config.model,
                    "messages": [
                        { "role": "system", "content": system_prompt },
                        { "role": "user", "content": user_message },
                    ],
                    "temperature": self.config.temperature,
                }))
                .send()?,
            Provider::Anthropic => self
                .client
                .post(format!("{}/messages", self.config.base_url))
                .header("x-api-key", api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&json!({
                    "model": self.config.model,
                    "max_tokens": self.config.max_tokens,
                    "temperature": self.config.temperature,
                    "system": system_prompt,
                    "messages": [
                        { "role": "user", "content": user_message },
                    ],
                }))
                .send()?,
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(StrategyError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let data: Value = response.json()?;
        let text = match self.config.provider {
            Provider::OpenAi => data["choices"][0]["message"]["content"].as_str(),
            Provider::Anthropic => data["content"][0]["text"].as_str(),
        };
        let text = text.ok_or(StrategyError::EmptyCompletion)?.to_string();
        if text.is_empty() {
            return Err(StrategyError::EmptyCompletion);
        }

        Ok(Completion {
            text,
            model: data["model"].as_str().map(str::to_string),
            usage: data.get("usage").cloned(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn openai_config(base_url: String) -> GatewayConfig {
        GatewayConfig {
            api_key: Some("test-key".to_string()),
            base_url,
            ..GatewayConfig::openai()
        }
    }

    #[test]
    fn missing_credential_is_an_error() {
        let gateway = LlmGateway::new(GatewayConfig::openai()).unwrap();
        assert!(!gateway.has_credential());
        assert!(matches!(
            gateway.complete("system", "user"),
            Err(StrategyError::CredentialMissing)
        ));
    }

    #[test]
    fn empty_key_counts_as_missing() {
        let config = GatewayConfig {
            api_key: Some(String::new()),
            ..GatewayConfig::openai()
        };
        let gateway = LlmGateway::new(config).unwrap();
        assert!(!gateway.has_credential());
    }

    #[test]
    fn openai_completion_roundtrip() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_body(
                r#"{
                    "model": "gpt-4o",
                    "choices": [{"message": {"role": "assistant", "content": "{\"elements\": []}"}}],
                    "usage": {"total_tokens": 12}
                }"#,
            )
            .create();

        let gateway = LlmGateway::new(openai_config(server.url())).unwrap();
        let completion = gateway.complete("system", "user").unwrap();
        mock.assert();
        assert_eq!(completion.text, "{\"elements\": []}");
        assert_eq!(completion.model.as_deref(), Some("gpt-4o"));
        assert_eq!(completion.usage.unwrap()["total_tokens"], 12);
    }

    #[test]
    fn anthropic_completion_roundtrip() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/messages")
            .match_header("x-api-key", "test-key")
            .match_header("anthropic-version", ANTHROPIC_VERSION)
            .with_status(200)
            .with_body(
                r#"{
                    "model": "claude-sonnet-4-20250514",
                    "content": [{"type": "text", "text": "hello"}]
                }"#,
            )
            .create();

        let config = GatewayConfig {
            api_key: Some("test-key".to_string()),
            base_url: server.url(),
            ..GatewayConfig::anthropic()
        };
        let gateway = LlmGateway::new(config).unwrap();
        let completion = gateway.complete("system", "user").unwrap();
        mock.assert();
        assert_eq!(completion.text, "hello");
    }

    #[test]
    fn upstream_error_carries_status_and_body() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/chat/completions")
            .with_status(502)
            .with_body("rate limited")
            .create();

        let gateway = LlmGateway::new(openai_config(server.url())).unwrap();
        let err = gateway.complete("system", "user").unwrap_err();
        match err {
            StrategyError::Upstream { status, body } => {
                assert_eq!(status, 502);
                assert_eq!(body, "rate limited");
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
    }

    #[test]
    fn missing_content_is_empty_completion() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices": []}"#)
            .create();

        let gateway = LlmGateway::new(openai_config(server.url())).unwrap();
        assert!(matches!(
            gateway.complete("system", "user"),
            Err(StrategyError::EmptyCompletion)
        ));
    }

    #[test]
    fn provider_roundtrip() {
        assert_eq!("openai".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert_eq!("anthropic".parse::<Provider>().unwrap(), Provider::Anthropic);
        assert!("azure".parse::<Provider>().is_err());
    }
}
