//! External text-completion oracle. The responder only sees the `Oracle` trait; the production
//! implementation talks to an OpenAI-compatible chat completions endpoint (OpenRouter by default).

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::OracleError;

pub const OPENROUTER_API_BASE: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "meta-llama/llama-3.3-70b-instruct";

/// Single-method completion capability.
#[async_trait]
pub trait Oracle: Send + Sync {
    async fn complete(&self, text: &str) -> Result<String, OracleError>;
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
    message: Option<ChatMessageResponse>,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

/// OpenRouter completion client. The utterance is sent as the only user message.
pub struct OpenRouterOracle {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenRouterOracle {
    /// Returns `None` when the key is empty, which selects fallback-only mode.
    pub fn new(api_key: &str, timeout: Duration) -> Option<Self> {
        let key = api_key.trim();
        if key.is_empty() {
            return None;
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Some(Self {
            api_key: key.to_string(),
            model: DEFAULT_MODEL.to_string(),
            base_url: OPENROUTER_API_BASE.to_string(),
            client,
        })
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Point at another OpenAI-compatible API base (no trailing `/chat/completions`).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Oracle for OpenRouterOracle {
    async fn complete(&self, text: &str) -> Result<String, OracleError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: text,
            }],
        };

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("X-Title", "Healthdesk Chatbot")
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        let raw = res.text().await?;
        if !status.is_success() {
            return Err(OracleError::Status {
                status: status.as_u16(),
                body: raw,
            });
        }

        extract_reply(&raw)
    }
}

/// Pull the first choice's content out of a chat completions body.
fn extract_reply(raw: &str) -> Result<String, OracleError> {
    let parsed: ChatResponse =
        serde_json::from_str(raw).map_err(|e| OracleError::Malformed(e.to_string()))?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| OracleError::Malformed("no reply content".to_string()))
}
