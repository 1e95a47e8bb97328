//! Model client boundary.
//!
//! The core issues one blocking `generate` call per pipeline run; there
//! is no retry here, and timeout policy belongs to the HTTP client
//! configuration.

use async_trait::async_trait;
use casedraft_core::ModelConfig;
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{AiError, Result};

/// Black-box generative model: prompt in, text out.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Client for an OpenAI-compatible chat-completions endpoint.
#[derive(Clone)]
pub struct HttpModelClient {
    http: Client,
    base_url: String,
    model: String,
    api_key: String,
    max_tokens: u32,
    temperature: f32,
}

impl std::fmt::Debug for HttpModelClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpModelClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl HttpModelClient {
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let http = Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()
            .map_err(AiError::Http)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

}

#[async_trait]
impl ModelClient for HttpModelClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        debug!(
            model = %self.model,
            prompt_chars = prompt.len(),
            "Sending generation request"
        );

        let response = self
            .http
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::TOO_MANY_REQUESTS => AiError::Api {
                    status: status.as_u16(),
                    message: "rate limited".to_string(),
                },
                _ => AiError::Api {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        let body: ChatResponse = response.json().await?;
        let choice = body.choices.into_iter().next().ok_or(AiError::EmptyCompletion)?;
        debug!(chars = choice.message.content.len(), "Received model completion");
        Ok(choice.message.content)
    }
}

/// Model client that replays canned outputs, for tests and offline runs.
#[derive(Debug, Default)]
pub struct ScriptedModelClient {
    outputs: std::sync::Mutex<Vec<String>>,
    /// When set, `generate` fails with this message instead.
    failure: Option<String>,
}

impl ScriptedModelClient {
    pub fn replying(output: impl Into<String>) -> Self {
        Self {
            outputs: std::sync::Mutex::new(vec![output.into()]),
            failure: None,
        }
    }

    pub fn replying_in_order(outputs: Vec<String>) -> Self {
        let mut reversed = outputs;
        reversed.reverse();
        Self {
            outputs: std::sync::Mutex::new(reversed),
            failure: None,
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outputs: std::sync::Mutex::new(Vec::new()),
            failure: Some(message.into()),
        }
    }
}

#[async_trait]
impl ModelClient for ScriptedModelClient {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        if let Some(message) = &self.failure {
            return Err(AiError::Api {
                status: 500,
                message: message.clone(),
            });
        }
        let mut outputs = self.outputs.lock().expect("scripted outputs lock");
        match outputs.pop() {
            Some(output) => Ok(output),
            None => Err(AiError::EmptyCompletion),
        }
    }
}
