use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::providers::llm::{LLMProvider, Message};

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.1";

pub struct OllamaProvider {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: Option<ChatReply>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: String,
}

impl OllamaProvider {
    pub fn new(base_url: Option<String>, model: Option<String>) -> Self {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string()),
            client: reqwest::Client::new(),
        }
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }

    fn build_request<'a>(&'a self, messages: &'a [Message]) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages,
            stream: false,
        }
    }

    fn parse_response(response: ChatResponse) -> Result<String> {
        if let Some(error) = response.error {
            return Err(anyhow!("Ollama error: {}", error));
        }
        response
            .message
            .map(|reply| reply.content)
            .ok_or_else(|| anyhow!("Ollama response has no message"))
    }
}

#[async_trait]
impl LLMProvider for OllamaProvider {
    async fn complete(&self, messages: Vec<Message>) -> Result<String> {
        let response = self
            .client
            .post(self.chat_url())
            .json(&self.build_request(&messages))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await?;
            anyhow::bail!("Ollama error {}: {}", status, body);
        }

        Self::parse_response(response.json().await?)
    }
}
