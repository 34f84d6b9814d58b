use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::errors::AdapterFailure;
use crate::providers::llm::{LLMProvider, Message};
use crate::tools::ToolSpec;

/// Prefix of every error string the adapter produces in place of model text.
pub const ERROR_MARKER: &str = "An error occurred:";

pub const MODEL_ROLE: &str = "model";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub enum ModelInput {
    Prompt(String),
    Turns(Vec<Message>),
}

impl From<&str> for ModelInput {
    fn from(prompt: &str) -> Self {
        ModelInput::Prompt(prompt.to_string())
    }
}

impl From<String> for ModelInput {
    fn from(prompt: String) -> Self {
        ModelInput::Prompt(prompt)
    }
}

impl From<Vec<Message>> for ModelInput {
    fn from(turns: Vec<Message>) -> Self {
        ModelInput::Turns(turns)
    }
}

impl ModelInput {
    fn into_prompt(self) -> String {
        match self {
            ModelInput::Prompt(prompt) => prompt,
            ModelInput::Turns(turns) => turns
                .into_iter()
                .last()
                .map(|m| m.content)
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelResponse {
    pub role: String,
    pub content: String,
    #[serde(default)]
    pub failed: bool,
}

pub struct ModelAdapter {
    provider: Arc<dyn LLMProvider>,
    timeout: Duration,
}

impl ModelAdapter {
    pub fn new(provider: Arc<dyn LLMProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    pub fn with_default_timeout(provider: Arc<dyn LLMProvider>) -> Self {
        Self::new(provider, DEFAULT_TIMEOUT)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn try_complete(&self, prompt: &str) -> Result<String, AdapterFailure> {
        let call = self.provider.complete(vec![Message::user(prompt)]);

        match tokio::time::timeout(self.timeout, call).await {
            Err(_) => Err(AdapterFailure::Timeout(self.timeout)),
            Ok(Err(e)) => Err(AdapterFailure::Provider(format!("{:#}", e))),
            Ok(Ok(text)) if text.trim().is_empty() => Err(AdapterFailure::EmptyResponse),
            Ok(Ok(text)) => Ok(text),
        }
    }

    /// Text completion that never fails. Provider errors, timeouts and empty
    /// replies come back as a string starting with [`ERROR_MARKER`].
    pub async fn complete(&self, prompt: &str) -> String {
        match self.try_complete(prompt).await {
            Ok(text) => text,
            Err(failure) => {
                log::warn!("Model call failed: {}", failure);
                error_text(&failure)
            }
        }
    }

    pub fn role_label(&self) -> &'static str {
        MODEL_ROLE
    }

    pub fn format_tool_instructions(&self, tools: &[ToolSpec]) -> String {
        if tools.is_empty() {
            return "No tools are available. Answer the user directly in plain text.".to_string();
        }

        let listing = tools
            .iter()
            .enumerate()
            .map(|(i, tool)| {
                format!(
                    "{}. {}: {}\n   Parameters: {}",
                    i + 1,
                    tool.name,
                    tool.description,
                    tool.parameters
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"You have access to the following tools. Each tool takes no arguments; the documents it needs are already attached to it.

Tools:
{listing}

To use a tool, reply with exactly one line of JSON and nothing else:
{{"tool": "<tool name>", "params": {{}}}}

Call at most one tool. If none of the tools fits the request, answer the user directly in plain text."#
        )
    }

    pub async fn respond(&self, input: impl Into<ModelInput>) -> ModelResponse {
        let prompt = input.into().into_prompt();

        let (content, failed) = match self.try_complete(&prompt).await {
            Ok(text) => (text, false),
            Err(failure) => {
                log::warn!("Model call failed inside decision loop: {}", failure);
                (error_text(&failure), true)
            }
        };

        ModelResponse {
            role: self.role_label().to_string(),
            content,
            failed,
        }
    }
}

pub fn error_text(failure: &AdapterFailure) -> String {
    format!("{} {}", ERROR_MARKER, failure)
}

pub fn is_error_text(text: &str) -> bool {
    text.trim_start().starts_with(ERROR_MARKER)
}
