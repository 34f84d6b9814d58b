use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

#[async_trait]
pub trait LLMProvider: Send + Sync {
    async fn complete(&self, messages: Vec<Message>) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct GeminiProvider {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

impl GeminiProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    fn build_request(messages: Vec<Message>) -> GeminiRequest {
        let system_instruction = messages
            .iter()
            .find(|m| m.role == "system")
            .map(|m| GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: m.content.clone(),
                }],
            });

        let contents = messages
            .into_iter()
            .filter(|m| m.role != "system")
            .map(|m| GeminiContent {
                // Gemini names model-originated turns "model".
                role: Some(if m.role == "assistant" {
                    "model".to_string()
                } else {
                    m.role
                }),
                parts: vec![GeminiPart { text: m.content }],
            })
            .collect();

        GeminiRequest {
            contents,
            system_instruction,
        }
    }
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    async fn complete(&self, messages: Vec<Message>) -> Result<String> {
        let request = Self::build_request(messages);

        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url, self.model
            ))
            .query(&[("key", &self.api_key)])
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await?;
            anyhow::bail!("Gemini API error {}: {}", status, body);
        }

        let result: GeminiResponse = response.json().await?;
        let text = result
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .next()
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .ok_or_else(|| anyhow::anyhow!("No candidates in response"))?;

        Ok(text)
    }
}

#[derive(Debug, Clone)]
pub struct AnthropicProvider {
    api_key: String,
    model: String,
    max_tokens: u32,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<AnthropicBlock>,
}

#[derive(Debug, Deserialize)]
struct AnthropicBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

impl AnthropicProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: "claude-3-5-sonnet-20240620".to_string(),
            max_tokens: 4096,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    // System turns are merged into the top-level `system` field.
    fn build_request(&self, messages: Vec<Message>) -> AnthropicRequest {
        let (system, turns): (Vec<Message>, Vec<Message>) =
            messages.into_iter().partition(|m| m.role == "system");
        let system = (!system.is_empty()).then(|| {
            system
                .into_iter()
                .map(|m| m.content)
                .collect::<Vec<_>>()
                .join("\n\n")
        });

        AnthropicRequest {
            model: self.model.clone(),
            messages: turns,
            max_tokens: self.max_tokens,
            system,
        }
    }

    fn parse_response(response: AnthropicResponse) -> Result<String> {
        let text: Vec<String> = response
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .map(|block| block.text)
            .collect();
        if text.is_empty() {
            anyhow::bail!("No text content in Anthropic response");
        }
        Ok(text.join(""))
    }
}

#[async_trait]
impl LLMProvider for AnthropicProvider {
    async fn complete(&self, messages: Vec<Message>) -> Result<String> {
        let request = self.build_request(messages);

        let response = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await?;
            anyhow::bail!("Anthropic API error {}: {}", status, body);
        }

        Self::parse_response(response.json().await?)
    }
}

#[derive(Debug, Clone)]
pub struct OpenAIProvider {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIReply,
}

#[derive(Debug, Deserialize)]
struct OpenAIReply {
    content: Option<String>,
}

impl OpenAIProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    // Any OpenAI-compatible chat completions server.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn build_request(&self, messages: Vec<Message>) -> OpenAIRequest {
        OpenAIRequest {
            model: self.model.clone(),
            messages,
            max_tokens: Some(4096),
        }
    }

    fn parse_response(response: OpenAIResponse) -> Result<String> {
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| anyhow::anyhow!("No message content in OpenAI response"))
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    async fn complete(&self, messages: Vec<Message>) -> Result<String> {
        let request = self.build_request(messages);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await?;
            anyhow::bail!("OpenAI API error {}: {}", status, body);
        }

        Self::parse_response(response.json().await?)
    }
}

/// Scripted provider for tests and offline runs. Queued responses are served
/// first, then the default one. Every call is recorded.
pub struct MockLLMProvider {
    responses: Mutex<VecDeque<String>>,
    default_response: String,
    failure: Option<String>,
    delay: Option<Duration>,
    calls: Mutex<Vec<Vec<Message>>>,
}

impl MockLLMProvider {
    pub fn new() -> Self {
        Self::with_response("Mock response".to_string())
    }

    pub fn with_response(response: String) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            default_response: response,
            failure: None,
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mock = Self::new();
        *mock.responses.lock().unwrap_or_else(|e| e.into_inner()) =
            responses.into_iter().map(Into::into).collect();
        mock
    }

    pub fn failing(message: impl Into<String>) -> Self {
        let mut mock = Self::new();
        mock.failure = Some(message.into());
        mock
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<Vec<Message>> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|messages| messages.last().map(|m| m.content.clone()))
            .collect()
    }
}

impl Default for MockLLMProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LLMProvider for MockLLMProvider {
    async fn complete(&self, messages: Vec<Message>) -> Result<String> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(messages);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(failure) = &self.failure {
            anyhow::bail!("{}", failure);
        }

        let queued = self
            .responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        Ok(queued.unwrap_or_else(|| self.default_response.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let sys = Message::system("test");
        assert_eq!(sys.role, "system");
        assert_eq!(sys.content, "test");

        let user = Message::user("hello");
        assert_eq!(user.role, "user");
        assert_eq!(user.content, "hello");

        let assistant = Message::assistant("hi");
        assert_eq!(assistant.role, "assistant");
        assert_eq!(assistant.content, "hi");
    }

    #[test]
    fn test_gemini_provider_creation() {
        let provider = GeminiProvider::new("test-key".to_string());
        assert_eq!(provider.model, "gemini-2.5-flash");
    }

    #[test]
    fn test_gemini_request_maps_roles() {
        let request = GeminiProvider::build_request(vec![
            Message::system("be brief"),
            Message::user("hi"),
            Message::assistant("hello"),
        ]);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "be brief");
        assert_eq!(json["contents"].as_array().unwrap().len(), 2);
        assert_eq!(json["contents"][1]["role"], "model");
    }

    #[test]
    fn test_anthropic_request_lifts_system_turns() {
        let provider = AnthropicProvider::new("test-key".to_string());
        let request = provider.build_request(vec![
            Message::system("be brief"),
            Message::system("answer in English"),
            Message::user("review my resume"),
        ]);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "claude-3-5-sonnet-20240620");
        assert_eq!(json["system"], "be brief\n\nanswer in English");
        assert_eq!(json["max_tokens"], 4096);
        assert_eq!(
            json["messages"],
            serde_json::json!([{"role": "user", "content": "review my resume"}])
        );

        let without_system = provider.build_request(vec![Message::user("hi")]);
        assert!(serde_json::to_value(&without_system).unwrap().get("system").is_none());
    }

    #[test]
    fn test_anthropic_response_joins_text_blocks() {
        let response: AnthropicResponse = serde_json::from_value(serde_json::json!({
            "content": [
                {"type": "text", "text": "Strong "},
                {"type": "tool_use", "id": "x", "name": "n", "input": {}},
                {"type": "text", "text": "match."}
            ]
        }))
        .unwrap();
        assert_eq!(AnthropicProvider::parse_response(response).unwrap(), "Strong match.");

        let empty: AnthropicResponse = serde_json::from_value(serde_json::json!({"content": []})).unwrap();
        assert!(AnthropicProvider::parse_response(empty).is_err());
    }

    #[test]
    fn test_openai_request_keeps_turns_in_order() {
        let provider = OpenAIProvider::new("test-key".to_string()).with_model("gpt-4o".to_string());
        let request = provider.build_request(vec![Message::system("be brief"), Message::user("hi")]);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
    }

    #[test]
    fn test_openai_response_parsing() {
        let response: OpenAIResponse = serde_json::from_value(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "Add Airflow."}}]
        }))
        .unwrap();
        assert_eq!(OpenAIProvider::parse_response(response).unwrap(), "Add Airflow.");

        let refused: OpenAIResponse = serde_json::from_value(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": null}}]
        }))
        .unwrap();
        assert!(OpenAIProvider::parse_response(refused).is_err());
    }

    #[test]
    fn test_openai_base_url_is_normalized() {
        let provider = OpenAIProvider::new("k".to_string())
            .with_base_url("http://localhost:8000/v1/".to_string());
        assert_eq!(provider.base_url, "http://localhost:8000/v1");
    }

    #[tokio::test]
    async fn test_mock_provider_serves_queue_then_default() {
        let provider = MockLLMProvider::with_responses(["first", "second"]);
        let a = provider.complete(vec![Message::user("1")]).await.unwrap();
        let b = provider.complete(vec![Message::user("2")]).await.unwrap();
        let c = provider.complete(vec![Message::user("3")]).await.unwrap();

        assert_eq!((a.as_str(), b.as_str(), c.as_str()), ("first", "second", "Mock response"));
        assert_eq!(provider.prompts(), vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn test_failing_mock_provider() {
        let provider = MockLLMProvider::failing("quota exceeded");
        let err = provider.complete(vec![Message::user("x")]).await.unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
        assert_eq!(provider.call_count(), 1);
    }
}
