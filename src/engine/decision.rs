use serde_json::{json, Value};
use std::sync::Arc;

use crate::agents::USER_REQUEST_LABEL;
use crate::normalizer::json_repair::fence_pattern;
use crate::providers::adapter::{ModelAdapter, ERROR_MARKER};
use crate::tools::{ToolCall, ToolRegistry};
use crate::types::AgentOutput;

#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    ToolInvoked { tool: String, output: AgentOutput },
    Answered(String),
    ModelFailed(String),
    ToolFailed { tool: String, message: String },
}

impl Decision {
    pub fn tool(&self) -> Option<&str> {
        match self {
            Decision::ToolInvoked { tool, .. } | Decision::ToolFailed { tool, .. } => Some(tool),
            Decision::Answered(_) | Decision::ModelFailed(_) => None,
        }
    }
}

pub struct DecisionLoop {
    adapter: Arc<ModelAdapter>,
    instructions: String,
}

impl DecisionLoop {
    pub fn new(adapter: Arc<ModelAdapter>, instructions: impl Into<String>) -> Self {
        Self {
            adapter,
            instructions: instructions.into(),
        }
    }

    pub fn build_prompt(&self, registry: &ToolRegistry, user_message: &str) -> String {
        format!(
            "{}\n\n{}\n\n{} {}",
            self.instructions,
            self.adapter.format_tool_instructions(&registry.specs()),
            USER_REQUEST_LABEL,
            user_message
        )
    }

    pub async fn run(&self, registry: &ToolRegistry, user_message: &str) -> Decision {
        let prompt = self.build_prompt(registry, user_message);
        let response = self.adapter.respond(prompt).await;

        if response.failed {
            return Decision::ModelFailed(response.content);
        }

        let mut calls = parse_tool_calls(&response.content)
            .into_iter()
            .filter(|call| {
                let known = registry.contains(&call.name);
                if !known {
                    log::warn!("Model asked for unknown tool '{}', ignoring", call.name);
                }
                known
            });

        let Some(call) = calls.next() else {
            log::debug!("Decision loop answered without a tool call");
            return Decision::Answered(response.content);
        };

        let ignored: Vec<String> = calls.map(|c| c.name).collect();
        if !ignored.is_empty() {
            log::warn!(
                "Model requested {} extra tool calls ({}); only '{}' runs",
                ignored.len(),
                ignored.join(", "),
                call.name
            );
        }

        let tool = registry
            .get(&call.name)
            .map(|t| t.name().to_string())
            .unwrap_or_else(|| call.name.clone());
        log::info!("Decision loop selected tool '{}'", tool);

        match registry.invoke(&tool, call.params).await {
            Ok(output) => Decision::ToolInvoked { tool, output },
            Err(e) => {
                log::error!("Tool '{}' failed: {:#}", tool, e);
                Decision::ToolFailed {
                    message: format!("{} the {} step failed: {}", ERROR_MARKER, tool, e),
                    tool,
                }
            }
        }
    }
}

/// Tool calls in the order they appear: the whole reply as one JSON object,
/// else fenced blocks, else JSON objects on their own line.
/// Accepts `{"tool": ..., "params": ...}` and `{"name": ..., "params": ...}`.
pub fn parse_tool_calls(text: &str) -> Vec<ToolCall> {
    let trimmed = text.trim();
    if let Some(call) = parse_call(trimmed) {
        return vec![call];
    }

    let mut calls: Vec<ToolCall> = fence_pattern()
        .captures_iter(text)
        .filter_map(|cap| cap.get(2))
        .filter_map(|body| parse_call(body.as_str().trim()))
        .collect();

    let unfenced = fence_pattern().replace_all(text, "\n");
    calls.extend(
        unfenced
            .lines()
            .map(str::trim)
            .filter(|line| line.starts_with('{'))
            .filter_map(parse_call),
    );

    calls
}

fn parse_call(candidate: &str) -> Option<ToolCall> {
    if !candidate.starts_with('{') {
        return None;
    }
    let value: Value = serde_json::from_str(candidate).ok()?;
    let object = value.as_object()?;

    let name = object
        .get("tool")
        .or_else(|| object.get("name"))
        .and_then(Value::as_str)?
        .trim();
    if name.is_empty() {
        return None;
    }

    let params = object
        .get("params")
        .or_else(|| object.get("arguments"))
        .cloned()
        .unwrap_or_else(|| json!({}));

    Some(ToolCall {
        name: name.to_string(),
        params,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::PromptCatalog;
    use crate::factory::AgentFactory;
    use crate::providers::adapter::is_error_text;
    use crate::providers::llm::MockLLMProvider;
    use crate::types::Context;
    use std::time::Duration;

    fn setup(provider: Arc<MockLLMProvider>) -> (DecisionLoop, ToolRegistry) {
        let adapter = Arc::new(ModelAdapter::new(provider, Duration::from_secs(5)));
        let catalog = Arc::new(PromptCatalog::builtin());
        let factory = AgentFactory::new(catalog.clone(), adapter.clone());
        let context = Context::message_only("help")
            .with_resume("Python, SQL")
            .with_job_description("Python, Kubernetes");
        let registry = ToolRegistry::build(factory.create_routed(), &context).unwrap();
        (DecisionLoop::new(adapter, catalog.router_prompt.clone()), registry)
    }

    #[test]
    fn test_parse_whole_reply() {
        let calls = parse_tool_calls(r#"  {"tool": "skill_gap_agent", "params": {}}  "#);
        assert_eq!(
            calls,
            vec![ToolCall {
                name: "skill_gap_agent".to_string(),
                params: json!({})
            }]
        );
    }

    #[test]
    fn test_parse_fenced_and_line_calls() {
        let text = "I'll check.\n```json\n{\"name\": \"recruiter_agent\"}\n```\nThen:\n{\"tool\": \"skill_gap_agent\", \"params\": {}}";
        let names: Vec<_> = parse_tool_calls(text).into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["recruiter_agent", "skill_gap_agent"]);
    }

    #[test]
    fn test_parse_prose_has_no_calls() {
        assert!(parse_tool_calls("Hello! How can I help with your job search?").is_empty());
        assert!(parse_tool_calls(r#"{"answer": "no tool field"}"#).is_empty());
        assert!(parse_tool_calls("").is_empty());
    }

    #[tokio::test]
    async fn test_prompt_lists_tools_and_request() {
        let provider = Arc::new(MockLLMProvider::with_response("Hi there".to_string()));
        let (decision_loop, registry) = setup(provider.clone());

        let decision = decision_loop.run(&registry, "hello").await;
        assert_eq!(decision, Decision::Answered("Hi there".to_string()));

        let prompt = &provider.prompts()[0];
        assert!(prompt.contains("recruiter_agent"));
        assert!(prompt.contains("skill_gap_agent"));
        assert!(prompt.contains("interview_question_agent"));
        assert!(prompt.ends_with("User's Request: hello"));
    }

    #[tokio::test]
    async fn test_runs_first_registered_tool_only() {
        let provider = Arc::new(MockLLMProvider::with_responses(vec![
            "{\"tool\": \"astrologer\", \"params\": {}}\n{\"tool\": \"recruiter_agent\", \"params\": {}}\n{\"tool\": \"skill_gap_agent\", \"params\": {}}",
            "Match score: 70%",
        ]));
        let (decision_loop, registry) = setup(provider.clone());

        let decision = decision_loop.run(&registry, "how do I match?").await;
        assert_eq!(
            decision,
            Decision::ToolInvoked {
                tool: "recruiter_agent".to_string(),
                output: AgentOutput::text("Match score: 70%"),
            }
        );
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_model_failure_becomes_visible_text() {
        let provider = Arc::new(MockLLMProvider::failing("503 unavailable"));
        let (decision_loop, registry) = setup(provider);

        match decision_loop.run(&registry, "what am I missing?").await {
            Decision::ModelFailed(text) => {
                assert!(is_error_text(&text));
                assert!(text.contains("503 unavailable"));
            }
            other => panic!("unexpected decision: {:?}", other),
        }
    }
}
