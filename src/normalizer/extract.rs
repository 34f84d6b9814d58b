use serde_json::Value;

use crate::providers::adapter::ModelResponse;
use crate::types::AgentOutput;

#[derive(Debug, Clone)]
pub enum RawResponse {
    Text(String),
    Model(ModelResponse),
    Agent(AgentOutput),
    Json(Value),
}

/// Produces the displayable string for any response shape. Never fails:
/// unknown shapes degrade to their textual form.
pub fn extract_text(raw: &RawResponse) -> String {
    match raw {
        RawResponse::Text(text) => text.clone(),
        RawResponse::Model(response) => response.content.clone(),
        RawResponse::Agent(AgentOutput::Text(text)) => text.clone(),
        RawResponse::Agent(AgentOutput::Structured(structured)) => {
            serde_json::to_string_pretty(&structured.questions)
                .unwrap_or_else(|_| structured.questions.render_markdown())
        }
        RawResponse::Json(value) => extract_from_value(value),
    }
}

pub fn extract_from_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Object(map) => match map.get("content") {
            Some(Value::String(content)) => content.clone(),
            Some(Value::Array(parts)) if parts.iter().all(Value::is_string) => parts
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join("\n"),
            _ => value.to_string(),
        },
        other => other.to_string(),
    }
}

impl From<AgentOutput> for RawResponse {
    fn from(output: AgentOutput) -> Self {
        RawResponse::Agent(output)
    }
}

impl From<ModelResponse> for RawResponse {
    fn from(response: ModelResponse) -> Self {
        RawResponse::Model(response)
    }
}

impl From<String> for RawResponse {
    fn from(text: String) -> Self {
        RawResponse::Text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::QuestionBank;
    use serde_json::json;

    #[test]
    fn test_content_field_is_used() {
        let raw = RawResponse::Json(json!({"content": "Your resume looks strong", "role": "model"}));
        assert_eq!(extract_text(&raw), "Your resume looks strong");
    }

    #[test]
    fn test_unknown_shape_degrades_to_string() {
        let raw = RawResponse::Json(json!({"answer": 42}));
        assert_eq!(extract_text(&raw), r#"{"answer":42}"#);
        assert_eq!(extract_from_value(&json!(7)), "7");
    }

    #[test]
    fn test_model_response_content() {
        let raw = RawResponse::Model(ModelResponse {
            role: "model".to_string(),
            content: "hello".to_string(),
            failed: false,
        });
        assert_eq!(extract_text(&raw), "hello");
    }

    #[test]
    fn test_structured_output_keeps_skill_keys() {
        let structured = QuestionBank::from_model_text(
            r#"{"Kubernetes": {"Level 3": ["Design a rollout strategy"]}, "SQL": {"Level 1": ["What is a join?"]}}"#,
        );
        let text = extract_text(&RawResponse::Agent(AgentOutput::Structured(structured)));

        let reparsed: serde_json::Map<String, Value> = serde_json::from_str(&text).unwrap();
        let keys: Vec<&String> = reparsed.keys().collect();
        assert_eq!(keys, vec!["Kubernetes", "SQL"]);
    }
}
