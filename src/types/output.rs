use serde::{Deserialize, Serialize};

use crate::normalizer::QuestionBank;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AgentOutput {
    Text(String),
    Structured(StructuredOutput),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredOutput {
    pub questions: QuestionBank,
    /// Set when the model text could not be parsed and `questions` holds
    /// the fallback bucket with the raw text.
    #[serde(default)]
    pub parse_error: bool,
}

impl AgentOutput {
    pub fn text(content: impl Into<String>) -> Self {
        AgentOutput::Text(content.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AgentOutput::Text(text) => Some(text),
            AgentOutput::Structured(_) => None,
        }
    }

    pub fn as_structured(&self) -> Option<&StructuredOutput> {
        match self {
            AgentOutput::Structured(structured) => Some(structured),
            AgentOutput::Text(_) => None,
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, AgentOutput::Structured(_))
    }

    pub fn structured_json(&self) -> Option<serde_json::Value> {
        self.as_structured()
            .and_then(|s| serde_json::to_value(&s.questions).ok())
    }
}

impl From<String> for AgentOutput {
    fn from(text: String) -> Self {
        AgentOutput::Text(text)
    }
}

impl From<StructuredOutput> for AgentOutput {
    fn from(structured: StructuredOutput) -> Self {
        AgentOutput::Structured(structured)
    }
}
