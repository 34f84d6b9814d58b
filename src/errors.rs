use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentError {
    #[error("template placeholder '{{{placeholder}}}' has no value in the current context")]
    MissingPlaceholder { placeholder: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("duplicate tool name '{name}': agents '{first}' and '{second}' normalize to the same identifier")]
    DuplicateToolName {
        name: String,
        first: String,
        second: String,
    },

    #[error("unknown tool: {0}")]
    UnknownTool(String),
}

#[derive(Debug, Error)]
pub enum AdapterFailure {
    #[error("model call timed out after {}s", .0.as_secs_f32())]
    Timeout(Duration),

    #[error("model call failed: {0}")]
    Provider(String),

    #[error("model returned an empty response")]
    EmptyResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuredOutputError {
    #[error("malformed structured output: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("document is not valid UTF-8 text")]
    InvalidEncoding,

    #[error("document is empty")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_placeholder_message() {
        let err = AgentError::MissingPlaceholder {
            placeholder: "jd_content".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "template placeholder '{jd_content}' has no value in the current context"
        );
    }

    #[test]
    fn test_timeout_message() {
        let err = AdapterFailure::Timeout(Duration::from_millis(1500));
        assert_eq!(err.to_string(), "model call timed out after 1.5s");
    }
}
