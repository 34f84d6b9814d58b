use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

use super::{normalize_tool_name, Tool};
use crate::agents::Agent;
use crate::errors::AgentError;
use crate::types::{AgentOutput, Context};

/// An agent bound to the context snapshot taken when the registry was built.
/// Calling it takes no arguments.
pub struct AgentTool {
    name: String,
    agent: Arc<dyn Agent>,
    context: Arc<Context>,
}

impl AgentTool {
    pub fn new(agent: Arc<dyn Agent>, context: Arc<Context>) -> Self {
        Self {
            name: normalize_tool_name(agent.name()),
            agent,
            context,
        }
    }

    pub fn agent(&self) -> &Arc<dyn Agent> {
        &self.agent
    }

    pub fn context(&self) -> &Context {
        &self.context
    }
}

#[async_trait]
impl Tool for AgentTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        self.agent.description()
    }

    fn display_name(&self) -> &str {
        self.agent.name()
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }

    async fn call(&self, params: Value) -> Result<AgentOutput, AgentError> {
        if params.as_object().map_or(false, |p| !p.is_empty()) {
            log::debug!("Ignoring parameters passed to tool '{}': {}", self.name, params);
        }
        self.agent.execute(&self.context).await
    }
}
