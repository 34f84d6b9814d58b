use anyhow::Result;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

use super::{normalize_tool_name, AgentTool, Tool, ToolSpec};
use crate::agents::Agent;
use crate::errors::RegistryError;
use crate::types::{AgentOutput, Context};

/// Tools offered to the decision loop for one turn, in registration order.
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Wraps each agent as a tool bound to one shared snapshot of `context`.
    pub fn build(agents: Vec<Arc<dyn Agent>>, context: &Context) -> Result<Self, RegistryError> {
        let snapshot = Arc::new(context.clone());
        let tools = agents
            .into_iter()
            .map(|agent| Arc::new(AgentTool::new(agent, snapshot.clone())) as Arc<dyn Tool>)
            .collect();
        Self::from_tools(tools)
    }

    pub fn from_tools(tools: Vec<Arc<dyn Tool>>) -> Result<Self, RegistryError> {
        let mut index: HashMap<String, usize> = HashMap::new();

        for (position, tool) in tools.iter().enumerate() {
            let name = normalize_tool_name(tool.name());
            if let Some(&existing) = index.get(&name) {
                return Err(RegistryError::DuplicateToolName {
                    name,
                    first: tools[existing].display_name().to_string(),
                    second: tool.display_name().to_string(),
                });
            }
            index.insert(name, position);
        }

        log::debug!("Built tool registry with {} tools", tools.len());
        Ok(Self { tools, index })
    }

    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools.iter().map(|tool| tool.spec()).collect()
    }

    pub fn get_schemas(&self) -> Vec<Value> {
        self.tools
            .iter()
            .map(|tool| {
                json!({
                    "name": tool.name(),
                    "description": tool.description(),
                    "parameters": tool.parameters_schema(),
                })
            })
            .collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|tool| tool.name()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.index
            .get(&normalize_tool_name(name))
            .map(|&position| &self.tools[position])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub async fn invoke(&self, name: &str, params: Value) -> Result<AgentOutput> {
        let tool = self
            .get(name)
            .ok_or_else(|| RegistryError::UnknownTool(name.to_string()))?;

        Ok(tool.call(params).await?)
    }
}
