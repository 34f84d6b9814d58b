use anyhow::{Context as _, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Prompt overrides read from YAML. Every field is optional; agents are
/// keyed by their kind name (`recruiter`, `skill_gap`, ...).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptOverrides {
    #[serde(default)]
    pub chatbot_prompt: Option<String>,
    #[serde(default)]
    pub router_prompt: Option<String>,
    #[serde(default)]
    pub agents: BTreeMap<String, AgentOverride>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgentOverride {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub template: Option<String>,
}

pub fn parse_overrides(yaml: &str) -> Result<PromptOverrides> {
    if yaml.trim().is_empty() {
        return Ok(PromptOverrides::default());
    }
    serde_yaml::from_str(yaml).context("invalid prompt override file")
}

pub fn load_overrides(path: &Path) -> Result<PromptOverrides> {
    let yaml = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read prompt overrides from {}", path.display()))?;
    parse_overrides(&yaml)
}
