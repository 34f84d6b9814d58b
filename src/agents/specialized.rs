use async_trait::async_trait;
use std::sync::Arc;

use super::Agent;
use crate::definitions::{AgentDefinition, AgentKind, OutputContract, PromptTemplate};
use crate::errors::AgentError;
use crate::normalizer::QuestionBank;
use crate::providers::adapter::{is_error_text, ModelAdapter};
use crate::types::{AgentOutput, Context, DocumentSlot};

pub const USER_REQUEST_LABEL: &str = "User's Request:";

/// A single-purpose agent: one prompt template, one model call.
pub struct SpecializedAgent {
    definition: AgentDefinition,
    template: PromptTemplate,
    required: Vec<DocumentSlot>,
    adapter: Arc<ModelAdapter>,
}

impl SpecializedAgent {
    pub fn new(definition: AgentDefinition, adapter: Arc<ModelAdapter>) -> Self {
        let template = definition.prompt_template();
        let required = definition.required_documents();
        Self {
            definition,
            template,
            required,
            adapter,
        }
    }

    pub fn definition(&self) -> &AgentDefinition {
        &self.definition
    }

    /// Filled template followed by the user's literal request.
    pub fn build_prompt(&self, context: &Context) -> Result<String, AgentError> {
        let filled = self
            .template
            .render(|name| context.placeholder_value(name))?;
        Ok(format!(
            "{}\n\n{} {}",
            filled, USER_REQUEST_LABEL, context.user_message
        ))
    }
}

#[async_trait]
impl Agent for SpecializedAgent {
    fn kind(&self) -> AgentKind {
        self.definition.kind
    }

    fn name(&self) -> &str {
        &self.definition.name
    }

    fn description(&self) -> &str {
        &self.definition.description
    }

    fn required_documents(&self) -> &[DocumentSlot] {
        &self.required
    }

    async fn execute(&self, context: &Context) -> Result<AgentOutput, AgentError> {
        let prompt = self.build_prompt(context)?;
        log::debug!("{} prompt is {} chars", self.definition.name, prompt.len());

        let text = self.adapter.complete(&prompt).await;

        // Adapter error strings stay visible as text, never as parsed content.
        if is_error_text(&text) {
            return Ok(AgentOutput::Text(text));
        }

        Ok(match self.definition.output {
            OutputContract::Prose => AgentOutput::Text(text),
            OutputContract::QuestionBank => {
                AgentOutput::Structured(QuestionBank::from_model_text(&text))
            }
        })
    }
}
