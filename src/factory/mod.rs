use std::sync::Arc;

use crate::agents::{Agent, SpecializedAgent};
use crate::definitions::{AgentKind, PromptCatalog};
use crate::providers::adapter::ModelAdapter;

#[derive(Clone)]
pub struct AgentFactory {
    catalog: Arc<PromptCatalog>,
    adapter: Arc<ModelAdapter>,
}

impl AgentFactory {
    pub fn new(catalog: Arc<PromptCatalog>, adapter: Arc<ModelAdapter>) -> Self {
        Self { catalog, adapter }
    }

    pub fn catalog(&self) -> &PromptCatalog {
        &self.catalog
    }

    pub fn adapter(&self) -> &Arc<ModelAdapter> {
        &self.adapter
    }

    pub fn create(&self, kind: AgentKind) -> Arc<dyn Agent> {
        let definition = self.catalog.definition(kind).clone();
        log::debug!("Creating agent '{}' ({})", definition.name, kind.as_str());
        Arc::new(SpecializedAgent::new(definition, self.adapter.clone()))
    }

    pub fn create_routed(&self) -> Vec<Arc<dyn Agent>> {
        AgentKind::routed()
            .into_iter()
            .map(|kind| self.create(kind))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::llm::MockLLMProvider;

    fn factory() -> AgentFactory {
        let adapter = Arc::new(ModelAdapter::with_default_timeout(Arc::new(
            MockLLMProvider::new(),
        )));
        AgentFactory::new(Arc::new(PromptCatalog::builtin()), adapter)
    }

    #[test]
    fn test_create_uses_catalog_definition() {
        let agent = factory().create(AgentKind::ResumeReviewer);
        assert_eq!(agent.kind(), AgentKind::ResumeReviewer);
        assert_eq!(agent.name(), "Resume Reviewer Agent");
    }

    #[test]
    fn test_create_routed_order() {
        let kinds: Vec<_> = factory()
            .create_routed()
            .iter()
            .map(|agent| agent.kind())
            .collect();
        assert_eq!(
            kinds,
            vec![
                AgentKind::Recruiter,
                AgentKind::SkillGap,
                AgentKind::InterviewQuestions
            ]
        );
    }

    #[test]
    fn test_create_builds_fresh_instances() {
        let factory = factory();
        let first = factory.create(AgentKind::Recruiter);
        let second = factory.create(AgentKind::Recruiter);
        assert!(!Arc::ptr_eq(&first, &second));
    }
}
