use anyhow::{bail, Result};
use std::collections::HashMap;
use std::path::Path;

use super::loader::{load_overrides, PromptOverrides};
use super::prompts::*;
use super::schema::{AgentDefinition, AgentKind, DefinitionSource, OutputContract};
use super::template::PromptTemplate;
use crate::tools::normalize_tool_name;
use crate::types::DocumentSlot;

pub fn resume_reviewer_definition() -> AgentDefinition {
    AgentDefinition {
        kind: AgentKind::ResumeReviewer,
        name: "Resume Reviewer Agent".to_string(),
        description: RESUME_REVIEWER_DESCRIPTION.to_string(),
        template: RESUME_REVIEWER_PROMPT.to_string(),
        output: OutputContract::Prose,
        source: DefinitionSource::BuiltIn,
    }
}

pub fn recruiter_definition() -> AgentDefinition {
    AgentDefinition {
        kind: AgentKind::Recruiter,
        name: "Recruiter Agent".to_string(),
        description: RECRUITER_DESCRIPTION.to_string(),
        template: RECRUITER_PROMPT.to_string(),
        output: OutputContract::Prose,
        source: DefinitionSource::BuiltIn,
    }
}

pub fn skill_gap_definition() -> AgentDefinition {
    AgentDefinition {
        kind: AgentKind::SkillGap,
        name: "Skill Gap Agent".to_string(),
        description: SKILL_GAP_DESCRIPTION.to_string(),
        template: SKILL_GAP_PROMPT.to_string(),
        output: OutputContract::QuestionBank,
        source: DefinitionSource::BuiltIn,
    }
}

pub fn interview_questions_definition() -> AgentDefinition {
    AgentDefinition {
        kind: AgentKind::InterviewQuestions,
        name: "Interview Question Agent".to_string(),
        description: INTERVIEW_QUESTIONS_DESCRIPTION.to_string(),
        template: INTERVIEW_QUESTIONS_PROMPT.to_string(),
        output: OutputContract::QuestionBank,
        source: DefinitionSource::BuiltIn,
    }
}

#[derive(Debug, Clone)]
pub struct PromptCatalog {
    resume_reviewer: AgentDefinition,
    recruiter: AgentDefinition,
    skill_gap: AgentDefinition,
    interview_questions: AgentDefinition,
    pub chatbot_prompt: String,
    pub router_prompt: String,
}

impl Default for PromptCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PromptCatalog {
    pub fn builtin() -> Self {
        Self {
            resume_reviewer: resume_reviewer_definition(),
            recruiter: recruiter_definition(),
            skill_gap: skill_gap_definition(),
            interview_questions: interview_questions_definition(),
            chatbot_prompt: CHATBOT_PROMPT.to_string(),
            router_prompt: ROUTER_PROMPT.to_string(),
        }
    }

    pub fn with_overrides_from(path: impl AsRef<Path>) -> Result<Self> {
        let overrides = load_overrides(path.as_ref())?;
        let mut catalog = Self::builtin();
        catalog.apply(overrides)?;
        log::info!("Loaded prompt overrides from {}", path.as_ref().display());
        Ok(catalog)
    }

    pub fn definition(&self, kind: AgentKind) -> &AgentDefinition {
        match kind {
            AgentKind::ResumeReviewer => &self.resume_reviewer,
            AgentKind::Recruiter => &self.recruiter,
            AgentKind::SkillGap => &self.skill_gap,
            AgentKind::InterviewQuestions => &self.interview_questions,
        }
    }

    fn definition_mut(&mut self, kind: AgentKind) -> &mut AgentDefinition {
        match kind {
            AgentKind::ResumeReviewer => &mut self.resume_reviewer,
            AgentKind::Recruiter => &mut self.recruiter,
            AgentKind::SkillGap => &mut self.skill_gap,
            AgentKind::InterviewQuestions => &mut self.interview_questions,
        }
    }

    pub fn apply(&mut self, overrides: PromptOverrides) -> Result<()> {
        if let Some(prompt) = overrides.chatbot_prompt {
            self.chatbot_prompt = prompt;
        }
        if let Some(prompt) = overrides.router_prompt {
            self.router_prompt = prompt;
        }

        for (key, agent) in overrides.agents {
            let Some(kind) = AgentKind::from_str(&key) else {
                bail!("unknown agent '{}' in prompt overrides", key);
            };
            if let Some(template) = &agent.template {
                validate_template(kind, template)?;
            }

            let definition = self.definition_mut(kind);
            if let Some(name) = agent.name {
                definition.name = name;
            }
            if let Some(description) = agent.description {
                definition.description = description;
            }
            if let Some(template) = agent.template {
                definition.template = template;
            }
            definition.source = DefinitionSource::UserCustom;
        }

        self.check_tool_names()
    }

    // Routed agents share one registry, so their tool names must stay distinct.
    fn check_tool_names(&self) -> Result<()> {
        let mut seen: HashMap<String, &str> = HashMap::new();
        for kind in AgentKind::routed() {
            let name = self.definition(kind).name.as_str();
            let tool = normalize_tool_name(name);
            if tool.is_empty() {
                bail!("agent '{}' has an empty name", kind.as_str());
            }
            if let Some(first) = seen.insert(tool.clone(), name) {
                bail!(
                    "agents '{}' and '{}' both become tool '{}'; rename one of them",
                    first,
                    name,
                    tool
                );
            }
        }
        Ok(())
    }
}

// A template may only read documents its route guarantees.
fn validate_template(kind: AgentKind, template: &str) -> Result<()> {
    let parsed = PromptTemplate::new(template);
    for name in parsed.placeholders() {
        let Some(slot) = DocumentSlot::all()
            .into_iter()
            .find(|slot| slot.placeholder() == name)
        else {
            bail!("template references unknown placeholder '{{{}}}'", name);
        };
        if !kind.provided_documents().contains(&slot) {
            bail!(
                "{} template references '{{{}}}', which is not available when it runs",
                kind.as_str(),
                name
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::loader::parse_overrides;

    #[test]
    fn test_builtin_definitions() {
        let catalog = PromptCatalog::builtin();
        for kind in AgentKind::all() {
            let def = catalog.definition(kind);
            assert_eq!(def.kind, kind);
            assert_eq!(def.source, DefinitionSource::BuiltIn);
            assert!(!def.description.is_empty());
        }

        assert_eq!(
            catalog.definition(AgentKind::ResumeReviewer).required_documents(),
            vec![DocumentSlot::Resume]
        );
        for kind in AgentKind::routed() {
            assert_eq!(
                catalog.definition(kind).required_documents(),
                vec![DocumentSlot::Resume, DocumentSlot::JobDescription]
            );
        }
    }

    #[test]
    fn test_question_bank_agents() {
        let catalog = PromptCatalog::builtin();
        assert_eq!(
            catalog.definition(AgentKind::SkillGap).output,
            OutputContract::QuestionBank
        );
        assert_eq!(
            catalog.definition(AgentKind::InterviewQuestions).output,
            OutputContract::QuestionBank
        );
        assert_eq!(catalog.definition(AgentKind::Recruiter).output, OutputContract::Prose);
    }

    #[test]
    fn test_apply_overrides() {
        let overrides = parse_overrides(
            r#"
router_prompt: "Pick one tool."
agents:
  recruiter:
    description: "Scores the resume against the posting."
    template: "Resume {resume_content} JD {jd_content}"
"#,
        )
        .unwrap();

        let mut catalog = PromptCatalog::builtin();
        catalog.apply(overrides).unwrap();

        assert_eq!(catalog.router_prompt, "Pick one tool.");
        assert_eq!(catalog.chatbot_prompt, CHATBOT_PROMPT);
        let recruiter = catalog.definition(AgentKind::Recruiter);
        assert_eq!(recruiter.name, "Recruiter Agent");
        assert_eq!(recruiter.description, "Scores the resume against the posting.");
        assert_eq!(recruiter.source, DefinitionSource::UserCustom);
    }

    #[test]
    fn test_unknown_agent_override_rejected() {
        let overrides = parse_overrides("agents:\n  astrologer:\n    name: Stars\n").unwrap();
        assert!(PromptCatalog::builtin().apply(overrides).is_err());
    }

    #[test]
    fn test_reviewer_template_cannot_read_job_description() {
        let overrides = parse_overrides(
            "agents:\n  resume_reviewer:\n    template: \"{resume_content} vs {jd_content}\"\n",
        )
        .unwrap();
        let mut catalog = PromptCatalog::builtin();
        let err = catalog.apply(overrides).unwrap_err();
        assert!(err.to_string().contains("jd_content"));
        assert_eq!(
            catalog.definition(AgentKind::ResumeReviewer).source,
            DefinitionSource::BuiltIn
        );
    }

    #[test]
    fn test_colliding_agent_names_rejected() {
        let overrides =
            parse_overrides("agents:\n  skill_gap:\n    name: \"Recruiter-Agent\"\n").unwrap();
        let err = PromptCatalog::builtin().apply(overrides).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Recruiter Agent"));
        assert!(message.contains("Recruiter-Agent"));
        assert!(message.contains("recruiter_agent"));
    }

    #[test]
    fn test_reviewer_name_may_match_routed_agent() {
        let overrides =
            parse_overrides("agents:\n  resume_reviewer:\n    name: \"Recruiter Agent\"\n").unwrap();
        assert!(PromptCatalog::builtin().apply(overrides).is_ok());
    }

    #[test]
    fn test_unknown_placeholder_rejected() {
        let overrides =
            parse_overrides("agents:\n  skill_gap:\n    template: \"{cover_letter}\"\n").unwrap();
        let err = PromptCatalog::builtin().apply(overrides).unwrap_err();
        assert!(err.to_string().contains("cover_letter"));
    }
}
