use serde::{Deserialize, Serialize};

use super::template::PromptTemplate;
use crate::types::DocumentSlot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    ResumeReviewer,
    Recruiter,
    SkillGap,
    InterviewQuestions,
}

impl AgentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::ResumeReviewer => "resume_reviewer",
            AgentKind::Recruiter => "recruiter",
            AgentKind::SkillGap => "skill_gap",
            AgentKind::InterviewQuestions => "interview_questions",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "resume_reviewer" => Some(AgentKind::ResumeReviewer),
            "recruiter" => Some(AgentKind::Recruiter),
            "skill_gap" => Some(AgentKind::SkillGap),
            "interview_questions" => Some(AgentKind::InterviewQuestions),
            _ => None,
        }
    }

    pub fn all() -> [Self; 4] {
        [
            AgentKind::ResumeReviewer,
            AgentKind::Recruiter,
            AgentKind::SkillGap,
            AgentKind::InterviewQuestions,
        ]
    }

    // Documents the router guarantees are present whenever it runs this agent.
    pub fn provided_documents(&self) -> &'static [DocumentSlot] {
        match self {
            AgentKind::ResumeReviewer => &[DocumentSlot::Resume],
            AgentKind::Recruiter | AgentKind::SkillGap | AgentKind::InterviewQuestions => {
                &[DocumentSlot::Resume, DocumentSlot::JobDescription]
            }
        }
    }

    pub fn routed() -> [Self; 3] {
        [
            AgentKind::Recruiter,
            AgentKind::SkillGap,
            AgentKind::InterviewQuestions,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputContract {
    Prose,
    QuestionBank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefinitionSource {
    BuiltIn,
    UserCustom,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentDefinition {
    pub kind: AgentKind,
    pub name: String,
    pub description: String,
    pub template: String,
    pub output: OutputContract,
    pub source: DefinitionSource,
}

impl AgentDefinition {
    pub fn prompt_template(&self) -> PromptTemplate {
        PromptTemplate::new(&self.template)
    }

    pub fn required_documents(&self) -> Vec<DocumentSlot> {
        let template = self.prompt_template();
        let placeholders = template.placeholders();
        DocumentSlot::all()
            .into_iter()
            .filter(|slot| placeholders.contains(&slot.placeholder()))
            .collect()
    }
}
