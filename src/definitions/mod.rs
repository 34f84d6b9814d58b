pub mod builtin;
pub mod loader;
pub mod prompts;
pub mod schema;
pub mod template;

pub use builtin::{
    interview_questions_definition, recruiter_definition, resume_reviewer_definition,
    skill_gap_definition, PromptCatalog,
};
pub use loader::{load_overrides, parse_overrides, AgentOverride, PromptOverrides};
pub use schema::{AgentDefinition, AgentKind, DefinitionSource, OutputContract};
pub use template::PromptTemplate;
