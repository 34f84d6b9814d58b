pub mod chat;
pub mod context;
pub mod output;

pub use chat::{ChatHistory, ChatMessage};
pub use context::{Availability, Context};
pub use output::{AgentOutput, StructuredOutput};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type RecordId = Uuid;

/// The two long-lived upload slots a session tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentSlot {
    Resume,
    JobDescription,
}

impl DocumentSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentSlot::Resume => "resume",
            DocumentSlot::JobDescription => "job_description",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "resume" | "cv" => Some(DocumentSlot::Resume),
            "job_description" | "job-description" | "jd" => Some(DocumentSlot::JobDescription),
            _ => None,
        }
    }

    /// Placeholder name used for this slot inside prompt templates.
    pub fn placeholder(&self) -> &'static str {
        match self {
            DocumentSlot::Resume => "resume_content",
            DocumentSlot::JobDescription => "jd_content",
        }
    }

    pub fn all() -> [Self; 2] {
        [DocumentSlot::Resume, DocumentSlot::JobDescription]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    pub fn avatar(&self) -> &'static str {
        match self {
            Role::User => "🧑‍💻",
            Role::Assistant => "🤖",
        }
    }
}
