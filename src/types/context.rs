use serde::{Deserialize, Serialize};

use super::DocumentSlot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    pub resume_text: Option<String>,
    pub job_description_text: Option<String>,
    pub user_message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Nothing,
    ResumeOnly,
    JobDescriptionOnly,
    Both,
}

impl Context {
    pub fn new(
        resume_text: Option<String>,
        job_description_text: Option<String>,
        user_message: impl Into<String>,
    ) -> Self {
        Self {
            resume_text: non_blank(resume_text),
            job_description_text: non_blank(job_description_text),
            user_message: user_message.into(),
        }
    }

    pub fn message_only(user_message: impl Into<String>) -> Self {
        Self::new(None, None, user_message)
    }

    pub fn with_resume(mut self, text: impl Into<String>) -> Self {
        self.resume_text = non_blank(Some(text.into()));
        self
    }

    pub fn with_job_description(mut self, text: impl Into<String>) -> Self {
        self.job_description_text = non_blank(Some(text.into()));
        self
    }

    pub fn document(&self, slot: DocumentSlot) -> Option<&str> {
        match slot {
            DocumentSlot::Resume => self.resume_text.as_deref(),
            DocumentSlot::JobDescription => self.job_description_text.as_deref(),
        }
    }

    pub fn has_resume(&self) -> bool {
        self.resume_text.is_some()
    }

    pub fn has_job_description(&self) -> bool {
        self.job_description_text.is_some()
    }

    pub fn availability(&self) -> Availability {
        match (self.has_resume(), self.has_job_description()) {
            (true, true) => Availability::Both,
            (true, false) => Availability::ResumeOnly,
            (false, true) => Availability::JobDescriptionOnly,
            (false, false) => Availability::Nothing,
        }
    }

    pub fn placeholder_value(&self, name: &str) -> Option<&str> {
        DocumentSlot::all()
            .into_iter()
            .find(|slot| slot.placeholder() == name)
            .and_then(|slot| self.document(slot))
    }
}

// Whitespace-only uploads count as absent.
fn non_blank(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_availability() {
        let ctx = Context::message_only("hi");
        assert_eq!(ctx.availability(), Availability::Nothing);

        let ctx = ctx.with_resume("Python, SQL");
        assert_eq!(ctx.availability(), Availability::ResumeOnly);

        let ctx = ctx.with_job_description("Data engineer");
        assert_eq!(ctx.availability(), Availability::Both);

        let ctx = Context::message_only("hi").with_job_description("Data engineer");
        assert_eq!(ctx.availability(), Availability::JobDescriptionOnly);
    }

    #[test]
    fn test_blank_documents_are_absent() {
        let ctx = Context::new(Some("   \n".to_string()), Some(String::new()), "hello");
        assert!(!ctx.has_resume());
        assert!(!ctx.has_job_description());
    }

    #[test]
    fn test_placeholder_value() {
        let ctx = Context::message_only("q").with_resume("my resume");
        assert_eq!(ctx.placeholder_value("resume_content"), Some("my resume"));
        assert_eq!(ctx.placeholder_value("jd_content"), None);
        assert_eq!(ctx.placeholder_value("unknown"), None);
    }
}
