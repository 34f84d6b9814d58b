use serde::Serialize;
use tokio::sync::RwLock;

use crate::types::{Context, DocumentSlot};

#[derive(Debug, Clone, Default)]
struct Documents {
    resume: Option<String>,
    job_description: Option<String>,
}

impl Documents {
    fn slot_mut(&mut self, slot: DocumentSlot) -> &mut Option<String> {
        match slot {
            DocumentSlot::Resume => &mut self.resume,
            DocumentSlot::JobDescription => &mut self.job_description,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotStatus {
    pub resume_chars: Option<usize>,
    pub job_description_chars: Option<usize>,
}

#[derive(Debug, Default)]
pub struct UploadSlots {
    documents: RwLock<Documents>,
}

impl UploadSlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_document(&self, slot: DocumentSlot, text: impl Into<String>) {
        let text = text.into();
        let mut documents = self.documents.write().await;
        *documents.slot_mut(slot) = if text.trim().is_empty() {
            None
        } else {
            Some(text)
        };
        log::info!("Updated {} slot", slot.as_str());
    }

    pub async fn clear(&self, slot: DocumentSlot) {
        *self.documents.write().await.slot_mut(slot) = None;
    }

    pub async fn get_document(&self, slot: DocumentSlot) -> Option<String> {
        let documents = self.documents.read().await;
        match slot {
            DocumentSlot::Resume => documents.resume.clone(),
            DocumentSlot::JobDescription => documents.job_description.clone(),
        }
    }

    pub async fn snapshot(&self, user_message: impl Into<String>) -> Context {
        let documents = self.documents.read().await;
        Context::new(
            documents.resume.clone(),
            documents.job_description.clone(),
            user_message,
        )
    }

    pub async fn status(&self) -> SlotStatus {
        let documents = self.documents.read().await;
        SlotStatus {
            resume_chars: documents.resume.as_ref().map(|t| t.chars().count()),
            job_description_chars: documents.job_description.as_ref().map(|t| t.chars().count()),
        }
    }
}
