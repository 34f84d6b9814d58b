use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::parser::{DocumentParser, PlainTextParser};
use super::slots::{SlotStatus, UploadSlots};
use crate::engine::{Dispatcher, Route};
use crate::errors::ParseError;
use crate::storage::{AnalysisRecord, AnalysisStore};
use crate::types::{ChatHistory, ChatMessage, DocumentSlot, RecordId, Role};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayableResponse {
    pub route: Route,
    pub agent: Option<String>,
    pub content: String,
    #[serde(default)]
    pub structured: Option<Value>,
    #[serde(default)]
    pub parse_error: bool,
    pub avatar: String,
    #[serde(default)]
    pub record_id: Option<RecordId>,
}

pub struct ChatSession {
    dispatcher: Arc<Dispatcher>,
    slots: UploadSlots,
    parser: Arc<dyn DocumentParser>,
    history: RwLock<ChatHistory>,
    store: Option<Arc<dyn AnalysisStore>>,
}

impl ChatSession {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            slots: UploadSlots::new(),
            parser: Arc::new(PlainTextParser),
            history: RwLock::new(ChatHistory::new()),
            store: None,
        }
    }

    pub fn with_store(mut self, store: Arc<dyn AnalysisStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_parser(mut self, parser: Arc<dyn DocumentParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn slots(&self) -> &UploadSlots {
        &self.slots
    }

    pub async fn upload(
        &self,
        slot: DocumentSlot,
        filename: &str,
        bytes: &[u8],
    ) -> Result<usize, ParseError> {
        let text = self.parser.parse(filename, bytes)?;
        let chars = text.chars().count();
        self.slots.set_document(slot, text).await;
        Ok(chars)
    }

    pub async fn set_text(&self, slot: DocumentSlot, text: impl Into<String>) {
        self.slots.set_document(slot, text).await;
    }

    pub async fn documents(&self) -> SlotStatus {
        self.slots.status().await
    }

    pub async fn submit(&self, message: &str) -> DisplayableResponse {
        let context = self.slots.snapshot(message).await;
        let outcome = self.dispatcher.dispatch(&context).await;

        let record_id = match &self.store {
            Some(store) => {
                let record = AnalysisRecord::from_outcome(&context, &outcome);
                match store.save(&record).await {
                    Ok(id) => Some(id),
                    Err(e) => {
                        log::warn!("Failed to persist analysis record: {:#}", e);
                        None
                    }
                }
            }
            None => None,
        };

        // Both turns go in under one lock so concurrent submits stay paired.
        {
            let mut history = self.history.write().await;
            history.push(ChatMessage::user(message));
            history.push(ChatMessage::assistant(outcome.response.clone()));
        }

        DisplayableResponse {
            route: outcome.route,
            agent: outcome.agent.clone(),
            structured: outcome.output.structured_json(),
            parse_error: outcome
                .output
                .as_structured()
                .map_or(false, |s| s.parse_error),
            content: outcome.response,
            avatar: Role::Assistant.avatar().to_string(),
            record_id,
        }
    }

    pub async fn history(&self) -> Vec<ChatMessage> {
        self.history.read().await.messages().to_vec()
    }
}
