use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::traits::{AnalysisRecord, AnalysisStore};
use crate::types::RecordId;

#[derive(Clone, Default)]
pub struct InMemoryStore {
    records: Arc<RwLock<HashMap<RecordId, AnalysisRecord>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl AnalysisStore for InMemoryStore {
    async fn save(&self, record: &AnalysisRecord) -> Result<RecordId> {
        let mut records = self.records.write().await;
        records.insert(record.id, record.clone());
        Ok(record.id)
    }

    async fn load(&self, id: RecordId) -> Result<Option<AnalysisRecord>> {
        let records = self.records.read().await;
        Ok(records.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<AnalysisRecord>> {
        let records = self.records.read().await;
        let mut all: Vec<_> = records.values().cloned().collect();
        all.sort_by_key(|record| record.created_at);
        Ok(all)
    }
}
