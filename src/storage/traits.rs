use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::engine::{DispatchOutcome, Route};
use crate::types::{Context, RecordId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: RecordId,
    pub route: Route,
    pub agent: Option<String>,
    pub user_message: String,
    pub response: String,
    #[serde(default)]
    pub structured: Option<Value>,
    pub had_resume: bool,
    pub had_job_description: bool,
    pub created_at: DateTime<Utc>,
}

impl AnalysisRecord {
    pub fn from_outcome(context: &Context, outcome: &DispatchOutcome) -> Self {
        Self {
            id: Uuid::new_v4(),
            route: outcome.route,
            agent: outcome.agent.clone(),
            user_message: context.user_message.clone(),
            response: outcome.response.clone(),
            structured: outcome.output.structured_json(),
            had_resume: context.has_resume(),
            had_job_description: context.has_job_description(),
            created_at: Utc::now(),
        }
    }
}

#[async_trait]
pub trait AnalysisStore: Send + Sync {
    async fn save(&self, record: &AnalysisRecord) -> Result<RecordId>;
    async fn load(&self, id: RecordId) -> Result<Option<AnalysisRecord>>;
    async fn list(&self) -> Result<Vec<AnalysisRecord>>;
}
