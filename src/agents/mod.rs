pub mod specialized;

use async_trait::async_trait;

use crate::definitions::AgentKind;
use crate::errors::AgentError;
use crate::types::{AgentOutput, Context, DocumentSlot};

pub use specialized::{SpecializedAgent, USER_REQUEST_LABEL};

#[async_trait]
pub trait Agent: Send + Sync {
    fn kind(&self) -> AgentKind;
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn required_documents(&self) -> &[DocumentSlot];

    async fn execute(&self, context: &Context) -> Result<AgentOutput, AgentError>;

    /// True when the context carries every document this agent reads.
    fn accepts(&self, context: &Context) -> bool {
        self.required_documents()
            .iter()
            .all(|slot| context.document(*slot).is_some())
    }
}
