use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::panic::AssertUnwindSafe;

use super::decision::{Decision, DecisionLoop};
use crate::agents::USER_REQUEST_LABEL;
use crate::definitions::AgentKind;
use crate::errors::RegistryError;
use crate::factory::AgentFactory;
use crate::normalizer::{extract_text, RawResponse};
use crate::providers::adapter::ERROR_MARKER;
use crate::tools::{normalize_tool_name, ToolRegistry};
use crate::types::{AgentOutput, Availability, Context};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    GeneralChat,
    ResumeReview,
    ToolSelection,
}

impl Route {
    pub fn for_context(context: &Context) -> Self {
        match context.availability() {
            Availability::Nothing | Availability::JobDescriptionOnly => Route::GeneralChat,
            Availability::ResumeOnly => Route::ResumeReview,
            Availability::Both => Route::ToolSelection,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Route::GeneralChat => "general_chat",
            Route::ResumeReview => "resume_review",
            Route::ToolSelection => "tool_selection",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchOutcome {
    pub route: Route,
    // Normalized identifier of the agent that answered, on every route.
    pub agent: Option<String>,
    pub output: AgentOutput,
    pub response: String,
}

impl DispatchOutcome {
    fn new(route: Route, agent: Option<String>, output: AgentOutput) -> Self {
        let response = extract_text(&RawResponse::Agent(output.clone()));
        Self {
            route,
            agent,
            output,
            response,
        }
    }

    fn text(route: Route, agent: Option<String>, text: String) -> Self {
        Self::new(route, agent, AgentOutput::Text(text))
    }
}

pub struct Dispatcher {
    factory: AgentFactory,
    decision_loop: DecisionLoop,
}

impl Dispatcher {
    pub fn new(factory: AgentFactory) -> Self {
        let decision_loop = DecisionLoop::new(
            factory.adapter().clone(),
            factory.catalog().router_prompt.clone(),
        );
        Self {
            factory,
            decision_loop,
        }
    }

    pub fn factory(&self) -> &AgentFactory {
        &self.factory
    }

    pub fn registry_for(&self, context: &Context) -> Result<ToolRegistry, RegistryError> {
        ToolRegistry::build(self.factory.create_routed(), context)
    }

    /// Answers one turn. Always produces a displayable response: failures
    /// below this point come back as error text and panics are caught.
    pub async fn dispatch(&self, context: &Context) -> DispatchOutcome {
        let route = Route::for_context(context);
        log::info!("Dispatching turn via {}", route.as_str());

        match AssertUnwindSafe(self.dispatch_route(route, context))
            .catch_unwind()
            .await
        {
            Ok(outcome) => outcome,
            Err(_) => {
                log::error!("Dispatch panicked on route {}", route.as_str());
                DispatchOutcome::text(
                    route,
                    None,
                    format!(
                        "{} something went wrong while preparing this answer. Please try again.",
                        ERROR_MARKER
                    ),
                )
            }
        }
    }

    async fn dispatch_route(&self, route: Route, context: &Context) -> DispatchOutcome {
        match route {
            Route::GeneralChat => self.general_chat(context).await,
            Route::ResumeReview => self.resume_review(context).await,
            Route::ToolSelection => self.tool_selection(context).await,
        }
    }

    async fn general_chat(&self, context: &Context) -> DispatchOutcome {
        let prompt = format!(
            "{}\n\n{} {}",
            self.factory.catalog().chatbot_prompt,
            USER_REQUEST_LABEL,
            context.user_message
        );
        let text = self.factory.adapter().complete(&prompt).await;
        DispatchOutcome::text(Route::GeneralChat, None, text)
    }

    async fn resume_review(&self, context: &Context) -> DispatchOutcome {
        let agent = self.factory.create(AgentKind::ResumeReviewer);
        let name = normalize_tool_name(agent.name());

        match agent.execute(context).await {
            Ok(output) => DispatchOutcome::new(Route::ResumeReview, Some(name), output),
            Err(e) => {
                log::error!("{} could not run: {}", name, e);
                DispatchOutcome::text(
                    Route::ResumeReview,
                    Some(name),
                    format!("{} {}", ERROR_MARKER, e),
                )
            }
        }
    }

    async fn tool_selection(&self, context: &Context) -> DispatchOutcome {
        let registry = match self.registry_for(context) {
            Ok(registry) => registry,
            Err(e) => {
                log::error!("Tool registry construction failed: {}", e);
                return DispatchOutcome::text(
                    Route::ToolSelection,
                    None,
                    format!("{} {}", ERROR_MARKER, e),
                );
            }
        };

        match self.decision_loop.run(&registry, &context.user_message).await {
            Decision::ToolInvoked { tool, output } => {
                DispatchOutcome::new(Route::ToolSelection, Some(tool), output)
            }
            Decision::ToolFailed { tool, message } => {
                DispatchOutcome::text(Route::ToolSelection, Some(tool), message)
            }
            Decision::Answered(text) | Decision::ModelFailed(text) => {
                DispatchOutcome::text(Route::ToolSelection, None, text)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::PromptCatalog;
    use crate::providers::adapter::{is_error_text, ModelAdapter};
    use crate::providers::llm::MockLLMProvider;
    use std::sync::Arc;
    use std::time::Duration;

    fn dispatcher(provider: Arc<MockLLMProvider>) -> Dispatcher {
        let adapter = Arc::new(ModelAdapter::new(provider, Duration::from_secs(5)));
        Dispatcher::new(AgentFactory::new(Arc::new(PromptCatalog::builtin()), adapter))
    }

    #[test]
    fn test_route_for_context() {
        assert_eq!(Route::for_context(&Context::message_only("hi")), Route::GeneralChat);
        assert_eq!(
            Route::for_context(&Context::message_only("hi").with_resume("cv")),
            Route::ResumeReview
        );
        assert_eq!(
            Route::for_context(&Context::message_only("hi").with_job_description("jd")),
            Route::GeneralChat
        );
        assert_eq!(
            Route::for_context(
                &Context::message_only("hi")
                    .with_resume("cv")
                    .with_job_description("jd")
            ),
            Route::ToolSelection
        );
    }

    #[tokio::test]
    async fn test_general_chat_uses_chatbot_prompt() {
        let provider = Arc::new(MockLLMProvider::with_response("Research the market rate.".to_string()));
        let dispatcher = dispatcher(provider.clone());

        let outcome = dispatcher
            .dispatch(&Context::message_only("How do I negotiate salary?"))
            .await;

        assert_eq!(outcome.route, Route::GeneralChat);
        assert_eq!(outcome.agent, None);
        assert_eq!(outcome.response, "Research the market rate.");
        let prompt = &provider.prompts()[0];
        assert!(prompt.starts_with("You are a friendly and professional career consultant."));
        assert!(prompt.ends_with("User's Request: How do I negotiate salary?"));
    }

    #[tokio::test]
    async fn test_resume_review_failure_is_visible() {
        let provider = Arc::new(MockLLMProvider::failing("network down"));
        let dispatcher = dispatcher(provider);

        let outcome = dispatcher
            .dispatch(&Context::message_only("review").with_resume("cv"))
            .await;
        assert_eq!(outcome.route, Route::ResumeReview);
        assert_eq!(outcome.agent.as_deref(), Some("resume_reviewer_agent"));
        assert!(is_error_text(&outcome.response));
    }
}
