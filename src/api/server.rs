use anyhow::Result;
use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::api::handlers;
use crate::session::ChatSession;
use crate::storage::AnalysisStore;

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<ChatSession>,
    pub store: Arc<dyn AnalysisStore>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/documents", get(handlers::get_documents))
        .route("/documents/:slot", put(handlers::put_document))
        .route("/chat", post(handlers::chat))
        .route("/history", get(handlers::get_history))
        .route("/analyses", get(handlers::list_analyses))
        .route("/analyses/:id", get(handlers::get_analysis))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(state: AppState, port: u16) -> Result<()> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    log::info!("careerdesk API listening on port {}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::definitions::PromptCatalog;
    use crate::engine::Dispatcher;
    use crate::factory::AgentFactory;
    use crate::providers::adapter::ModelAdapter;
    use crate::providers::llm::MockLLMProvider;
    use crate::storage::InMemoryStore;

    fn create_test_app(provider: MockLLMProvider) -> (Router, Arc<ChatSession>) {
        let adapter = Arc::new(ModelAdapter::with_default_timeout(Arc::new(provider)));
        let factory = AgentFactory::new(Arc::new(PromptCatalog::builtin()), adapter);
        let store: Arc<dyn AnalysisStore> = Arc::new(InMemoryStore::new());
        let session = Arc::new(
            ChatSession::new(Arc::new(Dispatcher::new(factory))).with_store(store.clone()),
        );
        let state = AppState {
            session: session.clone(),
            store,
        };
        (create_router(state), session)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let (app, _) = create_test_app(MockLLMProvider::new());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "healthy");
    }

    #[tokio::test]
    async fn test_put_document() {
        let (app, session) = create_test_app(MockLLMProvider::new());

        let response = app
            .oneshot(json_request("PUT", "/documents/jd", r#"{"text": "Rust engineer"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["slot"], "job_description");
        assert_eq!(json["chars"], 13);
        assert_eq!(session.documents().await.job_description_chars, Some(13));
    }

    #[tokio::test]
    async fn test_put_document_unknown_slot() {
        let (app, _) = create_test_app(MockLLMProvider::new());

        let response = app
            .oneshot(json_request("PUT", "/documents/cover_letter", r#"{"text": "x"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_put_document_rejected_format() {
        let (app, _) = create_test_app(MockLLMProvider::new());

        let response = app
            .oneshot(json_request(
                "PUT",
                "/documents/resume",
                r#"{"text": "%PDF", "filename": "cv.pdf"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await["error"]["code"], "UNSUPPORTED_DOCUMENT");
    }

    #[tokio::test]
    async fn test_chat_and_history() {
        let (app, _) = create_test_app(MockLLMProvider::with_response("Ask for 10% more.".to_string()));

        let response = app
            .clone()
            .oneshot(json_request("POST", "/chat", r#"{"message": "How do I negotiate salary?"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["route"], "general_chat");
        assert_eq!(json["content"], "Ask for 10% more.");
        let record_id = json["record_id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/history").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let history = body_json(response).await;
        assert_eq!(history.as_array().unwrap().len(), 2);
        assert_eq!(history[0]["role"], "user");

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/analyses/{}", record_id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["route"], "general_chat");
    }

    #[tokio::test]
    async fn test_chat_rejects_empty_message() {
        let (app, _) = create_test_app(MockLLMProvider::new());

        let response = app
            .oneshot(json_request("POST", "/chat", r#"{"message": "   "}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_analysis_not_found() {
        let (app, _) = create_test_app(MockLLMProvider::new());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/analyses/00000000-0000-0000-0000-000000000000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
