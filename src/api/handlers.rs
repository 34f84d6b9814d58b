use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::server::AppState;
use crate::session::{DisplayableResponse, SlotStatus};
use crate::storage::AnalysisRecord;
use crate::types::{ChatMessage, DocumentSlot};

#[derive(Deserialize)]
pub struct DocumentRequest {
    pub text: String,
    /// When set, the text is run through the document parser under this name.
    #[serde(default)]
    pub filename: Option<String>,
}

#[derive(Serialize)]
pub struct DocumentResponse {
    pub slot: DocumentSlot,
    pub chars: usize,
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn put_document(
    State(state): State<AppState>,
    Path(slot): Path<String>,
    Json(request): Json<DocumentRequest>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let slot = DocumentSlot::from_str(&slot)
        .ok_or_else(|| ApiError::NotFound(format!("unknown document slot '{}'", slot)))?;

    let chars = match request.filename {
        Some(filename) => {
            state
                .session
                .upload(slot, &filename, request.text.as_bytes())
                .await?
        }
        None => {
            let chars = request.text.trim().chars().count();
            state.session.set_text(slot, request.text).await;
            chars
        }
    };

    Ok(Json(DocumentResponse { slot, chars }))
}

pub async fn get_documents(State(state): State<AppState>) -> Json<SlotStatus> {
    Json(state.session.documents().await)
}

pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<DisplayableResponse>, ApiError> {
    if request.message.trim().is_empty() {
        return Err(ApiError::BadRequest("message must not be empty".to_string()));
    }
    Ok(Json(state.session.submit(&request.message).await))
}

pub async fn get_history(State(state): State<AppState>) -> Json<Vec<ChatMessage>> {
    Json(state.session.history().await)
}

pub async fn get_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AnalysisRecord>, ApiError> {
    let record = state
        .store
        .load(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("analysis {} not found", id)))?;

    Ok(Json(record))
}

pub async fn list_analyses(
    State(state): State<AppState>,
) -> Result<Json<Vec<AnalysisRecord>>, ApiError> {
    Ok(Json(state.store.list().await?))
}
