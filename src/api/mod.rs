//! HTTP API for the four pipelines, plus the browser UI.
//!
//! Every failure is answered with `{"error": "..."}`: 400 for invalid input,
//! 500 for anything that went wrong downstream.

mod ui;

use crate::error::NexusError;
use crate::models::{Upload, NO_TEXT_EXTRACTED, NO_TRANSCRIPT_RETURNED};
use crate::orchestrator::Orchestrator;
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Shared application state.
pub type AppState = Arc<Orchestrator>;

/// Build the router with CORS, request tracing and the configured body limit.
pub fn router(state: AppState) -> Router {
    let body_limit = state.settings().server.body_limit_bytes;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/", get(ui::index))
        .route("/health", get(health))
        .route("/chat-with-file", post(chat_with_file))
        .route("/chat-with-url", post(chat_with_url))
        .route("/extract-text-from-image", post(extract_text_from_image))
        .route("/transcribe-audio", post(transcribe_audio))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}

// === Request/Response Types ===

#[derive(Debug, Deserialize)]
struct UrlQuery {
    url: String,
    question: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub answer: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// A pipeline failure rendered as JSON.
struct ApiError(NexusError);

impl From<NexusError> for ApiError {
    fn from(err: NexusError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_validation() {
            tracing::warn!(error = %self.0, "Rejected request");
            StatusCode::BAD_REQUEST
        } else {
            tracing::error!(error = %self.0, "Request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        };

        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

type ApiResult = Result<Json<AnswerResponse>, ApiError>;

fn answer(text: String) -> ApiResult {
    Ok(Json(AnswerResponse { answer: text }))
}

/// Fields of an upload form.
#[derive(Default)]
struct UploadForm {
    file: Option<Upload>,
    question: Option<String>,
}

impl UploadForm {
    async fn read(mut multipart: Multipart) -> Result<Self, NexusError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| NexusError::InvalidInput(format!("failed to read multipart: {}", e)))?
        {
            match field.name().unwrap_or_default() {
                "file" => {
                    let filename = field.file_name().unwrap_or("upload").to_string();
                    let bytes = field.bytes().await.map_err(|e| {
                        NexusError::InvalidInput(format!("failed to read file: {}", e))
                    })?;
                    tracing::debug!(filename = %filename, bytes = bytes.len(), "File data received");
                    form.file = Some(Upload::new(filename, bytes.to_vec()));
                }
                "question" => {
                    let text = field.text().await.map_err(|e| {
                        NexusError::InvalidInput(format!("failed to read question: {}", e))
                    })?;
                    form.question = Some(text);
                }
                other => tracing::debug!(field = %other, "Ignoring form field"),
            }
        }

        Ok(form)
    }

    fn require_file(&mut self) -> Result<Upload, NexusError> {
        self.file
            .take()
            .ok_or_else(|| NexusError::InvalidInput("no file uploaded".to_string()))
    }
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

#[tracing::instrument(skip_all)]
async fn chat_with_file(State(state): State<AppState>, multipart: Multipart) -> ApiResult {
    let mut form = UploadForm::read(multipart).await?;
    let upload = form.require_file()?;
    let question = form.question.unwrap_or_default();

    answer(state.chat_with_file(upload, &question).await?)
}

#[tracing::instrument(skip_all)]
async fn chat_with_url(
    State(state): State<AppState>,
    query: Result<Json<UrlQuery>, JsonRejection>,
) -> ApiResult {
    let Json(query) =
        query.map_err(|e| NexusError::InvalidInput(format!("invalid request body: {}", e)))?;

    answer(state.chat_with_url(&query.url, &query.question).await?)
}

#[tracing::instrument(skip_all)]
async fn extract_text_from_image(State(state): State<AppState>, multipart: Multipart) -> ApiResult {
    let upload = UploadForm::read(multipart).await?.require_file()?;
    let text = state.extract_image_text(upload).await?;

    answer(text.into_answer(NO_TEXT_EXTRACTED))
}

#[tracing::instrument(skip_all)]
async fn transcribe_audio(State(state): State<AppState>, multipart: Multipart) -> ApiResult {
    let upload = UploadForm::read(multipart).await?.require_file()?;
    let transcript = state.transcribe_audio(upload).await?;

    answer(transcript.into_answer(NO_TRANSCRIPT_RETURNED))
}
