//! HTTP handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};

use crate::ask::handle_ask;
use crate::error::ApiError;
use crate::page::PageView;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AskForm {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct ChunkBody {
    pub index: usize,
    pub text: String,
    pub source: String,
    pub score: f32,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub chunks: Vec<ChunkBody>,
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct DocumentSummary {
    pub name: String,
    pub bytes: usize,
}

#[derive(Debug, Serialize)]
pub struct DocumentsResponse {
    pub count: usize,
    pub documents: Vec<DocumentSummary>,
    pub notices: Vec<minirag_knowledge::NoticeView>,
}

/// GET / - idle page
pub async fn index(State(state): State<AppState>) -> Response {
    render_page(&state, state.page())
}

/// POST /ask - form submission, renders the result or a notice inline
pub async fn ask_form(State(state): State<AppState>, Form(form): Form<AskForm>) -> Response {
    let view = state.page().with_query(form.query.trim());

    let view = match handle_ask(&state, &form.query).await {
        Ok(outcome) => view.with_outcome(&outcome),
        Err(rejection) => view.with_notice(&rejection.notice()),
    };

    render_page(&state, view)
}

/// POST /api/ask - JSON mirror of the form
pub async fn api_ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let outcome = handle_ask(&state, &request.query)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(AskResponse {
        chunks: outcome
            .chunks
            .into_iter()
            .enumerate()
            .map(|(i, chunk)| ChunkBody {
                index: i + 1,
                text: chunk.text,
                source: chunk.source,
                score: chunk.score,
            })
            .collect(),
        answer: outcome.answer,
    }))
}

/// GET /api/documents - loaded document names and sizes
pub async fn api_documents(State(state): State<AppState>) -> Json<DocumentsResponse> {
    let documents: Vec<DocumentSummary> = state
        .documents()
        .iter()
        .map(|doc| DocumentSummary {
            name: doc.name.clone(),
            bytes: doc.content.len(),
        })
        .collect();

    Json(DocumentsResponse {
        count: documents.len(),
        documents,
        notices: state.load_notices().iter().map(Into::into).collect(),
    })
}

/// GET /health
pub async fn health() -> &'static str {
    "OK"
}

fn render_page(state: &AppState, view: PageView) -> Response {
    match state.renderer().render(&view) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("{}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
        }
    }
}

