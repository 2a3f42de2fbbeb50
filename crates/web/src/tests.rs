//! Page, API and Ask-flow tests against a stub retriever.

use crate::ask::{handle_ask, AskRejection};
use crate::server::build_router;
use crate::state::AppState;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use minirag_core::config::UiConfig;
use minirag_core::{AppError, AppResult};
use minirag_knowledge::{
    load_documents, Document, DocumentSet, LoadedDocuments, Notice, RagOutcome, Retriever,
    RetrievedChunk,
};
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

/// Returns a fixed outcome (or error) and counts its calls.
struct StubRetriever {
    reply: Result<RagOutcome, String>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    delay: Duration,
}

impl StubRetriever {
    fn answering(chunks: &[&str], answer: &str) -> Arc<Self> {
        Self::build(Ok(RagOutcome::new(
            chunks.iter().map(|c| RetrievedChunk::text_only(*c)).collect(),
            answer,
        )))
    }

    fn failing(reason: &str) -> Arc<Self> {
        Self::build(Err(reason.to_string()))
    }

    fn slow(delay: Duration) -> Arc<Self> {
        Self::build_with(Ok(RagOutcome::new(Vec::new(), "done")), delay)
    }

    fn build(reply: Result<RagOutcome, String>) -> Arc<Self> {
        Self::build_with(reply, Duration::ZERO)
    }

    fn build_with(reply: Result<RagOutcome, String>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            delay,
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Retriever for StubRetriever {
    fn name(&self) -> &str {
        "stub"
    }

    async fn retrieve(&self, _query: &str, _documents: &DocumentSet) -> AppResult<RagOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.reply.clone().map_err(AppError::Llm)
    }
}

fn loaded(docs: &[(&str, &str)]) -> LoadedDocuments {
    LoadedDocuments {
        documents: DocumentSet::new(
            docs.iter()
                .map(|(name, content)| Document::new(*name, *content))
                .collect(),
        ),
        notices: Vec::new(),
    }
}

fn concrete_docs() -> LoadedDocuments {
    loaded(&[("a.txt", "Concrete must cure for 28 days.")])
}

fn missing_folder() -> LoadedDocuments {
    LoadedDocuments {
        documents: DocumentSet::empty(),
        notices: vec![Notice::MissingDataDirectory {
            path: PathBuf::from("data"),
        }],
    }
}

fn state(loaded: LoadedDocuments, retriever: Arc<StubRetriever>) -> AppState {
    AppState::new(loaded, retriever, UiConfig::default(), 1).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn form_post(query: &str) -> Request<Body> {
    let encoded: String = query
        .bytes()
        .map(|b| match b {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' => (b as char).to_string(),
            b' ' => "+".to_string(),
            other => format!("%{:02X}", other),
        })
        .collect();

    Request::builder()
        .method("POST")
        .uri("/ask")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(format!("query={}", encoded)))
        .unwrap()
}

fn json_post(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/ask")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_empty_query_never_reaches_retriever() {
    let retriever = StubRetriever::answering(&["x"], "y");
    let state = state(concrete_docs(), retriever.clone());

    for query in ["", "   ", "\n\t"] {
        let result = handle_ask(&state, query).await;
        assert!(matches!(result, Err(AskRejection::EmptyQuery)));
    }
    assert_eq!(retriever.calls(), 0);
}

#[tokio::test]
async fn test_no_documents_never_reaches_retriever() {
    let retriever = StubRetriever::answering(&["x"], "y");
    let state = state(missing_folder(), retriever.clone());

    let result = handle_ask(&state, "How long does concrete take to cure?").await;

    assert!(matches!(result, Err(AskRejection::DocumentsUnavailable)));
    assert_eq!(retriever.calls(), 0);
}

#[tokio::test]
async fn test_empty_query_is_checked_before_documents() {
    let retriever = StubRetriever::answering(&["x"], "y");
    let state = state(missing_folder(), retriever.clone());

    let result = handle_ask(&state, " ").await;
    assert!(matches!(result, Err(AskRejection::EmptyQuery)));
}

#[tokio::test]
async fn test_valid_question_calls_retriever_once() {
    let retriever = StubRetriever::answering(&["Concrete must cure for 28 days."], "28 days.");
    let state = state(concrete_docs(), retriever.clone());

    let outcome = handle_ask(&state, "How long does concrete take to cure?")
        .await
        .unwrap();

    assert_eq!(retriever.calls(), 1);
    assert_eq!(outcome.answer, "28 days.");
}

#[tokio::test]
async fn test_queries_run_one_at_a_time() {
    let retriever = StubRetriever::slow(Duration::from_millis(20));
    let state = state(concrete_docs(), retriever.clone());

    let (a, b) = tokio::join!(handle_ask(&state, "first"), handle_ask(&state, "second"));

    assert!(a.is_ok() && b.is_ok());
    assert_eq!(retriever.calls(), 2);
    assert_eq!(retriever.max_in_flight.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_index_page_shows_form_and_load_notices() {
    let retriever = StubRetriever::answering(&[], "");
    let app = build_router(state(missing_folder(), retriever));

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Construction QA Assistant"));
    assert!(html.contains("e.g., What factors affect construction delays?"));
    assert!(html.contains(
        "The data/ folder is missing. Upload .txt files inside a data folder."
    ));
}

#[tokio::test]
async fn test_concrete_question_renders_chunk_and_answer() {
    let temp = TempDir::new().unwrap();
    let data = temp.path().join("data");
    fs::create_dir(&data).unwrap();
    fs::write(data.join("a.txt"), "Concrete must cure for 28 days.").unwrap();

    let docs = load_documents(&data);
    assert_eq!(docs.documents.len(), 1);

    let retriever = StubRetriever::answering(&["Concrete must cure for 28 days."], "28 days.");
    let app = build_router(state(docs, retriever.clone()));

    let response = app
        .oneshot(form_post("How long does concrete take to cure?"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;

    assert_eq!(retriever.calls(), 1);
    assert_eq!(html.matches("class=\"panel chunk-panel\"").count(), 1);
    assert!(html.contains("Chunk 1"));
    assert!(!html.contains("Chunk 2"));
    assert!(html.contains("<pre>Concrete must cure for 28 days.</pre>"));
    assert!(html.contains("Final Answer"));
    assert!(html.contains("<pre>28 days.</pre>"));
    // Query stays in the box
    assert!(html.contains("value=\"How long does concrete take to cure?\""));
}

#[tokio::test]
async fn test_panel_count_matches_returned_chunks() {
    let retriever = StubRetriever::answering(&["one", "two", "three"], "answer");
    let app = build_router(state(concrete_docs(), retriever));

    let html = body_text(app.oneshot(form_post("concrete")).await.unwrap()).await;

    assert_eq!(html.matches("class=\"panel chunk-panel\"").count(), 3);
    assert!(html.contains("Chunk 3"));
}

#[tokio::test]
async fn test_zero_chunks_still_shows_answer() {
    let retriever = StubRetriever::answering(&[], "Nothing relevant.");
    let app = build_router(state(concrete_docs(), retriever));

    let html = body_text(app.oneshot(form_post("concrete")).await.unwrap()).await;

    assert_eq!(html.matches("class=\"panel chunk-panel\"").count(), 0);
    assert!(html.contains("Final Answer"));
    assert!(html.contains("Nothing relevant."));
}

#[tokio::test]
async fn test_empty_form_shows_warning() {
    let retriever = StubRetriever::answering(&["x"], "y");
    let app = build_router(state(concrete_docs(), retriever.clone()));

    let html = body_text(app.oneshot(form_post("  ")).await.unwrap()).await;

    assert!(html.contains("notice-warning"));
    assert!(html.contains("Please enter a question."));
    assert!(!html.contains("Final Answer"));
    assert_eq!(retriever.calls(), 0);
}

#[tokio::test]
async fn test_form_without_documents_shows_error() {
    let retriever = StubRetriever::answering(&["x"], "y");
    let app = build_router(state(missing_folder(), retriever.clone()));

    let html = body_text(app.oneshot(form_post("concrete")).await.unwrap()).await;

    assert!(html.contains("Documents not loaded. Fix data folder first."));
    assert_eq!(retriever.calls(), 0);
}

#[tokio::test]
async fn test_retriever_failure_is_shown_inline() {
    let retriever = StubRetriever::failing("model offline");
    let app = build_router(state(concrete_docs(), retriever.clone()));

    let response = app.oneshot(form_post("concrete")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("The question could not be answered"));
    assert!(html.contains("model offline"));
    assert_eq!(retriever.calls(), 1);
}

#[tokio::test]
async fn test_api_ask_returns_numbered_chunks() {
    let retriever = StubRetriever::answering(&["Concrete must cure for 28 days."], "28 days.");
    let app = build_router(state(concrete_docs(), retriever));

    let response = app
        .oneshot(json_post(serde_json::json!({ "query": "How long does concrete take to cure?" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["answer"], "28 days.");
    assert_eq!(body["chunks"].as_array().unwrap().len(), 1);
    assert_eq!(body["chunks"][0]["index"], 1);
    assert_eq!(body["chunks"][0]["text"], "Concrete must cure for 28 days.");
}

#[tokio::test]
async fn test_api_ask_rejections() {
    let retriever = StubRetriever::answering(&["x"], "y");

    let app = build_router(state(concrete_docs(), retriever.clone()));
    let response = app
        .oneshot(json_post(serde_json::json!({ "query": "" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["error"], "empty_query");

    let app = build_router(state(missing_folder(), retriever.clone()));
    let response = app
        .oneshot(json_post(serde_json::json!({ "query": "concrete" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["error"], "documents_unavailable");
    assert_eq!(body["message"], "Documents not loaded. Fix data folder first.");

    assert_eq!(retriever.calls(), 0);
}

#[tokio::test]
async fn test_api_documents_lists_names_and_sizes() {
    let retriever = StubRetriever::answering(&[], "");
    let app = build_router(state(
        loaded(&[("a.txt", "Concrete must cure for 28 days."), ("b.txt", "Hard hats.")]),
        retriever,
    ));

    let response = app
        .oneshot(Request::builder().uri("/api/documents").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["count"], 2);
    assert_eq!(body["documents"][0]["name"], "a.txt");
    assert_eq!(body["documents"][0]["bytes"], 31);
    assert_eq!(body["documents"][1]["name"], "b.txt");
}

#[tokio::test]
async fn test_health() {
    let app = build_router(state(concrete_docs(), StubRetriever::answering(&[], "")));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "OK");
}
