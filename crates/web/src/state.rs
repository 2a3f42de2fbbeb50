//! Shared application state for the web server.

use crate::page::{PageRenderer, PageView};
use minirag_core::config::{AppConfig, UiConfig};
use minirag_core::AppResult;
use minirag_knowledge::{DocumentSet, LoadedDocuments, Notice, Retriever};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Cheap to clone; every handler gets its own handle.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Loaded once at start-up, never modified
    documents: DocumentSet,
    /// Notices raised while loading, shown on every render
    load_notices: Vec<Notice>,
    retriever: Arc<dyn Retriever>,
    renderer: PageRenderer,
    /// Bounds how many questions reach the retriever at once
    query_gate: Semaphore,
    ui: UiConfig,
}

impl AppState {
    pub fn new(
        loaded: LoadedDocuments,
        retriever: Arc<dyn Retriever>,
        ui: UiConfig,
        max_concurrent_queries: usize,
    ) -> AppResult<Self> {
        let renderer = PageRenderer::new()?;
        let permits = max_concurrent_queries.max(1);

        tracing::info!(
            "Web state ready: {} documents, {} load notices, retriever '{}', {} concurrent queries",
            loaded.documents.len(),
            loaded.notices.len(),
            retriever.name(),
            permits
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                documents: loaded.documents,
                load_notices: loaded.notices,
                retriever,
                renderer,
                query_gate: Semaphore::new(permits),
                ui,
            }),
        })
    }

    /// Build state from the merged configuration.
    pub fn from_config(
        config: &AppConfig,
        loaded: LoadedDocuments,
        retriever: Arc<dyn Retriever>,
    ) -> AppResult<Self> {
        Self::new(
            loaded,
            retriever,
            config.ui.clone(),
            config.server.max_concurrent_queries,
        )
    }

    pub fn documents(&self) -> &DocumentSet {
        &self.inner.documents
    }

    pub fn load_notices(&self) -> &[Notice] {
        &self.inner.load_notices
    }

    pub fn retriever(&self) -> &Arc<dyn Retriever> {
        &self.inner.retriever
    }

    pub fn renderer(&self) -> &PageRenderer {
        &self.inner.renderer
    }

    pub fn query_gate(&self) -> &Semaphore {
        &self.inner.query_gate
    }

    pub fn ui(&self) -> &UiConfig {
        &self.inner.ui
    }

    /// Page view carrying the header and load notices.
    pub fn page(&self) -> PageView {
        PageView::new(&self.inner.ui, &self.inner.load_notices)
    }
}
