//! HTML page rendering.
//!
//! The page is a single handlebars template compiled into the binary. Values
//! are HTML-escaped; the answer is emitted raw only when
//! `ui.raw_answer_markup` is enabled.

use handlebars::Handlebars;
use minirag_core::config::UiConfig;
use minirag_core::{AppError, AppResult};
use minirag_knowledge::{Notice, NoticeView, RagOutcome};
use serde::Serialize;

const TEMPLATE_NAME: &str = "index";
const TEMPLATE: &str = include_str!("../templates/index.hbs");

/// One numbered evidence panel.
#[derive(Debug, Clone, Serialize)]
pub struct ChunkPanel {
    /// 1-based display number
    pub index: usize,
    pub text: String,
    pub source: String,
    /// Formatted to two decimals
    pub score: String,
}

/// Everything the template needs for one render.
#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    pub title: String,
    pub subtitle: String,
    pub placeholder: String,
    pub query: String,
    pub notices: Vec<NoticeView>,
    pub answered: bool,
    pub chunks: Vec<ChunkPanel>,
    pub answer: String,
    pub raw_answer: bool,
}

impl PageView {
    /// Idle page: header, form and any standing notices.
    pub fn new(ui: &UiConfig, notices: &[Notice]) -> Self {
        Self {
            title: ui.title.clone(),
            subtitle: ui.subtitle.clone(),
            placeholder: ui.placeholder.clone(),
            query: String::new(),
            notices: notices.iter().map(NoticeView::from).collect(),
            answered: false,
            chunks: Vec::new(),
            answer: String::new(),
            raw_answer: ui.raw_answer_markup,
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_notice(mut self, notice: &Notice) -> Self {
        self.notices.push(NoticeView::from(notice));
        self
    }

    /// Result state: one panel per chunk in rank order, then the answer.
    pub fn with_outcome(mut self, outcome: &RagOutcome) -> Self {
        self.answered = true;
        self.chunks = outcome
            .chunks
            .iter()
            .enumerate()
            .map(|(i, chunk)| ChunkPanel {
                index: i + 1,
                text: chunk.text.clone(),
                source: chunk.source.clone(),
                score: format!("{:.2}", chunk.score),
            })
            .collect();
        self.answer = outcome.answer.clone();
        self
    }
}

pub struct PageRenderer {
    handlebars: Handlebars<'static>,
}

impl PageRenderer {
    pub fn new() -> AppResult<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        handlebars
            .register_template_string(TEMPLATE_NAME, TEMPLATE)
            .map_err(|e| AppError::Render(format!("Failed to register template: {}", e)))?;

        Ok(Self { handlebars })
    }

    pub fn render(&self, view: &PageView) -> AppResult<String> {
        self.handlebars
            .render(TEMPLATE_NAME, view)
            .map_err(|e| AppError::Render(format!("Failed to render page: {}", e)))
    }
}

impl std::fmt::Debug for PageRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageRenderer").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minirag_knowledge::RetrievedChunk;
    use std::path::PathBuf;

    fn render(view: &PageView) -> String {
        PageRenderer::new().unwrap().render(view).unwrap()
    }

    fn outcome(answer: &str) -> RagOutcome {
        RagOutcome::new(
            vec![RetrievedChunk::text_only("Concrete must cure for 28 days.")],
            answer,
        )
    }

    #[test]
    fn test_idle_page_has_form_and_no_panels() {
        let html = render(&PageView::new(&UiConfig::default(), &[]));

        assert!(html.contains("Mini RAG"));
        assert!(html.contains("Construction QA Assistant"));
        assert!(html.contains("name=\"query\""));
        assert!(html.contains(">Ask</button>"));
        assert!(!html.contains("class=\"panel chunk-panel\""));
        assert!(!html.contains("Final Answer"));
    }

    #[test]
    fn test_result_page_numbers_chunks() {
        let outcome = RagOutcome::new(
            vec![
                RetrievedChunk::text_only("first"),
                RetrievedChunk::text_only("second"),
            ],
            "answer",
        );
        let html = render(&PageView::new(&UiConfig::default(), &[]).with_outcome(&outcome));

        assert_eq!(html.matches("class=\"panel chunk-panel\"").count(), 2);
        assert!(html.contains("Chunk 1"));
        assert!(html.contains("Chunk 2"));
        assert!(html.find("Chunk 1") < html.find("Chunk 2"));
        assert!(html.find("Chunk 2") < html.find("Final Answer"));
    }

    #[test]
    fn test_chunk_panels_are_collapsible() {
        let outcome = RagOutcome::new(vec![RetrievedChunk::text_only("first")], "answer");
        let html = render(&PageView::new(&UiConfig::default(), &[]).with_outcome(&outcome));

        assert!(html.contains("<details class=\"panel chunk-panel\">"));
        assert!(html.contains("<summary>Chunk 1</summary>"));
    }

    #[test]
    fn test_answer_is_escaped_by_default() {
        let view = PageView::new(&UiConfig::default(), &[])
            .with_outcome(&outcome("<b>28</b> days"));
        let html = render(&view);

        assert!(html.contains("&lt;b&gt;28&lt;/b&gt; days"));
        assert!(!html.contains("<b>28</b>"));
    }

    #[test]
    fn test_raw_answer_markup_opt_in() {
        let ui = UiConfig {
            raw_answer_markup: true,
            ..Default::default()
        };
        let html = render(&PageView::new(&ui, &[]).with_outcome(&outcome("<b>28</b> days")));

        assert!(html.contains("<b>28</b> days"));
    }

    #[test]
    fn test_chunk_text_is_always_escaped() {
        let outcome = RagOutcome::new(vec![RetrievedChunk::text_only("<script>x</script>")], "ok");
        let ui = UiConfig {
            raw_answer_markup: true,
            ..Default::default()
        };
        let html = render(&PageView::new(&ui, &[]).with_outcome(&outcome));

        assert!(html.contains("&lt;script&gt;x&lt;/script&gt;"));
    }

    #[test]
    fn test_notices_are_rendered() {
        let notices = vec![Notice::MissingDataDirectory {
            path: PathBuf::from("data"),
        }];
        let html = render(&PageView::new(&UiConfig::default(), &notices).with_notice(&Notice::EmptyQuery));

        assert!(html.contains("notice-error"));
        assert!(html.contains("The data/ folder is missing."));
        assert!(html.contains("notice-warning"));
        assert!(html.contains("Please enter a question."));
    }
}
