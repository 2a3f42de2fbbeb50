//! CLI command implementations

mod ask;
mod docs;
mod serve;

pub use ask::AskCommand;
pub use docs::DocsCommand;
pub use serve::ServeCommand;

use minirag_core::{config::AppConfig, AppResult};
use minirag_knowledge::{load_documents, RagPipeline};
use minirag_web::AppState;
use std::sync::Arc;

/// Load the document folder and wire the retrieval pipeline into shared state.
pub(crate) fn build_state(config: &AppConfig) -> AppResult<AppState> {
    let loaded = load_documents(&config.data_path());
    for notice in &loaded.notices {
        tracing::warn!("{}", notice);
    }

    let pipeline = RagPipeline::from_config(config)?;
    AppState::from_config(config, loaded, Arc::new(pipeline))
}

#[cfg(test)]
mod tests {
    use super::*;
    use minirag_web::handle_ask;
    use std::fs;
    use tempfile::TempDir;

    fn config_for(dir: &TempDir) -> AppConfig {
        let mut config = AppConfig {
            workspace: dir.path().to_path_buf(),
            ..AppConfig::default()
        };
        config.answer.provider = "extractive".to_string();
        config
    }

    #[tokio::test]
    async fn test_build_state_loads_data_folder() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("data")).unwrap();
        fs::write(
            dir.path().join("data/curing.txt"),
            "Concrete curing takes about 28 days to reach full strength.",
        )
        .unwrap();

        let state = build_state(&config_for(&dir)).unwrap();
        assert_eq!(state.documents().len(), 1);
        assert!(state.load_notices().is_empty());

        let outcome = handle_ask(&state, "How long does concrete curing take?")
            .await
            .unwrap();
        assert!(!outcome.chunks.is_empty());
        assert!(outcome.answer.contains("28 days"));
    }

    #[tokio::test]
    async fn test_build_state_missing_folder_keeps_notice() {
        let dir = TempDir::new().unwrap();

        let state = build_state(&config_for(&dir)).unwrap();
        assert!(state.documents().is_empty());
        assert_eq!(state.load_notices().len(), 1);
    }
}
