//! Serve command

use clap::Args;
use minirag_core::{config::AppConfig, AppResult};
use minirag_web::WebServer;

/// Serve the question answering page
#[derive(Args, Debug)]
pub struct ServeCommand {
    /// Interface to bind (overrides server.host)
    #[arg(long, env = "MINIRAG_HOST")]
    pub host: Option<String>,

    /// Port to bind (overrides server.port)
    #[arg(long, env = "MINIRAG_PORT")]
    pub port: Option<u16>,
}

impl ServeCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let state = super::build_state(config)?;

        tracing::info!(
            "Loaded {} documents from {:?}",
            state.documents().len(),
            config.data_path()
        );

        let server = WebServer::new(config.server.clone(), state);
        println!("Mini RAG listening on http://{}", server.address());

        server.start().await
    }
}
