//! Web front end for the Mini RAG assistant.
//!
//! Serves a single page with a question box and renders the retrieved chunks
//! and the final answer, plus a small JSON API mirroring the page.

pub mod ask;
pub mod error;
pub mod page;
pub mod routes;
pub mod server;
pub mod state;

#[cfg(test)]
mod tests;

pub use ask::{handle_ask, AskRejection};
pub use error::ApiError;
pub use page::{PageRenderer, PageView};
pub use server::{build_router, WebServer};
pub use state::AppState;
