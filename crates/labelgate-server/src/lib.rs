//! Labelgate Server
//!
//! HTTP surface for text classification:
//! - `POST /analisar-comentario` classifies free text through the configured
//!   provider
//! - `GET /` serves the chat-style page that exercises it
//! - `GET /health` and `GET /metrics` for operators

pub mod cli;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod static_files;

pub use cli::Cli;
pub use config::ServerConfig;
pub use error::AppError;
pub use routes::create_router;
pub use state::AppState;
