//! trackrec server - HTTP REST API for playlist track recommendations
//!
//! Loads the vocabulary, embedding and neighbour artifacts once at startup
//! and answers recommendation requests from the shared read-only model.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! - `GET /` - API information
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe (503 while the model is unavailable)
//! - `GET /metrics` - Prometheus metrics
//! - `GET /api/v1/model` - Loaded model metadata
//! - `POST /predict` - Recommend tracks for `{"track_uris": [...], "k": n}`
//! - `POST /api/v1/recommend` - Same as `/predict`
//!
//! Errors use the envelope `{"error": {"code": ..., "message": ...}}` with
//! `VALIDATION_ERROR` (400) for malformed bodies and `MODEL_UNAVAILABLE`
//! (503) when the artifacts failed to load.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;
pub mod telemetry;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server, with_request_timeout};
pub use state::ServerState;
