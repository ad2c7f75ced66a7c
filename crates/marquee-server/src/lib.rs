//! # marquee-server
//!
//! HTTP server for the Marquee ticket-booking API.
//!
//! Wires the identity pipeline (token service, read-through user cache,
//! authorization gate) into an axum router together with the catalog
//! handlers, configuration loading, and tracing bootstrap.

pub mod bootstrap;
pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;
pub mod observability;
pub mod password;
pub mod server;
pub mod state;

pub use bootstrap::build_state;
pub use config::{AppConfig, load_config};
pub use error::{ApiError, ApiResult};
pub use server::{MarqueeServer, ServerBuilder, build_app};
pub use state::AppState;
