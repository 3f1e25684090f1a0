//! Inbound HTTP surface
//!
//! axum routes over the gateway: capability endpoints, the CoinGecko
//! passthrough, IndexNow submission plus key file, and health.

pub mod error;
pub mod routes;
pub mod server;

pub use error::{ApiError, ApiResult};
pub use server::{build_router, serve, AppState};
