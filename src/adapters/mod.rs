//! Adapters Layer - External System Implementations
//!
//! Implementations of the port traits plus the outer surfaces:
//! - `providers`: upstream market-data API bindings and routing table
//! - `cache`: in-memory and file-backed cache stores
//! - `transport`: shared reqwest client behind the Transport trait
//! - `rest`: inbound axum HTTP surface
//! - `indexnow`: search-index push notification submitter
//! - `cli`: clap argument definitions

pub mod cache;
pub mod cli;
pub mod indexnow;
pub mod providers;
pub mod rest;
pub mod transport;

pub use cache::{FileCache, TtlCache};
pub use cli::CliApp;
pub use indexnow::IndexNowSubmitter;
pub use transport::ReqwestTransport;
