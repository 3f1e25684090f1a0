//! Tickergate - Market-Data Aggregation Gateway
//!
//! Fronts multiple cryptocurrency market-data providers with ordered
//! failover, credential-placement fallback, a two-tier cache and static
//! degradation when everything upstream fails.
//!
//! # Modules
//!
//! - `domain`: Capabilities, provider specs, errors, result envelope, cache keys
//! - `ports`: Trait seams (Transport, CacheStore, ProviderBinding) and test doubles
//! - `application`: Provider router, auth resolver, deadline guard
//! - `adapters`: Provider bindings, caches, HTTP surface, submitter, CLI
//! - `config`: Configuration loading and validation

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
