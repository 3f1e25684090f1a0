//! Application Layer - Routing and resolution
//!
//! Composes the domain and ports into the gateway's control flow:
//! - `gateway`: provider router with cache tiers and fallback
//! - `resolver`: ordered auth-strategy fallback per provider call
//! - `timeout`: deadline guard around each outbound attempt

pub mod gateway;
pub mod resolver;
pub mod timeout;

pub use gateway::{CacheSnapshot, CapabilityRoute, MarketGateway, FALLBACK_PROVIDER};
