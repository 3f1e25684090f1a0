//! Domain Layer - Core gateway types
//!
//! Pure types shared across the gateway: capabilities and request
//! arguments, provider specifications with typed request building, the
//! error taxonomy, the aggregated result envelope, and deterministic
//! cache keys. No I/O happens here; external interactions go through
//! the ports layer.

pub mod cache_key;
pub mod capability;
pub mod error;
pub mod provider;
pub mod result;

pub use cache_key::CacheKey;
pub use capability::{Capability, RouteArgs};
pub use error::GatewayError;
pub use provider::{
    key_preview, AuthStrategy, HttpMethod, PreparedRequest, ProviderSpec, RequestDraft,
};
pub use result::AggregatedResult;
