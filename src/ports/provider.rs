//! Provider binding port
//!
//! A binding couples one provider to one capability: it knows how to
//! build the provider-specific request from capability-level arguments
//! and how to reshape the provider's payload into the capability's
//! canonical form. The router consumes ordered lists of bindings and
//! never looks inside them.

use serde_json::Value;

use crate::domain::capability::RouteArgs;
use crate::domain::error::GatewayError;
use crate::domain::provider::{ProviderSpec, RequestDraft};

pub trait ProviderBinding: Send + Sync {
    /// Static spec for this provider (name, base URL, auth, timeout)
    fn spec(&self) -> &ProviderSpec;

    /// Build the typed request for the given arguments
    fn build_request(&self, args: &RouteArgs) -> Result<RequestDraft, GatewayError>;

    /// Reshape the raw provider payload into the canonical capability
    /// shape. Missing optional fields become JSON null, never zero.
    fn normalize(&self, raw: Value, args: &RouteArgs) -> Result<Value, GatewayError>;
}
