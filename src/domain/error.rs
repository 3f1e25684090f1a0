//! Gateway error taxonomy
//!
//! Failures below the router boundary are recovered locally (next
//! strategy, next provider); only total exhaustion changes the response
//! shape, and even that resolves to degraded data when a fallback
//! dataset exists.

use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum GatewayError {
    /// An outbound call exceeded its deadline
    #[error("upstream call exceeded {limit_millis}ms deadline")]
    Timeout { limit_millis: u64 },

    /// Upstream rejected the credential placement (401/403)
    #[error("credential rejected with status {status}")]
    AuthRejected { status: u16 },

    /// Upstream returned 429
    #[error("upstream rate limit hit")]
    RateLimited,

    /// Any other non-2xx upstream status
    #[error("upstream returned status {status}: {detail}")]
    Upstream { status: u16, detail: String },

    /// Transport-level failure (DNS, connect, TLS, broken pipe)
    #[error("network failure: {0}")]
    Network(String),

    /// Body could not be decoded or is missing required structure
    #[error("payload could not be decoded: {0}")]
    MalformedPayload(String),

    /// Every declared credential placement was rejected
    #[error("all {attempts} credential placements rejected (last status {last_status})")]
    AllAuthMethodsFailed { attempts: usize, last_status: u16 },

    /// Every provider configured for a capability failed
    #[error("every provider failed for {capability}: {last}")]
    AllProvidersExhausted {
        capability: String,
        last: Box<GatewayError>,
    },

    /// Missing or unusable request argument
    #[error("invalid request argument: {0}")]
    InvalidArgs(String),

    /// No provider list configured for the requested capability
    #[error("no provider configured for {0}")]
    NoRoute(String),

    /// Persistent cache file unreadable or malformed (never fatal)
    #[error("persistent cache unreadable: {0}")]
    CacheCorrupt(String),
}

impl GatewayError {
    /// True for 401/403-class rejections, the only failures that advance
    /// the auth-strategy loop instead of aborting it
    pub fn is_auth_rejection(&self) -> bool {
        matches!(
            self,
            GatewayError::AuthRejected { .. } | GatewayError::AllAuthMethodsFailed { .. }
        )
    }

    /// HTTP status mirroring the failure class when no fallback data
    /// can be served
    pub fn http_status(&self) -> u16 {
        match self {
            GatewayError::Timeout { .. } => 408,
            GatewayError::AuthRejected { .. } | GatewayError::AllAuthMethodsFailed { .. } => 401,
            GatewayError::RateLimited => 429,
            GatewayError::Upstream { status, .. } if (400..600).contains(status) => *status,
            GatewayError::Upstream { .. } => 502,
            GatewayError::Network(_) | GatewayError::MalformedPayload(_) => 502,
            GatewayError::AllProvidersExhausted { last, .. } => last.http_status(),
            GatewayError::InvalidArgs(_) => 400,
            GatewayError::NoRoute(_) => 404,
            GatewayError::CacheCorrupt(_) => 500,
        }
    }

    /// Short kebab-case label for error bodies and logs
    pub fn label(&self) -> &'static str {
        match self {
            GatewayError::Timeout { .. } => "timeout",
            GatewayError::AuthRejected { .. } => "auth-rejected",
            GatewayError::RateLimited => "rate-limited",
            GatewayError::Upstream { .. } => "upstream-error",
            GatewayError::Network(_) => "network-error",
            GatewayError::MalformedPayload(_) => "malformed-payload",
            GatewayError::AllAuthMethodsFailed { .. } => "auth-exhausted",
            GatewayError::AllProvidersExhausted { .. } => "providers-exhausted",
            GatewayError::InvalidArgs(_) => "invalid-arguments",
            GatewayError::NoRoute(_) => "unknown-capability",
            GatewayError::CacheCorrupt(_) => "cache-corrupt",
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::MalformedPayload(err.to_string())
        } else {
            GatewayError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::MalformedPayload(err.to_string())
    }
}
