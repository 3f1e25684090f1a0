//! HTTP error mapping
//!
//! Gateway failures that reach the HTTP boundary mirror the upstream
//! failure class: 408 for timeouts, 401 for exhausted auth, 429 for
//! rate limits, 502-class for unreachable upstreams. Degraded fallback
//! responses never come through here; they are 200s with the degraded
//! flag set in the envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::domain::error::GatewayError;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub GatewayError);

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    details: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.http_status()).unwrap_or(StatusCode::BAD_GATEWAY);
        let body = Json(ErrorBody {
            error: self.0.label().to_string(),
            details: self.0.to_string(),
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_maps_to_408() {
        let response = ApiError(GatewayError::Timeout { limit_millis: 10_000 }).into_response();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }

    #[test]
    fn test_rate_limit_maps_to_429() {
        let response = ApiError(GatewayError::RateLimited).into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_exhausted_auth_maps_to_401() {
        let response = ApiError(GatewayError::AllAuthMethodsFailed {
            attempts: 4,
            last_status: 403,
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_network_failure_maps_to_502() {
        let response = ApiError(GatewayError::Network("refused".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
