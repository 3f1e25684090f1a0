//! Auth-method resolver
//!
//! Some providers accept their demo-tier keys inconsistently across
//! endpoints: one endpoint wants the key as a query parameter, the next
//! wants a header. The resolver tries the provider's declared credential
//! placements in order until one is accepted.
//!
//! Only 401/403 advances the loop. Any other failure (429, 5xx,
//! network, timeout) stops it and propagates: re-sending the key
//! differently cannot fix those, and retrying burns quota while hiding
//! the real error. The winning strategy is not remembered across calls
//! since acceptance varies per endpoint within one provider.

use crate::application::timeout::deadline;
use crate::domain::error::GatewayError;
use crate::domain::provider::{key_preview, ProviderSpec, RequestDraft};
use crate::ports::transport::{Transport, TransportResponse};

const DETAIL_LIMIT: usize = 200;

pub async fn resolve(
    transport: &dyn Transport,
    spec: &ProviderSpec,
    draft: &RequestDraft,
    api_key: Option<&str>,
) -> Result<TransportResponse, GatewayError> {
    let key = api_key.filter(|k| !k.is_empty());

    // Unauthenticated path: no key on hand or nothing declared.
    let Some(key) = key else {
        let response = attempt(transport, spec, draft.clone()).await?;
        return classify_single(response);
    };
    if spec.auth_strategies.is_empty() {
        let response = attempt(transport, spec, draft.clone()).await?;
        return classify_single(response);
    }

    let attempts = spec.auth_strategies.len();
    let mut last_status = 0u16;
    for strategy in &spec.auth_strategies {
        let mut authed = draft.clone();
        strategy.apply(&mut authed, key);
        let response = attempt(transport, spec, authed).await?;
        if response.is_success() {
            return Ok(response);
        }
        match response.status {
            401 | 403 => {
                tracing::warn!(
                    provider = spec.name,
                    strategy = %strategy.describe(),
                    status = response.status,
                    key = %key_preview(key),
                    "credential placement rejected, trying next"
                );
                last_status = response.status;
            }
            429 => return Err(GatewayError::RateLimited),
            status => {
                return Err(GatewayError::Upstream {
                    status,
                    detail: truncate(&response.body),
                })
            }
        }
    }

    Err(GatewayError::AllAuthMethodsFailed {
        attempts,
        last_status,
    })
}

async fn attempt(
    transport: &dyn Transport,
    spec: &ProviderSpec,
    draft: RequestDraft,
) -> Result<TransportResponse, GatewayError> {
    deadline(spec.timeout, transport.execute(draft.into_prepared(spec))).await
}

fn classify_single(response: TransportResponse) -> Result<TransportResponse, GatewayError> {
    if response.is_success() {
        return Ok(response);
    }
    match response.status {
        401 | 403 => Err(GatewayError::AuthRejected {
            status: response.status,
        }),
        429 => Err(GatewayError::RateLimited),
        status => Err(GatewayError::Upstream {
            status,
            detail: truncate(&response.body),
        }),
    }
}

fn truncate(body: &str) -> String {
    if body.len() <= DETAIL_LIMIT {
        body.to_string()
    } else {
        let cut = body
            .char_indices()
            .take_while(|(i, _)| *i < DETAIL_LIMIT)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}…", &body[..cut])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::provider::AuthStrategy;
    use crate::ports::mocks::ScriptedTransport;

    fn keyed_spec() -> ProviderSpec {
        ProviderSpec::new("gecko", "https://example.test").with_auth(vec![
            AuthStrategy::QueryParam("demo_key"),
            AuthStrategy::Header("x-demo-key"),
            AuthStrategy::Bearer,
        ])
    }

    #[tokio::test]
    async fn test_strategies_tried_in_declared_order_once_each() {
        let transport = ScriptedTransport::new()
            .with_response(401, "{}")
            .with_response(403, "{}")
            .with_response(200, r#"{"ok":true}"#);
        let spec = keyed_spec();
        let draft = RequestDraft::get("/global");

        let response = resolve(&transport, &spec, &draft, Some("k123"))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        let requests = transport.requests();
        assert_eq!(requests.len(), 3);
        assert!(requests[0].url.contains("demo_key=k123"));
        assert_eq!(requests[1].header("x-demo-key"), Some("k123"));
        assert_eq!(requests[2].header("authorization"), Some("Bearer k123"));
    }

    #[tokio::test]
    async fn test_rate_limit_short_circuits_strategy_loop() {
        let transport = ScriptedTransport::new().with_response(429, "{}");
        let spec = keyed_spec();
        let draft = RequestDraft::get("/global");

        let result = resolve(&transport, &spec, &draft, Some("k123")).await;

        assert!(matches!(result, Err(GatewayError::RateLimited)));
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_server_error_short_circuits_strategy_loop() {
        let transport = ScriptedTransport::new().with_response(503, "busy");
        let spec = keyed_spec();
        let draft = RequestDraft::get("/global");

        let result = resolve(&transport, &spec, &draft, Some("k123")).await;

        match result {
            Err(GatewayError::Upstream { status, .. }) => assert_eq!(status, 503),
            other => panic!("expected upstream error, got {other:?}"),
        }
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_exhausted_strategies_report_last_status() {
        let transport = ScriptedTransport::new()
            .with_response(401, "{}")
            .with_response(401, "{}")
            .with_response(403, "{}");
        let spec = keyed_spec();
        let draft = RequestDraft::get("/global");

        let result = resolve(&transport, &spec, &draft, Some("k123")).await;

        match result {
            Err(GatewayError::AllAuthMethodsFailed {
                attempts,
                last_status,
            }) => {
                assert_eq!(attempts, 3);
                assert_eq!(last_status, 403);
            }
            other => panic!("expected auth exhaustion, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_no_key_makes_single_plain_attempt() {
        let transport = ScriptedTransport::new().with_response(200, r#"{"ok":true}"#);
        let spec = keyed_spec();
        let draft = RequestDraft::get("/global");

        let response = resolve(&transport, &spec, &draft, None).await.unwrap();

        assert_eq!(response.status, 200);
        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert!(!requests[0].url.contains("demo_key"));
        assert!(requests[0].header("authorization").is_none());
    }

    #[tokio::test]
    async fn test_unauthenticated_provider_rejection_classified() {
        let transport = ScriptedTransport::new().with_response(418, "teapot");
        let spec = ProviderSpec::new("binance", "https://example.test");
        let draft = RequestDraft::get("/depth");

        let result = resolve(&transport, &spec, &draft, None).await;

        match result {
            Err(GatewayError::Upstream { status, detail }) => {
                assert_eq!(status, 418);
                assert_eq!(detail, "teapot");
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_network_failure_propagates() {
        let transport =
            ScriptedTransport::new().with_failure(GatewayError::Network("refused".into()));
        let spec = keyed_spec();
        let draft = RequestDraft::get("/global");

        let result = resolve(&transport, &spec, &draft, Some("k123")).await;

        assert!(matches!(result, Err(GatewayError::Network(_))));
        assert_eq!(transport.request_count(), 1);
    }
}
