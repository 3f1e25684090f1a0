//! CoinGecko bindings
//!
//! Primary source for trending, global stats, listings and coin
//! detail, plus a raw passthrough. Demo-tier keys are accepted
//! inconsistently across CoinGecko endpoints, hence the four-step
//! credential chain: the resolver walks it top to bottom on every call.

use std::time::Duration;

use serde_json::{json, Value};

use crate::domain::capability::RouteArgs;
use crate::domain::error::GatewayError;
use crate::domain::provider::{AuthStrategy, ProviderSpec, RequestDraft};
use crate::ports::provider::ProviderBinding;

use super::{field, ptr};

pub const NAME: &str = "coingecko";

const MAX_PER_PAGE: u32 = 250;

pub fn spec(base_url: &str, timeout: Duration) -> ProviderSpec {
    ProviderSpec::new(NAME, base_url)
        .with_auth(vec![
            AuthStrategy::QueryParam("x_cg_demo_api_key"),
            AuthStrategy::Header("x-cg-demo-api-key"),
            AuthStrategy::QueryParam("x_cg_pro_api_key"),
            AuthStrategy::Header("x-cg-pro-api-key"),
        ])
        .with_header("accept", "application/json")
        .with_timeout(timeout)
}

/// `/search/trending`
pub struct Trending {
    spec: ProviderSpec,
}

impl Trending {
    pub fn new(spec: ProviderSpec) -> Self {
        Self { spec }
    }
}

impl ProviderBinding for Trending {
    fn spec(&self) -> &ProviderSpec {
        &self.spec
    }

    fn build_request(&self, _args: &RouteArgs) -> Result<RequestDraft, GatewayError> {
        Ok(RequestDraft::get("/search/trending"))
    }

    fn normalize(&self, raw: Value, _args: &RouteArgs) -> Result<Value, GatewayError> {
        let coins = raw
            .get("coins")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                GatewayError::MalformedPayload("trending response missing coins array".into())
            })?;
        let coins: Vec<Value> = coins
            .iter()
            .map(|entry| {
                // Trending entries nest the coin under "item".
                let item = entry.get("item").unwrap_or(entry);
                json!({
                    "id": field(item, "id"),
                    "name": field(item, "name"),
                    "symbol": field(item, "symbol"),
                    "market_cap_rank": field(item, "market_cap_rank"),
                    "score": field(item, "score"),
                    "price_usd": ptr(item, "/data/price"),
                })
            })
            .collect();
        Ok(json!({ "coins": coins }))
    }
}

/// `/global`
pub struct Global {
    spec: ProviderSpec,
}

impl Global {
    pub fn new(spec: ProviderSpec) -> Self {
        Self { spec }
    }
}

impl ProviderBinding for Global {
    fn spec(&self) -> &ProviderSpec {
        &self.spec
    }

    fn build_request(&self, _args: &RouteArgs) -> Result<RequestDraft, GatewayError> {
        Ok(RequestDraft::get("/global"))
    }

    fn normalize(&self, raw: Value, _args: &RouteArgs) -> Result<Value, GatewayError> {
        // CoinGecko wraps the stats in a "data" envelope.
        let data = raw.get("data").unwrap_or(&raw);
        Ok(json!({
            "active_cryptocurrencies": field(data, "active_cryptocurrencies"),
            "markets": field(data, "markets"),
            "total_market_cap": field(data, "total_market_cap"),
            "total_volume": field(data, "total_volume"),
            "market_cap_percentage": field(data, "market_cap_percentage"),
            "market_cap_change_percentage_24h_usd":
                field(data, "market_cap_change_percentage_24h_usd"),
            "updated_at": field(data, "updated_at"),
        }))
    }
}

/// `/coins/markets`
pub struct Markets {
    spec: ProviderSpec,
}

impl Markets {
    pub fn new(spec: ProviderSpec) -> Self {
        Self { spec }
    }
}

impl ProviderBinding for Markets {
    fn spec(&self) -> &ProviderSpec {
        &self.spec
    }

    fn build_request(&self, args: &RouteArgs) -> Result<RequestDraft, GatewayError> {
        let vs_currency = args.vs_currency.clone().unwrap_or_else(|| "usd".to_string());
        Ok(RequestDraft::get("/coins/markets")
            .query("vs_currency", vs_currency)
            .query("order", "market_cap_desc")
            .query("page", args.page.unwrap_or(1).max(1))
            .query("per_page", args.per_page.unwrap_or(100).clamp(1, MAX_PER_PAGE))
            .query("sparkline", "false"))
    }

    fn normalize(&self, raw: Value, _args: &RouteArgs) -> Result<Value, GatewayError> {
        let entries = raw.as_array().ok_or_else(|| {
            GatewayError::MalformedPayload("markets response is not an array".into())
        })?;
        let coins: Vec<Value> = entries
            .iter()
            .map(|coin| {
                json!({
                    "id": field(coin, "id"),
                    "symbol": field(coin, "symbol"),
                    "name": field(coin, "name"),
                    "current_price": field(coin, "current_price"),
                    "market_cap": field(coin, "market_cap"),
                    "market_cap_rank": field(coin, "market_cap_rank"),
                    "total_volume": field(coin, "total_volume"),
                    "price_change_percentage_24h": field(coin, "price_change_percentage_24h"),
                    "last_updated": field(coin, "last_updated"),
                })
            })
            .collect();
        Ok(json!({ "coins": coins }))
    }
}

/// `/coins/{id}`
pub struct Detail {
    spec: ProviderSpec,
}

impl Detail {
    pub fn new(spec: ProviderSpec) -> Self {
        Self { spec }
    }
}

impl ProviderBinding for Detail {
    fn spec(&self) -> &ProviderSpec {
        &self.spec
    }

    fn build_request(&self, args: &RouteArgs) -> Result<RequestDraft, GatewayError> {
        let coin_id = args
            .coin_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| GatewayError::InvalidArgs("coin id is required".into()))?;
        Ok(
            RequestDraft::get(format!("/coins/{}", urlencoding::encode(coin_id)))
                .query("localization", "false")
                .query("tickers", "false")
                .query("market_data", "true")
                .query("community_data", "false")
                .query("developer_data", "false"),
        )
    }

    fn normalize(&self, raw: Value, _args: &RouteArgs) -> Result<Value, GatewayError> {
        if raw.get("id").is_none() {
            return Err(GatewayError::MalformedPayload(
                "coin detail response missing id".into(),
            ));
        }
        Ok(json!({
            "id": field(&raw, "id"),
            "symbol": field(&raw, "symbol"),
            "name": field(&raw, "name"),
            "market_data": {
                "current_price_usd": ptr(&raw, "/market_data/current_price/usd"),
                "market_cap_usd": ptr(&raw, "/market_data/market_cap/usd"),
                "total_volume_usd": ptr(&raw, "/market_data/total_volume/usd"),
                "high_24h_usd": ptr(&raw, "/market_data/high_24h/usd"),
                "low_24h_usd": ptr(&raw, "/market_data/low_24h/usd"),
                "price_change_percentage_24h":
                    ptr(&raw, "/market_data/price_change_percentage_24h"),
            },
            "last_updated": field(&raw, "last_updated"),
        }))
    }
}

/// Raw passthrough under `/api/coingecko/...`. The suffix and query are
/// forwarded after auth transformation; the payload is returned as-is.
pub struct Proxy {
    spec: ProviderSpec,
}

impl Proxy {
    pub fn new(spec: ProviderSpec) -> Self {
        Self { spec }
    }
}

impl ProviderBinding for Proxy {
    fn spec(&self) -> &ProviderSpec {
        &self.spec
    }

    fn build_request(&self, args: &RouteArgs) -> Result<RequestDraft, GatewayError> {
        let subpath = args
            .subpath
            .as_deref()
            .map(|p| p.trim_start_matches('/'))
            .filter(|p| !p.is_empty())
            .ok_or_else(|| GatewayError::InvalidArgs("passthrough path is required".into()))?;
        if subpath.split('/').any(|segment| segment == "..") {
            return Err(GatewayError::InvalidArgs(
                "passthrough path may not traverse upwards".into(),
            ));
        }
        Ok(RequestDraft::get(format!("/{subpath}")).queries(&args.passthrough))
    }

    fn normalize(&self, raw: Value, _args: &RouteArgs) -> Result<Value, GatewayError> {
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_spec() -> ProviderSpec {
        spec("https://api.coingecko.com/api/v3", Duration::from_secs(10))
    }

    fn args() -> RouteArgs {
        RouteArgs::default()
    }

    #[test]
    fn test_spec_declares_demo_before_pro() {
        let spec = test_spec();
        assert_eq!(spec.auth_strategies.len(), 4);
        assert_eq!(
            spec.auth_strategies[0],
            AuthStrategy::QueryParam("x_cg_demo_api_key")
        );
        assert_eq!(
            spec.auth_strategies[3],
            AuthStrategy::Header("x-cg-pro-api-key")
        );
    }

    #[test]
    fn test_trending_normalization() {
        let binding = Trending::new(test_spec());
        let raw = json!({
            "coins": [
                {"item": {"id": "bonk", "name": "Bonk", "symbol": "BONK",
                          "market_cap_rank": 55, "score": 0,
                          "data": {"price": 0.000021}}},
                {"item": {"id": "pepe", "name": "Pepe", "symbol": "PEPE"}}
            ]
        });

        let normalized = binding.normalize(raw, &args()).unwrap();

        let coins = normalized["coins"].as_array().unwrap();
        assert_eq!(coins.len(), 2);
        assert_eq!(coins[0]["id"], "bonk");
        assert_eq!(coins[0]["price_usd"], json!(0.000021));
        // Absent price is null, not zero.
        assert_eq!(coins[1]["price_usd"], Value::Null);
        assert_eq!(coins[1]["market_cap_rank"], Value::Null);
    }

    #[test]
    fn test_trending_missing_coins_is_malformed() {
        let binding = Trending::new(test_spec());
        let result = binding.normalize(json!({"unexpected": true}), &args());
        assert!(matches!(result, Err(GatewayError::MalformedPayload(_))));
    }

    #[test]
    fn test_global_unwraps_data_envelope() {
        let binding = Global::new(test_spec());
        let raw = json!({"data": {"total_market_cap": {"usd": 123}}});

        let normalized = binding.normalize(raw, &args()).unwrap();

        assert_eq!(normalized["total_market_cap"]["usd"], 123);
        assert_eq!(normalized["total_volume"], Value::Null);
        assert_eq!(normalized["markets"], Value::Null);
    }

    #[test]
    fn test_markets_request_defaults() {
        let binding = Markets::new(test_spec());
        let draft = binding.build_request(&args()).unwrap();
        let request = draft.into_prepared(binding.spec());

        assert!(request.url.contains("/coins/markets?"));
        assert!(request.url.contains("vs_currency=usd"));
        assert!(request.url.contains("page=1"));
        assert!(request.url.contains("per_page=100"));
    }

    #[test]
    fn test_markets_per_page_clamped() {
        let binding = Markets::new(test_spec());
        let request_args = RouteArgs {
            per_page: Some(5000),
            ..Default::default()
        };
        let draft = binding.build_request(&request_args).unwrap();
        let request = draft.into_prepared(binding.spec());
        assert!(request.url.contains("per_page=250"));
    }

    #[test]
    fn test_markets_normalization_preserves_zero_volume() {
        let binding = Markets::new(test_spec());
        let raw = json!([
            {"id": "bitcoin", "symbol": "btc", "name": "Bitcoin",
             "current_price": 97000.0, "total_volume": 0}
        ]);

        let normalized = binding.normalize(raw, &args()).unwrap();

        let coin = &normalized["coins"][0];
        assert_eq!(coin["total_volume"], json!(0));
        assert_eq!(coin["market_cap"], Value::Null);
    }

    #[test]
    fn test_detail_requires_coin_id() {
        let binding = Detail::new(test_spec());
        let result = binding.build_request(&args());
        assert!(matches!(result, Err(GatewayError::InvalidArgs(_))));
    }

    #[test]
    fn test_detail_normalization_flattens_usd_fields() {
        let binding = Detail::new(test_spec());
        let raw = json!({
            "id": "bitcoin", "symbol": "btc", "name": "Bitcoin",
            "market_data": {
                "current_price": {"usd": 97000.0},
                "market_cap": {"usd": 1900000000000u64}
            },
            "last_updated": "2025-01-01T00:00:00Z"
        });

        let normalized = binding
            .normalize(
                raw,
                &RouteArgs {
                    coin_id: Some("bitcoin".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(normalized["market_data"]["current_price_usd"], 97000.0);
        assert_eq!(normalized["market_data"]["low_24h_usd"], Value::Null);
    }

    #[test]
    fn test_proxy_forwards_path_and_query() {
        let binding = Proxy::new(test_spec());
        let request_args = RouteArgs {
            subpath: Some("simple/price".to_string()),
            passthrough: vec![
                ("ids".to_string(), "bitcoin".to_string()),
                ("vs_currencies".to_string(), "usd".to_string()),
            ],
            ..Default::default()
        };

        let draft = binding.build_request(&request_args).unwrap();
        let request = draft.into_prepared(binding.spec());

        assert!(request
            .url
            .ends_with("/simple/price?ids=bitcoin&vs_currencies=usd"));
    }

    #[test]
    fn test_proxy_rejects_parent_traversal() {
        let binding = Proxy::new(test_spec());
        let request_args = RouteArgs {
            subpath: Some("../internal".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            binding.build_request(&request_args),
            Err(GatewayError::InvalidArgs(_))
        ));
    }
}
