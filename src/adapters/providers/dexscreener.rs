//! DexScreener bindings
//!
//! Dedicated DEX aggregator, first choice for pair stats. Public API,
//! no credential required.

use std::time::Duration;

use serde_json::{json, Value};

use crate::domain::capability::RouteArgs;
use crate::domain::error::GatewayError;
use crate::domain::provider::{ProviderSpec, RequestDraft};
use crate::ports::provider::ProviderBinding;

use super::{field, ptr};

pub const NAME: &str = "dexscreener";

pub fn spec(base_url: &str, timeout: Duration) -> ProviderSpec {
    ProviderSpec::new(NAME, base_url).with_timeout(timeout)
}

/// `/latest/dex/pairs/{chain}/{pair}`
pub struct Pair {
    spec: ProviderSpec,
}

impl Pair {
    pub fn new(spec: ProviderSpec) -> Self {
        Self { spec }
    }
}

impl ProviderBinding for Pair {
    fn spec(&self) -> &ProviderSpec {
        &self.spec
    }

    fn build_request(&self, args: &RouteArgs) -> Result<RequestDraft, GatewayError> {
        let chain = args
            .chain
            .as_deref()
            .filter(|c| !c.is_empty())
            .ok_or_else(|| GatewayError::InvalidArgs("chain is required".into()))?;
        let pair = args
            .pair_address
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| GatewayError::InvalidArgs("pair address is required".into()))?;
        Ok(RequestDraft::get(format!(
            "/latest/dex/pairs/{}/{}",
            urlencoding::encode(&chain.to_lowercase()),
            urlencoding::encode(pair)
        )))
    }

    fn normalize(&self, raw: Value, _args: &RouteArgs) -> Result<Value, GatewayError> {
        // Single-pair lookups answer with a one-element "pairs" array;
        // some responses use a "pair" object instead.
        let pair = raw
            .pointer("/pairs/0")
            .or_else(|| raw.get("pair"))
            .filter(|p| !p.is_null())
            .ok_or_else(|| GatewayError::MalformedPayload("no pair in response".into()))?;
        Ok(json!({
            "pair_address": field(pair, "pairAddress"),
            "dex": field(pair, "dexId"),
            "base_token": {
                "address": ptr(pair, "/baseToken/address"),
                "name": ptr(pair, "/baseToken/name"),
                "symbol": ptr(pair, "/baseToken/symbol"),
            },
            "quote_token": {
                "address": ptr(pair, "/quoteToken/address"),
                "name": ptr(pair, "/quoteToken/name"),
                "symbol": ptr(pair, "/quoteToken/symbol"),
            },
            "price_usd": field(pair, "priceUsd"),
            "volume_24h": ptr(pair, "/volume/h24"),
            "liquidity_usd": ptr(pair, "/liquidity/usd"),
            "fdv": field(pair, "fdv"),
            "txns_24h": {
                "buys": ptr(pair, "/txns/h24/buys"),
                "sells": ptr(pair, "/txns/h24/sells"),
            },
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding() -> Pair {
        Pair::new(spec("https://api.dexscreener.com", Duration::from_secs(10)))
    }

    fn pair_args() -> RouteArgs {
        RouteArgs {
            chain: Some("Solana".to_string()),
            pair_address: Some("8sLbNZoA1cfnvMJLPfp98ZLAnFSYCFApfJKMbiXNLwxj".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_request_path_lowercases_chain() {
        let draft = binding().build_request(&pair_args()).unwrap();
        let request = draft.into_prepared(binding().spec());
        assert!(request
            .url
            .contains("/latest/dex/pairs/solana/8sLbNZoA1cfnvMJLPfp98ZLAnFSYCFApfJKMbiXNLwxj"));
    }

    #[test]
    fn test_missing_pair_address_rejected() {
        let args = RouteArgs {
            chain: Some("solana".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            binding().build_request(&args),
            Err(GatewayError::InvalidArgs(_))
        ));
    }

    #[test]
    fn test_normalization_canonical_shape() {
        let raw = json!({
            "schemaVersion": "1.0.0",
            "pairs": [{
                "pairAddress": "8sLb...wxj",
                "dexId": "raydium",
                "baseToken": {"address": "So11...112", "name": "Wrapped SOL", "symbol": "SOL"},
                "quoteToken": {"address": "EPjF...t1v", "name": "USD Coin", "symbol": "USDC"},
                "priceUsd": "212.55",
                "volume": {"h24": 123456789.0},
                "liquidity": {"usd": 9876543.0},
                "fdv": 0,
                "txns": {"h24": {"buys": 1200, "sells": 1100}}
            }]
        });

        let normalized = binding().normalize(raw, &pair_args()).unwrap();

        assert_eq!(normalized["dex"], "raydium");
        assert_eq!(normalized["base_token"]["symbol"], "SOL");
        assert_eq!(normalized["price_usd"], "212.55");
        assert_eq!(normalized["volume_24h"], 123456789.0);
        assert_eq!(normalized["txns_24h"]["buys"], 1200);
        // Zero FDV stays zero; it is a value, not an absence.
        assert_eq!(normalized["fdv"], 0);
    }

    #[test]
    fn test_missing_optional_fields_become_null() {
        let raw = json!({"pairs": [{"pairAddress": "abc"}]});
        let normalized = binding().normalize(raw, &pair_args()).unwrap();
        assert_eq!(normalized["price_usd"], Value::Null);
        assert_eq!(normalized["liquidity_usd"], Value::Null);
        assert_eq!(normalized["base_token"]["symbol"], Value::Null);
    }

    #[test]
    fn test_null_pairs_is_malformed() {
        let result = binding().normalize(json!({"pairs": null, "pair": null}), &pair_args());
        assert!(matches!(result, Err(GatewayError::MalformedPayload(_))));
    }
}
