//! GeckoTerminal bindings
//!
//! Generic on-chain indexer, second choice for DEX pair stats when
//! DexScreener fails. Network names differ from common chain names, so
//! inbound chains are mapped before building the path.

use std::time::Duration;

use serde_json::{json, Value};

use crate::domain::capability::RouteArgs;
use crate::domain::error::GatewayError;
use crate::domain::provider::{ProviderSpec, RequestDraft};
use crate::ports::provider::ProviderBinding;

use super::{field, ptr};

pub const NAME: &str = "geckoterminal";

pub fn spec(base_url: &str, timeout: Duration) -> ProviderSpec {
    ProviderSpec::new(NAME, base_url)
        .with_header("accept", "application/json")
        .with_timeout(timeout)
}

/// Map a common chain name onto a GeckoTerminal network id
fn map_network(chain: &str) -> String {
    match chain.to_lowercase().as_str() {
        "ethereum" => "eth".to_string(),
        "polygon" => "polygon_pos".to_string(),
        "binance" | "bnb" => "bsc".to_string(),
        "arbitrum" => "arbitrum".to_string(),
        other => other.to_string(),
    }
}

/// `/networks/{network}/pools/{pool}`
pub struct Pool {
    spec: ProviderSpec,
}

impl Pool {
    pub fn new(spec: ProviderSpec) -> Self {
        Self { spec }
    }
}

impl ProviderBinding for Pool {
    fn spec(&self) -> &ProviderSpec {
        &self.spec
    }

    fn build_request(&self, args: &RouteArgs) -> Result<RequestDraft, GatewayError> {
        let chain = args
            .chain
            .as_deref()
            .filter(|c| !c.is_empty())
            .ok_or_else(|| GatewayError::InvalidArgs("chain is required".into()))?;
        let pool = args
            .pair_address
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| GatewayError::InvalidArgs("pair address is required".into()))?;
        Ok(RequestDraft::get(format!(
            "/networks/{}/pools/{}",
            urlencoding::encode(&map_network(chain)),
            urlencoding::encode(pool)
        )))
    }

    fn normalize(&self, raw: Value, _args: &RouteArgs) -> Result<Value, GatewayError> {
        let attributes = raw
            .pointer("/data/attributes")
            .filter(|a| !a.is_null())
            .ok_or_else(|| {
                GatewayError::MalformedPayload("pool response missing attributes".into())
            })?;
        // Pool names read "SOL / USDC"; the token symbols are the only
        // token detail this endpoint exposes inline.
        let (base_symbol, quote_symbol) = attributes
            .get("name")
            .and_then(Value::as_str)
            .and_then(|name| name.split_once(" / "))
            .map(|(base, quote)| (Value::from(base.trim()), Value::from(quote.trim())))
            .unwrap_or((Value::Null, Value::Null));
        Ok(json!({
            "pair_address": field(attributes, "address"),
            "dex": Value::Null,
            "base_token": {
                "address": Value::Null,
                "name": Value::Null,
                "symbol": base_symbol,
            },
            "quote_token": {
                "address": Value::Null,
                "name": Value::Null,
                "symbol": quote_symbol,
            },
            "price_usd": field(attributes, "base_token_price_usd"),
            "volume_24h": ptr(attributes, "/volume_usd/h24"),
            "liquidity_usd": field(attributes, "reserve_in_usd"),
            "fdv": field(attributes, "fdv_usd"),
            "txns_24h": {
                "buys": ptr(attributes, "/transactions/h24/buys"),
                "sells": ptr(attributes, "/transactions/h24/sells"),
            },
        }))
    }
}
