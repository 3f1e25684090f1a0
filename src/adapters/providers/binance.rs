//! Binance bindings
//!
//! Primary venue for order-book snapshots. Public market-data
//! endpoints, no credential required.

use std::time::Duration;

use serde_json::{json, Value};

use crate::domain::capability::RouteArgs;
use crate::domain::error::GatewayError;
use crate::domain::provider::{ProviderSpec, RequestDraft};
use crate::ports::provider::ProviderBinding;

use super::field;

pub const NAME: &str = "binance";

const DEFAULT_DEPTH: u32 = 100;
const MAX_DEPTH: u32 = 1000;

pub fn spec(base_url: &str, timeout: Duration) -> ProviderSpec {
    ProviderSpec::new(NAME, base_url).with_timeout(timeout)
}

/// `/api/v3/depth`
pub struct OrderBook {
    spec: ProviderSpec,
}

impl OrderBook {
    pub fn new(spec: ProviderSpec) -> Self {
        Self { spec }
    }
}

impl ProviderBinding for OrderBook {
    fn spec(&self) -> &ProviderSpec {
        &self.spec
    }

    fn build_request(&self, args: &RouteArgs) -> Result<RequestDraft, GatewayError> {
        let symbol = args
            .symbol
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| GatewayError::InvalidArgs("trading symbol is required".into()))?;
        let depth = args.depth.unwrap_or(DEFAULT_DEPTH).clamp(1, MAX_DEPTH);
        Ok(RequestDraft::get("/api/v3/depth")
            .query("symbol", symbol.to_uppercase())
            .query("limit", depth))
    }

    fn normalize(&self, raw: Value, args: &RouteArgs) -> Result<Value, GatewayError> {
        let bids = raw.get("bids").and_then(Value::as_array);
        let asks = raw.get("asks").and_then(Value::as_array);
        let (Some(bids), Some(asks)) = (bids, asks) else {
            return Err(GatewayError::MalformedPayload(
                "depth response missing bids/asks".into(),
            ));
        };
        let symbol = args
            .symbol
            .as_deref()
            .map(str::to_uppercase)
            .map(Value::from)
            .unwrap_or(Value::Null);
        Ok(json!({
            "symbol": symbol,
            "bids": bids,
            "asks": asks,
            "update_id": field(&raw, "lastUpdateId"),
            "timestamp": Value::Null,
        }))
    }
}
