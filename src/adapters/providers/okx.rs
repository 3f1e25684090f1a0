//! OKX bindings
//!
//! Secondary venue for order-book snapshots, tried after Binance. OKX
//! wants dashed instrument ids (`BTC-USDT`) and returns book levels
//! with per-level order counts that the canonical shape drops.

use std::time::Duration;

use serde_json::{json, Value};

use crate::domain::capability::RouteArgs;
use crate::domain::error::GatewayError;
use crate::domain::provider::{ProviderSpec, RequestDraft};
use crate::ports::provider::ProviderBinding;

use super::field;

pub const NAME: &str = "okx";

const DEFAULT_DEPTH: u32 = 100;
const MAX_DEPTH: u32 = 400;

/// Quote assets recognized when deriving a dashed instrument id from a
/// concatenated symbol like BTCUSDT
const KNOWN_QUOTES: [&str; 6] = ["USDT", "USDC", "BTC", "ETH", "EUR", "DAI"];

pub fn spec(base_url: &str, timeout: Duration) -> ProviderSpec {
    ProviderSpec::new(NAME, base_url).with_timeout(timeout)
}

/// Derive an OKX instrument id from an inbound symbol. Symbols already
/// containing a dash pass through.
fn to_inst_id(symbol: &str) -> Result<String, GatewayError> {
    let upper = symbol.to_uppercase();
    if upper.contains('-') {
        return Ok(upper);
    }
    for quote in KNOWN_QUOTES {
        if upper.len() > quote.len() && upper.ends_with(quote) {
            let base = &upper[..upper.len() - quote.len()];
            return Ok(format!("{base}-{quote}"));
        }
    }
    Err(GatewayError::InvalidArgs(format!(
        "cannot derive instrument id from symbol {symbol}"
    )))
}

/// `/api/v5/market/books`
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
        let inst_id = to_inst_id(symbol)?;
        let depth = args.depth.unwrap_or(DEFAULT_DEPTH).clamp(1, MAX_DEPTH);
        Ok(RequestDraft::get("/api/v5/market/books")
            .query("instId", inst_id)
            .query("sz", depth))
    }

    fn normalize(&self, raw: Value, args: &RouteArgs) -> Result<Value, GatewayError> {
        let book = raw
            .pointer("/data/0")
            .ok_or_else(|| GatewayError::MalformedPayload("books response carries no data".into()))?;
        let trim = |side: &str| -> Result<Vec<Value>, GatewayError> {
            let levels = book.get(side).and_then(Value::as_array).ok_or_else(|| {
                GatewayError::MalformedPayload(format!("books response missing {side}"))
            })?;
            // Levels arrive as [price, size, liquidated, order_count].
            Ok(levels
                .iter()
                .map(|level| {
                    json!([
                        level.get(0).cloned().unwrap_or(Value::Null),
                        level.get(1).cloned().unwrap_or(Value::Null),
                    ])
                })
                .collect())
        };
        let symbol = args
            .symbol
            .as_deref()
            .map(str::to_uppercase)
            .map(Value::from)
            .unwrap_or(Value::Null);
        Ok(json!({
            "symbol": symbol,
            "bids": trim("bids")?,
            "asks": trim("asks")?,
            "update_id": Value::Null,
            "timestamp": field(book, "ts"),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding() -> OrderBook {
        OrderBook::new(spec("https://www.okx.com", Duration::from_secs(10)))
    }

    fn book_args(symbol: &str) -> RouteArgs {
        RouteArgs {
            symbol: Some(symbol.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_inst_id_from_concatenated_symbol() {
        assert_eq!(to_inst_id("BTCUSDT").unwrap(), "BTC-USDT");
        assert_eq!(to_inst_id("solusdc").unwrap(), "SOL-USDC");
        assert_eq!(to_inst_id("ETHBTC").unwrap(), "ETH-BTC");
    }

    #[test]
    fn test_inst_id_passthrough_when_dashed() {
        assert_eq!(to_inst_id("btc-usdt").unwrap(), "BTC-USDT");
    }

    #[test]
    fn test_inst_id_unknown_quote_rejected() {
        assert!(matches!(
            to_inst_id("BTCXYZ"),
            Err(GatewayError::InvalidArgs(_))
        ));
    }

    #[test]
    fn test_request_carries_inst_id() {
        let draft = binding().build_request(&book_args("BTCUSDT")).unwrap();
        let request = draft.into_prepared(binding().spec());
        assert!(request.url.contains("instId=BTC-USDT"));
        assert!(request.url.contains("sz=100"));
    }

    #[test]
    fn test_normalization_trims_levels() {
        let raw = json!({
            "code": "0",
            "data": [{
                "bids": [["97000.1", "0.5", "0", "3"]],
                "asks": [["97001.0", "0.8", "0", "1"]],
                "ts": "1735689600000"
            }]
        });

        let normalized = binding().normalize(raw, &book_args("BTCUSDT")).unwrap();

        assert_eq!(normalized["bids"][0], json!(["97000.1", "0.5"]));
        assert_eq!(normalized["asks"][0], json!(["97001.0", "0.8"]));
        assert_eq!(normalized["timestamp"], "1735689600000");
        assert_eq!(normalized["update_id"], Value::Null);
    }

    #[test]
    fn test_empty_data_is_malformed() {
        let result = binding().normalize(json!({"code": "0", "data": []}), &book_args("BTCUSDT"));
        assert!(matches!(result, Err(GatewayError::MalformedPayload(_))));
    }
}
