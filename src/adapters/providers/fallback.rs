//! Static fallback datasets
//!
//! Hand-authored payloads shaped exactly like live normalized
//! responses, served with `degraded = true` when every provider for a
//! capability has failed. Downstream consumers need no special-casing;
//! the degraded flag in the envelope is the only difference.
//!
//! Only argument-free capabilities carry a dataset: fabricating an
//! order book or pair stats for an arbitrary symbol would be
//! misleading, so those surface the last upstream error instead.

use serde_json::{json, Value};

use crate::domain::capability::Capability;

pub fn dataset(capability: Capability) -> Option<Value> {
    match capability {
        Capability::TrendingCoins => Some(trending()),
        Capability::GlobalMarket => Some(global()),
        Capability::CoinMarkets => Some(markets()),
        Capability::CoinDetail
        | Capability::OrderBook
        | Capability::DexPair
        | Capability::GeckoProxy => None,
    }
}

fn trending() -> Value {
    json!({
        "coins": [
            {
                "id": "bitcoin",
                "name": "Bitcoin",
                "symbol": "BTC",
                "market_cap_rank": 1,
                "score": 0,
                "price_usd": null
            },
            {
                "id": "ethereum",
                "name": "Ethereum",
                "symbol": "ETH",
                "market_cap_rank": 2,
                "score": 1,
                "price_usd": null
            },
            {
                "id": "solana",
                "name": "Solana",
                "symbol": "SOL",
                "market_cap_rank": 6,
                "score": 2,
                "price_usd": null
            }
        ]
    })
}

fn global() -> Value {
    json!({
        "active_cryptocurrencies": 10000,
        "markets": 900,
        "total_market_cap": { "usd": 3_000_000_000_000u64 },
        "total_volume": { "usd": 120_000_000_000u64 },
        "market_cap_percentage": { "btc": 55.0, "eth": 12.0 },
        "market_cap_change_percentage_24h_usd": null,
        "updated_at": null
    })
}

fn markets() -> Value {
    json!({
        "coins": [
            {
                "id": "bitcoin",
                "symbol": "btc",
                "name": "Bitcoin",
                "current_price": null,
                "market_cap": null,
                "market_cap_rank": 1,
                "total_volume": null,
                "price_change_percentage_24h": null,
                "last_updated": null
            },
            {
                "id": "ethereum",
                "symbol": "eth",
                "name": "Ethereum",
                "current_price": null,
                "market_cap": null,
                "market_cap_rank": 2,
                "total_volume": null,
                "price_change_percentage_24h": null,
                "last_updated": null
            }
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trending_dataset_has_coins() {
        let payload = dataset(Capability::TrendingCoins).unwrap();
        let coins = payload["coins"].as_array().unwrap();
        assert!(!coins.is_empty());
        // Same field set as a live normalized trending entry.
        for coin in coins {
            assert!(coin.get("id").is_some());
            assert!(coin.get("symbol").is_some());
            assert!(coin.get("market_cap_rank").is_some());
            assert!(coin.get("price_usd").is_some());
        }
    }

    #[test]
    fn test_global_dataset_matches_canonical_shape() {
        let payload = dataset(Capability::GlobalMarket).unwrap();
        assert!(payload["total_market_cap"]["usd"].is_number());
        assert!(payload.get("market_cap_percentage").is_some());
        assert!(payload.get("updated_at").is_some());
    }

    #[test]
    fn test_markets_dataset_matches_canonical_shape() {
        let payload = dataset(Capability::CoinMarkets).unwrap();
        let coins = payload["coins"].as_array().unwrap();
        assert!(!coins.is_empty());
        // Unknown prices are null, never zero.
        assert!(coins[0]["current_price"].is_null());
    }

    #[test]
    fn test_argument_bound_capabilities_have_no_dataset() {
        assert!(dataset(Capability::OrderBook).is_none());
        assert!(dataset(Capability::DexPair).is_none());
        assert!(dataset(Capability::CoinDetail).is_none());
        assert!(dataset(Capability::GeckoProxy).is_none());
    }
}
