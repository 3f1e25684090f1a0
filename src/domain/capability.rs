//! Capabilities
//!
//! A capability is a logical market-data request type, decoupled from any
//! concrete upstream provider. The router maps each capability to an
//! ordered provider list at boot.

use std::fmt;

/// Logical data request types served by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Currently trending coins
    TrendingCoins,
    /// Global market statistics (total cap, volume, dominance)
    GlobalMarket,
    /// Paged coin listing with prices and caps
    CoinMarkets,
    /// Detail view for a single coin
    CoinDetail,
    /// CEX order book snapshot for a trading symbol
    OrderBook,
    /// DEX pair stats for a pool address
    DexPair,
    /// Raw passthrough to the CoinGecko API
    GeckoProxy,
}

impl Capability {
    pub const ALL: [Capability; 7] = [
        Capability::TrendingCoins,
        Capability::GlobalMarket,
        Capability::CoinMarkets,
        Capability::CoinDetail,
        Capability::OrderBook,
        Capability::DexPair,
        Capability::GeckoProxy,
    ];

    /// Stable identifier, also the path segment of cache keys
    pub fn path_tag(&self) -> &'static str {
        match self {
            Capability::TrendingCoins => "trending-coins",
            Capability::GlobalMarket => "global-market",
            Capability::CoinMarkets => "coin-markets",
            Capability::CoinDetail => "coin-detail",
            Capability::OrderBook => "order-book",
            Capability::DexPair => "dex-pair",
            Capability::GeckoProxy => "gecko-proxy",
        }
    }

    /// Parse a capability from its path tag (used by the `fetch` CLI command)
    pub fn parse(tag: &str) -> Option<Capability> {
        Capability::ALL
            .iter()
            .copied()
            .find(|c| c.path_tag() == tag)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_tag())
    }
}

/// Provider-agnostic request arguments
///
/// Handlers fill in the fields relevant to their capability; provider
/// bindings read the ones they need and ignore the rest.
#[derive(Debug, Clone, Default)]
pub struct RouteArgs {
    /// Coin identifier, e.g. "bitcoin"
    pub coin_id: Option<String>,
    /// CEX trading symbol, e.g. "BTCUSDT"
    pub symbol: Option<String>,
    /// Chain/network name for DEX lookups, e.g. "solana"
    pub chain: Option<String>,
    /// DEX pair/pool address
    pub pair_address: Option<String>,
    /// Quote currency for listings, e.g. "usd"
    pub vs_currency: Option<String>,
    /// Listing page (1-based)
    pub page: Option<u32>,
    /// Listing page size
    pub per_page: Option<u32>,
    /// Order book depth
    pub depth: Option<u32>,
    /// Remaining path for passthrough capabilities
    pub subpath: Option<String>,
    /// Query parameters forwarded verbatim for passthrough capabilities
    pub passthrough: Vec<(String, String)>,
    /// Caller-supplied key overriding the configured provider key for
    /// this request only. Never part of the cache key.
    pub api_key_override: Option<String>,
}

impl RouteArgs {
    /// All set arguments as name/value pairs, for cache-key derivation.
    ///
    /// The key override is deliberately excluded: the same logical
    /// request must hit the same cache entry regardless of credential.
    pub fn cache_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        let mut push = |name: &str, value: Option<String>| {
            if let Some(v) = value {
                params.push((name.to_string(), v));
            }
        };
        push("coin_id", self.coin_id.clone());
        push("symbol", self.symbol.clone());
        push("chain", self.chain.clone());
        push("pair_address", self.pair_address.clone());
        push("vs_currency", self.vs_currency.clone());
        push("page", self.page.map(|v| v.to_string()));
        push("per_page", self.per_page.map(|v| v.to_string()));
        push("depth", self.depth.map(|v| v.to_string()));
        push("subpath", self.subpath.clone());
        for (name, value) in &self.passthrough {
            params.push((name.clone(), value.clone()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_tags_round_trip() {
        for capability in Capability::ALL {
            assert_eq!(Capability::parse(capability.path_tag()), Some(capability));
        }
    }

    #[test]
    fn test_parse_unknown_tag() {
        assert_eq!(Capability::parse("nope"), None);
    }

    #[test]
    fn test_cache_params_skip_unset_fields() {
        let args = RouteArgs {
            symbol: Some("BTCUSDT".to_string()),
            depth: Some(50),
            ..Default::default()
        };
        let params = args.cache_params();
        assert_eq!(params.len(), 2);
        assert!(params.contains(&("symbol".to_string(), "BTCUSDT".to_string())));
        assert!(params.contains(&("depth".to_string(), "50".to_string())));
    }

    #[test]
    fn test_cache_params_exclude_key_override() {
        let args = RouteArgs {
            api_key_override: Some("secret".to_string()),
            ..Default::default()
        };
        assert!(args.cache_params().is_empty());
    }
}
