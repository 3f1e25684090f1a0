//! Capability routing table
//!
//! Builds the ordered provider list per capability from configuration.
//! The order is policy, not happenstance: for CEX order books the
//! high-liquidity primary venue comes before smaller ones, and for DEX
//! data the dedicated aggregator comes before the generic on-chain
//! indexer. Reordering providers is a change here, never in the router.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::application::gateway::CapabilityRoute;
use crate::config::Config;
use crate::domain::capability::Capability;
use crate::ports::provider::ProviderBinding;

use super::{binance, coingecko, dexscreener, fallback, geckoterminal, okx};

pub fn build_routes(config: &Config) -> HashMap<Capability, CapabilityRoute> {
    let volatile = Duration::from_secs(config.cache.volatile_ttl_secs);
    let steady = Duration::from_secs(config.cache.steady_ttl_secs);
    let metadata = Duration::from_secs(config.timeouts.metadata_secs);
    let listing = Duration::from_secs(config.timeouts.listing_secs);

    let gecko_url = &config.providers.coingecko.base_url;
    let route = |providers: Vec<Arc<dyn ProviderBinding>>,
                 cache_ttl: Duration,
                 capability: Capability| {
        (
            capability,
            CapabilityRoute {
                providers,
                cache_ttl,
                fallback: fallback::dataset(capability),
            },
        )
    };

    HashMap::from([
        route(
            vec![Arc::new(coingecko::Trending::new(coingecko::spec(
                gecko_url, metadata,
            )))],
            volatile,
            Capability::TrendingCoins,
        ),
        route(
            vec![Arc::new(coingecko::Global::new(coingecko::spec(
                gecko_url, metadata,
            )))],
            steady,
            Capability::GlobalMarket,
        ),
        route(
            vec![Arc::new(coingecko::Markets::new(coingecko::spec(
                gecko_url, listing,
            )))],
            volatile,
            Capability::CoinMarkets,
        ),
        route(
            vec![Arc::new(coingecko::Detail::new(coingecko::spec(
                gecko_url, metadata,
            )))],
            steady,
            Capability::CoinDetail,
        ),
        route(
            vec![
                Arc::new(binance::OrderBook::new(binance::spec(
                    &config.providers.binance.base_url,
                    metadata,
                ))),
                Arc::new(okx::OrderBook::new(okx::spec(
                    &config.providers.okx.base_url,
                    metadata,
                ))),
            ],
            volatile,
            Capability::OrderBook,
        ),
        route(
            vec![
                Arc::new(dexscreener::Pair::new(dexscreener::spec(
                    &config.providers.dexscreener.base_url,
                    metadata,
                ))),
                Arc::new(geckoterminal::Pool::new(geckoterminal::spec(
                    &config.providers.geckoterminal.base_url,
                    metadata,
                ))),
            ],
            volatile,
            Capability::DexPair,
        ),
        route(
            vec![Arc::new(coingecko::Proxy::new(coingecko::spec(
                gecko_url, listing,
            )))],
            volatile,
            Capability::GeckoProxy,
        ),
    ])
}

/// Configured provider keys by provider name
pub fn api_keys(config: &Config) -> HashMap<String, String> {
    let mut keys = HashMap::new();
    if let Some(key) = config.providers.coingecko.resolved_api_key() {
        keys.insert(coingecko::NAME.to_string(), key);
    }
    keys
}
