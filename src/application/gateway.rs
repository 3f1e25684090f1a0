//! Provider router
//!
//! The heart of the gateway: consult the rate-limit cache, then (in
//! development) the persistent cache, then walk the capability's
//! ordered provider list until one answers, normalizing and writing
//! back on success. Exhaustion degrades to the capability's static
//! dataset instead of erroring, when one exists.
//!
//! Providers are tried strictly in configured order and never
//! concurrently for one request; a reachable-but-slow provider delays
//! the next attempt until its own deadline fires. That bounds quota
//! usage at the expense of latency.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::application::resolver;
use crate::config::RuntimeEnv;
use crate::domain::cache_key::CacheKey;
use crate::domain::capability::{Capability, RouteArgs};
use crate::domain::error::GatewayError;
use crate::domain::result::AggregatedResult;
use crate::ports::cache::CacheStore;
use crate::ports::provider::ProviderBinding;
use crate::ports::transport::Transport;

/// Provider tag carried by degraded responses
pub const FALLBACK_PROVIDER: &str = "fallback";

const DEFAULT_DEV_CACHE_TTL: Duration = Duration::from_secs(24 * 3600);

/// Ordered provider list plus cache policy for one capability.
///
/// The order encodes expected reliability and data completeness for the
/// capability; it is configuration, not an implementation detail.
pub struct CapabilityRoute {
    pub providers: Vec<Arc<dyn ProviderBinding>>,
    pub cache_ttl: Duration,
    /// Static dataset served with `degraded = true` on total exhaustion
    pub fallback: Option<Value>,
}

/// Cache tier sizes for the health endpoint
#[derive(Debug, Clone, serde::Serialize)]
pub struct CacheSnapshot {
    pub rate_cache_entries: usize,
    pub dev_cache_entries: Option<usize>,
}

pub struct MarketGateway {
    routes: HashMap<Capability, CapabilityRoute>,
    transport: Arc<dyn Transport>,
    rate_cache: Arc<dyn CacheStore>,
    dev_cache: Option<Arc<dyn CacheStore>>,
    dev_cache_ttl: Duration,
    api_keys: HashMap<String, String>,
    production: bool,
}

impl MarketGateway {
    pub fn new(
        env: RuntimeEnv,
        routes: HashMap<Capability, CapabilityRoute>,
        transport: Arc<dyn Transport>,
        rate_cache: Arc<dyn CacheStore>,
    ) -> Self {
        Self {
            routes,
            transport,
            rate_cache,
            dev_cache: None,
            dev_cache_ttl: DEFAULT_DEV_CACHE_TTL,
            api_keys: HashMap::new(),
            production: env.is_production(),
        }
    }

    /// Attach the development persistent cache.
    ///
    /// In a production runtime the store is discarded, whatever the
    /// caller wired up: production traffic must always reflect live or
    /// explicitly degraded data.
    pub fn with_dev_cache(mut self, store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        if self.production {
            tracing::info!("production runtime: development cache stays disabled");
        } else {
            self.dev_cache = Some(store);
            self.dev_cache_ttl = ttl;
        }
        self
    }

    /// Register the configured API key for a provider
    pub fn with_api_key(mut self, provider: &str, key: impl Into<String>) -> Self {
        self.api_keys.insert(provider.to_string(), key.into());
        self
    }

    /// Resolve a capability request to an aggregated result.
    ///
    /// Never panics and only errors when every provider failed and no
    /// fallback dataset exists for the capability; the error then
    /// mirrors the last concrete upstream failure.
    pub async fn route(
        &self,
        capability: Capability,
        args: &RouteArgs,
    ) -> Result<AggregatedResult, GatewayError> {
        let route = self
            .routes
            .get(&capability)
            .ok_or_else(|| GatewayError::NoRoute(capability.to_string()))?;
        let key = CacheKey::new(capability.path_tag(), &args.cache_params());

        if let Some(result) = self.cached(&key) {
            return Ok(result);
        }

        let mut last_error = GatewayError::NoRoute(capability.to_string());
        for binding in &route.providers {
            let provider = binding.spec().name;
            match self.try_provider(binding.as_ref(), args).await {
                Ok(payload) => {
                    let result = AggregatedResult::live(provider, payload);
                    self.store(&key, &result, route.cache_ttl);
                    tracing::debug!(capability = %capability, provider, "live fetch succeeded");
                    return Ok(result);
                }
                Err(err) => {
                    tracing::warn!(
                        capability = %capability,
                        provider,
                        error = %err,
                        "provider attempt failed, moving on"
                    );
                    last_error = err;
                }
            }
        }

        let exhausted = GatewayError::AllProvidersExhausted {
            capability: capability.to_string(),
            last: Box::new(last_error),
        };
        match &route.fallback {
            Some(payload) => {
                tracing::warn!(capability = %capability, "serving static fallback data: {exhausted}");
                Ok(AggregatedResult::degraded(FALLBACK_PROVIDER, payload.clone()))
            }
            None => Err(exhausted),
        }
    }

    /// Cache tier sizes for diagnostics
    pub fn cache_snapshot(&self) -> CacheSnapshot {
        CacheSnapshot {
            rate_cache_entries: self.rate_cache.entry_count(),
            dev_cache_entries: self.dev_cache.as_ref().map(|c| c.entry_count()),
        }
    }

    fn cached(&self, key: &CacheKey) -> Option<AggregatedResult> {
        if let Some(hit) = self.rate_cache.get(key.as_str()) {
            if let Ok(result) = serde_json::from_value::<AggregatedResult>(hit) {
                tracing::debug!(key = %key, "rate-limit cache hit");
                return Some(result);
            }
        }
        let dev = self.dev_cache.as_ref()?;
        let hit = dev.get(key.as_str())?;
        match serde_json::from_value::<AggregatedResult>(hit.clone()) {
            Ok(result) => {
                tracing::debug!(key = %key, "dev cache hit");
                // Back-fill the hot tier so repeats stay in memory.
                self.rate_cache.set(key.as_str(), hit, self.route_ttl(key));
                Some(result)
            }
            Err(_) => None,
        }
    }

    fn route_ttl(&self, key: &CacheKey) -> Duration {
        let tag = key.as_str().split('?').next().unwrap_or_default();
        Capability::parse(tag)
            .and_then(|c| self.routes.get(&c))
            .map(|r| r.cache_ttl)
            .unwrap_or(Duration::from_secs(30))
    }

    async fn try_provider(
        &self,
        binding: &dyn ProviderBinding,
        args: &RouteArgs,
    ) -> Result<Value, GatewayError> {
        let spec = binding.spec();
        let draft = binding.build_request(args)?;
        let api_key = args
            .api_key_override
            .as_deref()
            .or_else(|| self.api_keys.get(spec.name).map(String::as_str));
        let response = resolver::resolve(self.transport.as_ref(), spec, &draft, api_key).await?;
        let raw = response.json()?;
        binding.normalize(raw, args)
    }

    fn store(&self, key: &CacheKey, result: &AggregatedResult, ttl: Duration) {
        let value = match serde_json::to_value(result) {
            Ok(v) => v,
            Err(err) => {
                tracing::debug!(key = %key, error = %err, "result not cacheable");
                return;
            }
        };
        self.rate_cache.set(key.as_str(), value.clone(), ttl);
        if let Some(dev) = &self.dev_cache {
            dev.set(key.as_str(), value, self.dev_cache_ttl);
        }
    }
}
