//! Aggregated result envelope
//!
//! Every gateway answer carries its originating provider and a
//! `degraded` flag so callers can tell live data from static fallback
//! data. The envelope is what gets cached, so a cache hit preserves the
//! original provider tag and fetch timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedResult {
    /// Name of the provider that produced the payload
    pub provider: String,
    /// Normalized payload in the capability's canonical shape
    pub payload: Value,
    pub fetched_at: DateTime<Utc>,
    /// True when the payload came from the static fallback dataset
    pub degraded: bool,
}

impl AggregatedResult {
    pub fn live(provider: &str, payload: Value) -> Self {
        Self {
            provider: provider.to_string(),
            payload,
            fetched_at: Utc::now(),
            degraded: false,
        }
    }

    pub fn degraded(provider: &str, payload: Value) -> Self {
        Self {
            provider: provider.to_string(),
            payload,
            fetched_at: Utc::now(),
            degraded: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_live_result_is_not_degraded() {
        let result = AggregatedResult::live("binance", json!({"bids": []}));
        assert_eq!(result.provider, "binance");
        assert!(!result.degraded);
    }

    #[test]
    fn test_envelope_round_trips_through_json() {
        let result = AggregatedResult::degraded("fallback", json!({"coins": [1]}));
        let value = serde_json::to_value(&result).unwrap();
        let back: AggregatedResult = serde_json::from_value(value).unwrap();
        assert!(back.degraded);
        assert_eq!(back.provider, "fallback");
        assert_eq!(back.payload["coins"][0], 1);
    }
}
