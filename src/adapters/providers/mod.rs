//! Upstream provider bindings
//!
//! One module per provider: the static `ProviderSpec` plus a binding
//! per capability it serves (typed request building + normalization).
//! `registry` wires the ordered provider lists the router consumes;
//! `fallback` holds the static datasets served on total exhaustion.

pub mod binance;
pub mod coingecko;
pub mod dexscreener;
pub mod fallback;
pub mod geckoterminal;
pub mod okx;
pub mod registry;

use serde_json::Value;

/// Optional field lookup preserving absence as null. Zero is a valid
/// price or volume; only a missing field maps to null.
pub(crate) fn field(value: &Value, name: &str) -> Value {
    value.get(name).cloned().unwrap_or(Value::Null)
}

/// Optional nested lookup by JSON pointer, preserving absence as null
pub(crate) fn ptr(value: &Value, pointer: &str) -> Value {
    value.pointer(pointer).cloned().unwrap_or(Value::Null)
}
