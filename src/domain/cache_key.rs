//! Deterministic cache keys
//!
//! Derived from the capability path tag plus sorted query parameters.
//! Two logically identical requests produce the same key regardless of
//! parameter order; any differing value produces a different key.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(path_tag: &str, params: &[(String, String)]) -> Self {
        let mut sorted: Vec<&(String, String)> = params.iter().collect();
        sorted.sort();
        let mut rendered = String::from(path_tag);
        for (i, (name, value)) in sorted.iter().enumerate() {
            rendered.push(if i == 0 { '?' } else { '&' });
            rendered.push_str(name);
            rendered.push('=');
            rendered.push_str(value);
        }
        CacheKey(rendered)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
