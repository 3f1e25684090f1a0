//! Provider specifications and typed request building
//!
//! A `ProviderSpec` is static configuration: constructed once at boot,
//! immutable afterwards. Requests are assembled as `RequestDraft`s so
//! auth strategies can mutate query/headers before the final URL is
//! rendered, instead of string-concatenating user input.

use std::time::Duration;

use serde_json::Value;

/// One way of attaching a credential to an outbound call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStrategy {
    /// Key sent as a query parameter with the given name
    QueryParam(&'static str),
    /// Key sent as a custom header with the given name
    Header(&'static str),
    /// Key sent as an `Authorization: Bearer` header
    Bearer,
}

impl AuthStrategy {
    /// Apply the credential to a request draft
    pub fn apply(&self, draft: &mut RequestDraft, key: &str) {
        match self {
            AuthStrategy::QueryParam(name) => {
                draft.query.push(((*name).to_string(), key.to_string()));
            }
            AuthStrategy::Header(name) => {
                draft.headers.push(((*name).to_string(), key.to_string()));
            }
            AuthStrategy::Bearer => {
                draft
                    .headers
                    .push(("authorization".to_string(), format!("Bearer {key}")));
            }
        }
    }

    /// Short label for logging
    pub fn describe(&self) -> String {
        match self {
            AuthStrategy::QueryParam(name) => format!("query:{name}"),
            AuthStrategy::Header(name) => format!("header:{name}"),
            AuthStrategy::Bearer => "bearer".to_string(),
        }
    }
}

/// Static description of one upstream provider
#[derive(Debug, Clone)]
pub struct ProviderSpec {
    /// Provider name, tags results and log lines
    pub name: &'static str,
    /// API origin plus any fixed prefix, no trailing slash
    pub base_url: String,
    /// Credential placements tried in declared order on every call.
    /// Empty means the provider needs no auth.
    pub auth_strategies: Vec<AuthStrategy>,
    /// Headers attached to every request
    pub default_headers: Vec<(String, String)>,
    /// Deadline for a single attempt against this provider
    pub timeout: Duration,
}

impl ProviderSpec {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(name: &'static str, base_url: impl Into<String>) -> Self {
        Self {
            name,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth_strategies: Vec::new(),
            default_headers: Vec::new(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_auth(mut self, strategies: Vec<AuthStrategy>) -> Self {
        self.auth_strategies = strategies;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Request under construction, before auth and URL rendering
#[derive(Debug, Clone)]
pub struct RequestDraft {
    pub method: HttpMethod,
    /// Path below the provider base URL, starting with '/'
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RequestDraft {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: Some(body),
        }
    }

    pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    pub fn query_opt(self, name: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(v) => self.query(name, v),
            None => self,
        }
    }

    pub fn queries(mut self, pairs: &[(String, String)]) -> Self {
        self.query.extend(pairs.iter().cloned());
        self
    }

    /// Render the final request against a provider spec
    pub fn into_prepared(self, spec: &ProviderSpec) -> PreparedRequest {
        let mut url = format!("{}{}", spec.base_url, self.path);
        if !self.query.is_empty() {
            url.push('?');
            url.push_str(&render_query(&self.query));
        }
        let mut headers = spec.default_headers.clone();
        headers.extend(self.headers);
        PreparedRequest {
            method: self.method,
            url,
            headers,
            body: self.body,
        }
    }
}

/// Fully rendered outbound request, ready for a transport
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl PreparedRequest {
    /// Value of a header, if present (names compared case-insensitively)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

fn render_query(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(name, value)| {
            format!(
                "{}={}",
                urlencoding::encode(name),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Short, log-safe preview of an API key. Full keys never reach logs.
pub fn key_preview(key: &str) -> String {
    let prefix: String = key.chars().take(4).collect();
    format!("{prefix}…")
}
