//! Route handlers
//!
//! Thin translations from HTTP to `MarketGateway::route` calls. The
//! full result envelope is returned so callers always see the
//! originating provider and the degraded flag.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, RawQuery, State},
    http::{header, HeaderMap},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::capability::{Capability, RouteArgs};
use crate::domain::error::GatewayError;
use crate::domain::result::AggregatedResult;

use super::error::{ApiError, ApiResult};
use super::server::AppState;

/// Inbound header overriding the configured CoinGecko key per request
const COINGECKO_KEY_HEADER: &str = "x-coingecko-api-key";

fn base_args(headers: &HeaderMap) -> RouteArgs {
    let api_key_override = headers
        .get(COINGECKO_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string);
    RouteArgs {
        api_key_override,
        ..Default::default()
    }
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "caches": state.gateway.cache_snapshot(),
    }))
}

pub async fn trending(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<AggregatedResult>> {
    let args = base_args(&headers);
    Ok(Json(state.gateway.route(Capability::TrendingCoins, &args).await?))
}

pub async fn global(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<AggregatedResult>> {
    let args = base_args(&headers);
    Ok(Json(state.gateway.route(Capability::GlobalMarket, &args).await?))
}

#[derive(Deserialize)]
pub struct MarketsQuery {
    vs_currency: Option<String>,
    page: Option<u32>,
    per_page: Option<u32>,
}

pub async fn coin_markets(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MarketsQuery>,
    headers: HeaderMap,
) -> ApiResult<Json<AggregatedResult>> {
    let args = RouteArgs {
        vs_currency: query.vs_currency,
        page: query.page,
        per_page: query.per_page,
        ..base_args(&headers)
    };
    Ok(Json(state.gateway.route(Capability::CoinMarkets, &args).await?))
}

pub async fn coin_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<AggregatedResult>> {
    let args = RouteArgs {
        coin_id: Some(id),
        ..base_args(&headers)
    };
    Ok(Json(state.gateway.route(Capability::CoinDetail, &args).await?))
}

#[derive(Deserialize)]
pub struct DepthQuery {
    depth: Option<u32>,
}

pub async fn order_book(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(query): Query<DepthQuery>,
    headers: HeaderMap,
) -> ApiResult<Json<AggregatedResult>> {
    let args = RouteArgs {
        symbol: Some(symbol),
        depth: query.depth,
        ..base_args(&headers)
    };
    Ok(Json(state.gateway.route(Capability::OrderBook, &args).await?))
}

pub async fn dex_pair(
    State(state): State<Arc<AppState>>,
    Path((chain, pair)): Path<(String, String)>,
    headers: HeaderMap,
) -> ApiResult<Json<AggregatedResult>> {
    let args = RouteArgs {
        chain: Some(chain),
        pair_address: Some(pair),
        ..base_args(&headers)
    };
    Ok(Json(state.gateway.route(Capability::DexPair, &args).await?))
}

pub async fn gecko_proxy(
    State(state): State<Arc<AppState>>,
    Path(subpath): Path<String>,
    RawQuery(raw_query): RawQuery,
    headers: HeaderMap,
) -> ApiResult<Json<AggregatedResult>> {
    let passthrough: Vec<(String, String)> = raw_query
        .as_deref()
        .map(|q| serde_urlencoded::from_str(q).unwrap_or_default())
        .unwrap_or_default();
    let args = RouteArgs {
        subpath: Some(subpath),
        passthrough,
        ..base_args(&headers)
    };
    Ok(Json(state.gateway.route(Capability::GeckoProxy, &args).await?))
}

#[derive(Deserialize)]
pub struct SubmitBody {
    urls: Vec<String>,
}

pub async fn submit_urls(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SubmitBody>,
) -> ApiResult<Json<Value>> {
    let submitter = state
        .submitter
        .as_ref()
        .ok_or_else(|| ApiError(GatewayError::NoRoute("indexnow".to_string())))?;
    let report = submitter.submit_all(&body.urls).await;
    Ok(Json(json!(report)))
}

/// Raw ownership key at /<key>.txt, the file-based proof the indexing
/// service fetches before accepting submissions
pub async fn key_file(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let key = state
        .submitter
        .as_ref()
        .map(|s| s.key().to_string())
        .unwrap_or_default();
    ([(header::CONTENT_TYPE, "text/plain")], key)
}
