use {
	crate::{
		api_types::{ApiResponse, HealthResponse},
		consts::{HEADER_CACHE, HEADER_CACHE_AGE_MS},
		server::{AppState, ClientInfo},
	},
	axum::{
		Json,
		extract::{Extension, Query, State},
		http::{HeaderName, HeaderValue},
		response::{IntoResponse, Response},
	},
	common::{consts::PROXY_MARKETS_ROUTE, market_types::MarketQuery},
	tracing::warn,
};

/// GET /api/coingecko/markets
///
/// Same query parameters and JSON array as the upstream listing. An error body
/// is only returned when nothing was ever cached for the query and it cannot be
/// fetched (upstream failure: 502, client over its refresh limit: 429).
pub async fn handle_markets(State(state): State<AppState>, Extension(client_info): Extension<ClientInfo>, Query(query): Query<MarketQuery>) -> Response {
	// 只有需要回源时才消耗限流额度
	let may_refresh = || state.rate_limiter.is_allowed(&client_info.ip, PROXY_MARKETS_ROUTE);
	let resolved = match state.resolver.resolve_gated(&query, may_refresh).await {
		Ok(resolved) => resolved,
		Err(e) => {
			warn!("request_id={}, ip={} - markets resolution failed: {}", client_info.request_id, client_info.ip, e);
			return e.into_response();
		}
	};

	let mut response = Json(&*resolved.payload).into_response();
	let headers = response.headers_mut();
	headers.insert(HeaderName::from_static(HEADER_CACHE), HeaderValue::from_static(resolved.freshness.as_header()));
	headers.insert(HeaderName::from_static(HEADER_CACHE_AGE_MS), HeaderValue::from(resolved.age.as_millis() as u64));
	response
}

pub async fn handle_health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
	let cache_entries = state.resolver.cache().len().await;
	Json(ApiResponse::success(HealthResponse { cache_entries, cache_ttl_ms: state.resolver.ttl().as_millis() as u64 }))
}
