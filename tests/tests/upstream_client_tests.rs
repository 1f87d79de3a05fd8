//! MarketsClient 对本地假上游的 http 测试，以及 代理 -> 上游 全链路
//! 运行方式: cargo test --test upstream_client_tests

use {
	api::{init::build_state, server::app},
	axum::{
		Json, Router,
		extract::{Query, State},
		http::StatusCode,
		response::{IntoResponse, Response},
		routing::get,
	},
	common::{
		market_types::MarketQuery,
		markets_client::{ClientTimeouts, MarketSource, MarketsClient, UpstreamError, fetch_market_rows},
	},
	serde_json::json,
	std::{
		collections::BTreeMap,
		sync::{
			Arc,
			atomic::{AtomicU8, AtomicUsize, Ordering},
		},
		time::Duration,
	},
	tests::test_utils::{api_config, generous_rule, spawn_server},
};

const MODE_OK: u8 = 0;
const MODE_RATE_LIMITED: u8 = 1;
const MODE_NOT_ARRAY: u8 = 2;

/// 假上游：按 mode 返回数组 / 429 / 错误对象
#[derive(Default)]
struct FakeUpstream {
	mode: AtomicU8,
	hits: AtomicUsize,
}

async fn fake_markets(State(upstream): State<Arc<FakeUpstream>>, Query(params): Query<BTreeMap<String, String>>) -> Response {
	upstream.hits.fetch_add(1, Ordering::SeqCst);
	match upstream.mode.load(Ordering::SeqCst) {
		MODE_RATE_LIMITED => (StatusCode::TOO_MANY_REQUESTS, "slow down").into_response(),
		MODE_NOT_ARRAY => Json(json!({ "status": { "error_code": 429 } })).into_response(),
		_ => {
			let ids = params.get("ids").cloned().unwrap_or_default();
			let rows: Vec<_> = ids
				.split(',')
				.filter(|id| !id.is_empty())
				.map(|id| {
					json!({
						"id": id,
						"symbol": &id[..3.min(id.len())],
						"name": id,
						"current_price": 100.0,
						"price_change_percentage_24h_in_currency": 1.25,
						"echo_vs_currency": params.get("vs_currency"),
					})
				})
				.collect();
			Json(rows).into_response()
		}
	}
}

async fn spawn_upstream() -> (Arc<FakeUpstream>, String) {
	let upstream = Arc::new(FakeUpstream::default());
	let router = Router::new().route("/coins/markets", get(fake_markets)).with_state(upstream.clone());
	let addr = spawn_server(router).await;
	(upstream, format!("http://{}/coins/markets", addr))
}

fn client(url: &str) -> MarketsClient {
	MarketsClient::new(url, ClientTimeouts { request: Duration::from_secs(2), connect: Duration::from_secs(1) }).unwrap()
}

fn query(ids: &[&str]) -> MarketQuery {
	MarketQuery::new().vs_currency("usd").ids(ids)
}

#[tokio::test]
async fn test_client_sends_query_and_decodes_rows() {
	let (_upstream, url) = spawn_upstream().await;

	let rows = fetch_market_rows(&client(&url), &query(&["bitcoin", "ripple"])).await.unwrap();

	assert_eq!(rows.len(), 2);
	assert_eq!(rows[0].id, "bitcoin");
	assert_eq!(rows[1].id, "ripple");
	assert_eq!(rows[0].price, 100.0);
	assert_eq!(rows[0].pct_change_24h, Some(1.25));

	let raw = client(&url).fetch_markets(&query(&["bitcoin"])).await.unwrap();
	assert_eq!(raw[0]["echo_vs_currency"], "usd");
}

#[tokio::test]
async fn test_client_maps_error_status() {
	let (upstream, url) = spawn_upstream().await;
	upstream.mode.store(MODE_RATE_LIMITED, Ordering::SeqCst);

	let err = client(&url).fetch_markets(&query(&["bitcoin"])).await.unwrap_err();

	match err {
		UpstreamError::Status { code, message } => {
			assert_eq!(code, 429);
			assert_eq!(message, "slow down");
		}
		other => panic!("unexpected error: {:?}", other),
	}
}

#[tokio::test]
async fn test_client_rejects_non_array_body() {
	let (upstream, url) = spawn_upstream().await;
	upstream.mode.store(MODE_NOT_ARRAY, Ordering::SeqCst);

	let err = client(&url).fetch_markets(&query(&["bitcoin"])).await.unwrap_err();

	assert!(matches!(err, UpstreamError::Decode(_)), "unexpected error: {:?}", err);
}

#[tokio::test]
async fn test_client_reports_transport_failure() {
	// 先占一个端口再释放，保证没人在听
	let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	drop(listener);

	let err = client(&format!("http://{}/coins/markets", addr)).fetch_markets(&query(&["bitcoin"])).await.unwrap_err();

	assert!(matches!(err, UpstreamError::Transport(_)), "unexpected error: {:?}", err);
	assert_eq!(err.status_code(), None);
}

#[tokio::test]
async fn test_proxy_end_to_end_with_stale_fallback() {
	let (upstream, upstream_url) = spawn_upstream().await;
	// TTL 为 0，每个请求都会尝试回源
	let state = build_state(&api_config(0, None, generous_rule()), &upstream_url).unwrap();
	let proxy_addr = spawn_server(app(state)).await;
	let through_proxy = client(&format!("http://{}/api/coingecko/markets", proxy_addr));

	let fresh = fetch_market_rows(&through_proxy, &query(&["cardano"])).await.unwrap();
	assert_eq!(fresh[0].id, "cardano");
	assert_eq!(upstream.hits.load(Ordering::SeqCst), 1);

	upstream.mode.store(MODE_RATE_LIMITED, Ordering::SeqCst);
	let stale = fetch_market_rows(&through_proxy, &query(&["cardano"])).await.unwrap();
	assert_eq!(stale, fresh);
	assert_eq!(upstream.hits.load(Ordering::SeqCst), 2);

	// 没缓存过的查询只能拿到 502
	let err = through_proxy.fetch_markets(&query(&["solana"])).await.unwrap_err();
	assert_eq!(err.status_code(), Some(502));
}
