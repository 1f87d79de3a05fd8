use {
	crate::{
		consts::{HEADER_REQUEST_ID, RATE_LIMIT_PATTERNS},
		handlers::{handle_health, handle_markets},
		resolver::MarketsResolver,
	},
	axum::{
		Router,
		extract::{ConnectInfo, Request},
		http::HeaderName,
		middleware::{self, Next},
		response::Response,
		routing::get,
	},
	common::{
		consts::PROXY_MARKETS_ROUTE,
		rate_limit::{RateLimiter, Rule, rate_limit_gc},
	},
	std::{net::SocketAddr, sync::Arc, time::Duration},
	tower_http::{
		compression::CompressionLayer,
		cors::{Any, CorsLayer},
		request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	},
	uuid::Uuid,
};

/// Handles shared by every request; built once at start-up
#[derive(Clone)]
pub struct AppState {
	pub resolver: Arc<MarketsResolver>,
	pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
	pub fn new(resolver: Arc<MarketsResolver>, rule: Rule) -> anyhow::Result<Self> {
		let rate_limiter = RateLimiter::with_patterns(RATE_LIMIT_PATTERNS, rule)?;
		Ok(Self { resolver, rate_limiter: Arc::new(rate_limiter) })
	}

	/// 启动限流器的后台回收任务
	pub fn spawn_background_tasks(&self) {
		let rate_limiter = self.rate_limiter.clone();
		tokio::spawn(async move { rate_limit_gc(rate_limiter).await });
	}
}

#[derive(Debug, Clone)]
pub struct ClientInfo {
	pub request_id: String,
	pub ip: String,
}

// 真实 IP 优先级：X-Real-IP > X-Forwarded-For 第一个 > 连接地址
fn client_ip(request: &Request) -> String {
	let header_ip = |name: &str| request.headers().get(name).and_then(|header| header.to_str().ok()).and_then(|value| value.split(',').next()).map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

	header_ip("x-real-ip")
		.or_else(|| header_ip("x-forwarded-for"))
		.or_else(|| request.extensions().get::<ConnectInfo<SocketAddr>>().map(|info| info.ip().to_string()))
		.unwrap_or_else(|| "unknown".to_string())
}

// 限流不在这里做：命中缓存的请求不该被拒，只在需要回源时检查
async fn extract_client_info(mut request: Request, next: Next) -> Response {
	let ip = client_ip(&request);
	let request_id = request.headers().get(HEADER_REQUEST_ID).and_then(|header| header.to_str().ok()).map(|header| header.to_string()).unwrap_or_else(|| Uuid::new_v4().to_string());

	request.extensions_mut().insert(ClientInfo { request_id, ip });
	next.run(request).await
}

pub fn app(state: AppState) -> Router {
	let x_request_id = HeaderName::from_static(HEADER_REQUEST_ID);
	let sub_router = Router::new()
		.route("/hi", get(handle_hi))
		.route("/health", get(handle_health))
		.route(PROXY_MARKETS_ROUTE, get(handle_markets))
		.layer(PropagateRequestIdLayer::new(x_request_id.clone()))
		.layer(CompressionLayer::new())
		.layer(middleware::from_fn(extract_client_info))
		.layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid))
		.layer(CorsLayer::new().allow_methods(Any).allow_origin(Any).allow_credentials(false).allow_headers(Any).expose_headers(Any).max_age(Duration::from_secs(60) * 10))
		.with_state(state);

	// 先 nest，未知路径直接 404，不经过中间件
	Router::new().nest("/api", sub_router)
}

async fn handle_hi() -> &'static str {
	"You will succeed."
}
