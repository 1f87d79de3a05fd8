use {
	crate::cache::{CacheEntry, CacheStore},
	async_singleflight::Group,
	common::{
		market_types::MarketQuery,
		markets_client::{MarketSource, UpstreamError},
	},
	serde_json::Value,
	std::{convert::Infallible, sync::Arc, time::Duration},
	thiserror::Error,
	tokio::time::Instant,
	tracing::{debug, error, info, warn},
};

/// Surfaced only when the upstream failed and nothing is cached for the query
#[derive(Debug, Error)]
pub enum ResolutionError {
	#[error("upstream unavailable and no cached data: {0}")]
	Upstream(#[from] UpstreamError),

	// 合并请求的 leader 被取消，没有结果可分
	#[error("upstream refresh was abandoned and no cached data is available")]
	Abandoned,

	/// 调用方被限流，不允许回源
	#[error("refresh not allowed for this client right now and no cached data is available")]
	Throttled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
	/// cache hit within TTL
	Fresh,
	/// fetched from upstream for this request
	Refreshed,
	/// upstream failed, last known good entry served regardless of age
	Stale,
}

impl Freshness {
	pub fn as_header(&self) -> &'static str {
		match self {
			Freshness::Fresh => "HIT",
			Freshness::Refreshed => "MISS",
			Freshness::Stale => "STALE",
		}
	}
}

#[derive(Debug, Clone)]
pub struct Resolved {
	pub payload: Arc<Value>,
	pub freshness: Freshness,
	pub age: Duration,
}

/// TTL cache in front of the upstream with stale-on-failure fallback.
///
/// Concurrent misses for one key share a single upstream call, and every
/// waiter gets that call's outcome (payload or error) as the same value.
pub struct MarketsResolver {
	source: Arc<dyn MarketSource>,
	cache: Arc<dyn CacheStore>,
	ttl: Duration,
	flights: Group<String, Result<Arc<Value>, UpstreamError>, Infallible>,
}

impl MarketsResolver {
	pub fn new(source: Arc<dyn MarketSource>, cache: Arc<dyn CacheStore>, ttl: Duration) -> Self {
		Self { source, cache, ttl, flights: Group::new() }
	}

	pub fn ttl(&self) -> Duration {
		self.ttl
	}

	pub fn cache(&self) -> &Arc<dyn CacheStore> {
		&self.cache
	}

	pub async fn resolve(&self, query: &MarketQuery) -> Result<Resolved, ResolutionError> {
		self.resolve_gated(query, || true).await
	}

	/// Like [`resolve`](Self::resolve), but `may_refresh` is asked before going
	/// upstream. It is never consulted on a fresh hit; when it refuses, any
	/// cached entry is served as stale and only a cold miss fails.
	pub async fn resolve_gated(&self, query: &MarketQuery, may_refresh: impl FnOnce() -> bool) -> Result<Resolved, ResolutionError> {
		let key = query.canonical();

		// 1. TTL 内直接返回缓存
		let cached = self.cache.get(&key).await;
		if let Some(entry) = &cached
			&& entry.age() < self.ttl
		{
			debug!(key = %key, age_ms = entry.age().as_millis() as u64, "cache hit");
			return Ok(Resolved { payload: entry.payload.clone(), freshness: Freshness::Fresh, age: entry.age() });
		}

		// 2. 过期或不存在，请求上游（同 key 并发只发一次，结果原样分给所有等待者）
		let reason = if may_refresh() {
			let outcome = self.flights.work(&key, async { Ok::<_, Infallible>(self.refresh(&key, query).await) }).await;
			match outcome {
				Ok(Ok(payload)) => return Ok(Resolved { payload, freshness: Freshness::Refreshed, age: Duration::ZERO }),
				Ok(Err(e)) => ResolutionError::Upstream(e),
				Err(_) => ResolutionError::Abandoned,
			}
		} else {
			ResolutionError::Throttled
		};

		// 3. 上游失败，有旧数据就返回旧数据
		let fallback = match self.cache.get(&key).await {
			Some(entry) => Some(entry),
			None => cached,
		};
		match fallback {
			Some(entry) => {
				warn!(key = %key, age_ms = entry.age().as_millis() as u64, reason = %reason, "serving stale entry");
				Ok(Resolved { payload: entry.payload.clone(), freshness: Freshness::Stale, age: entry.age() })
			}
			None => {
				error!(key = %key, reason = %reason, "cold miss and no refresh result");
				Err(reason)
			}
		}
	}

	async fn refresh(&self, key: &str, query: &MarketQuery) -> Result<Arc<Value>, UpstreamError> {
		let started = Instant::now();
		let payload = Arc::new(self.source.fetch_markets(query).await?);
		self.cache.put(key, CacheEntry::new(payload.clone())).await;
		info!(key = %key, elapsed_ms = started.elapsed().as_millis() as u64, "cache refreshed from upstream");
		Ok(payload)
	}
}
