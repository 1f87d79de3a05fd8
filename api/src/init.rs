use {
	crate::{
		cache::MemoryCache,
		config::{ApiConfig, get_config, load_config},
		eviction::policy_for,
		resolver::MarketsResolver,
		server::AppState,
	},
	common::{common_env, markets_client::MarketsClient},
	std::sync::Arc,
	tracing::info,
};

pub async fn init_all() -> anyhow::Result<AppState> {
	init_load()?;
	init_logging()?;
	let state = build_state(get_config(), &common_env::get_common_env().upstream_markets_url)?;
	state.spawn_background_tasks();
	Ok(state)
}

fn init_load() -> anyhow::Result<()> {
	common_env::load_common_env()?;
	load_config(common::consts::API_CONFIG_PATH)?;
	Ok(())
}

fn init_logging() -> anyhow::Result<()> {
	common::logging::init_logging(&get_config().logging)
}

/// 缓存对象在这里创建一次，之后通过 AppState 传给 handler
pub fn build_state(config: &ApiConfig, upstream_url: &str) -> anyhow::Result<AppState> {
	let source = MarketsClient::new(upstream_url, config.upstream.timeouts())?;
	let cache = MemoryCache::new(policy_for(config.cache.max_entries));
	let resolver = MarketsResolver::new(Arc::new(source), Arc::new(cache), config.cache.ttl());
	info!(upstream = %upstream_url, ttl_ms = config.cache.ttl_ms, max_entries = ?config.cache.max_entries, "markets resolver ready");

	AppState::new(Arc::new(resolver), config.rate_limit)
}
