use {
	common::{consts::DEFAULT_CACHE_TTL_MS, logging::LoggingConfig, markets_client::ClientTimeouts, rate_limit::Rule},
	config::{Config, File},
	serde::{Deserialize, Serialize},
	std::time::Duration,
	tokio::sync::OnceCell,
};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
	pub logging: LoggingConfig,
	pub server: ServerConfig,
	#[serde(default)]
	pub cache: CacheConfig,
	#[serde(default)]
	pub upstream: UpstreamConfig,
	pub rate_limit: Rule,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
	pub port: u16,
}

impl ServerConfig {
	pub fn get_addr(&self) -> String {
		format!("0.0.0.0:{}", self.port)
	}
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
	pub ttl_ms: u64,
	/// 不配置则不淘汰
	pub max_entries: Option<usize>,
}

impl Default for CacheConfig {
	fn default() -> Self {
		Self { ttl_ms: DEFAULT_CACHE_TTL_MS, max_entries: None }
	}
}

impl CacheConfig {
	pub fn ttl(&self) -> Duration {
		Duration::from_millis(self.ttl_ms)
	}
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
	pub request_timeout_ms: u64,
	pub connect_timeout_ms: u64,
}

impl Default for UpstreamConfig {
	fn default() -> Self {
		let timeouts = ClientTimeouts::default();
		Self { request_timeout_ms: timeouts.request.as_millis() as u64, connect_timeout_ms: timeouts.connect.as_millis() as u64 }
	}
}

impl UpstreamConfig {
	pub fn timeouts(&self) -> ClientTimeouts {
		ClientTimeouts { request: Duration::from_millis(self.request_timeout_ms), connect: Duration::from_millis(self.connect_timeout_ms) }
	}
}

pub static CONFIG: OnceCell<ApiConfig> = OnceCell::const_new();

pub fn load_config(config_path: &str) -> anyhow::Result<()> {
	let run_mode = &common::common_env::get_common_env().run_mode;

	let config = Config::builder().add_source(File::with_name(&format!("{}/{}", config_path, run_mode)).required(true)).build()?;

	let api_config: ApiConfig = config.try_deserialize()?;
	println!("Configuration loaded for mode: {}", run_mode);
	println!("Configuration: {:?}", api_config);
	check_config(&api_config)?;
	CONFIG.set(api_config)?;
	Ok(())
}

pub fn check_config(config: &ApiConfig) -> anyhow::Result<()> {
	config.logging.check()?;
	config.rate_limit.check()?;
	if config.cache.ttl_ms == 0 {
		return Err(anyhow::anyhow!("cache.ttl_ms must be greater than 0"));
	}
	if config.cache.max_entries == Some(0) {
		return Err(anyhow::anyhow!("cache.max_entries must be greater than 0 when set"));
	}
	if config.upstream.request_timeout_ms == 0 || config.upstream.connect_timeout_ms == 0 {
		return Err(anyhow::anyhow!("upstream timeouts must be greater than 0"));
	}
	Ok(())
}

pub fn get_config() -> &'static ApiConfig {
	CONFIG.get().expect("Config not loaded")
}
