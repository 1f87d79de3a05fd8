use {
	crate::consts::{DEFAULT_GAINERS_COUNT, DEFAULT_LOSERS_COUNT, DEFAULT_TICKER_SYMBOLS},
	common::{consts::DEFAULT_REFRESH_MS, logging::LoggingConfig, markets_client::ClientTimeouts},
	config::{Config, File},
	serde::{Deserialize, Serialize},
	std::time::Duration,
	tokio::sync::OnceCell,
};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DashboardConfig {
	pub logging: LoggingConfig,
	pub proxy: ProxyConfig,
	#[serde(default = "default_refresh_ms")]
	pub refresh_ms: u64,
	#[serde(default)]
	pub ticker: TickerConfig,
	#[serde(default)]
	pub top_movers: TopMoversConfig,
	pub watchlist: WatchlistConfig,
}

fn default_refresh_ms() -> u64 {
	DEFAULT_REFRESH_MS
}

impl DashboardConfig {
	pub fn refresh_interval(&self) -> Duration {
		Duration::from_millis(self.refresh_ms)
	}
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProxyConfig {
	/// e.g. http://127.0.0.1:8080
	pub base_url: String,
	pub request_timeout_ms: u64,
	pub connect_timeout_ms: u64,
}

impl ProxyConfig {
	pub fn markets_url(&self) -> String {
		format!("{}/api{}", self.base_url.trim_end_matches('/'), common::consts::PROXY_MARKETS_ROUTE)
	}

	pub fn timeouts(&self) -> ClientTimeouts {
		ClientTimeouts { request: Duration::from_millis(self.request_timeout_ms), connect: Duration::from_millis(self.connect_timeout_ms) }
	}
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TickerConfig {
	pub symbols: Vec<String>,
	/// 直接请求上游，不走代理缓存
	#[serde(default)]
	pub bypass_proxy: bool,
}

impl Default for TickerConfig {
	fn default() -> Self {
		Self { symbols: DEFAULT_TICKER_SYMBOLS.iter().map(|s| s.to_string()).collect(), bypass_proxy: false }
	}
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TopMoversConfig {
	pub gainers: usize,
	pub losers: usize,
	/// 空表示不过滤
	#[serde(default)]
	pub symbols: Vec<String>,
	#[serde(default)]
	pub bypass_proxy: bool,
}

impl Default for TopMoversConfig {
	fn default() -> Self {
		Self { gainers: DEFAULT_GAINERS_COUNT, losers: DEFAULT_LOSERS_COUNT, symbols: Vec::new(), bypass_proxy: false }
	}
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WatchlistConfig {
	pub path: String,
}

pub static CONFIG: OnceCell<DashboardConfig> = OnceCell::const_new();

pub fn load_config(config_path: &str) -> anyhow::Result<()> {
	let run_mode = &common::common_env::get_common_env().run_mode;

	let config = Config::builder().add_source(File::with_name(&format!("{}/{}", config_path, run_mode)).required(true)).build()?;

	let dashboard_config: DashboardConfig = config.try_deserialize()?;
	println!("Configuration loaded for mode: {}", run_mode);
	println!("Configuration: {:?}", dashboard_config);
	check_config(&dashboard_config)?;
	CONFIG.set(dashboard_config)?;
	Ok(())
}

pub fn check_config(config: &DashboardConfig) -> anyhow::Result<()> {
	config.logging.check()?;
	if config.refresh_ms == 0 {
		return Err(anyhow::anyhow!("refresh_ms must be greater than 0"));
	}
	if config.proxy.base_url.is_empty() {
		return Err(anyhow::anyhow!("Proxy base url is empty"));
	}
	if config.proxy.request_timeout_ms == 0 || config.proxy.connect_timeout_ms == 0 {
		return Err(anyhow::anyhow!("proxy timeouts must be greater than 0"));
	}
	if config.ticker.symbols.is_empty() {
		return Err(anyhow::anyhow!("ticker.symbols is empty"));
	}
	if config.watchlist.path.is_empty() {
		return Err(anyhow::anyhow!("watchlist.path is empty"));
	}
	Ok(())
}

pub fn get_config() -> &'static DashboardConfig {
	CONFIG.get().expect("Config not loaded")
}
