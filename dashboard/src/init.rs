use {
	crate::{
		config::{DashboardConfig, get_config, load_config},
		poller::Poller,
		prediction::PredictionClient,
		sources::{TickerSource, TopMoversSource, WatchlistMarketsSource},
		watchlist::{JsonFileStore, Watchlist},
	},
	common::{
		common_env::{self, CommonEnv},
		markets_client::{MarketSource, MarketsClient},
	},
	std::sync::Arc,
	tracing::info,
};

/// Every consumer the dashboard runs, plus the watchlist they read from
pub struct Dashboard {
	pub watchlist: Arc<Watchlist>,
	pub ticker: Poller<TickerSource>,
	pub top_movers: Poller<TopMoversSource>,
	pub markets: Poller<WatchlistMarketsSource>,
	pub prediction: Poller<PredictionClient>,
}

impl Dashboard {
	pub fn build(config: &DashboardConfig, env: &CommonEnv) -> anyhow::Result<Self> {
		let timeouts = config.proxy.timeouts();
		let proxy: Arc<dyn MarketSource> = Arc::new(MarketsClient::new(config.proxy.markets_url(), timeouts)?);
		let upstream: Arc<dyn MarketSource> = Arc::new(MarketsClient::new(env.upstream_markets_url.clone(), timeouts)?);
		let pick = |bypass: bool| if bypass { upstream.clone() } else { proxy.clone() };

		let watchlist = Arc::new(Watchlist::open(Box::new(JsonFileStore::new(&config.watchlist.path))));
		info!("Watchlist loaded from {} with {} ids", config.watchlist.path, watchlist.len());

		let interval = config.refresh_interval();
		let ticker = Poller::new(TickerSource::new(pick(config.ticker.bypass_proxy), &config.ticker.symbols), interval);
		let top_movers = Poller::new(TopMoversSource::new(pick(config.top_movers.bypass_proxy), &config.top_movers.symbols, config.top_movers.gainers, config.top_movers.losers), interval);
		let markets = Poller::new(WatchlistMarketsSource::new(proxy.clone(), watchlist.clone()), interval);
		let prediction = Poller::new(PredictionClient::new(&env.prediction_api_base, timeouts)?, interval);

		Ok(Self { watchlist, ticker, top_movers, markets, prediction })
	}

	/// 预测只在启动时拉一次，不定时轮询
	pub fn activate_all(&self) {
		self.ticker.activate();
		self.top_movers.activate();
		self.markets.activate();
	}

	pub fn deactivate_all(&self) {
		self.ticker.deactivate();
		self.top_movers.deactivate();
		self.markets.deactivate();
		self.prediction.deactivate();
	}
}

pub async fn init_all() -> anyhow::Result<Dashboard> {
	init_load()?;
	common::logging::init_logging(&get_config().logging)?;
	crate::reporter::init_shutdown();
	Dashboard::build(get_config(), common_env::get_common_env())
}

fn init_load() -> anyhow::Result<()> {
	common_env::load_common_env()?;
	load_config(common::consts::DASHBOARD_CONFIG_PATH)?;
	Ok(())
}
