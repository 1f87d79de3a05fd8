use {
	crate::{
		consts::{TOP_MOVERS_UNIVERSE, symbol_to_id},
		poller::PollSource,
		watchlist::Watchlist,
	},
	async_trait::async_trait,
	common::{
		consts::{CURRENCY_USD, ORDER_MARKET_CAP_DESC},
		market_types::{ChangeWindow, MarketQuery, MarketRow},
		markets_client::{MarketSource, fetch_market_rows},
		ranking::{TopMovers, rank},
	},
	serde::{Deserialize, Serialize},
	std::{collections::HashSet, sync::Arc},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerItem {
	pub symbol: String,
	pub price: f64,
	pub change_pct: f64,
}

impl TickerItem {
	/// 24h 缺失时按 0 展示
	pub fn from_market_row(row: &MarketRow) -> Self {
		Self { symbol: row.symbol.to_uppercase(), price: row.price, change_pct: row.change_pct(ChangeWindow::H24).unwrap_or(0.0) }
	}
}

/// Price strip for a fixed set of symbols
pub struct TickerSource {
	markets: Arc<dyn MarketSource>,
	ids: Vec<String>,
}

impl TickerSource {
	pub fn new<S: AsRef<str>>(markets: Arc<dyn MarketSource>, symbols: &[S]) -> Self {
		let ids = symbols.iter().map(|s| symbol_to_id(s.as_ref())).collect();
		Self { markets, ids }
	}

	pub fn query(&self) -> MarketQuery {
		MarketQuery::new().vs_currency(CURRENCY_USD).ids(&self.ids).sparkline(false).price_change_percentage(&[ChangeWindow::H24])
	}
}

#[async_trait]
impl PollSource for TickerSource {
	type Output = Vec<TickerItem>;

	fn name(&self) -> &str {
		"ticker"
	}

	async fn fetch(&self) -> anyhow::Result<Self::Output> {
		let rows = fetch_market_rows(self.markets.as_ref(), &self.query()).await?;
		Ok(rows.iter().map(TickerItem::from_market_row).collect())
	}
}

/// Gainers/losers among the largest markets by cap
pub struct TopMoversSource {
	markets: Arc<dyn MarketSource>,
	symbols: Option<HashSet<String>>,
	gainers_count: usize,
	losers_count: usize,
}

impl TopMoversSource {
	/// An empty symbol list means no filter
	pub fn new(markets: Arc<dyn MarketSource>, symbols: &[String], gainers_count: usize, losers_count: usize) -> Self {
		let symbols = if symbols.is_empty() { None } else { Some(symbols.iter().map(|s| s.to_uppercase()).collect()) };
		Self { markets, symbols, gainers_count, losers_count }
	}

	pub fn query(&self) -> MarketQuery {
		MarketQuery::new()
			.vs_currency(CURRENCY_USD)
			.order(ORDER_MARKET_CAP_DESC)
			.per_page(TOP_MOVERS_UNIVERSE)
			.page(1)
			.sparkline(false)
			.price_change_percentage(&[ChangeWindow::H24])
	}
}

#[async_trait]
impl PollSource for TopMoversSource {
	type Output = TopMovers;

	fn name(&self) -> &str {
		"top_movers"
	}

	async fn fetch(&self) -> anyhow::Result<Self::Output> {
		let rows = fetch_market_rows(self.markets.as_ref(), &self.query()).await?;
		Ok(rank(&rows, self.symbols.as_ref(), self.gainers_count, self.losers_count))
	}
}

/// Full rows (all windows + sparkline) for whatever the watchlist holds at fetch time
pub struct WatchlistMarketsSource {
	markets: Arc<dyn MarketSource>,
	watchlist: Arc<Watchlist>,
}

impl WatchlistMarketsSource {
	pub fn new(markets: Arc<dyn MarketSource>, watchlist: Arc<Watchlist>) -> Self {
		Self { markets, watchlist }
	}

	pub fn query_for(ids: &[String]) -> MarketQuery {
		MarketQuery::new()
			.vs_currency(CURRENCY_USD)
			.ids(ids)
			.order(ORDER_MARKET_CAP_DESC)
			.per_page(ids.len())
			.page(1)
			.price_change_percentage(&ChangeWindow::ALL)
			.sparkline(true)
	}
}

#[async_trait]
impl PollSource for WatchlistMarketsSource {
	type Output = Vec<MarketRow>;

	fn name(&self) -> &str {
		"watchlist_markets"
	}

	async fn fetch(&self) -> anyhow::Result<Self::Output> {
		let ids = self.watchlist.ids();
		// 空列表不发请求
		if ids.is_empty() {
			return Ok(Vec::new());
		}
		Ok(fetch_market_rows(self.markets.as_ref(), &Self::query_for(&ids)).await?)
	}
}
