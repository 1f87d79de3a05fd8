//! 行情数据源测试：ticker / 涨跌榜 / 自选列表行情
//! 运行方式: cargo test --test sources_tests

use {
	dashboard::{
		poller::PollSource,
		sources::{TickerItem, TickerSource, TopMoversSource, WatchlistMarketsSource},
		watchlist::{JsonFileStore, Watchlist},
	},
	std::sync::Arc,
	tests::test_utils::{MockMarkets, market_row, temp_file},
};

#[tokio::test]
async fn test_ticker_maps_symbols_and_rows() {
	let mut ripple = market_row("ripple", "xrp", None);
	ripple.pct_change_24h_plain = Some(-0.75);
	let markets = MockMarkets::with_rows(vec![market_row("bitcoin", "btc", Some(2.0)), ripple, market_row("doge", "doge", None)]);
	let source = TickerSource::new(markets.clone(), &["BTC", "xrp", "DOGE"]);

	let items = source.fetch().await.unwrap();

	let query = markets.last_query().unwrap();
	assert_eq!(query.get("ids"), Some("bitcoin,ripple,doge"));
	assert_eq!(query.get("vs_currency"), Some("usd"));
	assert_eq!(query.get("sparkline"), Some("false"));
	assert_eq!(
		items,
		vec![
			TickerItem { symbol: "BTC".to_string(), price: 1.0, change_pct: 2.0 },
			TickerItem { symbol: "XRP".to_string(), price: 1.0, change_pct: -0.75 },
			// 缺失按 0 展示
			TickerItem { symbol: "DOGE".to_string(), price: 1.0, change_pct: 0.0 },
		]
	);
}

#[tokio::test]
async fn test_ticker_propagates_upstream_failure() {
	let markets = MockMarkets::new();
	markets.set_failing(true);
	let source = TickerSource::new(markets.clone(), &["BTC"]);

	assert!(source.fetch().await.is_err());
}

#[tokio::test]
async fn test_top_movers_ranks_largest_markets() {
	let markets = MockMarkets::with_rows(vec![
		market_row("a", "a", Some(5.0)),
		market_row("b", "b", Some(-3.0)),
		market_row("c", "c", Some(0.0)),
		market_row("d", "d", Some(10.0)),
	]);
	let source = TopMoversSource::new(markets.clone(), &[], 2, 2);

	let movers = source.fetch().await.unwrap();

	let query = markets.last_query().unwrap();
	assert_eq!(query.get("order"), Some("market_cap_desc"));
	assert_eq!(query.get("per_page"), Some("100"));
	assert_eq!(query.get("page"), Some("1"));
	assert_eq!(query.get("ids"), None);
	assert_eq!(movers.gainers.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(), vec!["d", "a"]);
	assert_eq!(movers.losers.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(), vec!["b"]);
}

#[tokio::test]
async fn test_top_movers_symbol_filter() {
	let markets = MockMarkets::with_rows(vec![market_row("bitcoin", "btc", Some(1.0)), market_row("other", "oth", Some(9.0))]);
	let source = TopMoversSource::new(markets, &["btc".to_string()], 5, 5);

	let movers = source.fetch().await.unwrap();

	assert_eq!(movers.gainers.len(), 1);
	assert_eq!(movers.gainers[0].symbol, "BTC");
}

#[tokio::test]
async fn test_empty_watchlist_makes_no_request() {
	let markets = MockMarkets::new();
	let watchlist = Arc::new(Watchlist::open(Box::new(JsonFileStore::new(temp_file("empty-watchlist")))));
	let source = WatchlistMarketsSource::new(markets.clone(), watchlist);

	let rows = source.fetch().await.unwrap();

	assert!(rows.is_empty());
	assert_eq!(markets.calls(), 0);
}

#[tokio::test]
async fn test_watchlist_markets_follow_current_list() {
	let path = temp_file("watchlist-markets");
	let markets = MockMarkets::new();
	let watchlist = Arc::new(Watchlist::open(Box::new(JsonFileStore::new(&path))));
	let source = WatchlistMarketsSource::new(markets.clone(), watchlist.clone());

	watchlist.add("bitcoin");
	watchlist.add("ethereum");
	source.fetch().await.unwrap();

	let query = markets.last_query().unwrap();
	assert_eq!(query.get("ids"), Some("ethereum,bitcoin"));
	assert_eq!(query.get("per_page"), Some("2"));
	assert_eq!(query.get("sparkline"), Some("true"));
	assert_eq!(query.get("price_change_percentage"), Some("1h,24h,7d"));

	// 下一次 fetch 用最新的列表
	watchlist.remove("ethereum");
	source.fetch().await.unwrap();
	assert_eq!(markets.last_query().unwrap().get("ids"), Some("bitcoin"));

	let _ = std::fs::remove_file(path);
}
