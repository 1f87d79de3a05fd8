//! 查询参数 / 行数据解析测试
//! 运行方式: cargo test --test market_query_tests

use {
	common::market_types::{ChangeWindow, MarketQuery, MarketRow},
	dashboard::consts::symbol_to_id,
	serde_json::json,
};

#[test]
fn test_canonical_key_ignores_parameter_order() {
	let a = MarketQuery::from_pairs([("vs_currency", "usd"), ("ids", "bitcoin,ripple"), ("sparkline", "false")]);
	let b = MarketQuery::from_pairs([("sparkline", "false"), ("ids", "bitcoin,ripple"), ("vs_currency", "usd")]);

	assert_eq!(a.canonical(), b.canonical());
	assert_eq!(a.canonical(), "ids=bitcoin%2Cripple&sparkline=false&vs_currency=usd");
}

#[test]
fn test_canonical_key_distinguishes_values() {
	let a = MarketQuery::new().vs_currency("usd").ids(["bitcoin"]);
	let b = MarketQuery::new().vs_currency("usd").ids(["ripple"]);
	let c = MarketQuery::new().vs_currency("eur").ids(["bitcoin"]);

	assert_ne!(a.canonical(), b.canonical());
	assert_ne!(a.canonical(), c.canonical());
}

#[test]
fn test_builder_sets_upstream_parameters() {
	let query = MarketQuery::new()
		.vs_currency("usd")
		.ids(["bitcoin", "cardano"])
		.order("market_cap_desc")
		.per_page(100)
		.page(1)
		.price_change_percentage(&ChangeWindow::ALL)
		.sparkline(true);

	assert_eq!(query.get("ids"), Some("bitcoin,cardano"));
	assert_eq!(query.get("per_page"), Some("100"));
	assert_eq!(query.get("page"), Some("1"));
	assert_eq!(query.get("price_change_percentage"), Some("1h,24h,7d"));
	assert_eq!(query.get("sparkline"), Some("true"));
	assert_eq!(query.get("missing"), None);
}

#[test]
fn test_empty_query_has_empty_key() {
	let query = MarketQuery::new();

	assert!(query.is_empty());
	assert_eq!(query.canonical(), "");
}

#[test]
fn test_market_row_tolerates_nulls_and_missing_fields() {
	let raw = json!({
		"id": "bitcoin",
		"symbol": "btc",
		"name": null,
		"current_price": null,
		"price_change_percentage_24h_in_currency": 2.5,
		"unknown_field": "ignored",
	});

	let row: MarketRow = serde_json::from_value(raw).unwrap();

	assert_eq!(row.id, "bitcoin");
	assert_eq!(row.name, "");
	assert_eq!(row.price, 0.0);
	assert_eq!(row.pct_change_1h, None);
	assert_eq!(row.change_pct(ChangeWindow::H24), Some(2.5));
	assert!(row.sparkline.is_none());
}

#[test]
fn test_market_row_reads_sparkline() {
	let raw = json!({
		"id": "ripple",
		"symbol": "xrp",
		"name": "XRP",
		"current_price": 0.5,
		"total_volume": 1000.0,
		"sparkline_in_7d": { "price": [0.4, 0.45, 0.5] },
	});

	let row: MarketRow = serde_json::from_value(raw).unwrap();

	assert_eq!(row.volume, 1000.0);
	assert_eq!(row.sparkline.unwrap().price, vec![0.4, 0.45, 0.5]);
}

#[test]
fn test_symbol_to_id() {
	assert_eq!(symbol_to_id("BTC"), "bitcoin");
	assert_eq!(symbol_to_id("xrp"), "ripple");
	assert_eq!(symbol_to_id("ADA"), "cardano");
	assert_eq!(symbol_to_id("DOGE"), "doge");
}
