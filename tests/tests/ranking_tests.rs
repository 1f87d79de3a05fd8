//! 涨跌榜排序测试
//! 运行方式: cargo test --test ranking_tests

use {
	common::{
		market_types::{ChangeWindow, MarketRow},
		ranking::{rank, rank_by},
	},
	std::collections::HashSet,
	tests::test_utils::market_row,
};

fn ids(rows: &[common::market_types::RankedRow]) -> Vec<&str> {
	rows.iter().map(|row| row.id.as_str()).collect()
}

fn symbols(list: &[&str]) -> HashSet<String> {
	list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_gainers_and_losers_are_ordered_and_truncated() {
	let rows = vec![market_row("a", "a", Some(5.0)), market_row("b", "b", Some(-3.0)), market_row("c", "c", Some(0.0)), market_row("d", "d", Some(10.0))];

	let movers = rank(&rows, None, 2, 2);

	assert_eq!(ids(&movers.gainers), vec!["d", "a"]);
	assert_eq!(ids(&movers.losers), vec!["b"]);
}

#[test]
fn test_zero_change_is_neither_gainer_nor_loser() {
	let rows = vec![market_row("flat", "flat", Some(0.0))];

	let movers = rank(&rows, None, 5, 5);

	assert!(movers.gainers.is_empty());
	assert!(movers.losers.is_empty());
}

#[test]
fn test_non_finite_and_missing_changes_are_excluded() {
	let rows = vec![
		market_row("nan", "nan", Some(f64::NAN)),
		market_row("inf", "inf", Some(f64::INFINITY)),
		market_row("neg_inf", "neginf", Some(f64::NEG_INFINITY)),
		market_row("missing", "missing", None),
		market_row("up", "up", Some(2.0)),
		market_row("down", "down", Some(-2.0)),
	];

	let movers = rank(&rows, None, 10, 10);

	assert_eq!(ids(&movers.gainers), vec!["up"]);
	assert_eq!(ids(&movers.losers), vec!["down"]);
}

#[test]
fn test_symbol_filter_applies_before_ranking() {
	// 过滤在截断之前：即使 x 涨得最多，不在白名单里也不出现
	let rows = vec![market_row("x", "xxx", Some(50.0)), market_row("bitcoin", "btc", Some(1.0)), market_row("ripple", "xrp", Some(-1.0)), market_row("y", "yyy", Some(-40.0))];
	let filter = symbols(&["BTC", "xrp"]);

	let movers = rank(&rows, Some(&filter), 1, 1);

	assert_eq!(ids(&movers.gainers), vec!["bitcoin"]);
	assert_eq!(ids(&movers.losers), vec!["ripple"]);
	assert_eq!(movers.gainers[0].symbol, "BTC");
}

#[test]
fn test_ties_keep_input_order() {
	let rows = vec![market_row("first", "a", Some(3.0)), market_row("second", "b", Some(3.0)), market_row("third", "c", Some(-1.0)), market_row("fourth", "d", Some(-1.0))];

	let movers = rank(&rows, None, 5, 5);

	assert_eq!(ids(&movers.gainers), vec!["first", "second"]);
	assert_eq!(ids(&movers.losers), vec!["third", "fourth"]);
}

#[test]
fn test_same_input_gives_same_output() {
	let rows: Vec<MarketRow> = (0..20).map(|i| market_row(&format!("coin{}", i), &format!("c{}", i), Some(((i * 7) % 11) as f64 - 5.0))).collect();

	assert_eq!(rank(&rows, None, 5, 5), rank(&rows, None, 5, 5));
}

#[test]
fn test_zero_counts_give_empty_lists() {
	let rows = vec![market_row("a", "a", Some(1.0)), market_row("b", "b", Some(-1.0))];

	let movers = rank(&rows, None, 0, 0);

	assert!(movers.gainers.is_empty());
	assert!(movers.losers.is_empty());
}

#[test]
fn test_rank_by_other_window() {
	let mut up_hour = market_row("a", "a", Some(-9.0));
	up_hour.pct_change_1h = Some(4.0);
	let mut down_hour = market_row("b", "b", Some(9.0));
	down_hour.pct_change_1h = Some(-4.0);

	let movers = rank_by(&[up_hour, down_hour], ChangeWindow::H1, None, 5, 5);

	assert_eq!(ids(&movers.gainers), vec!["a"]);
	assert_eq!(ids(&movers.losers), vec!["b"]);
	assert_eq!(movers.gainers[0].change_pct, 4.0);
}

#[test]
fn test_24h_falls_back_to_plain_field() {
	let mut row = market_row("a", "a", None);
	row.pct_change_24h_plain = Some(-2.5);

	let movers = rank(&[row], None, 5, 5);

	assert_eq!(ids(&movers.losers), vec!["a"]);
	assert_eq!(movers.losers[0].change_pct, -2.5);
}
