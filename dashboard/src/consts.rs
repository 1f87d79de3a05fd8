/// Key the watchlist is stored under in the local state file
pub const WATCHLIST_KEY: &str = "krypto:watchlist";

pub const DEFAULT_TICKER_SYMBOLS: &[&str] = &["BTC", "XRP", "ADA"];
pub const DEFAULT_GAINERS_COUNT: usize = 5;
pub const DEFAULT_LOSERS_COUNT: usize = 5;

/// Rows fetched for the top movers ranking
pub const TOP_MOVERS_UNIVERSE: usize = 100;

pub const PREDICTION_PATH: &str = "/api/predict";

// 常用代码 -> 上游 id，不在表里的用小写代码
const SYMBOL_IDS: &[(&str, &str)] = &[("BTC", "bitcoin"), ("ETH", "ethereum"), ("XRP", "ripple"), ("ADA", "cardano"), ("SOL", "solana")];

pub fn symbol_to_id(symbol: &str) -> String {
	let upper = symbol.to_uppercase();
	SYMBOL_IDS.iter().find(|(code, _)| *code == upper).map(|(_, id)| id.to_string()).unwrap_or_else(|| symbol.to_lowercase())
}
