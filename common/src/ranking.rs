use {
	crate::market_types::{ChangeWindow, MarketRow, RankedRow},
	serde::{Deserialize, Serialize},
	std::collections::HashSet,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopMovers {
	pub gainers: Vec<RankedRow>,
	pub losers: Vec<RankedRow>,
}

/// Top gainers / losers over the 24h window
pub fn rank(rows: &[MarketRow], symbol_filter: Option<&HashSet<String>>, gainers_count: usize, losers_count: usize) -> TopMovers {
	rank_by(rows, ChangeWindow::H24, symbol_filter, gainers_count, losers_count)
}

/// 非有限值（缺失/NaN/Inf）直接丢弃，0 既不算涨也不算跌。
/// 排序用稳定排序，同值保持输入顺序
pub fn rank_by(rows: &[MarketRow], window: ChangeWindow, symbol_filter: Option<&HashSet<String>>, gainers_count: usize, losers_count: usize) -> TopMovers {
	let allowed: Option<HashSet<String>> = symbol_filter.map(|symbols| symbols.iter().map(|s| s.to_uppercase()).collect());

	let ranked = rows.iter().map(|row| RankedRow::from_market_row(row, window)).filter(|row| row.change_pct.is_finite()).filter(|row| match &allowed {
		Some(set) => set.contains(&row.symbol),
		None => true,
	});

	let (mut gainers, mut losers): (Vec<RankedRow>, Vec<RankedRow>) = ranked.filter(|row| row.change_pct != 0.0).partition(|row| row.change_pct > 0.0);

	gainers.sort_by(|a, b| b.change_pct.total_cmp(&a.change_pct));
	gainers.truncate(gainers_count);

	losers.sort_by(|a, b| a.change_pct.total_cmp(&b.change_pct));
	losers.truncate(losers_count);

	TopMovers { gainers, losers }
}
