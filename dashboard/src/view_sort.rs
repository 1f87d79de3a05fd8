use {
	common::market_types::MarketRow,
	serde::{Deserialize, Serialize},
	std::cmp::Ordering,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
	Asset,
	Price,
	H1,
	H24,
	D7,
	Volume,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
	Asc,
	Desc,
}

impl SortDir {
	fn flipped(self) -> Self {
		match self {
			SortDir::Asc => SortDir::Desc,
			SortDir::Desc => SortDir::Asc,
		}
	}
}

/// Search + sort state for the watchlist table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchlistView {
	pub search: String,
	pub sort_by: SortKey,
	pub sort_dir: SortDir,
}

impl Default for WatchlistView {
	fn default() -> Self {
		Self { search: String::new(), sort_by: SortKey::Asset, sort_dir: SortDir::Asc }
	}
}

impl WatchlistView {
	/// Same key flips direction, a new key starts descending
	pub fn set_sort(&mut self, key: SortKey) {
		if self.sort_by == key {
			self.sort_dir = self.sort_dir.flipped();
		} else {
			self.sort_by = key;
			self.sort_dir = SortDir::Desc;
		}
	}

	pub fn matches(&self, row: &MarketRow) -> bool {
		let needle = self.search.trim().to_lowercase();
		if needle.is_empty() {
			return true;
		}
		[&row.id, &row.symbol, &row.name].iter().any(|field| field.to_lowercase().contains(&needle))
	}

	pub fn apply(&self, rows: &[MarketRow]) -> Vec<MarketRow> {
		let mut visible: Vec<MarketRow> = rows.iter().filter(|row| self.matches(row)).cloned().collect();
		visible.sort_by(|a, b| self.compare(a, b));
		visible
	}

	fn compare(&self, a: &MarketRow, b: &MarketRow) -> Ordering {
		let directed = |ordering: Ordering| match self.sort_dir {
			SortDir::Asc => ordering,
			SortDir::Desc => ordering.reverse(),
		};
		match self.sort_by {
			SortKey::Asset => directed(a.name.to_lowercase().cmp(&b.name.to_lowercase()).then_with(|| a.symbol.cmp(&b.symbol))),
			SortKey::Price => directed(a.price.total_cmp(&b.price)),
			SortKey::Volume => directed(a.volume.total_cmp(&b.volume)),
			SortKey::H1 => compare_optional(a.pct_change_1h, b.pct_change_1h, directed),
			SortKey::H24 => compare_optional(a.pct_change_24h, b.pct_change_24h, directed),
			SortKey::D7 => compare_optional(a.pct_change_7d, b.pct_change_7d, directed),
		}
	}
}

// 缺失值无论升降序都排最后
fn compare_optional(a: Option<f64>, b: Option<f64>, directed: impl Fn(Ordering) -> Ordering) -> Ordering {
	match (a.filter(|v| v.is_finite()), b.filter(|v| v.is_finite())) {
		(Some(a), Some(b)) => directed(a.total_cmp(&b)),
		(Some(_), None) => Ordering::Less,
		(None, Some(_)) => Ordering::Greater,
		(None, None) => Ordering::Equal,
	}
}
