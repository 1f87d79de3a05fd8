use {
	crate::consts::{PARAM_IDS, PARAM_ORDER, PARAM_PAGE, PARAM_PER_PAGE, PARAM_PRICE_CHANGE_PERCENTAGE, PARAM_SPARKLINE, PARAM_VS_CURRENCY},
	serde::{Deserialize, Deserializer, Serialize},
	std::{collections::BTreeMap, fmt},
};

/// Markets listing query.
///
/// Parameters are kept sorted by name so two queries carrying the same
/// parameter values always produce the same [`MarketQuery::canonical`] string,
/// which is what the response cache keys on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarketQuery(BTreeMap<String, String>);

impl MarketQuery {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_pairs<I, K, V>(pairs: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		Self(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
	}

	pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.0.insert(name.into(), value.into());
		self
	}

	pub fn vs_currency(self, currency: &str) -> Self {
		self.with(PARAM_VS_CURRENCY, currency)
	}

	pub fn ids<I, S>(self, ids: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let joined = ids.into_iter().map(|id| id.as_ref().to_string()).collect::<Vec<_>>().join(",");
		self.with(PARAM_IDS, joined)
	}

	pub fn order(self, order: &str) -> Self {
		self.with(PARAM_ORDER, order)
	}

	pub fn per_page(self, per_page: usize) -> Self {
		self.with(PARAM_PER_PAGE, per_page.to_string())
	}

	pub fn page(self, page: u32) -> Self {
		self.with(PARAM_PAGE, page.to_string())
	}

	pub fn price_change_percentage(self, windows: &[ChangeWindow]) -> Self {
		let joined = windows.iter().map(|w| w.as_param()).collect::<Vec<_>>().join(",");
		self.with(PARAM_PRICE_CHANGE_PERCENTAGE, joined)
	}

	pub fn sparkline(self, enabled: bool) -> Self {
		self.with(PARAM_SPARKLINE, enabled.to_string())
	}

	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.get(name).map(String::as_str)
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Stable form-urlencoded serialization, used verbatim as the cache key
	pub fn canonical(&self) -> String {
		url::form_urlencoded::Serializer::new(String::new()).extend_pairs(self.pairs()).finish()
	}
}

impl fmt::Display for MarketQuery {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.canonical())
	}
}

/// Percentage change windows the upstream can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeWindow {
	#[serde(rename = "1h")]
	H1,
	#[serde(rename = "24h")]
	H24,
	#[serde(rename = "7d")]
	D7,
}

impl ChangeWindow {
	pub const ALL: [ChangeWindow; 3] = [ChangeWindow::H1, ChangeWindow::H24, ChangeWindow::D7];

	pub fn as_param(&self) -> &'static str {
		match self {
			ChangeWindow::H1 => "1h",
			ChangeWindow::H24 => "24h",
			ChangeWindow::D7 => "7d",
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sparkline {
	#[serde(default)]
	pub price: Vec<f64>,
}

/// One row of the upstream markets listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketRow {
	#[serde(default, deserialize_with = "string_or_empty")]
	pub id: String,
	#[serde(default, deserialize_with = "string_or_empty")]
	pub symbol: String,
	#[serde(default, deserialize_with = "string_or_empty")]
	pub name: String,
	#[serde(default, deserialize_with = "string_or_empty")]
	pub image: String,
	#[serde(rename = "current_price", default, deserialize_with = "f64_or_zero")]
	pub price: f64,
	#[serde(rename = "total_volume", default, deserialize_with = "f64_or_zero")]
	pub volume: f64,
	#[serde(rename = "price_change_percentage_1h_in_currency", default)]
	pub pct_change_1h: Option<f64>,
	#[serde(rename = "price_change_percentage_24h_in_currency", default)]
	pub pct_change_24h: Option<f64>,
	#[serde(rename = "price_change_percentage_7d_in_currency", default)]
	pub pct_change_7d: Option<f64>,
	// 不带 in_currency 后缀的 24h 字段，上游总会返回
	#[serde(rename = "price_change_percentage_24h", default, skip_serializing_if = "Option::is_none")]
	pub pct_change_24h_plain: Option<f64>,
	#[serde(rename = "sparkline_in_7d", default, skip_serializing_if = "Option::is_none")]
	pub sparkline: Option<Sparkline>,
}

impl MarketRow {
	/// 24h falls back to the plain field when the in-currency one is missing
	pub fn change_pct(&self, window: ChangeWindow) -> Option<f64> {
		match window {
			ChangeWindow::H1 => self.pct_change_1h,
			ChangeWindow::H24 => self.pct_change_24h.or(self.pct_change_24h_plain),
			ChangeWindow::D7 => self.pct_change_7d,
		}
	}
}

/// A market row reduced for gainers/losers lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedRow {
	pub id: String,
	pub symbol: String,
	pub name: String,
	pub price: f64,
	pub change_pct: f64,
}

impl RankedRow {
	/// A missing percentage becomes NaN so it is filtered out as non-finite
	pub fn from_market_row(row: &MarketRow, window: ChangeWindow) -> Self {
		Self {
			id: row.id.clone(),
			symbol: row.symbol.to_uppercase(),
			name: row.name.clone(),
			price: row.price,
			change_pct: row.change_pct(window).unwrap_or(f64::NAN),
		}
	}
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn f64_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}
