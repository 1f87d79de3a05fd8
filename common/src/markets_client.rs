use {
	crate::market_types::{MarketQuery, MarketRow},
	async_trait::async_trait,
	reqwest::{Client, header::ACCEPT},
	serde_json::Value,
	std::time::Duration,
	thiserror::Error,
	tracing::debug,
};

/// 上游失败，不做重试，由调用方决定
#[derive(Debug, Clone, Error)]
pub enum UpstreamError {
	#[error("Upstream transport error: {0}")]
	Transport(String),

	#[error("Upstream returned status {code}: {message}")]
	Status { code: u16, message: String },

	#[error("Upstream response decode error: {0}")]
	Decode(String),
}

impl UpstreamError {
	/// HTTP status when the upstream answered at all
	pub fn status_code(&self) -> Option<u16> {
		match self {
			UpstreamError::Status { code, .. } => Some(*code),
			_ => None,
		}
	}
}

/// Anything that can answer a markets listing query.
///
/// Implemented by [`MarketsClient`] for both the real upstream and the proxy,
/// which expose the same query parameters and response shape.
#[async_trait]
pub trait MarketSource: Send + Sync {
	async fn fetch_markets(&self, query: &MarketQuery) -> Result<Value, UpstreamError>;
}

/// Fetch and decode into typed rows
pub async fn fetch_market_rows(source: &dyn MarketSource, query: &MarketQuery) -> Result<Vec<MarketRow>, UpstreamError> {
	let payload = source.fetch_markets(query).await?;
	serde_json::from_value(payload).map_err(|e| UpstreamError::Decode(e.to_string()))
}

#[derive(Debug, Clone, Copy)]
pub struct ClientTimeouts {
	pub request: Duration,
	pub connect: Duration,
}

impl Default for ClientTimeouts {
	fn default() -> Self {
		Self { request: Duration::from_secs(15), connect: Duration::from_secs(5) }
	}
}

pub fn build_http_client(timeouts: ClientTimeouts) -> anyhow::Result<Client> {
	let client = Client::builder()
		.timeout(timeouts.request) // 读超时，避免一次慢请求拖住下一个 tick
		.connect_timeout(timeouts.connect)
		.build()?;
	Ok(client)
}

/// One GET per call against a markets listing URL. No caching, no retries.
#[derive(Debug, Clone)]
pub struct MarketsClient {
	client: Client,
	url: String,
}

impl MarketsClient {
	pub fn new(url: impl Into<String>, timeouts: ClientTimeouts) -> anyhow::Result<Self> {
		Ok(Self::with_client(build_http_client(timeouts)?, url))
	}

	pub fn with_client(client: Client, url: impl Into<String>) -> Self {
		Self { client, url: url.into() }
	}

	pub fn url(&self) -> &str {
		&self.url
	}
}

#[async_trait]
impl MarketSource for MarketsClient {
	async fn fetch_markets(&self, query: &MarketQuery) -> Result<Value, UpstreamError> {
		let response = self.client.get(&self.url).header(ACCEPT, "application/json").query(query).send().await.map_err(|e| UpstreamError::Transport(e.to_string()))?;

		let status = response.status();
		if !status.is_success() {
			let message = response.text().await.unwrap_or_default();
			return Err(UpstreamError::Status { code: status.as_u16(), message });
		}

		let payload: Value = response.json().await.map_err(|e| UpstreamError::Decode(e.to_string()))?;
		// 只接受数组，错误对象不能进缓存
		if !payload.is_array() {
			return Err(UpstreamError::Decode(format!("expected a JSON array from {}", self.url)));
		}
		debug!(url = %self.url, query = %query, "markets fetched");
		Ok(payload)
	}
}
