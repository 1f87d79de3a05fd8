use {
	crate::{consts::PREDICTION_PATH, poller::PollSource},
	async_trait::async_trait,
	common::markets_client::{ClientTimeouts, build_http_client},
	reqwest::Client,
	serde::{Deserialize, Serialize},
};

/// Next-day price prediction from the secondary service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
	pub ticker: String,
	pub actual_value: f64,
	pub prediction_value: f64,
	// 服务端字段名就是 flutation
	#[serde(rename = "flutation")]
	pub fluctuation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
	Up,
	Down,
	Flat,
	Unknown,
}

impl PredictionResponse {
	/// Service labels are Portuguese: Alta / Queda / Manteve
	pub fn trend(&self) -> Trend {
		match self.fluctuation.as_str() {
			"Alta" => Trend::Up,
			"Queda" => Trend::Down,
			"Manteve" => Trend::Flat,
			_ => Trend::Unknown,
		}
	}
}

pub struct PredictionClient {
	client: Client,
	url: String,
}

impl PredictionClient {
	pub fn new(base_url: &str, timeouts: ClientTimeouts) -> anyhow::Result<Self> {
		Ok(Self { client: build_http_client(timeouts)?, url: format!("{}{}", base_url.trim_end_matches('/'), PREDICTION_PATH) })
	}

	pub fn url(&self) -> &str {
		&self.url
	}

	pub async fn fetch_prediction(&self) -> anyhow::Result<PredictionResponse> {
		let response = self.client.get(&self.url).send().await?;

		if !response.status().is_success() {
			return Err(anyhow::anyhow!("Failed to get prediction: status={}, body={}", response.status(), response.text().await.unwrap_or_default()));
		}

		Ok(response.json().await?)
	}
}

#[async_trait]
impl PollSource for PredictionClient {
	type Output = PredictionResponse;

	fn name(&self) -> &str {
		"prediction"
	}

	async fn fetch(&self) -> anyhow::Result<Self::Output> {
		self.fetch_prediction().await
	}
}
