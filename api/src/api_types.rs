use serde::{Deserialize, Serialize};

/// Envelope for non-payload responses; market data itself is returned as the raw upstream array
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
	pub code: i32,
	pub msg: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<T>,
}

impl<T> ApiResponse<T> {
	pub fn success(data: T) -> Self {
		Self { code: 0, msg: "success".to_string(), data: Some(data) }
	}

	pub fn error(error_code: crate::api_error::ApiErrorCode) -> Self {
		Self { code: error_code.as_i32(), msg: error_code.message().to_string(), data: None }
	}

	pub fn with_message(error_code: crate::api_error::ApiErrorCode, msg: String) -> Self {
		Self { code: error_code.as_i32(), msg, data: None }
	}
}

/// Cache occupancy reported by the health route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
	pub cache_entries: usize,
	pub cache_ttl_ms: u64,
}
