use {
	crate::{api_types::ApiResponse, resolver::ResolutionError},
	axum::{
		Json,
		http::StatusCode,
		response::{IntoResponse, Response},
	},
};

/// Error codes carried in the `{code, msg}` body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCode {
	Success = 0,
	/// 上游不可用且没有缓存
	UpstreamUnavailable = 3001,
	/// 请求过于频繁
	TooManyRequests = 3002,
	InternalError = 3998,
}

impl ApiErrorCode {
	pub fn message(&self) -> &'static str {
		match self {
			ApiErrorCode::Success => "success",
			ApiErrorCode::UpstreamUnavailable => "Upstream unavailable",
			ApiErrorCode::TooManyRequests => "Too many requests",
			ApiErrorCode::InternalError => "Internal error",
		}
	}

	pub fn as_i32(&self) -> i32 {
		*self as i32
	}

	pub fn status(&self) -> StatusCode {
		match self {
			ApiErrorCode::Success => StatusCode::OK,
			ApiErrorCode::UpstreamUnavailable => StatusCode::BAD_GATEWAY,
			ApiErrorCode::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
			ApiErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl IntoResponse for ApiErrorCode {
	fn into_response(self) -> Response {
		(self.status(), Json(ApiResponse::<()>::error(self))).into_response()
	}
}

// 只有冷缓存（没有任何旧数据）才会走到这里
impl IntoResponse for ResolutionError {
	fn into_response(self) -> Response {
		let code = match &self {
			ResolutionError::Throttled => ApiErrorCode::TooManyRequests,
			ResolutionError::Upstream(_) | ResolutionError::Abandoned => ApiErrorCode::UpstreamUnavailable,
		};
		(code.status(), Json(ApiResponse::<()>::with_message(code, self.to_string()))).into_response()
	}
}
