pub const COMMON_ENV_PATH: &str = "./deploy/common.env";
pub const API_CONFIG_PATH: &str = "./deploy/api";
pub const DASHBOARD_CONFIG_PATH: &str = "./deploy/dashboard";

/// Upstream markets listing endpoint
pub const DEFAULT_UPSTREAM_MARKETS_URL: &str = "https://api.coingecko.com/api/v3/coins/markets";

/// Secondary prediction service
pub const DEFAULT_PREDICTION_API_BASE: &str = "http://localhost:5001";

/// Path the proxy serves markets on (under the `/api` prefix)
pub const PROXY_MARKETS_ROUTE: &str = "/coingecko/markets";

/// Cache freshness window in milliseconds
pub const DEFAULT_CACHE_TTL_MS: u64 = 120_000;

/// Polling consumer interval in milliseconds
pub const DEFAULT_REFRESH_MS: u64 = 60_000;

/// Graceful shutdown wait times (in seconds)
pub const GRACEFUL_CONSUMER_WAIT_SECS: u64 = 1;
pub const GRACEFUL_TASKS_WAIT_SECS: u64 = 1;

/// Query parameter names understood by the upstream
pub const PARAM_VS_CURRENCY: &str = "vs_currency";
pub const PARAM_IDS: &str = "ids";
pub const PARAM_ORDER: &str = "order";
pub const PARAM_PER_PAGE: &str = "per_page";
pub const PARAM_PAGE: &str = "page";
pub const PARAM_PRICE_CHANGE_PERCENTAGE: &str = "price_change_percentage";
pub const PARAM_SPARKLINE: &str = "sparkline";

pub const ORDER_MARKET_CAP_DESC: &str = "market_cap_desc";
pub const CURRENCY_USD: &str = "usd";

pub const RUN_MODE_DEV: &str = "dev";
pub const RUN_MODE_TEST: &str = "test";
pub const RUN_MODE_PROD: &str = "prod";

pub fn validate_run_mode(run_mode: &str) -> anyhow::Result<()> {
	match run_mode {
		RUN_MODE_DEV | RUN_MODE_TEST | RUN_MODE_PROD => Ok(()),
		_ => Err(anyhow::anyhow!("Invalid RUN_MODE: {}, must be one of: {}, {}, {}", run_mode, RUN_MODE_DEV, RUN_MODE_TEST, RUN_MODE_PROD)),
	}
}
