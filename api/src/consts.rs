/// Response headers describing how the payload was produced
pub const HEADER_CACHE: &str = "x-cache";
pub const HEADER_CACHE_AGE_MS: &str = "x-cache-age-ms";
pub const HEADER_REQUEST_ID: &str = "x-request-id";

/// Routes (without the `/api` prefix) whose upstream refreshes are limited per client
pub const RATE_LIMIT_PATTERNS: &[&str] = &[common::consts::PROXY_MARKETS_ROUTE];
