pub mod common_env;
pub mod consts;
pub mod graceful;
pub mod logging;
pub mod market_types;
pub mod markets_client;
pub mod ranking;
pub mod rate_limit;
