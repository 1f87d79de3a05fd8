//! Integration Tests Crate
//!
//! Tests are organized by area:
//! - `test_utils`: mock upstream sources, fake http servers and config builders
//! - `ranking_tests`, `market_query_tests`: pure data helpers
//! - `resolver_tests`, `proxy_tests`, `upstream_client_tests`: caching proxy
//! - `poller_tests`, `sources_tests`, `watchlist_tests`, `prediction_tests`: dashboard consumers
