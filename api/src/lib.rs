// api 库入口，测试 crate 直接使用这里导出的模块

pub mod api_error;
pub mod api_types;
pub mod cache;
pub mod config;
pub mod consts;
pub mod eviction;
pub mod handlers;
pub mod init;
pub mod resolver;
pub mod server;
