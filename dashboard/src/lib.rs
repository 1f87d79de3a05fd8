// dashboard 库入口，测试 crate 直接使用这里导出的模块

pub mod config;
pub mod consts;
pub mod init;
pub mod poller;
pub mod prediction;
pub mod reporter;
pub mod sources;
pub mod view_sort;
pub mod watchlist;
