pub mod config;
pub mod connection;
pub mod indicators;
pub mod market_data;
pub mod report;
pub mod signals;
pub mod stats;
pub mod timeframe_selector;
