//! Concrete adapter implementations for ports.

pub mod file_config_adapter;
pub mod memory_supply;
pub mod ops_csv_adapter;
pub mod role_access;
pub mod static_price_feed;
pub mod tracing_notifier;
