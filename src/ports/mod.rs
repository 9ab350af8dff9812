//! Port traits for the engine's external collaborators.

pub mod access_port;
pub mod config_port;
pub mod notification_port;
pub mod price_feed_port;
pub mod unit_supply_port;
