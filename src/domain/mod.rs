//! Core domain types and logic.

pub mod account_gate;
pub mod buyback;
pub mod config;
pub mod config_validation;
pub mod engine;
pub mod error;
pub mod events;
pub mod fixed_point;
pub mod guard;
pub mod holding;
pub mod issuance;
pub mod ledger;
pub mod replay;
pub mod state;
pub mod symbols;
pub mod transfer_fee;
pub mod valuation;
