//! Asset-backed unit ledger engine.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits for the
//! external collaborators in [`ports`], concrete implementations in
//! [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
