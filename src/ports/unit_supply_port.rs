//! Unit-supply collaborator port.
//!
//! Balances and total supply of the derived unit live behind this port.
//! Implementations must apply each call atomically and make it visible to
//! the next call immediately.

use crate::domain::error::LedgerError;
use crate::domain::holding::AccountId;

pub trait UnitSupplyPort: Send + Sync {
    fn mint(&self, account: &AccountId, amount: u128) -> Result<(), LedgerError>;

    fn burn(&self, account: &AccountId, amount: u128) -> Result<(), LedgerError>;

    fn transfer(&self, from: &AccountId, to: &AccountId, amount: u128) -> Result<(), LedgerError>;

    fn balance_of(&self, account: &AccountId) -> u128;

    fn total_supply(&self) -> u128;
}
