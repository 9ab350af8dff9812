//! In-memory unit-supply ledger.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::error::LedgerError;
use crate::domain::holding::AccountId;
use crate::ports::unit_supply_port::UnitSupplyPort;

#[derive(Debug, Default)]
struct Balances {
    accounts: HashMap<AccountId, u128>,
    total: u128,
}

#[derive(Debug, Default)]
pub struct InMemoryUnitSupply {
    inner: Mutex<Balances>,
}

impl InMemoryUnitSupply {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Balances> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Accounts with a non-zero balance, sorted by account.
    pub fn balances(&self) -> Vec<(AccountId, u128)> {
        let mut out: Vec<(AccountId, u128)> = self
            .lock()
            .accounts
            .iter()
            .filter(|(_, b)| **b > 0)
            .map(|(a, b)| (a.clone(), *b))
            .collect();
        out.sort();
        out
    }
}

fn insufficient(account: &AccountId, available: u128, needed: u128) -> LedgerError {
    LedgerError::InsufficientBalance {
        account: account.to_string(),
        available,
        needed,
    }
}

impl UnitSupplyPort for InMemoryUnitSupply {
    fn mint(&self, account: &AccountId, amount: u128) -> Result<(), LedgerError> {
        let mut b = self.lock();
        let total = b.total.checked_add(amount).ok_or(LedgerError::Overflow)?;
        let balance = b.accounts.get(account).copied().unwrap_or(0);
        let balance = balance.checked_add(amount).ok_or(LedgerError::Overflow)?;
        b.accounts.insert(account.clone(), balance);
        b.total = total;
        Ok(())
    }

    fn burn(&self, account: &AccountId, amount: u128) -> Result<(), LedgerError> {
        let mut b = self.lock();
        let balance = b.accounts.get(account).copied().unwrap_or(0);
        if balance < amount {
            return Err(insufficient(account, balance, amount));
        }
        b.accounts.insert(account.clone(), balance - amount);
        b.total -= amount;
        Ok(())
    }

    fn transfer(&self, from: &AccountId, to: &AccountId, amount: u128) -> Result<(), LedgerError> {
        let mut b = self.lock();
        let from_balance = b.accounts.get(from).copied().unwrap_or(0);
        if from_balance < amount {
            return Err(insufficient(from, from_balance, amount));
        }
        b.accounts.insert(from.clone(), from_balance - amount);
        let to_balance = b.accounts.get(to).copied().unwrap_or(0);
        b.accounts.insert(to.clone(), to_balance + amount);
        Ok(())
    }

    fn balance_of(&self, account: &AccountId) -> u128 {
        self.lock().accounts.get(account).copied().unwrap_or(0)
    }

    fn total_supply(&self) -> u128 {
        self.lock().total
    }
}
