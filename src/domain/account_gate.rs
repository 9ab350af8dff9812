//! Per-account freeze and fee-exemption flags.

use std::collections::HashMap;

use super::error::LedgerError;
use super::holding::AccountId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccountFlags {
    pub frozen: bool,
    pub fee_exempt: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountGate {
    flags: HashMap<AccountId, AccountFlags>,
}

impl AccountGate {
    pub fn new() -> Self {
        AccountGate {
            flags: HashMap::new(),
        }
    }

    pub fn flags(&self, account: &AccountId) -> AccountFlags {
        self.flags.get(account).copied().unwrap_or_default()
    }

    pub fn set_frozen(&mut self, account: &AccountId, frozen: bool) {
        self.flags.entry(account.clone()).or_default().frozen = frozen;
    }

    pub fn is_frozen(&self, account: &AccountId) -> bool {
        self.flags(account).frozen
    }

    pub fn set_fee_exempt(&mut self, account: &AccountId, exempt: bool) {
        self.flags.entry(account.clone()).or_default().fee_exempt = exempt;
    }

    pub fn is_fee_exempt(&self, account: &AccountId) -> bool {
        self.flags(account).fee_exempt
    }

    /// Fail with `AccountFrozen` on the first frozen party.
    pub fn ensure_not_frozen(&self, parties: &[&AccountId]) -> Result<(), LedgerError> {
        match parties.iter().find(|a| self.is_frozen(a)) {
            Some(account) => Err(LedgerError::AccountFrozen {
                account: account.to_string(),
            }),
            None => Ok(()),
        }
    }
}
