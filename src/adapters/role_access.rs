//! Owner-plus-grants access control.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::holding::AccountId;
use crate::ports::access_port::{AccessControlPort, Operation};

/// The owner may call every gated operation; other accounts only the
/// operations they were granted.
#[derive(Debug)]
pub struct RoleAccessControl {
    owner: AccountId,
    grants: Mutex<HashSet<(AccountId, Operation)>>,
}

impl RoleAccessControl {
    pub fn new(owner: AccountId) -> Self {
        RoleAccessControl {
            owner,
            grants: Mutex::new(HashSet::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<(AccountId, Operation)>> {
        self.grants.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn grant(&self, account: &AccountId, operation: Operation) {
        self.lock().insert((account.clone(), operation));
    }

    pub fn revoke(&self, account: &AccountId, operation: Operation) {
        self.lock().remove(&(account.clone(), operation));
    }
}

impl AccessControlPort for RoleAccessControl {
    fn is_authorized(&self, caller: &AccountId, operation: Operation) -> bool {
        *caller == self.owner || self.lock().contains(&(caller.clone(), operation))
    }
}
