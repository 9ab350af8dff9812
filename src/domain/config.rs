//! Engine configuration.

use chrono::TimeDelta;

use super::fixed_point::SCALE;
use super::holding::AccountId;
use super::symbols::FeedHandle;

/// Transfer fee applied when none is configured, in basis points.
pub const DEFAULT_FEE_BPS: u128 = 10;

/// Bootstrap unit price used while no units are outstanding.
pub const DEFAULT_BASE_VALUE: u128 = SCALE;

#[derive(Debug, Clone, PartialEq)]
pub struct LedgerConfig {
    /// Account holding owner rights over the gated entry points.
    pub owner_account: AccountId,
    /// Receives the issuance admin fee and transfer fees.
    pub admin_account: AccountId,
    pub fee_bps: u128,
    pub base_value: u128,
    /// Quotes older than this are rejected. `None` disables the check.
    pub max_price_age: Option<TimeDelta>,
    /// Feed bindings applied when the engine is built.
    pub feeds: Vec<(String, FeedHandle)>,
}

impl LedgerConfig {
    pub fn new(owner_account: AccountId, admin_account: AccountId) -> Self {
        LedgerConfig {
            owner_account,
            admin_account,
            fee_bps: DEFAULT_FEE_BPS,
            base_value: DEFAULT_BASE_VALUE,
            max_price_age: None,
            feeds: Vec::new(),
        }
    }
}
