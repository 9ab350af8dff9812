//! Mutable engine state, owned by one [`AssetLedger`](super::engine::AssetLedger).

use super::account_gate::AccountGate;
use super::ledger::HoldingsLedger;
use super::symbols::{FeedBindings, SymbolRegistry};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerState {
    pub ledger: HoldingsLedger,
    pub symbols: SymbolRegistry,
    pub feeds: FeedBindings,
    pub gate: AccountGate,
    pub fee_bps: u128,
    /// Last published aggregate value. Never used for pricing.
    pub total_asset_value: u128,
    /// Last published unit price.
    pub unit_price: u128,
    pub seeded: bool,
}

impl LedgerState {
    pub fn new(fee_bps: u128) -> Self {
        LedgerState {
            fee_bps,
            ..LedgerState::default()
        }
    }
}
