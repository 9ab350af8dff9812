//! Notifications emitted after committed ledger changes.

use super::holding::AccountId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    HoldingAdded {
        owner: AccountId,
        asset_ref: String,
        symbol: String,
        quantity: u128,
        value: u128,
        owner_amount: u128,
        admin_fee: u128,
    },
    HoldingBoughtBack {
        owner: AccountId,
        asset_ref: String,
        tokens_burned: u128,
        value: u128,
    },
    UnitPriceUpdated {
        total_asset_value: u128,
        unit_price: u128,
    },
    FeeUpdated {
        fee_bps: u128,
    },
    AccountFrozen {
        account: AccountId,
        frozen: bool,
    },
    FeeExemptionUpdated {
        account: AccountId,
        exempt: bool,
    },
    SymbolRegistered {
        symbol: String,
    },
    FeedBound {
        symbol: String,
        handle: String,
    },
    UnitsTransferred {
        from: AccountId,
        to: AccountId,
        amount: u128,
        fee: u128,
    },
}

impl LedgerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            LedgerEvent::HoldingAdded { .. } => "HoldingAdded",
            LedgerEvent::HoldingBoughtBack { .. } => "HoldingBoughtBack",
            LedgerEvent::UnitPriceUpdated { .. } => "UnitPriceUpdated",
            LedgerEvent::FeeUpdated { .. } => "FeeUpdated",
            LedgerEvent::AccountFrozen { .. } => "AccountFrozen",
            LedgerEvent::FeeExemptionUpdated { .. } => "FeeExemptionUpdated",
            LedgerEvent::SymbolRegistered { .. } => "SymbolRegistered",
            LedgerEvent::FeedBound { .. } => "FeedBound",
            LedgerEvent::UnitsTransferred { .. } => "UnitsTransferred",
        }
    }
}
