//! Buyback: unwinding holdings and burning the units they back.

use tracing::info;

use super::engine::AssetLedger;
use super::error::LedgerError;
use super::events::LedgerEvent;
use super::holding::{AccountId, HoldingRecord};
use super::valuation;
use crate::ports::access_port::Operation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuybackReceipt {
    pub removed: HoldingRecord,
    pub value: u128,
    pub tokens_burned: u128,
    pub total_asset_value: u128,
    pub unit_price: u128,
}

#[derive(Debug, Clone, Copy)]
enum Scope<'a> {
    /// Quote every symbol under the asset reference, remove the first match.
    AssetRef,
    /// Quote and remove exactly one symbol.
    Symbol(&'a str),
}

impl AssetLedger {
    /// Burn `owner`'s units for the value of every holding under
    /// `asset_ref` and remove the first matching record.
    ///
    /// The quote covers all symbols under the asset reference while only one
    /// record is removed per call; see [`AssetLedger::buy_back_symbol`] for a
    /// call whose quote and removal agree.
    pub fn buy_back(
        &self,
        caller: &AccountId,
        owner: &AccountId,
        asset_ref: &str,
    ) -> Result<BuybackReceipt, LedgerError> {
        self.unwind(caller, owner, asset_ref, Scope::AssetRef)
    }

    /// Burn `owner`'s units for the value of the single holding
    /// `(owner, asset_ref, symbol)` and remove it.
    pub fn buy_back_symbol(
        &self,
        caller: &AccountId,
        owner: &AccountId,
        asset_ref: &str,
        symbol: &str,
    ) -> Result<BuybackReceipt, LedgerError> {
        self.unwind(caller, owner, asset_ref, Scope::Symbol(symbol))
    }

    fn unwind(
        &self,
        caller: &AccountId,
        owner: &AccountId,
        asset_ref: &str,
        scope: Scope<'_>,
    ) -> Result<BuybackReceipt, LedgerError> {
        self.authorize(caller, Operation::BuyBack)?;

        let (receipt, events) = {
            let _tx = self.guard.enter()?;
            let mut working = self.snapshot();
            working.gate.ensure_not_frozen(&[owner])?;

            let engine = self.valuation(&working.feeds);
            let value = match scope {
                Scope::AssetRef => working
                    .ledger
                    .value_of(owner, asset_ref, |r| engine.record_value(r))?,
                Scope::Symbol(symbol) => match working.ledger.get(owner, asset_ref, symbol) {
                    Some(record) => engine.record_value(record)?,
                    None => 0,
                },
            };
            if value == 0 {
                return Err(LedgerError::ZeroValue);
            }

            let total_before = engine.total_value(working.ledger.iter())?;
            let supply_before = self.ports.supply.total_supply();
            let price_before = valuation::unit_price(total_before, supply_before)?;
            let tokens_to_burn =
                valuation::tokens_from_value(value, price_before, self.config.base_value)?;
            if tokens_to_burn == 0 {
                return Err(LedgerError::ZeroTokens);
            }

            let balance = self.ports.supply.balance_of(owner);
            if balance < tokens_to_burn {
                return Err(LedgerError::InsufficientBalance {
                    account: owner.to_string(),
                    available: balance,
                    needed: tokens_to_burn,
                });
            }

            let removed = match scope {
                Scope::AssetRef => working.ledger.remove_first_match(owner, asset_ref)?,
                Scope::Symbol(symbol) => working.ledger.remove_exact(owner, asset_ref, symbol)?,
            };
            let total_after = engine.total_value(working.ledger.iter())?;
            let unit_price =
                valuation::unit_price(total_after, supply_before.saturating_sub(tokens_to_burn))?;

            self.ports.supply.burn(owner, tokens_to_burn)?;

            working.total_asset_value = total_after;
            working.unit_price = unit_price;
            self.commit(working);

            let events = vec![
                LedgerEvent::HoldingBoughtBack {
                    owner: owner.clone(),
                    asset_ref: asset_ref.to_string(),
                    tokens_burned: tokens_to_burn,
                    value,
                },
                LedgerEvent::UnitPriceUpdated {
                    total_asset_value: total_after,
                    unit_price,
                },
            ];
            let receipt = BuybackReceipt {
                removed,
                value,
                tokens_burned: tokens_to_burn,
                total_asset_value: total_after,
                unit_price,
            };
            (receipt, events)
        };

        info!(
            %owner,
            asset_ref,
            symbol = receipt.removed.symbol.as_str(),
            value = receipt.value,
            burned = receipt.tokens_burned,
            "holding bought back"
        );
        self.notify(&events);
        Ok(receipt)
    }
}
