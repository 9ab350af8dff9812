//! Issuance: adding a holding and minting units against its value.

use tracing::{error, info};

use super::engine::AssetLedger;
use super::error::LedgerError;
use super::events::LedgerEvent;
use super::fixed_point::{apply_bps, BPS_DENOMINATOR};
use super::holding::AccountId;
use super::valuation;
use crate::ports::access_port::Operation;

/// Share of every issuance minted to the admin account, in basis points.
pub const ADMIN_FEE_BPS: u128 = 4_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSplit {
    pub owner_amount: u128,
    pub admin_fee: u128,
}

/// Split `tokens_to_mint` between owner and admin. The rounding remainder
/// stays with the owner, so the two parts always sum to the input.
pub fn split_issuance(tokens_to_mint: u128, admin_fee_bps: u128) -> Result<FeeSplit, LedgerError> {
    if admin_fee_bps > BPS_DENOMINATOR {
        return Err(LedgerError::invalid("admin_fee_bps", "must not exceed 10000"));
    }
    let admin_fee = apply_bps(tokens_to_mint, admin_fee_bps)?;
    if admin_fee > tokens_to_mint {
        return Err(LedgerError::FeeExceedsMint {
            fee: admin_fee,
            minted: tokens_to_mint,
        });
    }
    Ok(FeeSplit {
        owner_amount: tokens_to_mint - admin_fee,
        admin_fee,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuanceReceipt {
    pub value: u128,
    pub tokens_minted: u128,
    pub owner_amount: u128,
    pub admin_fee: u128,
    pub total_asset_value: u128,
    pub unit_price: u128,
}

impl AssetLedger {
    /// Record a new holding for `owner` and mint its value in units.
    ///
    /// Units are priced at the unit price of the ledger as it stood before
    /// this holding. On any failure no record is kept and nothing stays
    /// minted.
    pub fn add_holding(
        &self,
        caller: &AccountId,
        owner: &AccountId,
        asset_ref: &str,
        symbol: &str,
        quantity: u128,
    ) -> Result<IssuanceReceipt, LedgerError> {
        self.authorize(caller, Operation::AddHolding)?;
        let admin = &self.config.admin_account;

        let (receipt, events) = {
            let _tx = self.guard.enter()?;
            let mut working = self.snapshot();
            working.gate.ensure_not_frozen(&[owner, admin])?;
            working.ledger.insert(owner.clone(), asset_ref, symbol, quantity)?;

            let engine = self.valuation(&working.feeds);
            let value = engine.mineral_value(symbol, quantity)?;
            if value == 0 {
                return Err(LedgerError::ZeroValue);
            }

            let total_before = engine.total_value(
                working
                    .ledger
                    .iter()
                    .filter(|r| !r.matches_key(owner, asset_ref, symbol)),
            )?;
            let supply_before = self.ports.supply.total_supply();
            let price_before = valuation::unit_price(total_before, supply_before)?;
            let tokens_to_mint =
                valuation::tokens_from_value(value, price_before, self.config.base_value)?;
            if tokens_to_mint == 0 {
                return Err(LedgerError::ZeroTokens);
            }
            let split = split_issuance(tokens_to_mint, ADMIN_FEE_BPS)?;
            let total_after = engine.total_value(working.ledger.iter())?;
            let supply_after = supply_before
                .checked_add(tokens_to_mint)
                .ok_or(LedgerError::Overflow)?;
            let unit_price = valuation::unit_price(total_after, supply_after)?;

            let newly_registered = working.symbols.register(symbol);

            self.mint_split(owner, admin, split)?;

            working.total_asset_value = total_after;
            working.unit_price = unit_price;
            self.commit(working);

            let mut events = vec![LedgerEvent::HoldingAdded {
                owner: owner.clone(),
                asset_ref: asset_ref.to_string(),
                symbol: symbol.to_string(),
                quantity,
                value,
                owner_amount: split.owner_amount,
                admin_fee: split.admin_fee,
            }];
            if newly_registered {
                events.push(LedgerEvent::SymbolRegistered {
                    symbol: symbol.to_string(),
                });
            }
            events.push(LedgerEvent::UnitPriceUpdated {
                total_asset_value: total_after,
                unit_price,
            });

            let receipt = IssuanceReceipt {
                value,
                tokens_minted: tokens_to_mint,
                owner_amount: split.owner_amount,
                admin_fee: split.admin_fee,
                total_asset_value: total_after,
                unit_price,
            };
            (receipt, events)
        };

        info!(
            %owner,
            asset_ref,
            symbol,
            quantity,
            value = receipt.value,
            minted = receipt.tokens_minted,
            "holding added"
        );
        self.notify(&events);
        Ok(receipt)
    }

    /// Mint both legs of a split; if the admin leg fails, burn the owner leg
    /// back so nothing stays minted.
    fn mint_split(&self, owner: &AccountId, admin: &AccountId, split: FeeSplit) -> Result<(), LedgerError> {
        let supply = &self.ports.supply;
        if split.owner_amount > 0 {
            supply.mint(owner, split.owner_amount)?;
        }
        if split.admin_fee > 0 {
            if let Err(e) = supply.mint(admin, split.admin_fee) {
                if split.owner_amount > 0 {
                    if let Err(undo) = supply.burn(owner, split.owner_amount) {
                        error!(%owner, amount = split.owner_amount, error = %undo, "failed to reverse owner mint");
                    }
                }
                return Err(e);
            }
        }
        Ok(())
    }
}
