//! Unit transfers with a basis-point fee routed to the admin account.

use tracing::{debug, error};

use super::engine::AssetLedger;
use super::error::LedgerError;
use super::events::LedgerEvent;
use super::fixed_point::apply_bps;
use super::holding::AccountId;

/// Fee charged on `amount`. Exempt senders pay nothing. The fee must stay
/// strictly below the amount.
pub fn transfer_fee(amount: u128, fee_bps: u128, exempt: bool) -> Result<u128, LedgerError> {
    let fee = if exempt { 0 } else { apply_bps(amount, fee_bps)? };
    if fee >= amount {
        return Err(LedgerError::FeeExceedsAmount { fee, amount });
    }
    Ok(fee)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferReceipt {
    pub received: u128,
    pub fee: u128,
}

impl AssetLedger {
    /// Move `amount` units from `from` to `to`, deducting the transfer fee.
    pub fn transfer(
        &self,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<TransferReceipt, LedgerError> {
        if to.is_empty() {
            return Err(LedgerError::invalid("to", "recipient must not be empty"));
        }
        if amount == 0 {
            return Err(LedgerError::invalid("amount", "must be positive"));
        }

        let receipt = {
            let _tx = self.guard.enter()?;
            let state = self.snapshot();
            state.gate.ensure_not_frozen(&[from, to])?;

            let supply = &self.ports.supply;
            let balance = supply.balance_of(from);
            if balance < amount {
                return Err(LedgerError::InsufficientBalance {
                    account: from.to_string(),
                    available: balance,
                    needed: amount,
                });
            }

            let fee = transfer_fee(amount, state.fee_bps, state.gate.is_fee_exempt(from))?;
            if fee > 0 {
                state.gate.ensure_not_frozen(&[&self.config.admin_account])?;
            }
            let received = amount - fee;
            supply.transfer(from, to, received)?;
            if fee > 0 {
                if let Err(e) = supply.transfer(from, &self.config.admin_account, fee) {
                    if let Err(undo) = supply.transfer(to, from, received) {
                        error!(%from, %to, amount = received, error = %undo, "failed to reverse transfer");
                    }
                    return Err(e);
                }
            }
            TransferReceipt { received, fee }
        };

        debug!(%from, %to, amount, fee = receipt.fee, "units transferred");
        self.notify(&[LedgerEvent::UnitsTransferred {
            from: from.clone(),
            to: to.clone(),
            amount,
            fee: receipt.fee,
        }]);
        Ok(receipt)
    }
}
