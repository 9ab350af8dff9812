//! Scripted replay of ledger operations against an engine.

use tracing::warn;

use super::engine::AssetLedger;
use super::error::LedgerError;
use super::fixed_point::format_scaled;
use super::holding::AccountId;
use super::symbols::FeedHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerOp {
    Seed {
        caller: AccountId,
    },
    BindFeed {
        caller: AccountId,
        symbol: String,
        handle: String,
    },
    AddHolding {
        caller: AccountId,
        owner: AccountId,
        asset_ref: String,
        symbol: String,
        quantity: u128,
    },
    BuyBack {
        caller: AccountId,
        owner: AccountId,
        asset_ref: String,
    },
    BuyBackSymbol {
        caller: AccountId,
        owner: AccountId,
        asset_ref: String,
        symbol: String,
    },
    Transfer {
        from: AccountId,
        to: AccountId,
        amount: u128,
    },
    SetFrozen {
        caller: AccountId,
        account: AccountId,
        frozen: bool,
    },
    SetFeeExempt {
        caller: AccountId,
        account: AccountId,
        exempt: bool,
    },
    SetFeeBps {
        caller: AccountId,
        fee_bps: u128,
    },
}

/// Outcome of one scripted operation.
#[derive(Debug)]
pub struct OpOutcome {
    pub line: usize,
    pub op: LedgerOp,
    pub result: Result<String, LedgerError>,
}

impl OpOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Apply one operation and describe what it did.
pub fn apply(ledger: &AssetLedger, op: &LedgerOp) -> Result<String, LedgerError> {
    match op {
        LedgerOp::Seed { caller } => {
            ledger.seed(caller)?;
            Ok("seeded".to_string())
        }
        LedgerOp::BindFeed {
            caller,
            symbol,
            handle,
        } => {
            ledger.bind_feed(caller, symbol, FeedHandle::new(handle.as_str()))?;
            Ok(format!("bound {} to {}", symbol, handle))
        }
        LedgerOp::AddHolding {
            caller,
            owner,
            asset_ref,
            symbol,
            quantity,
        } => {
            let r = ledger.add_holding(caller, owner, asset_ref, symbol, *quantity)?;
            Ok(format!(
                "added {} {} for {}: value {}, minted {} ({} owner, {} admin)",
                quantity,
                symbol,
                owner,
                format_scaled(r.value),
                format_scaled(r.tokens_minted),
                format_scaled(r.owner_amount),
                format_scaled(r.admin_fee)
            ))
        }
        LedgerOp::BuyBack {
            caller,
            owner,
            asset_ref,
        } => {
            let r = ledger.buy_back(caller, owner, asset_ref)?;
            Ok(format!(
                "bought back {} {} from {}: value {}, burned {}",
                r.removed.quantity,
                r.removed.symbol,
                owner,
                format_scaled(r.value),
                format_scaled(r.tokens_burned)
            ))
        }
        LedgerOp::BuyBackSymbol {
            caller,
            owner,
            asset_ref,
            symbol,
        } => {
            let r = ledger.buy_back_symbol(caller, owner, asset_ref, symbol)?;
            Ok(format!(
                "bought back {} {} from {}: value {}, burned {}",
                r.removed.quantity,
                r.removed.symbol,
                owner,
                format_scaled(r.value),
                format_scaled(r.tokens_burned)
            ))
        }
        LedgerOp::Transfer { from, to, amount } => {
            let r = ledger.transfer(from, to, *amount)?;
            Ok(format!(
                "transferred {} from {} to {} (fee {})",
                format_scaled(r.received),
                from,
                to,
                format_scaled(r.fee)
            ))
        }
        LedgerOp::SetFrozen {
            caller,
            account,
            frozen,
        } => {
            ledger.set_frozen(caller, account, *frozen)?;
            Ok(format!("{} frozen = {}", account, frozen))
        }
        LedgerOp::SetFeeExempt {
            caller,
            account,
            exempt,
        } => {
            ledger.set_fee_exempt(caller, account, *exempt)?;
            Ok(format!("{} fee exempt = {}", account, exempt))
        }
        LedgerOp::SetFeeBps { caller, fee_bps } => {
            ledger.set_fee_bps(caller, *fee_bps)?;
            Ok(format!("fee set to {} bps", fee_bps))
        }
    }
}

/// Apply every operation in order. Failures are recorded and the replay
/// continues with the next operation.
pub fn replay(ledger: &AssetLedger, ops: Vec<(usize, LedgerOp)>) -> Vec<OpOutcome> {
    ops.into_iter()
        .map(|(line, op)| {
            let result = apply(ledger, &op);
            if let Err(e) = &result {
                warn!(line, error = %e, "operation failed");
            }
            OpOutcome { line, op, result }
        })
        .collect()
}
