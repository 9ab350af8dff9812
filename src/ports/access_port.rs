//! Access-control port.

use std::fmt;

use crate::domain::holding::AccountId;

/// Owner-gated entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Seed,
    AddHolding,
    BuyBack,
    BindFeed,
    SetFrozen,
    SetFeeExempt,
    SetFeeBps,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Seed => "seed",
            Operation::AddHolding => "add_holding",
            Operation::BuyBack => "buy_back",
            Operation::BindFeed => "bind_feed",
            Operation::SetFrozen => "set_frozen",
            Operation::SetFeeExempt => "set_fee_exempt",
            Operation::SetFeeBps => "set_fee_bps",
        };
        f.write_str(name)
    }
}

pub trait AccessControlPort: Send + Sync {
    fn is_authorized(&self, caller: &AccountId, operation: Operation) -> bool;
}
