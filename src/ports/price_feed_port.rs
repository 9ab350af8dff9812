//! Price feed port.

use chrono::{DateTime, Utc};

use crate::domain::error::LedgerError;
use crate::domain::symbols::FeedHandle;

/// Latest observation from a feed. `price` is scaled by `10^decimals`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceQuote {
    pub price: i128,
    pub decimals: u32,
    pub timestamp: DateTime<Utc>,
}

/// Read-only access to external price feeds. Implementations may call back
/// into the engine, so they are invoked without any engine lock held.
pub trait PriceFeedPort: Send + Sync {
    fn latest_price(&self, feed: &FeedHandle, symbol: &str) -> Result<PriceQuote, LedgerError>;
}
