//! Valuation: pricing holdings through the bound feeds.
//!
//! Nothing here mutates state. Aggregates are recomputed from the records on
//! every call; there is no cached running total.

use chrono::{TimeDelta, Utc};

use super::error::LedgerError;
use super::fixed_point::{divide, mul_div, pow10, SCALE};
use super::holding::HoldingRecord;
use super::symbols::FeedBindings;
use crate::ports::price_feed_port::{PriceFeedPort, PriceQuote};

pub struct ValuationEngine<'a> {
    feeds: &'a dyn PriceFeedPort,
    bindings: &'a FeedBindings,
    max_price_age: Option<TimeDelta>,
}

impl<'a> ValuationEngine<'a> {
    pub fn new(
        feeds: &'a dyn PriceFeedPort,
        bindings: &'a FeedBindings,
        max_price_age: Option<TimeDelta>,
    ) -> Self {
        ValuationEngine {
            feeds,
            bindings,
            max_price_age,
        }
    }

    /// Latest usable quote for `symbol`.
    pub fn price_of(&self, symbol: &str) -> Result<PriceQuote, LedgerError> {
        let handle = self.bindings.resolve(symbol)?;
        let quote = self
            .feeds
            .latest_price(handle, symbol)
            .map_err(|e| match e {
                LedgerError::FeedUnavailable { .. } => e,
                other => LedgerError::FeedUnavailable {
                    symbol: symbol.to_string(),
                    reason: other.to_string(),
                },
            })?;
        if quote.price <= 0 {
            return Err(LedgerError::FeedUnavailable {
                symbol: symbol.to_string(),
                reason: format!("non-positive price {}", quote.price),
            });
        }
        if let Some(max_age) = self.max_price_age {
            let age = Utc::now() - quote.timestamp;
            if age > max_age {
                return Err(LedgerError::FeedUnavailable {
                    symbol: symbol.to_string(),
                    reason: format!("quote is {}s old", age.num_seconds()),
                });
            }
        }
        Ok(quote)
    }

    /// `price * quantity` normalised from the feed's precision to `SCALE`.
    pub fn mineral_value(&self, symbol: &str, quantity: u128) -> Result<u128, LedgerError> {
        let quote = self.price_of(symbol)?;
        let price = u128::try_from(quote.price).map_err(|_| LedgerError::Overflow)?;
        let raw = price.checked_mul(quantity).ok_or(LedgerError::Overflow)?;
        let unit = pow10(quote.decimals).map_err(|_| LedgerError::FeedUnavailable {
            symbol: symbol.to_string(),
            reason: format!("unsupported precision of {} decimals", quote.decimals),
        })?;
        mul_div(raw, SCALE, unit)
    }

    pub fn record_value(&self, record: &HoldingRecord) -> Result<u128, LedgerError> {
        self.mineral_value(&record.symbol, record.quantity)
    }

    /// Sum of `mineral_value` over `records`.
    pub fn total_value<'r, I>(&self, records: I) -> Result<u128, LedgerError>
    where
        I: IntoIterator<Item = &'r HoldingRecord>,
    {
        let mut total: u128 = 0;
        for record in records {
            total = total
                .checked_add(self.record_value(record)?)
                .ok_or(LedgerError::Overflow)?;
        }
        Ok(total)
    }
}

/// `total_value * SCALE / unit_supply`, or zero while nothing is outstanding.
pub fn unit_price(total_value: u128, unit_supply: u128) -> Result<u128, LedgerError> {
    if unit_supply == 0 {
        return Ok(0);
    }
    divide(total_value, unit_supply)
}

/// Units corresponding to `value` at `unit_price`, falling back to
/// `base_value` while the unit price is zero.
pub fn tokens_from_value(
    value: u128,
    unit_price: u128,
    base_value: u128,
) -> Result<u128, LedgerError> {
    let price = if unit_price == 0 { base_value } else { unit_price };
    divide(value, price)
}
