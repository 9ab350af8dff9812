//! Settable in-memory price feed, optionally loaded from CSV.
//!
//! CSV layout: `handle,price,decimals[,timestamp]` with a header row. The
//! timestamp is RFC 3339; quotes without one are stamped at load time.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use crate::domain::error::LedgerError;
use crate::domain::fixed_point::PRICE_DECIMALS;
use crate::domain::symbols::FeedHandle;
use crate::ports::price_feed_port::{PriceFeedPort, PriceQuote};

#[derive(Debug, Default)]
struct Quotes {
    latest: HashMap<String, PriceQuote>,
    failing: HashSet<String>,
}

#[derive(Debug, Default)]
pub struct StaticPriceFeed {
    inner: Mutex<Quotes>,
}

impl StaticPriceFeed {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Quotes> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publish an 8-decimal price stamped now.
    pub fn set_price(&self, handle: &str, price: i128) {
        self.set_quote(
            handle,
            PriceQuote {
                price,
                decimals: PRICE_DECIMALS,
                timestamp: Utc::now(),
            },
        );
    }

    pub fn set_quote(&self, handle: &str, quote: PriceQuote) {
        let mut q = self.lock();
        q.failing.remove(handle);
        q.latest.insert(handle.to_string(), quote);
    }

    /// Make every read of `handle` fail until a new quote is set.
    pub fn set_failing(&self, handle: &str) {
        self.lock().failing.insert(handle.to_string());
    }

    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self, LedgerError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| LedgerError::DataFile {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;
        let feed = StaticPriceFeed::new();
        for (handle, quote) in parse_quotes(&content)? {
            feed.set_quote(&handle, quote);
        }
        Ok(feed)
    }
}

fn column<'r>(record: &'r csv::StringRecord, idx: usize, name: &str) -> Result<&'r str, LedgerError> {
    record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| LedgerError::DataFile {
            reason: format!("missing {} column", name),
        })
}

pub fn parse_quotes(content: &str) -> Result<Vec<(String, PriceQuote)>, LedgerError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());
    let now = Utc::now();
    let mut quotes = Vec::new();

    for result in rdr.records() {
        let record = result.map_err(|e| LedgerError::DataFile {
            reason: format!("CSV parse error: {}", e),
        })?;

        let handle = column(&record, 0, "handle")?.to_string();
        let price: i128 = column(&record, 1, "price")?
            .parse()
            .map_err(|e| LedgerError::DataFile {
                reason: format!("invalid price for {}: {}", handle, e),
            })?;
        let decimals: u32 = column(&record, 2, "decimals")?
            .parse()
            .map_err(|e| LedgerError::DataFile {
                reason: format!("invalid decimals for {}: {}", handle, e),
            })?;
        let timestamp = match record.get(3).map(str::trim).filter(|s| !s.is_empty()) {
            Some(ts) => DateTime::parse_from_rfc3339(ts)
                .map_err(|e| LedgerError::DataFile {
                    reason: format!("invalid timestamp for {}: {}", handle, e),
                })?
                .with_timezone(&Utc),
            None => now,
        };

        quotes.push((
            handle,
            PriceQuote {
                price,
                decimals,
                timestamp,
            },
        ));
    }
    Ok(quotes)
}

impl PriceFeedPort for StaticPriceFeed {
    fn latest_price(&self, feed: &FeedHandle, symbol: &str) -> Result<PriceQuote, LedgerError> {
        let q = self.lock();
        if q.failing.contains(feed.as_str()) {
            return Err(LedgerError::FeedUnavailable {
                symbol: symbol.to_string(),
                reason: format!("feed {} is failing", feed.as_str()),
            });
        }
        q.latest
            .get(feed.as_str())
            .copied()
            .ok_or_else(|| LedgerError::FeedUnavailable {
                symbol: symbol.to_string(),
                reason: format!("feed {} has no data", feed.as_str()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn set_and_read_price() {
        let feed = StaticPriceFeed::new();
        feed.set_price("xau", 215_544_000_000);
        let quote = feed.latest_price(&FeedHandle::new("xau"), "AU").unwrap();
        assert_eq!(quote.price, 215_544_000_000);
        assert_eq!(quote.decimals, 8);
    }

    #[test]
    fn unknown_handle_is_unavailable() {
        let feed = StaticPriceFeed::new();
        assert!(matches!(
            feed.latest_price(&FeedHandle::new("nope"), "AU"),
            Err(LedgerError::FeedUnavailable { .. })
        ));
    }

    #[test]
    fn failing_until_next_quote() {
        let feed = StaticPriceFeed::new();
        feed.set_price("xau", 100);
        feed.set_failing("xau");
        assert!(feed.latest_price(&FeedHandle::new("xau"), "AU").is_err());
        feed.set_price("xau", 200);
        assert_eq!(
            feed.latest_price(&FeedHandle::new("xau"), "AU").unwrap().price,
            200
        );
    }

    #[test]
    fn parse_quotes_with_and_without_timestamp() {
        let content = "handle,price,decimals,timestamp\nxau,215544000000,8,2024-03-01T00:00:00Z\nxag,2400000000,8\n";
        let quotes = parse_quotes(content).unwrap();
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].0, "xau");
        assert_eq!(
            quotes[0].1.timestamp,
            DateTime::parse_from_rfc3339("2024-03-01T00:00:00Z").unwrap()
        );
        assert_eq!(quotes[1].1.price, 2_400_000_000);
    }

    #[test]
    fn parse_quotes_rejects_bad_price() {
        let content = "handle,price,decimals\nxau,abc,8\n";
        assert!(matches!(
            parse_quotes(content),
            Err(LedgerError::DataFile { .. })
        ));
    }

    #[test]
    fn parse_quotes_rejects_missing_decimals() {
        let content = "handle,price,decimals\nxau,100\n";
        assert!(parse_quotes(content).is_err());
    }

    #[test]
    fn from_csv_loads_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "handle,price,decimals\nxau,215544000000,8\n").unwrap();
        let feed = StaticPriceFeed::from_csv(file.path()).unwrap();
        assert!(feed.latest_price(&FeedHandle::new("xau"), "AU").is_ok());
    }

    #[test]
    fn from_csv_missing_file() {
        assert!(StaticPriceFeed::from_csv("/nonexistent/prices.csv").is_err());
    }
}
