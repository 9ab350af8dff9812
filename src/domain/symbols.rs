//! Symbol registry and price-feed bindings.
//!
//! Both are monotone: symbols are never de-registered and bindings are only
//! ever overwritten, never dropped.

use std::collections::{BTreeMap, BTreeSet};

use super::error::LedgerError;
use super::holding::validate_symbol;

/// Asset classes registered by the bulk seed.
pub const SEED_CATALOG: &[&str] = &[
    "AU", "AG", "PT", "PD", "RH", "CU", "NI", "ZN", "AL", "PB", "SN", "CO", "LI", "FE", "U",
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolRegistry {
    seen: BTreeSet<String>,
}

impl SymbolRegistry {
    pub fn new() -> Self {
        SymbolRegistry {
            seen: BTreeSet::new(),
        }
    }

    /// Mark `symbol` valid. Returns `true` the first time it is seen.
    pub fn register(&mut self, symbol: &str) -> bool {
        self.seen.insert(symbol.to_string())
    }

    pub fn is_valid(&self, symbol: &str) -> bool {
        self.seen.contains(symbol)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.seen.iter().map(String::as_str)
    }
}

/// Opaque identifier of an external price feed. Empty means unbound.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeedHandle(String);

impl FeedHandle {
    pub fn new(handle: impl Into<String>) -> Self {
        FeedHandle(handle.into())
    }

    pub fn unbound() -> Self {
        FeedHandle(String::new())
    }

    pub fn is_bound(&self) -> bool {
        !self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedBindings {
    bindings: BTreeMap<String, FeedHandle>,
}

impl FeedBindings {
    pub fn new() -> Self {
        FeedBindings {
            bindings: BTreeMap::new(),
        }
    }

    /// Bind (or rebind) `symbol` to `handle`.
    pub fn bind(&mut self, symbol: &str, handle: FeedHandle) -> Result<(), LedgerError> {
        validate_symbol(symbol)?;
        self.bindings.insert(symbol.to_string(), handle);
        Ok(())
    }

    /// Insert an unbound placeholder unless a binding already exists.
    pub fn bind_default(&mut self, symbol: &str) {
        self.bindings.entry(symbol.to_string()).or_default();
    }

    /// The bound handle for `symbol`, if any.
    pub fn resolve(&self, symbol: &str) -> Result<&FeedHandle, LedgerError> {
        self.bindings
            .get(symbol)
            .filter(|h| h.is_bound())
            .ok_or_else(|| LedgerError::NoFeedBound {
                symbol: symbol.to_string(),
            })
    }
}
