//! Holding records and account identifiers.

use std::fmt;

use super::error::LedgerError;

/// Maximum length of an asset reference, in bytes.
pub const MAX_ASSET_REF_LEN: usize = 64;

/// Symbols are 1 to 4 characters long.
pub const MAX_SYMBOL_LEN: usize = 5;

/// Largest quantity a single holding may carry.
pub const MAX_QUANTITY: u128 = 1_000_000_000_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        AccountId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        AccountId::new(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoldingRecord {
    pub owner: AccountId,
    pub asset_ref: String,
    pub symbol: String,
    pub quantity: u128,
}

impl HoldingRecord {
    /// Build a record, rejecting out-of-range fields.
    pub fn new(
        owner: AccountId,
        asset_ref: &str,
        symbol: &str,
        quantity: u128,
    ) -> Result<Self, LedgerError> {
        if owner.is_empty() {
            return Err(LedgerError::invalid("owner", "owner must not be empty"));
        }
        validate_asset_ref(asset_ref)?;
        validate_symbol(symbol)?;
        if quantity == 0 || quantity > MAX_QUANTITY {
            return Err(LedgerError::invalid(
                "quantity",
                format!("quantity must be in (0, {}]", MAX_QUANTITY),
            ));
        }
        Ok(HoldingRecord {
            owner,
            asset_ref: asset_ref.to_string(),
            symbol: symbol.to_string(),
            quantity,
        })
    }

    pub fn matches(&self, owner: &AccountId, asset_ref: &str) -> bool {
        self.owner == *owner && self.asset_ref == asset_ref
    }

    pub fn matches_key(&self, owner: &AccountId, asset_ref: &str, symbol: &str) -> bool {
        self.matches(owner, asset_ref) && self.symbol == symbol
    }
}

pub fn validate_asset_ref(asset_ref: &str) -> Result<(), LedgerError> {
    if asset_ref.is_empty() || asset_ref.len() > MAX_ASSET_REF_LEN {
        return Err(LedgerError::invalid(
            "asset_ref",
            format!("length must be in (0, {}] bytes", MAX_ASSET_REF_LEN),
        ));
    }
    Ok(())
}

pub fn validate_symbol(symbol: &str) -> Result<(), LedgerError> {
    let len = symbol.chars().count();
    if len == 0 || len >= MAX_SYMBOL_LEN {
        return Err(LedgerError::invalid(
            "symbol",
            format!("length must be in [1, {})", MAX_SYMBOL_LEN),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> AccountId {
        AccountId::new("alice")
    }

    #[test]
    fn new_record_accepts_bounds() {
        let rec = HoldingRecord::new(alice(), &"x".repeat(64), "GOLD", MAX_QUANTITY).unwrap();
        assert_eq!(rec.quantity, MAX_QUANTITY);
        assert!(HoldingRecord::new(alice(), "a", "A", 1).is_ok());
    }

    #[test]
    fn rejects_empty_or_long_asset_ref() {
        assert!(matches!(
            HoldingRecord::new(alice(), "", "AU", 1),
            Err(LedgerError::InvalidInput { ref field, .. }) if field == "asset_ref"
        ));
        assert!(HoldingRecord::new(alice(), &"x".repeat(65), "AU", 1).is_err());
    }

    #[test]
    fn rejects_bad_symbol_length() {
        assert!(HoldingRecord::new(alice(), "Qm1", "", 1).is_err());
        assert!(HoldingRecord::new(alice(), "Qm1", "ABCDE", 1).is_err());
    }

    #[test]
    fn rejects_quantity_out_of_range() {
        assert!(HoldingRecord::new(alice(), "Qm1", "AU", 0).is_err());
        assert!(HoldingRecord::new(alice(), "Qm1", "AU", MAX_QUANTITY + 1).is_err());
    }

    #[test]
    fn rejects_empty_owner() {
        assert!(HoldingRecord::new(AccountId::new(" "), "Qm1", "AU", 1).is_err());
    }

    #[test]
    fn matches_ignores_symbol() {
        let rec = HoldingRecord::new(alice(), "Qm1", "AU", 5).unwrap();
        assert!(rec.matches(&alice(), "Qm1"));
        assert!(!rec.matches(&alice(), "Qm2"));
        assert!(rec.matches_key(&alice(), "Qm1", "AU"));
        assert!(!rec.matches_key(&alice(), "Qm1", "AG"));
    }
}
