//! Holdings ledger: the ordered sequence of live holding records.

use super::error::LedgerError;
use super::holding::{AccountId, HoldingRecord};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoldingsLedger {
    records: Vec<HoldingRecord>,
}

impl HoldingsLedger {
    pub fn new() -> Self {
        HoldingsLedger {
            records: Vec::new(),
        }
    }

    /// Append a new holding. At most one live record may exist per
    /// `(owner, asset_ref, symbol)`.
    pub fn insert(
        &mut self,
        owner: AccountId,
        asset_ref: &str,
        symbol: &str,
        quantity: u128,
    ) -> Result<&HoldingRecord, LedgerError> {
        let record = HoldingRecord::new(owner, asset_ref, symbol, quantity)?;
        if self.contains(&record.owner, asset_ref, symbol) {
            return Err(LedgerError::DuplicateKey {
                owner: record.owner.to_string(),
                asset_ref: asset_ref.to_string(),
                symbol: symbol.to_string(),
            });
        }
        self.records.push(record);
        Ok(&self.records[self.records.len() - 1])
    }

    /// Remove the first record matching `(owner, asset_ref)`, whatever its
    /// symbol. Other records under the same asset reference stay. Removal
    /// swaps the last record into the freed slot.
    pub fn remove_first_match(
        &mut self,
        owner: &AccountId,
        asset_ref: &str,
    ) -> Result<HoldingRecord, LedgerError> {
        let idx = self
            .records
            .iter()
            .position(|r| r.matches(owner, asset_ref))
            .ok_or_else(|| LedgerError::NotFound {
                owner: owner.to_string(),
                asset_ref: asset_ref.to_string(),
            })?;
        Ok(self.records.swap_remove(idx))
    }

    /// Remove the record with exactly this key.
    pub fn remove_exact(
        &mut self,
        owner: &AccountId,
        asset_ref: &str,
        symbol: &str,
    ) -> Result<HoldingRecord, LedgerError> {
        let idx = self
            .records
            .iter()
            .position(|r| r.matches_key(owner, asset_ref, symbol))
            .ok_or_else(|| LedgerError::NotFound {
                owner: owner.to_string(),
                asset_ref: asset_ref.to_string(),
            })?;
        Ok(self.records.swap_remove(idx))
    }

    /// Sum the priced value of every record under `(owner, asset_ref)`,
    /// across all symbols.
    pub fn value_of<F>(
        &self,
        owner: &AccountId,
        asset_ref: &str,
        mut price: F,
    ) -> Result<u128, LedgerError>
    where
        F: FnMut(&HoldingRecord) -> Result<u128, LedgerError>,
    {
        let mut total: u128 = 0;
        for record in self.records.iter().filter(|r| r.matches(owner, asset_ref)) {
            total = total
                .checked_add(price(record)?)
                .ok_or(LedgerError::Overflow)?;
        }
        Ok(total)
    }

    pub fn contains(&self, owner: &AccountId, asset_ref: &str, symbol: &str) -> bool {
        self.records
            .iter()
            .any(|r| r.matches_key(owner, asset_ref, symbol))
    }

    pub fn get(&self, owner: &AccountId, asset_ref: &str, symbol: &str) -> Option<&HoldingRecord> {
        self.records
            .iter()
            .find(|r| r.matches_key(owner, asset_ref, symbol))
    }

    pub fn list_by_symbol<'a>(&'a self, symbol: &'a str) -> impl Iterator<Item = &'a HoldingRecord> {
        self.records.iter().filter(move |r| r.symbol == symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HoldingRecord> {
        self.records.iter()
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> AccountId {
        AccountId::new("alice")
    }

    fn bob() -> AccountId {
        AccountId::new("bob")
    }

    #[test]
    fn new_ledger_is_empty() {
        let ledger = HoldingsLedger::new();
        assert_eq!(ledger.count(), 0);
        assert!(ledger.is_empty());
    }

    #[test]
    fn insert_and_get() {
        let mut ledger = HoldingsLedger::new();
        let rec = ledger.insert(alice(), "Qm1", "AU", 10).unwrap();
        assert_eq!(rec.quantity, 10);

        assert!(ledger.contains(&alice(), "Qm1", "AU"));
        assert_eq!(ledger.get(&alice(), "Qm1", "AU").unwrap().quantity, 10);
        assert_eq!(ledger.count(), 1);
    }

    #[test]
    fn insert_duplicate_key_fails() {
        let mut ledger = HoldingsLedger::new();
        ledger.insert(alice(), "Qm1", "AU", 10).unwrap();

        let err = ledger.insert(alice(), "Qm1", "AU", 3).unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateKey { .. }));
        assert_eq!(ledger.count(), 1);
        assert_eq!(ledger.get(&alice(), "Qm1", "AU").unwrap().quantity, 10);
    }

    #[test]
    fn same_asset_ref_different_symbol_or_owner_is_allowed() {
        let mut ledger = HoldingsLedger::new();
        ledger.insert(alice(), "Qm1", "AU", 10).unwrap();
        ledger.insert(alice(), "Qm1", "AG", 20).unwrap();
        ledger.insert(bob(), "Qm1", "AU", 30).unwrap();
        assert_eq!(ledger.count(), 3);
    }

    #[test]
    fn insert_invalid_input_leaves_ledger_untouched() {
        let mut ledger = HoldingsLedger::new();
        assert!(ledger.insert(alice(), "", "AU", 10).is_err());
        assert!(ledger.insert(alice(), "Qm1", "AU", 0).is_err());
        assert!(ledger.is_empty());
    }

    #[test]
    fn remove_first_match_removes_one_record_only() {
        let mut ledger = HoldingsLedger::new();
        ledger.insert(alice(), "Qm1", "AU", 10).unwrap();
        ledger.insert(alice(), "Qm1", "AG", 20).unwrap();

        let removed = ledger.remove_first_match(&alice(), "Qm1").unwrap();
        assert_eq!(removed.symbol, "AU");
        assert_eq!(ledger.count(), 1);
        assert!(ledger.contains(&alice(), "Qm1", "AG"));
    }

    #[test]
    fn remove_first_match_swaps_last_into_place() {
        let mut ledger = HoldingsLedger::new();
        ledger.insert(alice(), "Qm1", "AU", 1).unwrap();
        ledger.insert(bob(), "Qm2", "AU", 2).unwrap();
        ledger.insert(bob(), "Qm3", "AU", 3).unwrap();

        ledger.remove_first_match(&alice(), "Qm1").unwrap();
        let order: Vec<&str> = ledger.iter().map(|r| r.asset_ref.as_str()).collect();
        assert_eq!(order, vec!["Qm3", "Qm2"]);
    }

    #[test]
    fn remove_nonexistent_is_not_found() {
        let mut ledger = HoldingsLedger::new();
        ledger.insert(alice(), "Qm1", "AU", 1).unwrap();
        assert!(matches!(
            ledger.remove_first_match(&bob(), "Qm1"),
            Err(LedgerError::NotFound { .. })
        ));
        assert!(matches!(
            ledger.remove_exact(&alice(), "Qm1", "AG"),
            Err(LedgerError::NotFound { .. })
        ));
        assert_eq!(ledger.count(), 1);
    }

    #[test]
    fn remove_exact_targets_symbol() {
        let mut ledger = HoldingsLedger::new();
        ledger.insert(alice(), "Qm1", "AU", 10).unwrap();
        ledger.insert(alice(), "Qm1", "AG", 20).unwrap();

        let removed = ledger.remove_exact(&alice(), "Qm1", "AG").unwrap();
        assert_eq!(removed.quantity, 20);
        assert!(ledger.contains(&alice(), "Qm1", "AU"));
    }

    #[test]
    fn value_of_sums_all_symbols_for_asset_ref() {
        let mut ledger = HoldingsLedger::new();
        ledger.insert(alice(), "Qm1", "AU", 10).unwrap();
        ledger.insert(alice(), "Qm1", "AG", 20).unwrap();
        ledger.insert(bob(), "Qm1", "AU", 1000).unwrap();

        let value = ledger
            .value_of(&alice(), "Qm1", |r| Ok(r.quantity * 2))
            .unwrap();
        assert_eq!(value, 60);
    }

    #[test]
    fn value_of_propagates_pricing_errors() {
        let mut ledger = HoldingsLedger::new();
        ledger.insert(alice(), "Qm1", "AU", 10).unwrap();
        let result = ledger.value_of(&alice(), "Qm1", |r| {
            Err(LedgerError::NoFeedBound {
                symbol: r.symbol.clone(),
            })
        });
        assert!(matches!(result, Err(LedgerError::NoFeedBound { .. })));
    }

    #[test]
    fn value_of_no_match_is_zero() {
        let ledger = HoldingsLedger::new();
        assert_eq!(ledger.value_of(&alice(), "Qm1", |_| Ok(1)).unwrap(), 0);
    }

    #[test]
    fn list_by_symbol_filters() {
        let mut ledger = HoldingsLedger::new();
        ledger.insert(alice(), "Qm1", "AU", 10).unwrap();
        ledger.insert(alice(), "Qm2", "AG", 20).unwrap();
        ledger.insert(bob(), "Qm3", "AU", 30).unwrap();

        let gold: Vec<u128> = ledger.list_by_symbol("AU").map(|r| r.quantity).collect();
        assert_eq!(gold, vec![10, 30]);
    }
}
