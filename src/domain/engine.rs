//! The ledger engine handle.
//!
//! [`AssetLedger`] owns the engine state and the collaborator ports. Every
//! mutating entry point runs as one transaction: it takes the re-entrancy
//! guard, works on a clone of the state and publishes the clone only when
//! every step has succeeded. Feed calls are made without the state lock held,
//! so read-only queries never block behind a transaction.
//!
//! Issuance, buyback and unit transfers live in their own modules as further
//! `impl AssetLedger` blocks.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use super::config::LedgerConfig;
use super::error::LedgerError;
use super::events::LedgerEvent;
use super::fixed_point::BPS_DENOMINATOR;
use super::guard::ReentrancyGuard;
use super::holding::{AccountId, HoldingRecord};
use super::state::LedgerState;
use super::symbols::{FeedHandle, FeedBindings, SEED_CATALOG};
use super::valuation::{self, ValuationEngine};
use crate::ports::access_port::{AccessControlPort, Operation};
use crate::ports::notification_port::NotificationPort;
use crate::ports::price_feed_port::PriceFeedPort;
use crate::ports::unit_supply_port::UnitSupplyPort;

/// External collaborators the engine is wired to.
#[derive(Clone)]
pub struct Collaborators {
    pub supply: Arc<dyn UnitSupplyPort>,
    pub feeds: Arc<dyn PriceFeedPort>,
    pub access: Arc<dyn AccessControlPort>,
    pub notifier: Arc<dyn NotificationPort>,
}

pub struct AssetLedger {
    pub(crate) config: LedgerConfig,
    pub(crate) ports: Collaborators,
    state: Mutex<LedgerState>,
    pub(crate) guard: ReentrancyGuard,
}

impl AssetLedger {
    pub fn new(config: LedgerConfig, ports: Collaborators) -> Result<Self, LedgerError> {
        if config.fee_bps >= BPS_DENOMINATOR {
            return Err(LedgerError::invalid("fee_bps", "must be below 10000"));
        }
        if config.base_value == 0 {
            return Err(LedgerError::invalid("base_value", "must be positive"));
        }
        let mut state = LedgerState::new(config.fee_bps);
        for (symbol, handle) in &config.feeds {
            state.feeds.bind(symbol, handle.clone())?;
        }
        Ok(AssetLedger {
            config,
            ports,
            state: Mutex::new(state),
            guard: ReentrancyGuard::new(),
        })
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Consistent copy of the current state.
    pub fn snapshot(&self) -> LedgerState {
        self.lock().clone()
    }

    pub(crate) fn commit(&self, state: LedgerState) {
        *self.lock() = state;
    }

    pub(crate) fn authorize(&self, caller: &AccountId, operation: Operation) -> Result<(), LedgerError> {
        if self.ports.access.is_authorized(caller, operation) {
            Ok(())
        } else {
            warn!(%caller, %operation, "unauthorized call rejected");
            Err(LedgerError::Unauthorized {
                caller: caller.to_string(),
                operation: operation.to_string(),
            })
        }
    }

    pub(crate) fn valuation<'a>(&'a self, bindings: &'a FeedBindings) -> ValuationEngine<'a> {
        ValuationEngine::new(self.ports.feeds.as_ref(), bindings, self.config.max_price_age)
    }

    /// Deliver events. Failures are logged and dropped.
    pub(crate) fn notify(&self, events: &[LedgerEvent]) {
        for event in events {
            if let Err(e) = self.ports.notifier.emit(event) {
                warn!(event = event.name(), error = %e, "notification failed");
            }
        }
    }

    // ----- owner-gated configuration -------------------------------------

    /// Register the fixed symbol catalog and bind empty feeds for it.
    /// Succeeds once.
    pub fn seed(&self, caller: &AccountId) -> Result<(), LedgerError> {
        self.authorize(caller, Operation::Seed)?;
        let events = {
            let _tx = self.guard.enter()?;
            let mut working = self.snapshot();
            if working.seeded {
                return Err(LedgerError::AlreadySeeded);
            }
            let mut events = Vec::new();
            for symbol in SEED_CATALOG {
                if working.symbols.register(symbol) {
                    events.push(LedgerEvent::SymbolRegistered {
                        symbol: symbol.to_string(),
                    });
                }
                working.feeds.bind_default(symbol);
            }
            working.seeded = true;
            self.commit(working);
            events
        };
        info!(symbols = SEED_CATALOG.len(), "ledger seeded");
        self.notify(&events);
        Ok(())
    }

    pub fn bind_feed(&self, caller: &AccountId, symbol: &str, handle: FeedHandle) -> Result<(), LedgerError> {
        self.authorize(caller, Operation::BindFeed)?;
        {
            let _tx = self.guard.enter()?;
            let mut working = self.snapshot();
            working.feeds.bind(symbol, handle.clone())?;
            self.commit(working);
        }
        debug!(symbol, handle = handle.as_str(), "feed bound");
        self.notify(&[LedgerEvent::FeedBound {
            symbol: symbol.to_string(),
            handle: handle.as_str().to_string(),
        }]);
        Ok(())
    }

    pub fn set_frozen(&self, caller: &AccountId, account: &AccountId, frozen: bool) -> Result<(), LedgerError> {
        self.authorize(caller, Operation::SetFrozen)?;
        {
            let _tx = self.guard.enter()?;
            let mut working = self.snapshot();
            working.gate.set_frozen(account, frozen);
            self.commit(working);
        }
        info!(%account, frozen, "account freeze updated");
        self.notify(&[LedgerEvent::AccountFrozen {
            account: account.clone(),
            frozen,
        }]);
        Ok(())
    }

    pub fn set_fee_exempt(&self, caller: &AccountId, account: &AccountId, exempt: bool) -> Result<(), LedgerError> {
        self.authorize(caller, Operation::SetFeeExempt)?;
        {
            let _tx = self.guard.enter()?;
            let mut working = self.snapshot();
            working.gate.set_fee_exempt(account, exempt);
            self.commit(working);
        }
        self.notify(&[LedgerEvent::FeeExemptionUpdated {
            account: account.clone(),
            exempt,
        }]);
        Ok(())
    }

    pub fn set_fee_bps(&self, caller: &AccountId, fee_bps: u128) -> Result<(), LedgerError> {
        self.authorize(caller, Operation::SetFeeBps)?;
        if fee_bps >= BPS_DENOMINATOR {
            return Err(LedgerError::invalid("fee_bps", "must be below 10000"));
        }
        {
            let _tx = self.guard.enter()?;
            let mut working = self.snapshot();
            working.fee_bps = fee_bps;
            self.commit(working);
        }
        info!(fee_bps, "transfer fee updated");
        self.notify(&[LedgerEvent::FeeUpdated { fee_bps }]);
        Ok(())
    }

    // ----- read-only queries ----------------------------------------------

    /// Recompute the value of every live holding.
    pub fn total_asset_value(&self) -> Result<u128, LedgerError> {
        let state = self.snapshot();
        self.valuation(&state.feeds).total_value(state.ledger.iter())
    }

    /// `total_asset_value * SCALE / total_supply`, zero with no units out.
    pub fn unit_price(&self) -> Result<u128, LedgerError> {
        let total = self.total_asset_value()?;
        valuation::unit_price(total, self.ports.supply.total_supply())
    }

    /// Priced value of all holdings under `(owner, asset_ref)`.
    pub fn value_of(&self, owner: &AccountId, asset_ref: &str) -> Result<u128, LedgerError> {
        let state = self.snapshot();
        let engine = self.valuation(&state.feeds);
        state
            .ledger
            .value_of(owner, asset_ref, |r| engine.record_value(r))
    }

    pub fn mineral_value(&self, symbol: &str, quantity: u128) -> Result<u128, LedgerError> {
        let state = self.snapshot();
        self.valuation(&state.feeds).mineral_value(symbol, quantity)
    }

    /// Units `value` converts to at the current unit price.
    pub fn tokens_from_value(&self, value: u128) -> Result<u128, LedgerError> {
        valuation::tokens_from_value(value, self.unit_price()?, self.config.base_value)
    }

    pub fn holdings(&self) -> Vec<HoldingRecord> {
        self.lock().ledger.iter().cloned().collect()
    }

    pub fn holdings_by_symbol(&self, symbol: &str) -> Vec<HoldingRecord> {
        self.lock().ledger.list_by_symbol(symbol).cloned().collect()
    }

    pub fn holding_count(&self) -> usize {
        self.lock().ledger.count()
    }

    pub fn is_symbol_valid(&self, symbol: &str) -> bool {
        self.lock().symbols.is_valid(symbol)
    }

    /// Registered symbols in sorted order.
    pub fn registered_symbols(&self) -> Vec<String> {
        self.lock().symbols.symbols().map(str::to_string).collect()
    }

    pub fn is_frozen(&self, account: &AccountId) -> bool {
        self.lock().gate.is_frozen(account)
    }

    pub fn is_fee_exempt(&self, account: &AccountId) -> bool {
        self.lock().gate.is_fee_exempt(account)
    }

    pub fn fee_bps(&self) -> u128 {
        self.lock().fee_bps
    }

    pub fn is_seeded(&self) -> bool {
        self.lock().seeded
    }

    /// `(total_asset_value, unit_price)` as last published by a transaction.
    pub fn last_published(&self) -> (u128, u128) {
        let state = self.lock();
        (state.total_asset_value, state.unit_price)
    }

    pub fn balance_of(&self, account: &AccountId) -> u128 {
        self.ports.supply.balance_of(account)
    }

    pub fn total_supply(&self) -> u128 {
        self.ports.supply.total_supply()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory_supply::InMemoryUnitSupply;
    use crate::adapters::role_access::RoleAccessControl;
    use crate::adapters::static_price_feed::StaticPriceFeed;
    use crate::adapters::tracing_notifier::TracingNotifier;

    fn owner() -> AccountId {
        AccountId::new("owner")
    }

    fn ledger() -> AssetLedger {
        let config = LedgerConfig::new(owner(), AccountId::new("admin"));
        let ports = Collaborators {
            supply: Arc::new(InMemoryUnitSupply::new()),
            feeds: Arc::new(StaticPriceFeed::new()),
            access: Arc::new(RoleAccessControl::new(owner())),
            notifier: Arc::new(TracingNotifier),
        };
        AssetLedger::new(config, ports).unwrap()
    }

    #[test]
    fn new_rejects_fee_at_denominator() {
        let mut config = LedgerConfig::new(owner(), AccountId::new("admin"));
        config.fee_bps = 10_000;
        let ports = Collaborators {
            supply: Arc::new(InMemoryUnitSupply::new()),
            feeds: Arc::new(StaticPriceFeed::new()),
            access: Arc::new(RoleAccessControl::new(owner())),
            notifier: Arc::new(TracingNotifier),
        };
        assert!(AssetLedger::new(config, ports).is_err());
    }

    #[test]
    fn seed_twice_fails_and_keeps_state() {
        let l = ledger();
        l.seed(&owner()).unwrap();
        let before = l.snapshot();
        assert!(matches!(l.seed(&owner()), Err(LedgerError::AlreadySeeded)));
        assert_eq!(l.snapshot(), before);
        assert!(l.is_symbol_valid("AU"));
    }

    #[test]
    fn seed_requires_owner() {
        let l = ledger();
        assert!(matches!(
            l.seed(&AccountId::new("mallory")),
            Err(LedgerError::Unauthorized { .. })
        ));
        assert!(!l.is_seeded());
    }

    #[test]
    fn empty_ledger_reads_zero() {
        let l = ledger();
        assert_eq!(l.total_asset_value().unwrap(), 0);
        assert_eq!(l.unit_price().unwrap(), 0);
        assert_eq!(l.last_published(), (0, 0));
    }

    #[test]
    fn set_fee_bps_validates_range() {
        let l = ledger();
        l.set_fee_bps(&owner(), 25).unwrap();
        assert_eq!(l.fee_bps(), 25);
        assert!(l.set_fee_bps(&owner(), 10_000).is_err());
        assert_eq!(l.fee_bps(), 25);
    }

    #[test]
    fn admin_setter_fails_while_transaction_held() {
        let l = ledger();
        let _tx = l.guard.enter().unwrap();
        assert!(matches!(
            l.set_frozen(&owner(), &AccountId::new("bob"), true),
            Err(LedgerError::ReentrantCall)
        ));
        assert!(!l.is_frozen(&AccountId::new("bob")));
    }
}
