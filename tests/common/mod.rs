#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use assetledger::adapters::memory_supply::InMemoryUnitSupply;
use assetledger::adapters::role_access::RoleAccessControl;
use assetledger::adapters::static_price_feed::StaticPriceFeed;
use assetledger::domain::config::LedgerConfig;
use assetledger::domain::engine::{AssetLedger, Collaborators};
use assetledger::domain::error::LedgerError;
use assetledger::domain::events::LedgerEvent;
use assetledger::domain::fixed_point::{divide, SCALE};
use assetledger::domain::holding::AccountId;
use assetledger::domain::state::LedgerState;
use assetledger::domain::symbols::FeedHandle;
use assetledger::ports::notification_port::NotificationPort;
use assetledger::ports::price_feed_port::PriceFeedPort;
use assetledger::ports::unit_supply_port::UnitSupplyPort;

/// XAU/USD 2155.44 at 8 decimals.
pub const GOLD_PRICE: i128 = 215_544_000_000;
/// XAG/USD 24.00 at 8 decimals.
pub const SILVER_PRICE: i128 = 2_400_000_000;

/// Value of 10 units of gold at `GOLD_PRICE`: 21554.4 scaled.
pub const GOLD_10_VALUE: u128 = 21_554_400 * SCALE / 1000;
/// Value of 10 units of silver at `SILVER_PRICE`: 240 scaled.
pub const SILVER_10_VALUE: u128 = 240 * SCALE;

pub fn acct(name: &str) -> AccountId {
    AccountId::new(name)
}

pub fn owner() -> AccountId {
    acct("owner")
}

pub fn admin() -> AccountId {
    acct("admin")
}

pub fn alice() -> AccountId {
    acct("alice")
}

pub fn bob() -> AccountId {
    acct("bob")
}

/// Config with AU and AG bound to `xau` and `xag`.
pub fn base_config() -> LedgerConfig {
    let mut config = LedgerConfig::new(owner(), admin());
    config.feeds = vec![
        ("AU".to_string(), FeedHandle::new("xau")),
        ("AG".to_string(), FeedHandle::new("xag")),
    ];
    config
}

/// Records every event it is handed. Can be switched to fail every call.
#[derive(Default)]
pub struct RecordingNotifier {
    pub events: Mutex<Vec<LedgerEvent>>,
    pub failing: Mutex<bool>,
}

impl RecordingNotifier {
    pub fn names(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().iter().map(|e| e.name()).collect()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }
}

impl NotificationPort for RecordingNotifier {
    fn emit(&self, event: &LedgerEvent) -> Result<(), LedgerError> {
        if *self.failing.lock().unwrap() {
            return Err(LedgerError::Notification {
                reason: "sink offline".to_string(),
            });
        }
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// Unit supply that can be told to reject mints or transfers into an account.
#[derive(Default)]
pub struct FlakySupply {
    pub inner: InMemoryUnitSupply,
    pub fail_mint_to: Mutex<HashSet<AccountId>>,
    pub fail_transfer_to: Mutex<HashSet<AccountId>>,
}

impl FlakySupply {
    pub fn fail_mints_to(&self, account: &AccountId) {
        self.fail_mint_to.lock().unwrap().insert(account.clone());
    }

    pub fn fail_transfers_to(&self, account: &AccountId) {
        self.fail_transfer_to.lock().unwrap().insert(account.clone());
    }

    fn rejected(account: &AccountId) -> LedgerError {
        LedgerError::Supply {
            reason: format!("{} rejected", account),
        }
    }
}

impl UnitSupplyPort for FlakySupply {
    fn mint(&self, account: &AccountId, amount: u128) -> Result<(), LedgerError> {
        if self.fail_mint_to.lock().unwrap().contains(account) {
            return Err(Self::rejected(account));
        }
        self.inner.mint(account, amount)
    }

    fn burn(&self, account: &AccountId, amount: u128) -> Result<(), LedgerError> {
        self.inner.burn(account, amount)
    }

    fn transfer(&self, from: &AccountId, to: &AccountId, amount: u128) -> Result<(), LedgerError> {
        if self.fail_transfer_to.lock().unwrap().contains(to) {
            return Err(Self::rejected(to));
        }
        self.inner.transfer(from, to, amount)
    }

    fn balance_of(&self, account: &AccountId) -> u128 {
        self.inner.balance_of(account)
    }

    fn total_supply(&self) -> u128 {
        self.inner.total_supply()
    }
}

/// Engine wired to shareable in-memory collaborators.
pub struct Harness {
    pub ledger: AssetLedger,
    pub supply: Arc<FlakySupply>,
    pub feed: Arc<StaticPriceFeed>,
    pub access: Arc<RoleAccessControl>,
    pub notifier: Arc<RecordingNotifier>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(base_config())
    }

    pub fn with_config(config: LedgerConfig) -> Self {
        let feed = Arc::new(StaticPriceFeed::new());
        feed.set_price("xau", GOLD_PRICE);
        feed.set_price("xag", SILVER_PRICE);
        Self::with_feed(config, feed.clone(), feed)
    }

    /// Build around a custom price feed. `quotes` is the settable feed the
    /// custom one reads through, kept for adjusting prices in tests.
    pub fn with_feed(
        config: LedgerConfig,
        feeds: Arc<dyn PriceFeedPort>,
        quotes: Arc<StaticPriceFeed>,
    ) -> Self {
        let supply = Arc::new(FlakySupply::default());
        let access = Arc::new(RoleAccessControl::new(config.owner_account.clone()));
        let notifier = Arc::new(RecordingNotifier::default());
        let ports = Collaborators {
            supply: supply.clone(),
            feeds,
            access: access.clone(),
            notifier: notifier.clone(),
        };
        Harness {
            ledger: AssetLedger::new(config, ports).unwrap(),
            supply,
            feed: quotes,
            access,
            notifier,
        }
    }

    pub fn add(&self, who: &AccountId, asset_ref: &str, symbol: &str, quantity: u128) {
        self.ledger
            .add_holding(&owner(), who, asset_ref, symbol, quantity)
            .unwrap();
    }

    pub fn balance(&self, account: &AccountId) -> u128 {
        self.ledger.balance_of(account)
    }

    /// Engine state, unit supply and every non-zero balance.
    pub fn observable(&self) -> (LedgerState, u128, Vec<(AccountId, u128)>) {
        (
            self.ledger.snapshot(),
            self.ledger.total_supply(),
            self.supply.inner.balances(),
        )
    }

    /// `total_asset_value * SCALE / total_supply` recomputed from scratch.
    pub fn recomputed_price(&self) -> u128 {
        let total = self.ledger.total_asset_value().unwrap();
        let supply = self.ledger.total_supply();
        if supply == 0 {
            0
        } else {
            divide(total, supply).unwrap()
        }
    }
}
