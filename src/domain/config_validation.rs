//! Configuration validation.
//!
//! Validates the `[ledger]` and `[feeds]` sections before an engine is built.

use chrono::TimeDelta;

use crate::domain::config::{LedgerConfig, DEFAULT_BASE_VALUE, DEFAULT_FEE_BPS};
use crate::domain::error::LedgerError;
use crate::domain::fixed_point::BPS_DENOMINATOR;
use crate::domain::holding::{validate_symbol, AccountId};
use crate::domain::symbols::FeedHandle;
use crate::ports::config_port::ConfigPort;

pub fn validate_ledger_config(config: &dyn ConfigPort) -> Result<(), LedgerError> {
    validate_account(config, "owner_account")?;
    validate_account(config, "admin_account")?;
    validate_fee_bps(config)?;
    validate_base_value(config)?;
    validate_max_price_age(config)?;
    validate_feeds(config)?;
    Ok(())
}

/// Validate and build a [`LedgerConfig`].
pub fn build_ledger_config(config: &dyn ConfigPort) -> Result<LedgerConfig, LedgerError> {
    validate_ledger_config(config)?;
    let owner = AccountId::new(required(config, "ledger", "owner_account")?);
    let admin = AccountId::new(required(config, "ledger", "admin_account")?);
    let max_age_secs = parse_u128(config, "ledger", "max_price_age_secs", 0)?;
    let max_price_age = if max_age_secs == 0 {
        None
    } else {
        let secs = i64::try_from(max_age_secs).map_err(|_| invalid("max_price_age_secs", "too large"))?;
        Some(TimeDelta::try_seconds(secs).ok_or_else(|| invalid("max_price_age_secs", "too large"))?)
    };
    let feeds = config
        .section_entries("feeds")
        .into_iter()
        .map(|(symbol, handle)| (symbol, FeedHandle::new(handle.trim())))
        .collect();

    Ok(LedgerConfig {
        owner_account: owner,
        admin_account: admin,
        fee_bps: parse_u128(config, "ledger", "fee_bps", DEFAULT_FEE_BPS)?,
        base_value: parse_u128(config, "ledger", "base_value", DEFAULT_BASE_VALUE)?,
        max_price_age,
        feeds,
    })
}

fn invalid(key: &str, reason: &str) -> LedgerError {
    LedgerError::ConfigInvalid {
        section: "ledger".to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn required(config: &dyn ConfigPort, section: &str, key: &str) -> Result<String, LedgerError> {
    match config.get_string(section, key) {
        Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(LedgerError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }),
    }
}

fn parse_u128(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: u128,
) -> Result<u128, LedgerError> {
    match config.get_string(section, key) {
        None => Ok(default),
        Some(s) => s
            .trim()
            .replace('_', "")
            .parse::<u128>()
            .map_err(|_| LedgerError::ConfigInvalid {
                section: section.to_string(),
                key: key.to_string(),
                reason: format!("{} must be a non-negative integer", key),
            }),
    }
}

fn validate_account(config: &dyn ConfigPort, key: &str) -> Result<(), LedgerError> {
    required(config, "ledger", key).map(|_| ())
}

fn validate_fee_bps(config: &dyn ConfigPort) -> Result<(), LedgerError> {
    let value = parse_u128(config, "ledger", "fee_bps", DEFAULT_FEE_BPS)?;
    if value >= BPS_DENOMINATOR {
        return Err(invalid("fee_bps", "fee_bps must be below 10000"));
    }
    Ok(())
}

fn validate_base_value(config: &dyn ConfigPort) -> Result<(), LedgerError> {
    let value = parse_u128(config, "ledger", "base_value", DEFAULT_BASE_VALUE)?;
    if value == 0 {
        return Err(invalid("base_value", "base_value must be positive"));
    }
    Ok(())
}

fn validate_max_price_age(config: &dyn ConfigPort) -> Result<(), LedgerError> {
    let value = parse_u128(config, "ledger", "max_price_age_secs", 0)?;
    if value > i64::MAX as u128 / 1000 {
        return Err(invalid("max_price_age_secs", "max_price_age_secs is too large"));
    }
    Ok(())
}

fn validate_feeds(config: &dyn ConfigPort) -> Result<(), LedgerError> {
    for (symbol, handle) in config.section_entries("feeds") {
        if validate_symbol(&symbol).is_err() {
            return Err(LedgerError::ConfigInvalid {
                section: "feeds".to_string(),
                key: symbol,
                reason: "symbol must be 1 to 4 characters".to_string(),
            });
        }
        if handle.trim().is_empty() {
            return Err(LedgerError::ConfigInvalid {
                section: "feeds".to_string(),
                key: symbol,
                reason: "feed handle must not be empty".to_string(),
            });
        }
    }
    Ok(())
}
