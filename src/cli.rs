//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::memory_supply::InMemoryUnitSupply;
use crate::adapters::ops_csv_adapter::load_ops;
use crate::adapters::role_access::RoleAccessControl;
use crate::adapters::static_price_feed::StaticPriceFeed;
use crate::adapters::tracing_notifier::TracingNotifier;
use crate::domain::config::LedgerConfig;
use crate::domain::config_validation::{build_ledger_config, validate_ledger_config};
use crate::domain::engine::{AssetLedger, Collaborators};
use crate::domain::error::LedgerError;
use crate::domain::fixed_point::format_scaled;
use crate::domain::replay::{replay, OpOutcome};
use crate::domain::valuation::tokens_from_value;

#[derive(Parser, Debug)]
#[command(name = "assetledger", about = "Asset-backed unit ledger engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a ledger configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Price a quantity of an asset class and quote its bootstrap mint
    Quote {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        prices: PathBuf,
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        quantity: u128,
    },
    /// Replay a CSV script of operations against a fresh ledger
    Replay {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        prices: PathBuf,
        #[arg(short, long)]
        ops: PathBuf,
        /// Exit non-zero if any operation fails
        #[arg(long)]
        strict: bool,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Validate { config } => run_validate(&config),
        Command::Quote {
            config,
            prices,
            symbol,
            quantity,
        } => run_quote(&config, &prices, &symbol, quantity),
        Command::Replay {
            config,
            prices,
            ops,
            strict,
        } => run_replay(&config, &prices, &ops, strict),
    }
}

fn fail(err: LedgerError) -> ExitCode {
    eprintln!("error: {err}");
    ExitCode::from(&err)
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, LedgerError> {
    FileConfigAdapter::from_file(path).map_err(|e| LedgerError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Wire a ledger to in-memory collaborators, with prices loaded from CSV.
pub fn build_ledger(
    config: LedgerConfig,
    feed: StaticPriceFeed,
) -> Result<(AssetLedger, Arc<InMemoryUnitSupply>), LedgerError> {
    let supply = Arc::new(InMemoryUnitSupply::new());
    let ports = Collaborators {
        supply: supply.clone(),
        feeds: Arc::new(feed),
        access: Arc::new(RoleAccessControl::new(config.owner_account.clone())),
        notifier: Arc::new(TracingNotifier),
    };
    Ok((AssetLedger::new(config, ports)?, supply))
}

fn run_validate(config_path: &Path) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(e) => return fail(e),
    };
    match validate_ledger_config(&adapter) {
        Ok(()) => {
            println!("{}: OK", config_path.display());
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn run_quote(config_path: &Path, prices_path: &Path, symbol: &str, quantity: u128) -> ExitCode {
    let result = (|| -> Result<(u128, u128), LedgerError> {
        let config = build_ledger_config(&load_config(config_path)?)?;
        let base_value = config.base_value;
        let (ledger, _) = build_ledger(config, StaticPriceFeed::from_csv(prices_path)?)?;
        let value = ledger.mineral_value(symbol, quantity)?;
        Ok((value, tokens_from_value(value, 0, base_value)?))
    })();

    match result {
        Ok((value, tokens)) => {
            println!("symbol:          {}", symbol);
            println!("quantity:        {}", quantity);
            println!("value:           {} ({})", format_scaled(value), value);
            println!("bootstrap mint:  {} ({})", format_scaled(tokens), tokens);
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn run_replay(config_path: &Path, prices_path: &Path, ops_path: &Path, strict: bool) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let setup = (|| -> Result<_, LedgerError> {
        let config = build_ledger_config(&load_config(config_path)?)?;
        let feed = StaticPriceFeed::from_csv(prices_path)?;
        let ops = load_ops(ops_path)?;
        let (ledger, supply) = build_ledger(config, feed)?;
        Ok((ledger, supply, ops))
    })();
    let (ledger, supply, ops) = match setup {
        Ok(s) => s,
        Err(e) => return fail(e),
    };

    eprintln!("Replaying {} operations...", ops.len());
    let outcomes = replay(&ledger, ops);
    print!("{}", render_outcomes(&outcomes));
    print!("{}", render_summary(&ledger, &supply));

    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    eprintln!("{} operations, {} failed", outcomes.len(), failed);
    match outcomes.iter().find_map(|o| o.result.as_ref().err()) {
        Some(err) if strict => ExitCode::from(err),
        _ => ExitCode::SUCCESS,
    }
}

pub fn render_outcomes(outcomes: &[OpOutcome]) -> String {
    let mut out = String::new();
    for o in outcomes {
        match &o.result {
            Ok(msg) => out.push_str(&format!("line {:>4}  ok     {}\n", o.line, msg)),
            Err(e) => out.push_str(&format!("line {:>4}  FAILED {}\n", o.line, e)),
        }
    }
    out
}

/// Final holdings, balances and aggregate value of a replayed ledger.
pub fn render_summary(ledger: &AssetLedger, supply: &InMemoryUnitSupply) -> String {
    let mut out = String::from("\nHoldings\n");
    for h in ledger.holdings() {
        out.push_str(&format!(
            "  {:<12} {:<20} {:<5} {}\n",
            h.owner, h.asset_ref, h.symbol, h.quantity
        ));
    }
    out.push_str(&format!("Symbols: {}\n", ledger.registered_symbols().join(", ")));
    out.push_str("Balances\n");
    for (account, balance) in supply.balances() {
        out.push_str(&format!("  {:<12} {}\n", account, format_scaled(balance)));
    }
    match (ledger.total_asset_value(), ledger.unit_price()) {
        (Ok(total), Ok(price)) => {
            out.push_str(&format!("Total asset value: {}\n", format_scaled(total)));
            out.push_str(&format!("Unit supply:       {}\n", format_scaled(ledger.total_supply())));
            out.push_str(&format!("Unit price:        {}\n", format_scaled(price)));
        }
        (Err(e), _) | (_, Err(e)) => {
            out.push_str(&format!("Total asset value: unavailable ({})\n", e));
        }
    }
    out
}
