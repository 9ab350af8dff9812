//! CSV loader for operation scripts.
//!
//! One operation per row, no header. The first column names the operation;
//! the remaining columns are its arguments:
//!
//! ```text
//! seed,<caller>
//! bind_feed,<caller>,<symbol>,<handle>
//! add_holding,<caller>,<owner>,<asset_ref>,<symbol>,<quantity>
//! buy_back,<caller>,<owner>,<asset_ref>
//! buy_back_symbol,<caller>,<owner>,<asset_ref>,<symbol>
//! transfer,<from>,<to>,<amount>
//! freeze,<caller>,<account>
//! unfreeze,<caller>,<account>
//! fee_exempt,<caller>,<account>,<true|false>
//! set_fee_bps,<caller>,<bps>
//! ```
//!
//! Lines starting with `#` are ignored.

use std::fs;
use std::path::Path;

use crate::domain::error::LedgerError;
use crate::domain::holding::AccountId;
use crate::domain::replay::LedgerOp;

pub fn load_ops<P: AsRef<Path>>(path: P) -> Result<Vec<(usize, LedgerOp)>, LedgerError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| LedgerError::DataFile {
        reason: format!("failed to read {}: {}", path.display(), e),
    })?;
    parse_ops(&content)
}

pub fn parse_ops(content: &str) -> Result<Vec<(usize, LedgerOp)>, LedgerError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());
    let mut ops = Vec::new();

    for result in rdr.records() {
        let record = result.map_err(|e| LedgerError::DataFile {
            reason: format!("CSV parse error: {}", e),
        })?;
        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);
        let fields: Vec<&str> = record.iter().collect();
        if fields.iter().all(|f| f.is_empty()) {
            continue;
        }
        ops.push((line, parse_row(line, &fields)?));
    }
    Ok(ops)
}

fn arg<'a>(fields: &[&'a str], line: usize, idx: usize, name: &str) -> Result<&'a str, LedgerError> {
    fields
        .get(idx)
        .copied()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| LedgerError::DataFile {
            reason: format!("line {}: missing {}", line, name),
        })
}

fn amount_arg(fields: &[&str], line: usize, idx: usize, name: &str) -> Result<u128, LedgerError> {
    arg(fields, line, idx, name)?
        .replace('_', "")
        .parse()
        .map_err(|_| LedgerError::DataFile {
            reason: format!("line {}: {} must be a non-negative integer", line, name),
        })
}

fn flag_arg(fields: &[&str], line: usize, idx: usize, name: &str) -> Result<bool, LedgerError> {
    match arg(fields, line, idx, name)?.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        other => Err(LedgerError::DataFile {
            reason: format!("line {}: invalid {} {:?}", line, name, other),
        }),
    }
}

fn parse_row(line: usize, fields: &[&str]) -> Result<LedgerOp, LedgerError> {
    let text = |idx: usize, name: &str| arg(fields, line, idx, name).map(str::to_string);
    let account = |idx: usize, name: &str| text(idx, name).map(AccountId::new);
    let amount = |idx: usize, name: &str| amount_arg(fields, line, idx, name);
    let flag = |idx: usize, name: &str| flag_arg(fields, line, idx, name);

    let op = match text(0, "operation")?.as_str() {
        "seed" => LedgerOp::Seed {
            caller: account(1, "caller")?,
        },
        "bind_feed" => LedgerOp::BindFeed {
            caller: account(1, "caller")?,
            symbol: text(2, "symbol")?,
            handle: text(3, "handle")?,
        },
        "add_holding" => LedgerOp::AddHolding {
            caller: account(1, "caller")?,
            owner: account(2, "owner")?,
            asset_ref: text(3, "asset_ref")?,
            symbol: text(4, "symbol")?,
            quantity: amount(5, "quantity")?,
        },
        "buy_back" => LedgerOp::BuyBack {
            caller: account(1, "caller")?,
            owner: account(2, "owner")?,
            asset_ref: text(3, "asset_ref")?,
        },
        "buy_back_symbol" => LedgerOp::BuyBackSymbol {
            caller: account(1, "caller")?,
            owner: account(2, "owner")?,
            asset_ref: text(3, "asset_ref")?,
            symbol: text(4, "symbol")?,
        },
        "transfer" => LedgerOp::Transfer {
            from: account(1, "from")?,
            to: account(2, "to")?,
            amount: amount(3, "amount")?,
        },
        "freeze" | "unfreeze" => LedgerOp::SetFrozen {
            caller: account(1, "caller")?,
            account: account(2, "account")?,
            frozen: fields[0] == "freeze",
        },
        "fee_exempt" => LedgerOp::SetFeeExempt {
            caller: account(1, "caller")?,
            account: account(2, "account")?,
            exempt: flag(3, "exempt")?,
        },
        "set_fee_bps" => LedgerOp::SetFeeBps {
            caller: account(1, "caller")?,
            fee_bps: amount(2, "bps")?,
        },
        other => {
            return Err(LedgerError::DataFile {
                reason: format!("line {}: unknown operation {:?}", line, other),
            })
        }
    };
    Ok(op)
}
