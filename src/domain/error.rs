//! Domain error types.

/// Broad failure category of a [`LedgerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Authorization,
    State,
    Resource,
    Frozen,
    Reentrancy,
    Collaborator,
    Config,
    Io,
}

/// Top-level error type for assetledger.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("holding already exists for ({owner}, {asset_ref}, {symbol})")]
    DuplicateKey {
        owner: String,
        asset_ref: String,
        symbol: String,
    },

    #[error("no holding for ({owner}, {asset_ref})")]
    NotFound { owner: String, asset_ref: String },

    #[error("{caller} is not authorized to {operation}")]
    Unauthorized { caller: String, operation: String },

    #[error("no price feed bound for {symbol}")]
    NoFeedBound { symbol: String },

    #[error("price feed for {symbol} unavailable: {reason}")]
    FeedUnavailable { symbol: String, reason: String },

    #[error("division by zero")]
    DivideByZero,

    #[error("fixed-point overflow")]
    Overflow,

    #[error("computed value is zero")]
    ZeroValue,

    #[error("computed token amount is zero")]
    ZeroTokens,

    #[error("ledger already seeded")]
    AlreadySeeded,

    #[error("insufficient balance for {account}: have {available}, need {needed}")]
    InsufficientBalance {
        account: String,
        available: u128,
        needed: u128,
    },

    #[error("admin fee {fee} exceeds minted amount {minted}")]
    FeeExceedsMint { fee: u128, minted: u128 },

    #[error("transfer fee {fee} must be below amount {amount}")]
    FeeExceedsAmount { fee: u128, amount: u128 },

    #[error("account {account} is frozen")]
    AccountFrozen { account: String },

    #[error("re-entrant call while a ledger transaction is in progress")]
    ReentrantCall,

    #[error("unit supply error: {reason}")]
    Supply { reason: String },

    #[error("notification error: {reason}")]
    Notification { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data file error: {reason}")]
    DataFile { reason: String },
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::InvalidInput { .. }
            | LedgerError::DuplicateKey { .. }
            | LedgerError::NotFound { .. } => ErrorKind::Validation,
            LedgerError::Unauthorized { .. } => ErrorKind::Authorization,
            LedgerError::NoFeedBound { .. }
            | LedgerError::FeedUnavailable { .. }
            | LedgerError::DivideByZero
            | LedgerError::Overflow
            | LedgerError::ZeroValue
            | LedgerError::ZeroTokens
            | LedgerError::AlreadySeeded => ErrorKind::State,
            LedgerError::InsufficientBalance { .. }
            | LedgerError::FeeExceedsMint { .. }
            | LedgerError::FeeExceedsAmount { .. } => ErrorKind::Resource,
            LedgerError::AccountFrozen { .. } => ErrorKind::Frozen,
            LedgerError::ReentrantCall => ErrorKind::Reentrancy,
            LedgerError::Supply { .. } | LedgerError::Notification { .. } => {
                ErrorKind::Collaborator
            }
            LedgerError::ConfigParse { .. }
            | LedgerError::ConfigMissing { .. }
            | LedgerError::ConfigInvalid { .. } => ErrorKind::Config,
            LedgerError::DataFile { .. } => ErrorKind::Io,
        }
    }

    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        LedgerError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&LedgerError> for std::process::ExitCode {
    fn from(err: &LedgerError) -> Self {
        let code: u8 = match err.kind() {
            ErrorKind::Io => 1,
            ErrorKind::Config => 2,
            ErrorKind::Validation => 3,
            ErrorKind::Authorization | ErrorKind::Frozen => 4,
            ErrorKind::State | ErrorKind::Resource => 5,
            ErrorKind::Reentrancy | ErrorKind::Collaborator => 6,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(
            LedgerError::invalid("symbol", "too long").kind(),
            ErrorKind::Validation
        );
        assert_eq!(LedgerError::ZeroTokens.kind(), ErrorKind::State);
        assert_eq!(
            LedgerError::FeeExceedsAmount { fee: 2, amount: 1 }.kind(),
            ErrorKind::Resource
        );
        assert_eq!(
            LedgerError::AccountFrozen {
                account: "alice".into()
            }
            .kind(),
            ErrorKind::Frozen
        );
        assert_eq!(LedgerError::ReentrantCall.kind(), ErrorKind::Reentrancy);
        assert_eq!(
            LedgerError::DataFile {
                reason: "missing".into()
            }
            .kind(),
            ErrorKind::Io
        );
    }

    #[test]
    fn messages_name_the_offending_key() {
        let err = LedgerError::DuplicateKey {
            owner: "alice".into(),
            asset_ref: "Qm123".into(),
            symbol: "AU".into(),
        };
        assert_eq!(
            err.to_string(),
            "holding already exists for (alice, Qm123, AU)"
        );
    }
}
