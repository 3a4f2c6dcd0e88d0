//! Result and error types for the core library

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::name::Name;

/// Precondition failures raised by ledger actions
///
/// Any of these aborts the whole call chain. Nothing the chain did before
/// the failure is kept.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("invalid symbol name: {0}")]
    InvalidSymbol(String),

    #[error("invalid account name: {0}")]
    InvalidName(String),

    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("must {0} positive quantity")]
    NonPositiveQuantity(&'static str),

    #[error("symbol precision mismatch: expected {expected}, got {actual}")]
    SymbolMismatch { expected: String, actual: String },

    #[error("memo has more than 256 bytes")]
    MemoTooLong,

    #[error("token with symbol already exists: {0}")]
    SymbolExists(String),

    #[error("token with symbol does not exist: {0}")]
    UnknownSymbol(String),

    #[error("no balance object found for {0}")]
    NoBalance(Name),

    #[error("overdrawn balance: have {have}, need {need}")]
    Overdrawn { have: i64, need: i64 },

    #[error("missing authority of {0}")]
    MissingAuthority(Name),

    #[error("quantity exceeds available supply: available {available}, requested {requested}")]
    SupplyExceeded { available: i64, requested: i64 },

    #[error("cannot transfer to self")]
    SelfTransfer,

    #[error("to account does not exist: {0}")]
    UnknownAccount(Name),

    #[error("withdrawal address must be 42 characters starting with 0x")]
    BadWithdrawalAddress,

    #[error("interest pool {pool} is bigger than reference supply {supply}")]
    PoolExceedsSupply { pool: i64, supply: i64 },

    #[error("interest pool {pool} is above the distribution ceiling {ceiling}")]
    PoolAboveCeiling { pool: i64, ceiling: i64 },

    #[error("balance of {owner} ({balance}) is bigger than reference supply {supply}")]
    HolderExceedsSupply { owner: Name, balance: i64, supply: i64 },

    #[error("cannot claim to the ledger account")]
    SelfClaim,

    #[error("interest of {owner} is below the baseline ({interest} < {baseline})")]
    InterestBelowBaseline { owner: Name, interest: i64, baseline: i64 },

    #[error("no holding found for {0}")]
    NoHolding(Name),

    #[error("arithmetic overflow")]
    Overflow,

    #[error("call chain exceeded {0} actions")]
    ChainTooLong(usize),
}

impl LedgerError {
    /// Stable identifier of the rejection, free of amounts and names
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerError::InvalidSymbol(_) => "invalid_symbol",
            LedgerError::InvalidName(_) => "invalid_name",
            LedgerError::InvalidQuantity(_) => "invalid_quantity",
            LedgerError::NonPositiveQuantity(_) => "non_positive_quantity",
            LedgerError::SymbolMismatch { .. } => "symbol_mismatch",
            LedgerError::MemoTooLong => "memo_too_long",
            LedgerError::SymbolExists(_) => "symbol_exists",
            LedgerError::UnknownSymbol(_) => "unknown_symbol",
            LedgerError::NoBalance(_) => "no_balance",
            LedgerError::Overdrawn { .. } => "overdrawn",
            LedgerError::MissingAuthority(_) => "missing_authority",
            LedgerError::SupplyExceeded { .. } => "supply_exceeded",
            LedgerError::SelfTransfer => "self_transfer",
            LedgerError::UnknownAccount(_) => "unknown_account",
            LedgerError::BadWithdrawalAddress => "bad_withdrawal_address",
            LedgerError::PoolExceedsSupply { .. } => "pool_exceeds_supply",
            LedgerError::PoolAboveCeiling { .. } => "pool_above_ceiling",
            LedgerError::HolderExceedsSupply { .. } => "holder_exceeds_supply",
            LedgerError::SelfClaim => "self_claim",
            LedgerError::InterestBelowBaseline { .. } => "interest_below_baseline",
            LedgerError::NoHolding(_) => "no_holding",
            LedgerError::Overflow => "overflow",
            LedgerError::ChainTooLong(_) => "chain_too_long",
        }
    }
}

/// Result type for ledger actions
pub type LedgerResult<T> = std::result::Result<T, LedgerError>;

/// Core library error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Operation result (for JSON output)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> OperationResult<T> {
    /// Create a successful result
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create a failed result
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}
