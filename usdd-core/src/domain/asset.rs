//! Asset (amount + symbol) domain model

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::result::{LedgerError, LedgerResult};
use super::symbol::Symbol;

/// Largest magnitude an asset amount may hold (2^62 - 1)
pub const MAX_AMOUNT: i64 = (1 << 62) - 1;

/// A quantity of tokens in smallest units, tagged with its symbol
///
/// `Asset::new(1_000_000, 4,USDD)` is `100.0000 USDD`. Arithmetic is
/// checked and only defined between assets of the same symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Asset {
    pub amount: i64,
    pub symbol: Symbol,
}

impl Asset {
    pub fn new(amount: i64, symbol: Symbol) -> Self {
        Self { amount, symbol }
    }

    /// Zero of the given symbol
    pub fn zero(symbol: Symbol) -> Self {
        Self::new(0, symbol)
    }

    pub fn is_valid(&self) -> bool {
        (-MAX_AMOUNT..=MAX_AMOUNT).contains(&self.amount) && self.symbol.is_valid()
    }

    pub fn checked_add(&self, other: &Asset) -> LedgerResult<Asset> {
        self.ensure_same_symbol(other)?;
        let amount = self
            .amount
            .checked_add(other.amount)
            .filter(|a| *a <= MAX_AMOUNT)
            .ok_or(LedgerError::Overflow)?;
        Ok(Asset::new(amount, self.symbol.clone()))
    }

    pub fn checked_sub(&self, other: &Asset) -> LedgerResult<Asset> {
        self.ensure_same_symbol(other)?;
        let amount = self
            .amount
            .checked_sub(other.amount)
            .filter(|a| *a >= -MAX_AMOUNT)
            .ok_or(LedgerError::Overflow)?;
        Ok(Asset::new(amount, self.symbol.clone()))
    }

    fn ensure_same_symbol(&self, other: &Asset) -> LedgerResult<()> {
        if self.symbol != other.symbol {
            return Err(LedgerError::SymbolMismatch {
                expected: self.symbol.to_string(),
                actual: other.symbol.to_string(),
            });
        }
        Ok(())
    }

    /// Amount as a decimal number (e.g. `100.0000`)
    pub fn to_decimal(&self) -> Option<Decimal> {
        Decimal::try_new(self.amount, u32::from(self.symbol.precision())).ok()
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_decimal() {
            Some(value) => write!(f, "{} {}", value, self.symbol.code()),
            None => write!(f, "{} {}", self.amount, self.symbol),
        }
    }
}

impl FromStr for Asset {
    type Err = LedgerError;

    /// Parse `"100.0000 USDD"`; the precision is taken from the number of
    /// fractional digits written.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LedgerError::InvalidQuantity(s.to_string());
        let (amount, code) = s.trim().split_once(' ').ok_or_else(invalid)?;
        let value = Decimal::from_str(amount.trim()).map_err(|_| invalid())?;
        let precision = u8::try_from(value.scale()).map_err(|_| invalid())?;
        let amount = i64::try_from(value.mantissa()).map_err(|_| invalid())?;

        let symbol = Symbol::new(precision, code.trim());
        if !symbol.is_valid() {
            return Err(LedgerError::InvalidSymbol(symbol.to_string()));
        }
        Ok(Asset::new(amount, symbol))
    }
}

impl TryFrom<String> for Asset {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Asset> for String {
    fn from(asset: Asset) -> Self {
        asset.to_string()
    }
}
