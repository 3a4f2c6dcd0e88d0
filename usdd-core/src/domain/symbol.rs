//! Token symbol domain model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::result::LedgerError;

/// Highest supported precision (digits after the decimal point)
pub const MAX_PRECISION: u8 = 18;

/// Token symbol: a code of 1-7 uppercase letters plus a fixed precision
///
/// A `Symbol` can hold an invalid code so that actions can reject it with
/// the proper error; use [`Symbol::is_valid`] before trusting it. The text
/// form is `precision,CODE`, e.g. `4,USDD`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol {
    precision: u8,
    code: String,
}

impl Symbol {
    pub fn new(precision: u8, code: impl Into<String>) -> Self {
        Self {
            precision,
            code: code.into(),
        }
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn is_valid(&self) -> bool {
        self.precision <= MAX_PRECISION
            && !self.code.is_empty()
            && self.code.len() <= 7
            && self.code.chars().all(|c| c.is_ascii_uppercase())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.precision, self.code)
    }
}

impl FromStr for Symbol {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LedgerError::InvalidSymbol(s.to_string());
        let (precision, code) = s.split_once(',').ok_or_else(invalid)?;
        let precision: u8 = precision.trim().parse().map_err(|_| invalid())?;
        let symbol = Symbol::new(precision, code.trim());
        if symbol.is_valid() {
            Ok(symbol)
        } else {
            Err(invalid())
        }
    }
}

impl TryFrom<String> for Symbol {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_symbol() {
        let symbol: Symbol = "4,USDD".parse().unwrap();
        assert_eq!(symbol.precision(), 4);
        assert_eq!(symbol.code(), "USDD");
        assert_eq!(symbol.to_string(), "4,USDD");
    }

    #[test]
    fn test_invalid_symbols() {
        assert!(!Symbol::new(4, "usdd").is_valid());
        assert!(!Symbol::new(4, "").is_valid());
        assert!(!Symbol::new(4, "TOOLONGX").is_valid());
        assert!(!Symbol::new(19, "USDD").is_valid());
        assert!("USDD".parse::<Symbol>().is_err());
        assert!("x,USDD".parse::<Symbol>().is_err());
    }
}
