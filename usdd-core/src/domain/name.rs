//! Account name domain model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::result::LedgerError;

/// Longest allowed account name
pub const MAX_NAME_LEN: usize = 12;

/// Identity of an account on the ledger
///
/// Names are 1-12 characters drawn from `a-z`, `1-5` and `.`, and may not
/// end with a dot. Ordering is plain string ordering, which is also the
/// iteration order of the balance store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Name(String);

impl Name {
    /// Parse and validate a name
    pub fn new(value: impl Into<String>) -> Result<Self, LedgerError> {
        let value = value.into();
        if Self::is_valid(&value) {
            Ok(Self(value))
        } else {
            Err(LedgerError::InvalidName(value))
        }
    }

    fn is_valid(value: &str) -> bool {
        !value.is_empty()
            && value.len() <= MAX_NAME_LEN
            && !value.ends_with('.')
            && value
                .chars()
                .all(|c| matches!(c, 'a'..='z' | '1'..='5' | '.'))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Name {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Name {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Name> for String {
    fn from(name: Name) -> Self {
        name.0
    }
}
