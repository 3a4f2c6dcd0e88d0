//! Stored ledger records

use serde::{Deserialize, Serialize};

use super::asset::Asset;
use super::name::Name;

/// Registry entry for one token symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyRecord {
    pub supply: Asset,
    pub max_supply: Asset,
    pub issuer: Name,
}

impl SupplyRecord {
    /// Amount that can still be issued before hitting `max_supply`
    pub fn available(&self) -> i64 {
        self.max_supply.amount - self.supply.amount
    }
}

/// Balance and accrued interest of one owner for one symbol
///
/// `interest` is not spendable: it grows through accrual distributions and
/// is moved into `balance` by a claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding {
    pub owner: Name,
    pub balance: Asset,
    pub interest: Asset,
}

impl Holding {
    /// A fresh holding with zero accrued interest
    pub fn new(owner: Name, balance: Asset) -> Self {
        let interest = Asset::zero(balance.symbol.clone());
        Self {
            owner,
            balance,
            interest,
        }
    }

    /// Nothing left worth keeping the record for
    pub fn is_empty(&self) -> bool {
        self.balance.amount == 0 && self.interest.amount == 0
    }
}
