//! In-memory ledger state
//!
//! `LedgerState` is the explicit handle every action runs against: the
//! symbol registry keyed by symbol code and the balance store, one map of
//! owners per symbol code. All maps are ordered, so iteration is stable.

use std::collections::BTreeMap;

use super::asset::Asset;
use super::name::Name;
use super::records::{Holding, SupplyRecord};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerState {
    stats: BTreeMap<String, SupplyRecord>,
    holdings: BTreeMap<String, BTreeMap<Name, Holding>>,
}

impl LedgerState {
    pub fn new() -> Self {
        Self::default()
    }

    // === Symbol registry ===

    pub fn stat(&self, code: &str) -> Option<&SupplyRecord> {
        self.stats.get(code)
    }

    pub fn stat_mut(&mut self, code: &str) -> Option<&mut SupplyRecord> {
        self.stats.get_mut(code)
    }

    pub fn insert_stat(&mut self, record: SupplyRecord) {
        self.stats
            .insert(record.supply.symbol.code().to_string(), record);
    }

    pub fn stats(&self) -> impl Iterator<Item = &SupplyRecord> {
        self.stats.values()
    }

    // === Balance store ===

    pub fn holding(&self, owner: &Name, code: &str) -> Option<&Holding> {
        self.holdings.get(code)?.get(owner)
    }

    pub fn holding_mut(&mut self, owner: &Name, code: &str) -> Option<&mut Holding> {
        self.holdings.get_mut(code)?.get_mut(owner)
    }

    pub fn insert_holding(&mut self, holding: Holding) {
        let code = holding.balance.symbol.code();
        match self.holdings.get_mut(code) {
            Some(owners) => {
                owners.insert(holding.owner.clone(), holding);
            }
            None => {
                let code = code.to_string();
                let owners = BTreeMap::from([(holding.owner.clone(), holding)]);
                self.holdings.insert(code, owners);
            }
        }
    }

    pub fn remove_holding(&mut self, owner: &Name, code: &str) -> Option<Holding> {
        let owners = self.holdings.get_mut(code)?;
        let removed = owners.remove(owner);
        if owners.is_empty() {
            self.holdings.remove(code);
        }
        removed
    }

    /// All holdings, ordered by symbol code then owner
    pub fn holdings(&self) -> impl Iterator<Item = &Holding> {
        self.holdings.values().flat_map(|owners| owners.values())
    }

    /// Holdings of one symbol, ordered by owner
    pub fn holdings_of<'a>(&'a self, code: &str) -> impl Iterator<Item = &'a Holding> + 'a {
        self.holdings
            .get(code)
            .into_iter()
            .flat_map(|owners| owners.values())
    }

    /// Sum of all balances of a symbol
    pub fn circulating(&self, code: &str) -> i128 {
        self.holdings_of(code)
            .map(|h| i128::from(h.balance.amount))
            .sum()
    }

    /// Sum of all accrued, unclaimed interest of a symbol
    pub fn accrued(&self, code: &str) -> i128 {
        self.holdings_of(code)
            .map(|h| i128::from(h.interest.amount))
            .sum()
    }

    pub fn balance_of(&self, owner: &Name, code: &str) -> Option<&Asset> {
        self.holding(owner, code).map(|h| &h.balance)
    }
}
