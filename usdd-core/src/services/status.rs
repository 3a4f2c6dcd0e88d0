//! Status service - supply and holder summaries

use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;

use crate::config::Config;
use crate::ports::LedgerRepository;

pub struct StatusService {
    repository: Arc<dyn LedgerRepository>,
    config: Config,
}

impl StatusService {
    pub fn new(repository: Arc<dyn LedgerRepository>, config: Config) -> Self {
        Self { repository, config }
    }

    /// Overall picture of the configured symbol
    pub fn get_status(&self) -> Result<StatusSummary> {
        let state = self.repository.load_state()?;
        let identities = self.repository.get_identities()?;
        let symbol = &self.config.symbol;
        let code = symbol.code();

        let token = state.stat(code).map(|stat| TokenSummary {
            supply: stat.supply.to_string(),
            max_supply: stat.max_supply.to_string(),
            available: stat.available(),
            issuer: stat.issuer.to_string(),
            circulating: state.circulating(code),
            accrued_interest: state.accrued(code),
            conserved: state.circulating(code) == i128::from(stat.supply.amount),
        });

        let holders: Vec<HolderSummary> = state
            .holdings_of(code)
            .map(|h| HolderSummary {
                owner: h.owner.to_string(),
                balance: h.balance.to_string(),
                interest: h.interest.to_string(),
            })
            .collect();

        Ok(StatusSummary {
            symbol: symbol.to_string(),
            ledger_account: self.config.ledger_account.to_string(),
            treasury_account: self.config.treasury_account.to_string(),
            total_identities: identities.len() as i64,
            total_holders: holders.len() as i64,
            token,
            holders,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct StatusSummary {
    pub symbol: String,
    pub ledger_account: String,
    pub treasury_account: String,
    pub total_identities: i64,
    pub total_holders: i64,
    /// None until the symbol has been created
    pub token: Option<TokenSummary>,
    pub holders: Vec<HolderSummary>,
}

#[derive(Debug, Serialize)]
pub struct TokenSummary {
    pub supply: String,
    pub max_supply: String,
    /// Smallest units still issuable
    pub available: i64,
    pub issuer: String,
    /// Sum of all balances, in smallest units
    pub circulating: i128,
    pub accrued_interest: i128,
    /// Whether circulating balances add up to the recorded supply
    pub conserved: bool,
}

#[derive(Debug, Serialize)]
pub struct HolderSummary {
    pub owner: String,
    pub balance: String,
    pub interest: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::duckdb::DuckDbRepository;
    use crate::domain::{Asset, Holding, LedgerState, Name, SupplyRecord, Symbol};
    use tempfile::TempDir;

    fn usdd(amount: i64) -> Asset {
        Asset::new(amount, Symbol::new(4, "USDD"))
    }

    #[test]
    fn test_status_before_and_after_create() {
        let dir = TempDir::new().unwrap();
        let repo = Arc::new(DuckDbRepository::new(&dir.path().join("ledger.duckdb")).unwrap());
        repo.ensure_schema().unwrap();
        let service = StatusService::new(repo.clone(), Config::default());

        let empty = service.get_status().unwrap();
        assert!(empty.token.is_none());
        assert_eq!(empty.total_holders, 0);

        let mut state = LedgerState::new();
        state.insert_stat(SupplyRecord {
            supply: usdd(500),
            max_supply: usdd(1_000),
            issuer: Name::new("usddtoken").unwrap(),
        });
        let mut alice = Holding::new(Name::new("alice").unwrap(), usdd(500));
        alice.interest = usdd(3);
        state.insert_holding(alice);
        repo.save_state(&state).unwrap();

        let status = service.get_status().unwrap();
        let token = status.token.unwrap();
        assert_eq!(token.supply, "0.0500 USDD");
        assert_eq!(token.available, 500);
        assert_eq!(token.accrued_interest, 3);
        assert!(token.conserved);
        assert_eq!(status.holders[0].owner, "alice");
    }
}
