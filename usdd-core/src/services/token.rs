//! Token service - runs ledger actions against the persisted stores
//!
//! Each `execute` is one call chain: lock the data directory, load the
//! state, run the chain, write the state back, release the lock. A rejected
//! chain writes nothing.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::adapters::lock::DataDirLock;
use crate::adapters::signers::KnownAccounts;
use crate::config::Config;
use crate::domain::{Action, Asset, Holding, Name, Receipt};
use crate::ports::{Authorizer, LedgerRepository};

use super::executor::Executor;
use super::ledger;

pub struct TokenService {
    repository: Arc<dyn LedgerRepository>,
    config: Config,
    data_dir: PathBuf,
}

impl TokenService {
    pub fn new(repository: Arc<dyn LedgerRepository>, config: Config, data_dir: PathBuf) -> Self {
        Self {
            repository,
            config,
            data_dir,
        }
    }

    /// Run `action` and everything it forwards as one atomic unit
    ///
    /// Ledger rejections come back as a `LedgerError` inside the anyhow
    /// error, so callers can downcast to tell them apart from storage
    /// failures.
    pub fn execute(&self, action: Action, signers: &dyn Authorizer) -> Result<Receipt> {
        let _lock = DataDirLock::acquire(&self.data_dir)?;

        let mut state = self.repository.load_state().context("Failed to load ledger state")?;
        let directory = KnownAccounts::new(self.repository.get_identities()?);

        let receipt = Executor::new(&self.config).apply(&mut state, action, signers, &directory)?;

        self.repository
            .save_state(&state)
            .context("Failed to save ledger state")?;
        Ok(receipt)
    }

    /// Current supply of the configured symbol
    pub fn supply(&self) -> Result<Asset> {
        let state = self.repository.load_state()?;
        Ok(ledger::get_supply(&state, self.config.symbol.code())?)
    }

    /// Transferable balance; fails when `owner` has no holding
    pub fn balance(&self, owner: &Name) -> Result<Asset> {
        let state = self.repository.load_state()?;
        Ok(ledger::get_balance(&state, owner, self.config.symbol.code())?)
    }

    /// Accrued interest; zero when `owner` has no holding
    pub fn interest(&self, owner: &Name) -> Result<Asset> {
        let state = self.repository.load_state()?;
        Ok(ledger::get_interest(&state, owner, &self.config.symbol))
    }

    /// All holdings of the configured symbol, ordered by owner
    pub fn holdings(&self) -> Result<Vec<Holding>> {
        let state = self.repository.load_state()?;
        Ok(state
            .holdings_of(self.config.symbol.code())
            .cloned()
            .collect())
    }

    pub fn identities(&self) -> Result<Vec<Name>> {
        self.repository.get_identities()
    }

    /// Register an identity; returns false if it was already known
    pub fn add_identity(&self, name: &Name) -> Result<bool> {
        let _lock = DataDirLock::acquire(&self.data_dir)?;
        self.repository.add_identity(name)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::duckdb::DuckDbRepository;
    use crate::adapters::signers::SignerSet;
    use crate::domain::{LedgerError, Symbol};
    use tempfile::TempDir;

    fn name(s: &str) -> Name {
        Name::new(s).unwrap()
    }

    fn usdd(amount: i64) -> Asset {
        Asset::new(amount, Symbol::new(4, "USDD"))
    }

    fn service(dir: &TempDir) -> TokenService {
        let repo = DuckDbRepository::new(&dir.path().join("ledger.duckdb")).unwrap();
        repo.ensure_schema().unwrap();
        for who in ["usddtoken", "usdpiggybank", "alice"] {
            repo.add_identity(&name(who)).unwrap();
        }
        TokenService::new(Arc::new(repo), Config::default(), dir.path().to_path_buf())
    }

    #[test]
    fn test_execute_persists_committed_state() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir);
        let ledger = SignerSet::from_names(["usddtoken"]);

        service
            .execute(
                Action::Create {
                    issuer: name("usddtoken"),
                    maximum_supply: usdd(1_000_000),
                },
                &ledger,
            )
            .unwrap();
        service
            .execute(
                Action::Issue {
                    to: name("alice"),
                    quantity: usdd(250),
                    memo: String::new(),
                },
                &ledger,
            )
            .unwrap();

        assert_eq!(service.supply().unwrap(), usdd(250));
        assert_eq!(service.balance(&name("alice")).unwrap(), usdd(250));
        assert_eq!(service.interest(&name("alice")).unwrap(), usdd(0));
        assert_eq!(service.holdings().unwrap().len(), 1);
    }

    #[test]
    fn test_rejected_action_is_not_persisted() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir);
        let ledger = SignerSet::from_names(["usddtoken"]);
        service
            .execute(
                Action::Create {
                    issuer: name("usddtoken"),
                    maximum_supply: usdd(100),
                },
                &ledger,
            )
            .unwrap();

        let err = service
            .execute(
                Action::Issue {
                    to: name("alice"),
                    quantity: usdd(101),
                    memo: String::new(),
                },
                &ledger,
            )
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LedgerError>(),
            Some(LedgerError::SupplyExceeded { .. })
        ));
        assert_eq!(service.supply().unwrap(), usdd(0));
    }

    #[test]
    fn test_add_identity_makes_account_reachable() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir);
        assert!(service.add_identity(&name("bob")).unwrap());
        assert!(!service.add_identity(&name("bob")).unwrap());
        assert!(service.identities().unwrap().contains(&name("bob")));
    }
}
