//! USDD Core - interest-bearing token ledger
//!
//! This crate implements the ledger following hexagonal architecture:
//!
//! - **domain**: Names, symbols, assets, ledger records and actions
//! - **ports**: Trait definitions for authorization, identities and storage
//! - **services**: The ledger engine plus storage, logging and status services
//! - **adapters**: Concrete implementations (DuckDB, signer sets, file lock)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod migrations;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use adapters::duckdb::DuckDbRepository;
use config::Config;
use ports::LedgerRepository;
use services::{StatusService, TokenService};

// Re-export commonly used types at crate root
pub use adapters::signers::{KnownAccounts, SignerSet};
pub use domain::result::{Error, OperationResult};
pub use domain::{Action, Asset, Holding, LedgerError, LedgerState, Name, Receipt, Symbol};
pub use services::{EntryPoint, LogEvent, LoggingService};

pub const LEDGER_DB_FILENAME: &str = "ledger.duckdb";

/// Main context for ledger operations
///
/// Holds the configuration, the repository and the services built on it.
pub struct UsddContext {
    pub config: Config,
    pub repository: Arc<DuckDbRepository>,
    pub token_service: TokenService,
    pub status_service: StatusService,
}

impl UsddContext {
    /// Open the ledger in `data_dir`, creating the database on first use
    ///
    /// The ledger and treasury identities are always registered, since
    /// every distribution and withdrawal moves funds to one of them.
    pub fn new(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;
        let config = Config::load(data_dir)?;

        let repository = Arc::new(DuckDbRepository::new(&data_dir.join(LEDGER_DB_FILENAME))?);
        repository.ensure_schema()?;
        repository.add_identity(&config.ledger_account)?;
        repository.add_identity(&config.treasury_account)?;

        let token_service = TokenService::new(
            repository.clone(),
            config.clone(),
            data_dir.to_path_buf(),
        );
        let status_service = StatusService::new(repository.clone(), config.clone());

        Ok(Self {
            config,
            repository,
            token_service,
            status_service,
        })
    }
}
