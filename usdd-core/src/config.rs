//! Configuration management
//!
//! Settings live in `settings.json` inside the data directory:
//! ```json
//! {
//!   "ledger": { "ledgerAccount": "usddtoken", "treasuryAccount": "usdpiggybank", ... },
//!   "cli": { ... }
//! }
//! ```
//! Keys this crate does not manage are ignored.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::result::Error;
use crate::domain::{Name, Symbol};

/// Raw settings.json structure
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    ledger: LedgerSettings,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LedgerSettings {
    #[serde(default)]
    ledger_account: Option<String>,
    #[serde(default)]
    treasury_account: Option<String>,
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    baseline: Option<i64>,
    #[serde(default)]
    claim_memo: Option<String>,
    #[serde(default)]
    distribution_ceiling: Option<i64>,
    #[serde(default)]
    max_chain_actions: Option<usize>,
}

pub const DEFAULT_LEDGER_ACCOUNT: &str = "usddtoken";
pub const DEFAULT_TREASURY_ACCOUNT: &str = "usdpiggybank";
pub const DEFAULT_SYMBOL: &str = "4,USDD";
pub const DEFAULT_BASELINE: i64 = 1;
pub const DEFAULT_CLAIM_MEMO: &str = "claim";
/// Largest pool (in smallest units) a single distribution accepts
pub const DEFAULT_DISTRIBUTION_CEILING: i64 = 999_999_999;
pub const DEFAULT_MAX_CHAIN_ACTIONS: usize = 100_000;

/// Ledger configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// The ledger's own identity: owner of the stores, target of withdrawals
    pub ledger_account: Name,
    /// Receives distribution remainders
    pub treasury_account: Name,
    /// The interest-bearing symbol
    pub symbol: Symbol,
    /// Smallest share that is paid out or accrued
    pub baseline: i64,
    /// Memo that switches a self-issue into accrual mode
    pub claim_memo: String,
    pub distribution_ceiling: i64,
    pub max_chain_actions: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ledger_account: Name::new(DEFAULT_LEDGER_ACCOUNT).expect("default ledger name"),
            treasury_account: Name::new(DEFAULT_TREASURY_ACCOUNT).expect("default treasury name"),
            symbol: Symbol::new(4, "USDD"),
            baseline: DEFAULT_BASELINE,
            claim_memo: DEFAULT_CLAIM_MEMO.to_string(),
            distribution_ceiling: DEFAULT_DISTRIBUTION_CEILING,
            max_chain_actions: DEFAULT_MAX_CHAIN_ACTIONS,
        }
    }
}

impl Config {
    /// Load config from the data directory
    ///
    /// A few values can be overridden from the environment (for CI/testing):
    /// USDD_LEDGER_ACCOUNT, USDD_TREASURY_ACCOUNT and USDD_BASELINE.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let settings_path = data_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content)
                .with_context(|| format!("Invalid settings file: {:?}", settings_path))?
        } else {
            SettingsFile::default()
        };

        let ledger = &raw.ledger;
        let ledger_account = std::env::var("USDD_LEDGER_ACCOUNT")
            .ok()
            .or_else(|| ledger.ledger_account.clone())
            .unwrap_or_else(|| DEFAULT_LEDGER_ACCOUNT.to_string());
        let treasury_account = std::env::var("USDD_TREASURY_ACCOUNT")
            .ok()
            .or_else(|| ledger.treasury_account.clone())
            .unwrap_or_else(|| DEFAULT_TREASURY_ACCOUNT.to_string());
        let baseline = match std::env::var("USDD_BASELINE").ok() {
            Some(value) => value
                .parse()
                .map_err(|_| Error::config(format!("USDD_BASELINE is not a number: {}", value)))?,
            None => ledger.baseline.unwrap_or(DEFAULT_BASELINE),
        };
        let symbol = ledger.symbol.as_deref().unwrap_or(DEFAULT_SYMBOL);

        let config = Self {
            ledger_account: Name::new(ledger_account).map_err(|e| Error::config(e.to_string()))?,
            treasury_account: Name::new(treasury_account)
                .map_err(|e| Error::config(e.to_string()))?,
            symbol: symbol.parse().map_err(|e: crate::domain::LedgerError| {
                Error::config(e.to_string())
            })?,
            baseline,
            claim_memo: ledger
                .claim_memo
                .clone()
                .unwrap_or_else(|| DEFAULT_CLAIM_MEMO.to_string()),
            distribution_ceiling: ledger
                .distribution_ceiling
                .unwrap_or(DEFAULT_DISTRIBUTION_CEILING),
            max_chain_actions: ledger.max_chain_actions.unwrap_or(DEFAULT_MAX_CHAIN_ACTIONS),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject combinations the ledger cannot run with
    pub fn validate(&self) -> std::result::Result<(), Error> {
        if self.ledger_account == self.treasury_account {
            return Err(Error::config(
                "treasury account must differ from the ledger account",
            ));
        }
        if self.baseline < 1 {
            return Err(Error::config("baseline must be at least 1"));
        }
        if self.distribution_ceiling < 1 {
            return Err(Error::config("distribution ceiling must be positive"));
        }
        if self.max_chain_actions == 0 {
            return Err(Error::config("max chain actions must be positive"));
        }
        Ok(())
    }
}
