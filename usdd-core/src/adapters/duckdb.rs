//! DuckDB repository implementation

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use duckdb::{params, Connection};

use crate::domain::{Asset, Holding, LedgerState, Name, SupplyRecord, Symbol};
use crate::ports::LedgerRepository;
use crate::services::{MigrationResult, MigrationService};

/// Maximum number of retries when database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400, 800ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows error messages
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS error messages
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
}

/// Raw sys_holdings row before names and symbols are validated
type HoldingRow = (String, String, i32, i64, i64);

/// Raw sys_stats row
type StatRow = (String, i32, i64, i64, String);

/// DuckDB-backed ledger stores and identity directory
pub struct DuckDbRepository {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl DuckDbRepository {
    /// Open (or create) the ledger database at `db_path`
    ///
    /// Retries with exponential backoff when the file is held by another
    /// process, which happens when two CLI invocations start together.
    pub fn new(db_path: &Path) -> Result<Self> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match Self::try_open_connection(db_path) {
                Ok(conn) => {
                    return Ok(Self {
                        conn: Mutex::new(conn),
                        db_path: db_path.to_path_buf(),
                    });
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        eprintln!(
                            "[usdd] Database busy, retrying in {}ms (attempt {}/{}): {}",
                            delay.as_millis(),
                            attempt + 1,
                            MAX_RETRIES,
                            err_msg
                        );
                        thread::sleep(delay);
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| anyhow!("Failed to open database after {} retries", MAX_RETRIES)))
    }

    fn try_open_connection(db_path: &Path) -> Result<Connection> {
        // Extension autoloading stays off; nothing here needs an extension
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        Ok(Connection::open_with_flags(db_path, config)?)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| anyhow!("Lock poisoned: {}", e))
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Run database migrations using the MigrationService
    pub fn run_migrations(&self) -> Result<MigrationResult> {
        let conn = self.conn()?;
        MigrationService::new(&conn).run_pending()
    }

    pub fn table_exists(&self, table_name: &str) -> Result<bool> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM information_schema.tables
             WHERE table_schema = 'main' AND table_name = ?",
            [table_name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn read_stats(conn: &Connection) -> Result<Vec<StatRow>> {
        let mut stmt = conn.prepare(
            "SELECT symbol_code, symbol_precision, supply, max_supply, issuer
             FROM sys_stats ORDER BY symbol_code",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
            })?
            .collect::<std::result::Result<Vec<StatRow>, _>>()?;
        Ok(rows)
    }

    fn read_holdings(conn: &Connection) -> Result<Vec<HoldingRow>> {
        let mut stmt = conn.prepare(
            "SELECT owner, symbol_code, symbol_precision, balance, interest
             FROM sys_holdings ORDER BY symbol_code, owner",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
            })?
            .collect::<std::result::Result<Vec<HoldingRow>, _>>()?;
        Ok(rows)
    }
}

impl LedgerRepository for DuckDbRepository {
    fn ensure_schema(&self) -> Result<()> {
        self.run_migrations()?;
        Ok(())
    }

    fn load_state(&self) -> Result<LedgerState> {
        let conn = self.conn()?;
        let mut state = LedgerState::new();

        for (code, precision, supply, max_supply, issuer) in Self::read_stats(&conn)? {
            let symbol = stored_symbol(precision, &code)?;
            state.insert_stat(SupplyRecord {
                supply: Asset::new(supply, symbol.clone()),
                max_supply: Asset::new(max_supply, symbol),
                issuer: stored_name(&issuer)?,
            });
        }

        for (owner, code, precision, balance, interest) in Self::read_holdings(&conn)? {
            let symbol = stored_symbol(precision, &code)?;
            state.insert_holding(Holding {
                owner: stored_name(&owner)?,
                balance: Asset::new(balance, symbol.clone()),
                interest: Asset::new(interest, symbol),
            });
        }

        Ok(state)
    }

    fn save_state(&self, state: &LedgerState) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM sys_stats", [])?;
        tx.execute("DELETE FROM sys_holdings", [])?;

        for record in state.stats() {
            let symbol = &record.supply.symbol;
            tx.execute(
                "INSERT INTO sys_stats (symbol_code, symbol_precision, supply, max_supply, issuer)
                 VALUES (?, ?, ?, ?, ?)",
                params![
                    symbol.code(),
                    i32::from(symbol.precision()),
                    record.supply.amount,
                    record.max_supply.amount,
                    record.issuer.as_str(),
                ],
            )?;
        }

        for holding in state.holdings() {
            let symbol = &holding.balance.symbol;
            tx.execute(
                "INSERT INTO sys_holdings (owner, symbol_code, symbol_precision, balance, interest)
                 VALUES (?, ?, ?, ?, ?)",
                params![
                    holding.owner.as_str(),
                    symbol.code(),
                    i32::from(symbol.precision()),
                    holding.balance.amount,
                    holding.interest.amount,
                ],
            )?;
        }

        tx.commit().context("Failed to commit ledger state")?;
        Ok(())
    }

    fn get_identities(&self) -> Result<Vec<Name>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT name FROM sys_identities ORDER BY name")?;
        let raw = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        raw.iter().map(|n| stored_name(n)).collect()
    }

    fn add_identity(&self, name: &Name) -> Result<bool> {
        let conn = self.conn()?;
        let exists: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sys_identities WHERE name = ?",
            [name.as_str()],
            |row| row.get(0),
        )?;
        if exists > 0 {
            return Ok(false);
        }
        conn.execute("INSERT INTO sys_identities (name) VALUES (?)", [name.as_str()])?;
        Ok(true)
    }
}

fn stored_symbol(precision: i32, code: &str) -> Result<Symbol> {
    let precision = u8::try_from(precision)
        .map_err(|_| anyhow!("Stored precision {} out of range for {}", precision, code))?;
    let symbol = Symbol::new(precision, code);
    if !symbol.is_valid() {
        return Err(anyhow!("Stored symbol {} is invalid", symbol));
    }
    Ok(symbol)
}

fn stored_name(raw: &str) -> Result<Name> {
    Name::new(raw).map_err(|e| anyhow!("Stored identity is invalid: {}", e))
}
