//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - DuckDB for the LedgerRepository port
//! - Explicit signer and identity sets for Authorizer / AccountDirectory
//! - An fs2 file lock serializing call chains on one data directory

pub mod duckdb;
pub mod lock;
pub mod signers;
