//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external collaborators. The ledger
//! services depend only on these traits, not on concrete implementations.

mod authority;
mod repository;

pub use authority::{AccountDirectory, Authorizer};
pub use repository::LedgerRepository;
