//! Repository port - ledger persistence abstraction

use anyhow::Result;

use crate::domain::{LedgerState, Name};

/// Persistent storage for the ledger stores and the identity directory
///
/// `save_state` must replace the stored state atomically: readers see
/// either the old state or the new one, never a mix.
pub trait LedgerRepository: Send + Sync {
    // === Schema ===

    /// Run any pending migrations
    fn ensure_schema(&self) -> Result<()>;

    // === Ledger stores ===

    /// Load the symbol registry and balance store
    fn load_state(&self) -> Result<LedgerState>;

    /// Replace the symbol registry and balance store
    fn save_state(&self, state: &LedgerState) -> Result<()>;

    // === Identities ===

    /// All registered identities, ordered by name
    fn get_identities(&self) -> Result<Vec<Name>>;

    /// Register an identity; returns false if it already existed
    fn add_identity(&self, name: &Name) -> Result<bool>;
}
