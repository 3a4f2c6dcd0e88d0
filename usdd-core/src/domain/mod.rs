//! Core domain entities
//!
//! Pure data structures with validation logic - no I/O or external
//! dependencies.

mod action;
mod asset;
mod name;
mod records;
pub mod result;
mod state;
mod symbol;

pub use action::{
    Action, DistributionMode, DistributionReport, ExecutedAction, ForwardedAction, Receipt, Share,
};
pub use asset::{Asset, MAX_AMOUNT};
pub use name::Name;
pub use records::{Holding, SupplyRecord};
pub use result::{LedgerError, LedgerResult};
pub use state::LedgerState;
pub use symbol::Symbol;
