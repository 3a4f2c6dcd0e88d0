//! Service layer - business logic orchestration
//!
//! The ledger engine (context, ledger, interest, claim, executor) works on
//! an in-memory `LedgerState`. The remaining services wire it to storage,
//! logging and reporting.

mod claim;
pub mod context;
pub mod executor;
pub mod interest;
pub mod ledger;
pub mod logging;
pub mod migration;
mod status;
mod token;

pub use context::{ActionContext, ActionOutput, Authority};
pub use executor::Executor;
pub use logging::{EntryPoint, LogEntry, LogEvent, LoggingService};
pub use migration::{MigrationResult, MigrationService};
pub use status::{HolderSummary, StatusService, StatusSummary, TokenSummary};
pub use token::TokenService;
