//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic over the repository. Each service
//! focuses on one feature area; all terminal I/O stays in the CLI crate.

mod accounts;
mod reporting;
mod seed;
mod transactions;
pub mod migration;
pub mod usage_log;

pub use accounts::AccountService;
pub use migration::{MigrationResult, MigrationService};
pub use reporting::{AccountStatistics, LedgerEntry, ReportingService, StatusSummary};
pub use seed::{SeedResult, SeedService, DEMO_PINS};
pub use transactions::{TransactionService, TransferReceipt, TxReceipt};
pub use usage_log::{UsageEvent, UsageLogService};
