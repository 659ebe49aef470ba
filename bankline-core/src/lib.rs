//! Bankline Core - business logic for the bank account console
//!
//! This crate implements the core domain logic following hexagonal
//! architecture:
//!
//! - **domain**: Core business entities (Account, Transaction) and the
//!   error taxonomy
//! - **services**: Business logic orchestration (directory, engine,
//!   reporting, seeding)
//! - **adapters**: Concrete persistence (DuckDB)
//! - **auth**: Opaque PIN hashing capability
//!
//! There is no ambient "current account" anywhere in this crate - every
//! operation takes the account number it acts on, so the core can sit
//! behind any front end.

pub mod adapters;
pub mod auth;
pub mod config;
pub mod domain;
pub mod ids;
pub mod migrations;
pub mod services;

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use fs2::FileExt;

use adapters::duckdb::DuckDbRepository;
use config::Config;
use services::{AccountService, ReportingService, SeedService, TransactionService};

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult, Party, Summarize};
pub use domain::{Account, AccountProfile, AccountType, Transaction, TransactionType};

/// Main context for Bankline operations
///
/// This is the primary entry point for all business logic. It holds the
/// database connection, configuration, and all services. Creating the
/// context takes an exclusive lock on the data directory: the core assumes
/// serialized access, and the lock turns a second process into a clean
/// startup error instead of a data race.
pub struct BankContext {
    pub config: Config,
    pub repository: Arc<DuckDbRepository>,
    pub accounts: AccountService,
    pub transactions: TransactionService,
    pub reporting: ReportingService,
    pub seed: SeedService,
    /// Held for the lifetime of the context; dropping it releases the
    /// data-directory lock
    _dir_lock: File,
}

impl BankContext {
    /// Create a new Bankline context rooted at the given data directory
    pub fn new(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

        let dir_lock = File::create(data_dir.join(".lock"))
            .with_context(|| format!("Failed to create lock file in {:?}", data_dir))?;
        dir_lock.try_lock_exclusive().with_context(|| {
            format!(
                "Another bankline process is using {:?}; close it and retry",
                data_dir
            )
        })?;

        let config = Config::load(data_dir)?;

        let db_path = data_dir.join("bankline.duckdb");
        let repository = Arc::new(DuckDbRepository::new(&db_path)?);

        // Initialize schema
        repository.ensure_schema()?;

        // Create services
        let accounts = AccountService::new(Arc::clone(&repository));
        let transactions = TransactionService::new(Arc::clone(&repository));
        let reporting = ReportingService::new(Arc::clone(&repository));
        let seed = SeedService::new(Arc::clone(&repository));

        Ok(Self {
            config,
            repository,
            accounts,
            transactions,
            reporting,
            seed,
            _dir_lock: dir_lock,
        })
    }
}
