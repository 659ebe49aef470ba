//! CLI command implementations

pub mod admin;
pub mod history;
pub mod money;
pub mod open;
pub mod profile;
pub mod seed;
pub mod status;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use dialoguer::Password;

use bankline_core::services::UsageLogService;
use bankline_core::{Account, BankContext};

/// Get the bankline data directory from environment or default
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("BANKLINE_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .expect("Could not find home directory")
            .join(".bankline")
    }
}

/// Get or create the bankline context
pub fn get_context() -> Result<BankContext> {
    BankContext::new(&get_data_dir()).context("Failed to initialize bankline context")
}

/// Get the usage logger
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<UsageLogService> {
    let data_dir = get_data_dir();
    std::fs::create_dir_all(&data_dir).ok()?;
    UsageLogService::new(&data_dir, env!("CARGO_PKG_VERSION")).ok()
}

/// Prompt for the PIN and authenticate the account
///
/// The failure message never reveals whether the account number or the PIN
/// was wrong.
pub fn authenticate(ctx: &BankContext, account_number: &str) -> Result<Account> {
    let pin = Password::new().with_prompt("PIN").interact()?;
    ctx.accounts
        .authenticate(account_number, &pin)
        .map_err(|e| anyhow!("{}", e))
}
