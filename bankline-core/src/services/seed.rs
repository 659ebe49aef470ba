//! Seed service - demo data
//!
//! Seeds the three demo customers through the regular account-opening
//! path, so every seeded balance is backed by an "Initial deposit"
//! transaction record and PIN hashing stays inside the account directory.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::adapters::duckdb::DuckDbRepository;
use crate::domain::{AccountProfile, AccountType};
use crate::services::AccountService;

/// Demo PINs, printed after seeding so the data is actually usable
pub const DEMO_PINS: [&str; 3] = ["1234", "5678", "9876"];

struct DemoAccount {
    profile: AccountProfile,
    pin: &'static str,
    account_type: AccountType,
    /// Opening balance in cents
    balance_cents: i64,
}

fn demo_accounts() -> Vec<DemoAccount> {
    vec![
        DemoAccount {
            profile: AccountProfile {
                holder_name: "John Doe".to_string(),
                email: "john.doe@email.com".to_string(),
                phone: "555-0101".to_string(),
                address: "123 Main St, City, State 12345".to_string(),
            },
            pin: DEMO_PINS[0],
            account_type: AccountType::Savings,
            balance_cents: 500_000, // $5,000.00
        },
        DemoAccount {
            profile: AccountProfile {
                holder_name: "Jane Smith".to_string(),
                email: "jane.smith@email.com".to_string(),
                phone: "555-0102".to_string(),
                address: "456 Oak Ave, City, State 12345".to_string(),
            },
            pin: DEMO_PINS[1],
            account_type: AccountType::Checking,
            balance_cents: 250_050, // $2,500.50
        },
        DemoAccount {
            profile: AccountProfile {
                holder_name: "Bob Johnson".to_string(),
                email: "bob.johnson@email.com".to_string(),
                phone: "555-0103".to_string(),
                address: "789 Pine Rd, City, State 12345".to_string(),
            },
            pin: DEMO_PINS[2],
            account_type: AccountType::Business,
            balance_cents: 1_000_000, // $10,000.00
        },
    ]
}

/// Result of a seed run
#[derive(Debug, Serialize)]
pub struct SeedResult {
    pub accounts_created: usize,
    pub account_numbers: Vec<String>,
}

/// Demo data seeding
pub struct SeedService {
    repository: Arc<DuckDbRepository>,
    directory: AccountService,
}

impl SeedService {
    pub fn new(repository: Arc<DuckDbRepository>) -> Self {
        let directory = AccountService::new(Arc::clone(&repository));
        Self {
            repository,
            directory,
        }
    }

    /// Seed demo accounts
    ///
    /// Refuses to touch a database that already has accounts unless
    /// `force` is set, in which case all existing data is wiped first.
    pub fn seed(&self, force: bool) -> Result<SeedResult> {
        if self.repository.account_count()? > 0 {
            if !force {
                bail!("Database already contains accounts. Use --force to wipe and reseed.");
            }
            self.repository.clear_all_data()?;
        }

        let mut account_numbers = Vec::new();
        for demo in demo_accounts() {
            let holder = demo.profile.holder_name.clone();
            let account = self
                .directory
                .create_account(
                    demo.profile,
                    demo.pin,
                    Decimal::new(demo.balance_cents, 2),
                    demo.account_type,
                )
                .with_context(|| format!("Failed to seed account for {}", holder))?;
            account_numbers.push(account.account_number);
        }

        Ok(SeedResult {
            accounts_created: account_numbers.len(),
            account_numbers,
        })
    }
}
