//! Integration tests for bankline-core services
//!
//! These tests exercise the account directory, transaction engine and
//! reporting layer against a real DuckDB database in a temp directory.
//!
//! Run with: cargo test --test integration_tests -- --nocapture

use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use tempfile::TempDir;

use bankline_core::adapters::duckdb::{self, DuckDbRepository};
use bankline_core::services::{
    AccountService, ReportingService, SeedService, TransactionService,
};
use bankline_core::{
    Account, AccountProfile, AccountType, Error, Party, Transaction, TransactionType,
};

// ============================================================================
// Test Helpers
// ============================================================================

/// Create a test repository with schema initialized
fn create_test_repo(temp_dir: &TempDir) -> Arc<DuckDbRepository> {
    let db_path = temp_dir.path().join("test.duckdb");
    let repo = DuckDbRepository::new(&db_path).expect("Failed to create repository");
    repo.ensure_schema().expect("Failed to initialize schema");
    Arc::new(repo)
}

fn services(
    repo: &Arc<DuckDbRepository>,
) -> (AccountService, TransactionService, ReportingService) {
    (
        AccountService::new(Arc::clone(repo)),
        TransactionService::new(Arc::clone(repo)),
        ReportingService::new(Arc::clone(repo)),
    )
}

fn test_profile(name: &str) -> AccountProfile {
    AccountProfile {
        holder_name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        phone: "555-0100".to_string(),
        address: "1 Test Way, Testville".to_string(),
    }
}

/// Open a Checking account with the given balance (in cents) and PIN 1234
fn open_account(directory: &AccountService, name: &str, balance_cents: i64) -> Account {
    directory
        .create_account(
            test_profile(name),
            "1234",
            Decimal::new(balance_cents, 2),
            AccountType::Checking,
        )
        .expect("Failed to open account")
}

/// Replay an account's transaction records oldest-first and assert that
/// each `balance_after` snapshot moves by exactly `amount`, ending at the
/// account's current balance.
fn assert_balance_conserved(
    directory: &AccountService,
    reporting: &ReportingService,
    account_number: &str,
) {
    let account = directory.get_by_number(account_number).unwrap();
    let mut transactions = reporting
        .history(account_number, None, None, None)
        .unwrap();
    transactions.sort_by_key(|t| t.id);

    let mut running = Decimal::ZERO;
    for tx in &transactions {
        let delta = tx.balance_after - running;
        assert_eq!(
            delta.abs(),
            tx.amount,
            "record {} moved the balance by {} but carries amount {}",
            tx.transaction_number,
            delta,
            tx.amount
        );
        running = tx.balance_after;
    }
    assert_eq!(
        running, account.balance,
        "replayed records do not reach the current balance of {}",
        account_number
    );
}

// ============================================================================
// Account opening
// ============================================================================

#[test]
fn test_create_account_assigns_number_and_funds_it() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let (directory, _, reporting) = services(&repo);

    let account = open_account(&directory, "John Doe", 500_000);

    assert_eq!(account.account_number, "ACC001");
    assert_eq!(account.balance, Decimal::new(500_000, 2));
    assert!(account.is_active);

    // The opening balance is backed by exactly one Initial deposit record
    let history = reporting.history("ACC001", None, None, None).unwrap();
    assert_eq!(history.len(), 1);
    let funding = &history[0];
    assert_eq!(funding.tx_type, TransactionType::Deposit);
    assert_eq!(funding.amount, Decimal::new(500_000, 2));
    assert_eq!(funding.balance_after, Decimal::new(500_000, 2));
    assert_eq!(funding.description.as_deref(), Some("Initial deposit"));
}

#[test]
fn test_create_account_with_zero_balance_writes_no_record() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let (directory, _, reporting) = services(&repo);

    let account = open_account(&directory, "Jane Smith", 0);

    assert_eq!(account.balance, Decimal::ZERO);
    let history = reporting
        .history(&account.account_number, None, None, None)
        .unwrap();
    assert!(history.is_empty());
}

#[test]
fn test_create_account_rejects_bad_input() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let (directory, _, _) = services(&repo);

    let mut profile = test_profile("Bad Email");
    profile.email = "nope".to_string();
    let err = directory
        .create_account(profile, "1234", Decimal::ZERO, AccountType::Savings)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidProfile(_)));

    let err = directory
        .create_account(test_profile("Bad Pin"), "12", Decimal::ZERO, AccountType::Savings)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidProfile(_)));
    assert_eq!(err.to_string(), "PIN must be exactly 4 digits.");

    let err = directory
        .create_account(
            test_profile("Negative"),
            "1234",
            Decimal::new(-100, 2),
            AccountType::Savings,
        )
        .unwrap_err();
    assert!(matches!(err, Error::InvalidProfile(_)));

    // Nothing was persisted
    assert_eq!(repo.account_count().unwrap(), 0);
}

// ============================================================================
// Deposit / Withdraw
// ============================================================================

#[test]
fn test_deposit_increases_balance_and_records_transaction() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let (directory, engine, reporting) = services(&repo);

    let account = open_account(&directory, "John Doe", 500_000);

    let receipt = engine
        .deposit(&account.account_number, Decimal::new(10_000, 2), None)
        .unwrap();

    assert_eq!(receipt.new_balance, Decimal::new(510_000, 2));
    assert_eq!(receipt.transaction.tx_type, TransactionType::Deposit);
    assert_eq!(receipt.transaction.amount, Decimal::new(10_000, 2));
    assert_eq!(receipt.transaction.balance_after, Decimal::new(510_000, 2));
    assert_eq!(receipt.transaction.description.as_deref(), Some("Cash deposit"));

    let refreshed = directory.get_by_number(&account.account_number).unwrap();
    assert_eq!(refreshed.balance, Decimal::new(510_000, 2));
    assert_eq!(
        reporting
            .history(&account.account_number, None, None, None)
            .unwrap()
            .len(),
        2
    );
}

#[test]
fn test_deposit_rejects_non_positive_amounts() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let (directory, engine, _) = services(&repo);

    let account = open_account(&directory, "John Doe", 500_000);

    for amount in [Decimal::ZERO, Decimal::new(-500, 2)] {
        let err = engine
            .deposit(&account.account_number, amount, None)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidAmount { .. }));
        assert_eq!(err.to_string(), "Deposit amount must be greater than zero.");
    }

    // Balance and record count untouched
    let refreshed = directory.get_by_number(&account.account_number).unwrap();
    assert_eq!(refreshed.balance, Decimal::new(500_000, 2));
    assert_eq!(repo.transaction_count().unwrap(), 1);
}

#[test]
fn test_deposit_to_unknown_account_fails() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let (_, engine, _) = services(&repo);

    let err = engine
        .deposit("ACC999", Decimal::new(100, 2), None)
        .unwrap_err();
    assert!(matches!(err, Error::AccountNotFound));
    assert_eq!(repo.transaction_count().unwrap(), 0);
}

#[test]
fn test_withdraw_happy_path() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let (directory, engine, _) = services(&repo);

    let account = open_account(&directory, "John Doe", 20_000);
    let receipt = engine
        .withdraw(&account.account_number, Decimal::new(5_000, 2), None)
        .unwrap();

    assert_eq!(receipt.new_balance, Decimal::new(15_000, 2));
    assert_eq!(receipt.transaction.tx_type, TransactionType::Withdrawal);
    assert_eq!(
        receipt.transaction.description.as_deref(),
        Some("Cash withdrawal")
    );
}

#[test]
fn test_withdraw_insufficient_funds_leaves_state_unchanged() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let (directory, engine, reporting) = services(&repo);

    let account = open_account(&directory, "John Doe", 20_000);
    let before = reporting
        .history(&account.account_number, None, None, None)
        .unwrap()
        .len();

    let err = engine
        .withdraw(&account.account_number, Decimal::new(25_000, 2), None)
        .unwrap_err();
    assert!(matches!(err, Error::InsufficientFunds));
    assert_eq!(err.to_string(), "Insufficient funds.");

    let refreshed = directory.get_by_number(&account.account_number).unwrap();
    assert_eq!(refreshed.balance, Decimal::new(20_000, 2));
    assert_eq!(
        reporting
            .history(&account.account_number, None, None, None)
            .unwrap()
            .len(),
        before
    );
}

// ============================================================================
// Transfer
// ============================================================================

#[test]
fn test_transfer_moves_funds_and_cross_references() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let (directory, engine, reporting) = services(&repo);

    let from = open_account(&directory, "John Doe", 20_000);
    let to = open_account(&directory, "Jane Smith", 1_000);
    let records_before = repo.transaction_count().unwrap();

    let receipt = engine
        .transfer(
            &from.account_number,
            &to.account_number,
            Decimal::new(5_000, 2),
            None,
        )
        .unwrap();

    // Balances moved symmetrically
    assert_eq!(
        directory.get_by_number(&from.account_number).unwrap().balance,
        Decimal::new(15_000, 2)
    );
    assert_eq!(
        directory.get_by_number(&to.account_number).unwrap().balance,
        Decimal::new(6_000, 2)
    );

    // Exactly two new records, one per account, cross-referencing
    assert_eq!(repo.transaction_count().unwrap(), records_before + 2);
    assert_eq!(receipt.debit.tx_type, TransactionType::Transfer);
    assert_eq!(receipt.credit.tx_type, TransactionType::Transfer);
    assert_eq!(receipt.debit.amount, Decimal::new(5_000, 2));
    assert_eq!(receipt.credit.amount, Decimal::new(5_000, 2));
    assert_eq!(receipt.debit.balance_after, Decimal::new(15_000, 2));
    assert_eq!(receipt.credit.balance_after, Decimal::new(6_000, 2));
    assert_eq!(
        receipt.debit.to_account_number.as_deref(),
        Some(to.account_number.as_str())
    );
    assert_eq!(
        receipt.credit.to_account_number.as_deref(),
        Some(from.account_number.as_str())
    );
    assert_eq!(
        receipt.debit.description.as_deref(),
        Some("Transfer to Jane Smith")
    );
    assert_eq!(
        receipt.credit.description.as_deref(),
        Some("Transfer from John Doe")
    );
}

#[test]
fn test_transfer_to_same_account_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let (directory, engine, _) = services(&repo);

    let account = open_account(&directory, "John Doe", 20_000);
    let records_before = repo.transaction_count().unwrap();

    let err = engine
        .transfer(
            &account.account_number,
            &account.account_number,
            Decimal::new(1_000, 2),
            None,
        )
        .unwrap_err();
    assert!(matches!(err, Error::SameAccount));

    assert_eq!(repo.transaction_count().unwrap(), records_before);
    assert_eq!(
        directory.get_by_number(&account.account_number).unwrap().balance,
        Decimal::new(20_000, 2)
    );
}

#[test]
fn test_transfer_distinguishes_missing_side() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let (directory, engine, _) = services(&repo);

    let account = open_account(&directory, "John Doe", 20_000);

    let err = engine
        .transfer("ACC999", &account.account_number, Decimal::new(100, 2), None)
        .unwrap_err();
    assert!(matches!(
        err,
        Error::TransferAccountNotFound { side: Party::Source }
    ));
    assert_eq!(err.to_string(), "Source account not found or inactive.");

    let err = engine
        .transfer(&account.account_number, "ACC999", Decimal::new(100, 2), None)
        .unwrap_err();
    assert!(matches!(
        err,
        Error::TransferAccountNotFound { side: Party::Destination }
    ));
    assert_eq!(err.to_string(), "Destination account not found or inactive.");

    // No partial mutation
    assert_eq!(
        directory.get_by_number(&account.account_number).unwrap().balance,
        Decimal::new(20_000, 2)
    );
}

#[test]
fn test_transfer_to_deactivated_account_fails_without_partial_mutation() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let (directory, engine, _) = services(&repo);

    let from = open_account(&directory, "John Doe", 20_000);
    let to = open_account(&directory, "Jane Smith", 1_000);
    directory.deactivate(&to.account_number).unwrap();
    let records_before = repo.transaction_count().unwrap();

    let err = engine
        .transfer(
            &from.account_number,
            &to.account_number,
            Decimal::new(5_000, 2),
            None,
        )
        .unwrap_err();
    assert!(matches!(
        err,
        Error::TransferAccountNotFound { side: Party::Destination }
    ));

    assert_eq!(
        directory.get_by_number(&from.account_number).unwrap().balance,
        Decimal::new(20_000, 2)
    );
    assert_eq!(repo.transaction_count().unwrap(), records_before);
}

#[test]
fn test_transfer_insufficient_source_funds() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let (directory, engine, _) = services(&repo);

    let from = open_account(&directory, "John Doe", 1_000);
    let to = open_account(&directory, "Jane Smith", 1_000);

    let err = engine
        .transfer(
            &from.account_number,
            &to.account_number,
            Decimal::new(5_000, 2),
            None,
        )
        .unwrap_err();
    assert!(matches!(err, Error::InsufficientSourceFunds));

    assert_eq!(
        directory.get_by_number(&from.account_number).unwrap().balance,
        Decimal::new(1_000, 2)
    );
    assert_eq!(
        directory.get_by_number(&to.account_number).unwrap().balance,
        Decimal::new(1_000, 2)
    );
}

/// A failure injected between the balance mutations of a unit of work must
/// roll back every write in it.
#[test]
fn test_unit_of_work_rolls_back_on_midflight_failure() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let (directory, _, _) = services(&repo);

    let account = open_account(&directory, "John Doe", 20_000);
    let records_before = repo.transaction_count().unwrap();

    let result: Result<(), Error> = repo.in_transaction(|conn| {
        // First half of a would-be transfer: debit the balance and write
        // its audit record...
        duckdb::update_balance(conn, account.id, Decimal::new(15_000, 2))?;
        let tx_id = duckdb::next_transaction_id(conn)?;
        duckdb::insert_transaction(
            conn,
            &Transaction {
                id: tx_id,
                transaction_number: bankline_core::ids::transaction_number(tx_id),
                account_id: account.id,
                tx_type: TransactionType::Transfer,
                amount: Decimal::new(5_000, 2),
                balance_after: Decimal::new(15_000, 2),
                description: Some("half a transfer".to_string()),
                to_account_number: Some("ACC999".to_string()),
                transaction_date: Utc::now(),
            },
        )?;
        // ...then fail before the credit side happens
        Err(Error::TransferFailed)
    });
    assert!(matches!(result, Err(Error::TransferFailed)));

    // Neither the balance change nor the orphan record survived
    assert_eq!(
        directory.get_by_number(&account.account_number).unwrap().balance,
        Decimal::new(20_000, 2)
    );
    assert_eq!(repo.transaction_count().unwrap(), records_before);
}

// ============================================================================
// Identifiers
// ============================================================================

#[test]
fn test_identifiers_are_unique_and_monotonic() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let (directory, engine, reporting) = services(&repo);

    let a = open_account(&directory, "John Doe", 10_000);
    let b = open_account(&directory, "Jane Smith", 10_000);
    let c = open_account(&directory, "Bob Johnson", 0);

    let account_suffixes: Vec<i64> = [&a, &b, &c]
        .iter()
        .map(|acct| bankline_core::ids::numeric_suffix(&acct.account_number).unwrap())
        .collect();
    assert!(account_suffixes.windows(2).all(|w| w[0] < w[1]));

    engine.deposit(&a.account_number, Decimal::new(500, 2), None).unwrap();
    engine.withdraw(&b.account_number, Decimal::new(500, 2), None).unwrap();
    engine
        .transfer(&a.account_number, &c.account_number, Decimal::new(250, 2), None)
        .unwrap();

    let mut entries = reporting.all_transactions(None).unwrap();
    entries.sort_by_key(|e| e.transaction.id);

    let numbers: Vec<String> = entries
        .iter()
        .map(|e| e.transaction.transaction_number.clone())
        .collect();
    let mut deduped = numbers.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), numbers.len(), "transaction numbers must be unique");

    let suffixes: Vec<i64> = entries
        .iter()
        .map(|e| bankline_core::ids::numeric_suffix(&e.transaction.transaction_number).unwrap())
        .collect();
    assert!(
        suffixes.windows(2).all(|w| w[0] < w[1]),
        "transaction numbers must increase with creation order"
    );
}

// ============================================================================
// Authentication
// ============================================================================

#[test]
fn test_authentication_failures_are_indistinguishable() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let (directory, _, _) = services(&repo);

    let account = open_account(&directory, "John Doe", 10_000);

    let wrong_pin = directory
        .authenticate(&account.account_number, "0000")
        .unwrap_err();
    let unknown_account = directory.authenticate("ACC999", "1234").unwrap_err();

    assert!(matches!(wrong_pin, Error::InvalidCredentials));
    assert!(matches!(unknown_account, Error::InvalidCredentials));
    assert_eq!(wrong_pin.to_string(), unknown_account.to_string());

    let authed = directory.authenticate(&account.account_number, "1234").unwrap();
    assert_eq!(authed.account_number, account.account_number);
}

#[test]
fn test_deactivated_account_cannot_authenticate_or_move_money() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let (directory, engine, _) = services(&repo);

    let account = open_account(&directory, "John Doe", 10_000);

    assert!(directory.deactivate(&account.account_number).unwrap());
    // Second close finds nothing active
    assert!(!directory.deactivate(&account.account_number).unwrap());

    assert!(matches!(
        directory.authenticate(&account.account_number, "1234"),
        Err(Error::InvalidCredentials)
    ));
    assert!(matches!(
        engine.deposit(&account.account_number, Decimal::new(100, 2), None),
        Err(Error::AccountNotFound)
    ));
    assert!(directory.list_all().unwrap().is_empty());
    assert!(directory.search("John").unwrap().is_empty());
}

// ============================================================================
// Profile updates
// ============================================================================

#[test]
fn test_update_profile_changes_fields_but_not_balance_or_number() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let (directory, _, _) = services(&repo);

    let account = open_account(&directory, "John Doe", 10_000);

    let updated = directory
        .update_profile(
            &account.account_number,
            AccountProfile {
                holder_name: "John Q. Doe".to_string(),
                email: "jqd@example.com".to_string(),
                phone: "555-0199".to_string(),
                address: "2 Other Road".to_string(),
            },
            Some("4321"),
        )
        .unwrap();

    assert_eq!(updated.holder_name, "John Q. Doe");
    assert_eq!(updated.account_number, account.account_number);
    assert_eq!(updated.balance, account.balance);

    // New PIN works, old one no longer does
    assert!(directory.authenticate(&account.account_number, "4321").is_ok());
    assert!(matches!(
        directory.authenticate(&account.account_number, "1234"),
        Err(Error::InvalidCredentials)
    ));
}

// ============================================================================
// Balance conservation
// ============================================================================

#[test]
fn test_balance_equals_replayed_transaction_history() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let (directory, engine, reporting) = services(&repo);

    let a = open_account(&directory, "John Doe", 50_000);
    let b = open_account(&directory, "Jane Smith", 5_000);

    engine.deposit(&a.account_number, Decimal::new(12_345, 2), None).unwrap();
    engine.withdraw(&a.account_number, Decimal::new(2_345, 2), None).unwrap();
    engine
        .transfer(&a.account_number, &b.account_number, Decimal::new(10_000, 2), None)
        .unwrap();
    engine
        .transfer(&b.account_number, &a.account_number, Decimal::new(2_500, 2), None)
        .unwrap();

    assert_balance_conserved(&directory, &reporting, &a.account_number);
    assert_balance_conserved(&directory, &reporting, &b.account_number);
}

// ============================================================================
// Reporting
// ============================================================================

#[test]
fn test_history_is_newest_first_and_honors_limit() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let (directory, engine, reporting) = services(&repo);

    let account = open_account(&directory, "John Doe", 10_000);
    for cents in [100, 200, 300] {
        engine
            .deposit(&account.account_number, Decimal::new(cents, 2), None)
            .unwrap();
    }

    let all = reporting
        .history(&account.account_number, None, None, None)
        .unwrap();
    assert_eq!(all.len(), 4);
    assert!(all.windows(2).all(|w| w[0].id > w[1].id), "newest first");

    let capped = reporting
        .history(&account.account_number, Some(2), None, None)
        .unwrap();
    assert_eq!(capped.len(), 2);
    // The newest two
    assert_eq!(capped[0].id, all[0].id);
    assert_eq!(capped[1].id, all[1].id);
}

#[test]
fn test_history_date_bounds() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let (directory, engine, reporting) = services(&repo);

    let account = open_account(&directory, "John Doe", 10_000);
    engine
        .deposit(&account.account_number, Decimal::new(100, 2), None)
        .unwrap();

    let today = Utc::now().date_naive();
    let yesterday = today - Duration::days(1);
    let tomorrow = today + Duration::days(1);

    let in_range = reporting
        .history(&account.account_number, None, Some(yesterday), Some(tomorrow))
        .unwrap();
    assert_eq!(in_range.len(), 2);

    let future_only = reporting
        .history(&account.account_number, None, Some(tomorrow), None)
        .unwrap();
    assert!(future_only.is_empty());

    let past_only = reporting
        .history(&account.account_number, None, None, Some(yesterday))
        .unwrap();
    assert!(past_only.is_empty());
}

#[test]
fn test_transactions_by_type_filters() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let (directory, engine, reporting) = services(&repo);

    let a = open_account(&directory, "John Doe", 10_000);
    let b = open_account(&directory, "Jane Smith", 0);
    engine.withdraw(&a.account_number, Decimal::new(500, 2), None).unwrap();
    engine
        .transfer(&a.account_number, &b.account_number, Decimal::new(250, 2), None)
        .unwrap();

    let withdrawals = reporting
        .transactions_by_type(TransactionType::Withdrawal, None)
        .unwrap();
    assert_eq!(withdrawals.len(), 1);

    let transfers = reporting
        .transactions_by_type(TransactionType::Transfer, None)
        .unwrap();
    assert_eq!(transfers.len(), 2);

    let interest = reporting
        .transactions_by_type(TransactionType::InterestCredit, None)
        .unwrap();
    assert!(interest.is_empty());

    // 1 funding deposit + 1 withdrawal + 2 transfer legs
    let everything = reporting.all_transactions(None).unwrap();
    assert_eq!(everything.len(), 4);
}

#[test]
fn test_statistics_cover_active_accounts_only() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let (directory, _, reporting) = services(&repo);

    directory
        .create_account(test_profile("Sally Savings"), "1234", Decimal::new(100_00, 2), AccountType::Savings)
        .unwrap();
    directory
        .create_account(test_profile("Carl Checking"), "1234", Decimal::new(200_00, 2), AccountType::Checking)
        .unwrap();
    let closed = directory
        .create_account(test_profile("Gone Business"), "1234", Decimal::new(300_00, 2), AccountType::Business)
        .unwrap();
    directory.deactivate(&closed.account_number).unwrap();

    let stats = reporting.statistics().unwrap();
    assert_eq!(stats.total_accounts, 2);
    assert_eq!(stats.total_balance, Decimal::new(300_00, 2));
    assert_eq!(stats.savings_accounts, 1);
    assert_eq!(stats.checking_accounts, 1);
    assert_eq!(stats.business_accounts, 0);
    assert_eq!(stats.fixed_deposit_accounts, 0);
}

#[test]
fn test_account_balance_requires_active_account() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let (directory, _, reporting) = services(&repo);

    let account = open_account(&directory, "John Doe", 12_300);
    assert_eq!(
        reporting.account_balance(&account.account_number).unwrap(),
        Decimal::new(12_300, 2)
    );

    directory.deactivate(&account.account_number).unwrap();
    assert!(matches!(
        reporting.account_balance(&account.account_number),
        Err(Error::AccountNotFound)
    ));
}

// ============================================================================
// Seeding
// ============================================================================

#[test]
fn test_seed_creates_consistent_demo_data() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let (directory, _, reporting) = services(&repo);
    let seeder = SeedService::new(Arc::clone(&repo));

    let result = seeder.seed(false).unwrap();
    assert_eq!(result.accounts_created, 3);
    assert_eq!(
        result.account_numbers,
        vec!["ACC001", "ACC002", "ACC003"]
    );

    // Every seeded balance is backed by records
    for number in &result.account_numbers {
        assert_balance_conserved(&directory, &reporting, number);
    }

    // Demo PINs authenticate
    assert!(directory.authenticate("ACC001", "1234").is_ok());
    assert!(directory.authenticate("ACC002", "5678").is_ok());

    // Refuses to reseed without force
    assert!(seeder.seed(false).is_err());

    // Force wipes and reseeds; sequences keep advancing so numbers differ
    let reseeded = seeder.seed(true).unwrap();
    assert_eq!(reseeded.accounts_created, 3);
    assert_ne!(reseeded.account_numbers[0], "ACC001");
}
