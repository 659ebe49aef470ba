//! Reporting service - read-only history and aggregate queries

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::adapters::duckdb::DuckDbRepository;
use crate::domain::result::{Error, Result};
use crate::domain::{Transaction, TransactionType};

/// A transaction paired with its owning account's number, for listings
/// that span accounts
#[derive(Debug, Clone, Serialize)]
pub struct LedgerEntry {
    pub account_number: String,
    pub transaction: Transaction,
}

/// Aggregate statistics over all active accounts
#[derive(Debug, Clone, Serialize)]
pub struct AccountStatistics {
    pub total_accounts: usize,
    pub total_balance: Decimal,
    pub savings_accounts: usize,
    pub checking_accounts: usize,
    pub business_accounts: usize,
    pub fixed_deposit_accounts: usize,
}

/// Overall database summary
#[derive(Debug, Clone, Serialize)]
pub struct StatusSummary {
    pub total_accounts: i64,
    pub total_transactions: i64,
    pub total_balance: Decimal,
    pub earliest_transaction: Option<String>,
    pub latest_transaction: Option<String>,
}

/// Reporting service for history and aggregates
pub struct ReportingService {
    repository: Arc<DuckDbRepository>,
}

impl ReportingService {
    pub fn new(repository: Arc<DuckDbRepository>) -> Self {
        Self { repository }
    }

    /// Transaction history for one account, newest first
    ///
    /// Date bounds are inclusive whole days: `from` starts at midnight,
    /// `to` ends just before the next midnight.
    pub fn history(
        &self,
        account_number: &str,
        limit: Option<i64>,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
    ) -> Result<Vec<Transaction>> {
        let from = from_date.map(start_of_day);
        let to = to_date.map(end_of_day);
        Ok(self
            .repository
            .transactions_for_account_number(account_number, from, to, limit)?)
    }

    /// All transactions across accounts, newest first
    pub fn all_transactions(&self, limit: Option<i64>) -> Result<Vec<LedgerEntry>> {
        let entries = self.repository.all_transactions(None, limit)?;
        Ok(entries.into_iter().map(into_ledger_entry).collect())
    }

    /// All transactions of one type, newest first
    pub fn transactions_by_type(
        &self,
        tx_type: TransactionType,
        limit: Option<i64>,
    ) -> Result<Vec<LedgerEntry>> {
        let entries = self.repository.all_transactions(Some(tx_type), limit)?;
        Ok(entries.into_iter().map(into_ledger_entry).collect())
    }

    /// Current balance of an active account
    pub fn account_balance(&self, account_number: &str) -> Result<Decimal> {
        let account = self
            .repository
            .get_account_by_number(account_number)?
            .ok_or(Error::AccountNotFound)?;
        Ok(account.balance)
    }

    /// Aggregate statistics, computed over the active account listing
    pub fn statistics(&self) -> Result<AccountStatistics> {
        let accounts = self.repository.list_accounts()?;

        let mut stats = AccountStatistics {
            total_accounts: accounts.len(),
            total_balance: Decimal::ZERO,
            savings_accounts: 0,
            checking_accounts: 0,
            business_accounts: 0,
            fixed_deposit_accounts: 0,
        };
        for account in &accounts {
            stats.total_balance += account.balance;
            match account.account_type {
                crate::domain::AccountType::Savings => stats.savings_accounts += 1,
                crate::domain::AccountType::Checking => stats.checking_accounts += 1,
                crate::domain::AccountType::Business => stats.business_accounts += 1,
                crate::domain::AccountType::FixedDeposit => stats.fixed_deposit_accounts += 1,
            }
        }
        Ok(stats)
    }

    /// Database-wide summary for the status command
    pub fn status(&self) -> Result<StatusSummary> {
        let accounts = self.repository.list_accounts()?;
        let total_balance = accounts.iter().map(|a| a.balance).sum();
        let (earliest, latest) = self.repository.transaction_date_range()?;

        Ok(StatusSummary {
            total_accounts: accounts.len() as i64,
            total_transactions: self.repository.transaction_count()?,
            total_balance,
            earliest_transaction: earliest.map(format_date),
            latest_transaction: latest.map(format_date),
        })
    }
}

fn into_ledger_entry((account_number, transaction): (String, Transaction)) -> LedgerEntry {
    LedgerEntry {
        account_number,
        transaction,
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    DateTime::from_naive_utc_and_offset(date.and_time(NaiveTime::MIN), Utc)
}

fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    let end = date
        .and_hms_micro_opt(23, 59, 59, 999_999)
        .unwrap_or_else(|| date.and_time(NaiveTime::MIN));
    DateTime::from_naive_utc_and_offset(end, Utc)
}

fn format_date(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d").to_string()
}
