//! Transaction service - the money-movement engine
//!
//! Deposit, withdrawal and transfer. Every balance mutation commits in the
//! same unit of work as its audit record; a transfer additionally couples
//! both legs, so either both accounts move or neither does.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::adapters::duckdb::{self, DuckDbRepository};
use crate::domain::result::{Error, Party, Result, Summarize};
use crate::domain::{Transaction, TransactionType};
use crate::ids;

/// Receipt for a deposit or withdrawal
#[derive(Debug, Clone, Serialize)]
pub struct TxReceipt {
    pub transaction: Transaction,
    pub new_balance: Decimal,
}

impl Summarize for TxReceipt {
    fn summary(&self) -> String {
        match self.transaction.tx_type {
            TransactionType::Withdrawal => format!(
                "Successfully withdrew ${:.2}. New balance: ${:.2}",
                self.transaction.amount, self.new_balance
            ),
            _ => format!(
                "Successfully deposited ${:.2}. New balance: ${:.2}",
                self.transaction.amount, self.new_balance
            ),
        }
    }
}

/// Receipt for a transfer: the debit leg on the source account and the
/// credit leg on the destination account
#[derive(Debug, Clone, Serialize)]
pub struct TransferReceipt {
    pub from_account_number: String,
    pub to_account_number: String,
    pub amount: Decimal,
    pub debit: Transaction,
    pub credit: Transaction,
}

impl Summarize for TransferReceipt {
    fn summary(&self) -> String {
        format!(
            "Successfully transferred ${:.2} from {} to {}.",
            self.amount, self.from_account_number, self.to_account_number
        )
    }
}

/// Money-movement engine
pub struct TransactionService {
    repository: Arc<DuckDbRepository>,
}

impl TransactionService {
    pub fn new(repository: Arc<DuckDbRepository>) -> Self {
        Self { repository }
    }

    /// Deposit money into an active account
    pub fn deposit(
        &self,
        account_number: &str,
        amount: Decimal,
        description: Option<&str>,
    ) -> Result<TxReceipt> {
        self.apply_single(account_number, amount, description, TransactionType::Deposit)
    }

    /// Withdraw money from an active account
    pub fn withdraw(
        &self,
        account_number: &str,
        amount: Decimal,
        description: Option<&str>,
    ) -> Result<TxReceipt> {
        self.apply_single(
            account_number,
            amount,
            description,
            TransactionType::Withdrawal,
        )
    }

    /// Shared deposit/withdrawal path. Amount and account existence are
    /// validated before any unit of work is opened; the balance used for
    /// the mutation is re-read fresh inside it.
    fn apply_single(
        &self,
        account_number: &str,
        amount: Decimal,
        description: Option<&str>,
        tx_type: TransactionType,
    ) -> Result<TxReceipt> {
        let (op, default_description) = match tx_type {
            TransactionType::Withdrawal => ("Withdrawal", "Cash withdrawal"),
            _ => ("Deposit", "Cash deposit"),
        };
        if amount <= Decimal::ZERO {
            return Err(Error::InvalidAmount { op });
        }
        let amount = amount.round_dp(2);

        if self.repository.get_account_by_number(account_number)?.is_none() {
            return Err(Error::AccountNotFound);
        }

        self.repository.in_transaction(|conn| {
            let account = duckdb::fetch_active_account(conn, account_number)?
                .ok_or(Error::AccountNotFound)?;

            let new_balance = match tx_type {
                TransactionType::Withdrawal => {
                    if amount > account.balance {
                        return Err(Error::InsufficientFunds);
                    }
                    account.balance - amount
                }
                _ => account.balance + amount,
            };

            let tx_id = duckdb::next_transaction_id(conn)?;
            let transaction = Transaction {
                id: tx_id,
                transaction_number: ids::transaction_number(tx_id),
                account_id: account.id,
                tx_type,
                amount,
                balance_after: new_balance,
                description: Some(description.unwrap_or(default_description).to_string()),
                to_account_number: None,
                transaction_date: Utc::now(),
            };

            duckdb::update_balance(conn, account.id, new_balance)?;
            duckdb::insert_transaction(conn, &transaction)?;

            Ok(TxReceipt {
                transaction,
                new_balance,
            })
        })
    }

    /// Transfer money between two active accounts
    ///
    /// Both balance mutations and both transaction records commit together
    /// or not at all. Amount and same-account validation happen before the
    /// unit of work opens; both accounts are loaded fresh inside it. Any
    /// storage failure mid-sequence rolls back and surfaces as the generic
    /// transfer failure.
    pub fn transfer(
        &self,
        from_account_number: &str,
        to_account_number: &str,
        amount: Decimal,
        description: Option<&str>,
    ) -> Result<TransferReceipt> {
        if amount <= Decimal::ZERO {
            return Err(Error::InvalidAmount { op: "Transfer" });
        }
        if from_account_number == to_account_number {
            return Err(Error::SameAccount);
        }
        let amount = amount.round_dp(2);

        let result = self.repository.in_transaction(|conn| {
            let from_account = duckdb::fetch_active_account(conn, from_account_number)?
                .ok_or(Error::TransferAccountNotFound {
                    side: Party::Source,
                })?;
            let to_account = duckdb::fetch_active_account(conn, to_account_number)?.ok_or(
                Error::TransferAccountNotFound {
                    side: Party::Destination,
                },
            )?;

            if from_account.balance < amount {
                return Err(Error::InsufficientSourceFunds);
            }

            let from_balance = from_account.balance - amount;
            let to_balance = to_account.balance + amount;
            let now = Utc::now();

            let debit_id = duckdb::next_transaction_id(conn)?;
            let debit = Transaction {
                id: debit_id,
                transaction_number: ids::transaction_number(debit_id),
                account_id: from_account.id,
                tx_type: TransactionType::Transfer,
                amount,
                balance_after: from_balance,
                description: Some(
                    description
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("Transfer to {}", to_account.holder_name)),
                ),
                to_account_number: Some(to_account.account_number.clone()),
                transaction_date: now,
            };

            let credit_id = duckdb::next_transaction_id(conn)?;
            let credit = Transaction {
                id: credit_id,
                transaction_number: ids::transaction_number(credit_id),
                account_id: to_account.id,
                tx_type: TransactionType::Transfer,
                amount,
                balance_after: to_balance,
                description: Some(
                    description
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("Transfer from {}", from_account.holder_name)),
                ),
                to_account_number: Some(from_account.account_number.clone()),
                transaction_date: now,
            };

            duckdb::update_balance(conn, from_account.id, from_balance)?;
            duckdb::update_balance(conn, to_account.id, to_balance)?;
            duckdb::insert_transaction(conn, &debit)?;
            duckdb::insert_transaction(conn, &credit)?;

            Ok(TransferReceipt {
                from_account_number: from_account.account_number,
                to_account_number: to_account.account_number,
                amount,
                debit,
                credit,
            })
        });

        // Mid-transaction storage failures become the generic transfer
        // failure; domain failures (not found, insufficient funds) pass
        // through with their specific kind.
        match result {
            Err(Error::Persistence(_)) => Err(Error::TransferFailed),
            other => other,
        }
    }
}
