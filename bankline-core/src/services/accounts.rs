//! Account service - the account directory
//!
//! Account opening, authentication, lookup, profile updates and soft
//! closing. PIN hashing lives here and only here; the repository stores
//! the opaque hash.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;

use crate::adapters::duckdb::{self, DuckDbRepository};
use crate::auth;
use crate::domain::result::{Error, Result};
use crate::domain::{validate_pin, Account, AccountProfile, AccountType, Transaction, TransactionType};
use crate::ids;

/// Account directory service
pub struct AccountService {
    repository: Arc<DuckDbRepository>,
}

impl AccountService {
    pub fn new(repository: Arc<DuckDbRepository>) -> Self {
        Self { repository }
    }

    /// Open a new account
    ///
    /// Assigns the account number from the id sequence, hashes the PIN and
    /// persists the account. A positive initial balance is recorded as an
    /// "Initial deposit" transaction in the same unit of work, so the
    /// balance always equals the sum of the account's transaction amounts.
    pub fn create_account(
        &self,
        profile: AccountProfile,
        pin: &str,
        initial_balance: Decimal,
        account_type: AccountType,
    ) -> Result<Account> {
        profile.validate().map_err(Error::InvalidProfile)?;
        validate_pin(pin).map_err(Error::InvalidProfile)?;
        if initial_balance < Decimal::ZERO {
            return Err(Error::InvalidProfile(
                "Invalid initial deposit amount.".to_string(),
            ));
        }

        let pin_hash = auth::hash_pin(pin)?;
        let initial_balance = initial_balance.round_dp(2);

        self.repository.in_transaction(|conn| {
            let id = duckdb::next_account_id(conn)?;
            let account = Account {
                id,
                account_number: ids::account_number(id),
                holder_name: profile.holder_name.trim().to_string(),
                email: profile.email.trim().to_string(),
                phone: profile.phone.trim().to_string(),
                address: profile.address.trim().to_string(),
                account_type,
                balance: initial_balance,
                pin_hash: pin_hash.clone(),
                is_active: true,
                created_date: Utc::now(),
            };
            duckdb::insert_account(conn, &account)?;

            if initial_balance > Decimal::ZERO {
                let tx_id = duckdb::next_transaction_id(conn)?;
                let funding = Transaction {
                    id: tx_id,
                    transaction_number: ids::transaction_number(tx_id),
                    account_id: id,
                    tx_type: TransactionType::Deposit,
                    amount: initial_balance,
                    balance_after: initial_balance,
                    description: Some("Initial deposit".to_string()),
                    to_account_number: None,
                    transaction_date: account.created_date,
                };
                duckdb::insert_transaction(conn, &funding)?;
            }

            Ok(account)
        })
    }

    /// Authenticate with account number and PIN
    ///
    /// Unknown/inactive account and wrong PIN return the same error - the
    /// caller cannot tell which factor failed.
    pub fn authenticate(&self, account_number: &str, pin: &str) -> Result<Account> {
        let account = self
            .repository
            .get_account_by_number(account_number)?
            .ok_or(Error::InvalidCredentials)?;

        if auth::verify_pin(pin, &account.pin_hash) {
            Ok(account)
        } else {
            Err(Error::InvalidCredentials)
        }
    }

    /// Look up an active account by number
    pub fn get_by_number(&self, account_number: &str) -> Result<Account> {
        self.repository
            .get_account_by_number(account_number)?
            .ok_or(Error::AccountNotFound)
    }

    /// Overwrite the mutable profile fields; re-hash the PIN if a new one
    /// is supplied. Balance and account number are never affected.
    pub fn update_profile(
        &self,
        account_number: &str,
        profile: AccountProfile,
        new_pin: Option<&str>,
    ) -> Result<Account> {
        let mut account = self.get_by_number(account_number)?;

        profile.validate().map_err(Error::InvalidProfile)?;
        account.holder_name = profile.holder_name.trim().to_string();
        account.email = profile.email.trim().to_string();
        account.phone = profile.phone.trim().to_string();
        account.address = profile.address.trim().to_string();

        if let Some(pin) = new_pin {
            validate_pin(pin).map_err(Error::InvalidProfile)?;
            account.pin_hash = auth::hash_pin(pin)?;
        }

        self.repository.update_account_profile(&account)?;
        Ok(account)
    }

    /// Soft-close an account. Returns whether an active account was found;
    /// closing an already closed account reports false.
    pub fn deactivate(&self, account_number: &str) -> Result<bool> {
        match self.repository.get_account_by_number(account_number)? {
            Some(account) => {
                self.repository.set_account_active(account.id, false)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Substring search over holder name, email and account number
    pub fn search(&self, term: &str) -> Result<Vec<Account>> {
        Ok(self.repository.search_accounts(term)?)
    }

    pub fn list_by_type(&self, account_type: AccountType) -> Result<Vec<Account>> {
        Ok(self.repository.list_accounts_by_type(account_type)?)
    }

    pub fn list_all(&self) -> Result<Vec<Account>> {
        Ok(self.repository.list_accounts()?)
    }
}
