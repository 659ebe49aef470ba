//! DuckDB repository implementation
//!
//! One `Connection` behind a `Mutex` - request processing is single
//! threaded and the data directory is exclusively locked by the context,
//! so the mutex only serializes accidental overlap, it is not a
//! concurrency strategy.
//!
//! Row-level statements are free functions over `&Connection` so the same
//! code runs both for single-call operations (which lock per call) and
//! inside an explicit unit of work (`in_transaction`), where every read
//! and write shares one BEGIN/COMMIT scope.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use duckdb::{params, Connection};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::domain::{Account, AccountType, Transaction, TransactionType};
use crate::services::MigrationService;

/// Maximum number of retries when the database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400, 800ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

const ACCOUNT_COLUMNS: &str = "id, account_number, holder_name, email, phone, address, \
     account_type, balance::VARCHAR, pin_hash, is_active, created_date::VARCHAR";

const TRANSACTION_COLUMNS: &str = "id, transaction_number, account_id, tx_type, \
     amount::VARCHAR, balance_after::VARCHAR, description, to_account_number, \
     transaction_date::VARCHAR";

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows error messages
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS error messages
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
}

/// DuckDB repository implementation
pub struct DuckDbRepository {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl DuckDbRepository {
    /// Create a new DuckDB repository
    ///
    /// Includes retry logic with exponential backoff for file locking
    /// errors, which can occur when a previous process is still releasing
    /// the database file.
    pub fn new(db_path: &Path) -> Result<Self> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match Self::try_open_connection(db_path) {
                Ok(conn) => {
                    return Ok(Self {
                        conn: Mutex::new(conn),
                        db_path: db_path.to_path_buf(),
                    });
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        eprintln!(
                            "[bankline] Database busy, retrying in {}ms (attempt {}/{}): {}",
                            delay.as_millis(),
                            attempt + 1,
                            MAX_RETRIES,
                            err_msg
                        );
                        thread::sleep(delay);
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| anyhow!("Failed to open database after {} retries", MAX_RETRIES)))
    }

    /// Attempt to open a database connection (called by new() with retry logic)
    fn try_open_connection(db_path: &Path) -> Result<Connection> {
        // Disable extension autoloading to avoid macOS code signing issues
        // (cached extensions in ~/.duckdb/extensions may have different Team IDs)
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        let conn = Connection::open_with_flags(db_path, config)?;
        Ok(conn)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Run database migrations using the MigrationService
    pub fn run_migrations(&self) -> Result<crate::services::MigrationResult> {
        let conn = self.conn.lock().unwrap();
        let migration_service = MigrationService::new(&conn);
        migration_service.run_pending()
    }

    /// Ensure database schema exists (runs pending migrations)
    pub fn ensure_schema(&self) -> Result<()> {
        self.run_migrations()?;
        Ok(())
    }

    /// Execute a closure inside an explicit unit of work
    ///
    /// Every statement the closure runs against the passed connection is
    /// part of one BEGIN/COMMIT scope. If the closure returns an error the
    /// transaction is dropped without commit, which rolls back all writes.
    pub fn in_transaction<T, E>(
        &self,
        f: impl FnOnce(&Connection) -> std::result::Result<T, E>,
    ) -> std::result::Result<T, E>
    where
        E: From<anyhow::Error>,
    {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn
            .transaction()
            .map_err(|e| E::from(anyhow!("Failed to begin transaction: {}", e)))?;
        match f(&tx) {
            Ok(value) => {
                tx.commit()
                    .map_err(|e| E::from(anyhow!("Failed to commit transaction: {}", e)))?;
                Ok(value)
            }
            // Dropping the uncommitted transaction rolls it back
            Err(err) => Err(err),
        }
    }

    // === Account operations ===

    /// Get the active account with the given number
    pub fn get_account_by_number(&self, account_number: &str) -> Result<Option<Account>> {
        let conn = self.conn.lock().unwrap();
        fetch_active_account(&conn, account_number)
    }

    /// All active accounts, in creation order
    pub fn list_accounts(&self) -> Result<Vec<Account>> {
        let conn = self.conn.lock().unwrap();
        let sql = format!(
            "SELECT {} FROM accounts WHERE is_active ORDER BY id",
            ACCOUNT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let accounts = stmt
            .query_map([], |row| Ok(row_to_account(row)))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(accounts)
    }

    /// Active accounts of one product type, in creation order
    pub fn list_accounts_by_type(&self, account_type: AccountType) -> Result<Vec<Account>> {
        let conn = self.conn.lock().unwrap();
        let sql = format!(
            "SELECT {} FROM accounts WHERE is_active AND account_type = ? ORDER BY id",
            ACCOUNT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let accounts = stmt
            .query_map([account_type.as_str()], |row| Ok(row_to_account(row)))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(accounts)
    }

    /// Substring search (case-sensitive) over holder name, email and
    /// account number. Active accounts only.
    pub fn search_accounts(&self, term: &str) -> Result<Vec<Account>> {
        let conn = self.conn.lock().unwrap();
        let sql = format!(
            "SELECT {} FROM accounts
             WHERE is_active
               AND (holder_name LIKE '%' || ? || '%'
                    OR email LIKE '%' || ? || '%'
                    OR account_number LIKE '%' || ? || '%')
             ORDER BY id",
            ACCOUNT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let accounts = stmt
            .query_map(params![term, term, term], |row| Ok(row_to_account(row)))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(accounts)
    }

    /// Overwrite the mutable profile fields (and pin hash) of an account.
    /// Balance, number and type are never touched by this statement.
    pub fn update_account_profile(&self, account: &Account) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE accounts
             SET holder_name = ?, email = ?, phone = ?, address = ?, pin_hash = ?
             WHERE id = ?",
            params![
                account.holder_name,
                account.email,
                account.phone,
                account.address,
                account.pin_hash,
                account.id,
            ],
        )?;
        Ok(())
    }

    /// Soft delete / restore
    pub fn set_account_active(&self, account_id: i64, active: bool) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE accounts SET is_active = ? WHERE id = ?",
            params![active, account_id],
        )?;
        Ok(())
    }

    /// Count of all accounts, active or not (used by the seed guard)
    pub fn account_count(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM accounts", [], |row| row.get(0))?;
        Ok(count)
    }

    // === Transaction operations ===

    /// Transactions for one account (by account number, joined - the
    /// account row itself is not required to be active for history reads),
    /// newest first, optionally bounded by date and capped.
    pub fn transactions_for_account_number(
        &self,
        account_number: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        limit: Option<i64>,
    ) -> Result<Vec<Transaction>> {
        let conn = self.conn.lock().unwrap();
        let mut sql = format!(
            "SELECT {} FROM transactions t
             JOIN accounts a ON t.account_id = a.id
             WHERE a.account_number = ?
               AND t.transaction_date >= COALESCE(CAST(? AS TIMESTAMP), '-infinity'::TIMESTAMP)
               AND t.transaction_date <= COALESCE(CAST(? AS TIMESTAMP), 'infinity'::TIMESTAMP)
             ORDER BY t.transaction_date DESC, t.id DESC",
            qualified_transaction_columns("t")
        );
        if let Some(n) = limit {
            sql.push_str(&format!(" LIMIT {}", n.max(0)));
        }
        let mut stmt = conn.prepare(&sql)?;
        let transactions = stmt
            .query_map(
                params![
                    account_number,
                    from.map(to_db_timestamp),
                    to.map(to_db_timestamp)
                ],
                |row| Ok(row_to_transaction(row)),
            )?
            .filter_map(|r| r.ok())
            .collect();
        Ok(transactions)
    }

    /// All transactions, newest first, optionally filtered by type and
    /// capped. Returns the owning account number alongside each record for
    /// display.
    pub fn all_transactions(
        &self,
        type_filter: Option<TransactionType>,
        limit: Option<i64>,
    ) -> Result<Vec<(String, Transaction)>> {
        let conn = self.conn.lock().unwrap();
        let mut sql = format!(
            "SELECT a.account_number, {} FROM transactions t
             JOIN accounts a ON t.account_id = a.id
             WHERE COALESCE(t.tx_type = ?, true)
             ORDER BY t.transaction_date DESC, t.id DESC",
            qualified_transaction_columns("t")
        );
        if let Some(n) = limit {
            sql.push_str(&format!(" LIMIT {}", n.max(0)));
        }
        let mut stmt = conn.prepare(&sql)?;
        let entries = stmt
            .query_map(params![type_filter.map(|t| t.as_str())], |row| {
                let account_number: String = row.get(0).unwrap_or_default();
                Ok((account_number, row_to_transaction_at(row, 1)))
            })?
            .filter_map(|r| r.ok())
            .collect();
        Ok(entries)
    }

    pub fn transaction_count(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Earliest and latest transaction timestamps, if any
    pub fn transaction_date_range(&self) -> Result<(Option<DateTime<Utc>>, Option<DateTime<Utc>>)> {
        let conn = self.conn.lock().unwrap();
        let (earliest, latest): (Option<String>, Option<String>) = conn.query_row(
            "SELECT MIN(transaction_date)::VARCHAR, MAX(transaction_date)::VARCHAR
             FROM transactions",
            [],
            |row| Ok((row.get(0).ok(), row.get(1).ok())),
        )?;
        Ok((
            earliest.as_deref().map(parse_timestamp),
            latest.as_deref().map(parse_timestamp),
        ))
    }

    /// Delete all accounts and transactions. Sequences keep advancing, so
    /// identifiers stay unique across a reseed.
    pub fn clear_all_data(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM transactions", [])?;
        conn.execute("DELETE FROM accounts", [])?;
        Ok(())
    }
}

// === Row-level statements (shared with units of work) ===

/// Draw the next account id from the persistence-level sequence
pub fn next_account_id(conn: &Connection) -> Result<i64> {
    let id: i64 = conn.query_row("SELECT nextval('seq_account_ids')", [], |row| row.get(0))?;
    Ok(id)
}

/// Draw the next transaction id from the persistence-level sequence
pub fn next_transaction_id(conn: &Connection) -> Result<i64> {
    let id: i64 = conn.query_row("SELECT nextval('seq_transaction_ids')", [], |row| row.get(0))?;
    Ok(id)
}

/// Load the active account with the given number, reading the current
/// committed (or in-transaction) balance.
pub fn fetch_active_account(conn: &Connection, account_number: &str) -> Result<Option<Account>> {
    let sql = format!(
        "SELECT {} FROM accounts WHERE account_number = ? AND is_active",
        ACCOUNT_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let account = stmt
        .query_row([account_number], |row| Ok(row_to_account(row)))
        .ok();
    Ok(account)
}

/// Insert a freshly created account row
pub fn insert_account(conn: &Connection, account: &Account) -> Result<()> {
    conn.execute(
        "INSERT INTO accounts (id, account_number, holder_name, email, phone, address,
                               account_type, balance, pin_hash, is_active, created_date)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            account.id,
            account.account_number,
            account.holder_name,
            account.email,
            account.phone,
            account.address,
            account.account_type.as_str(),
            dec_to_f64(account.balance),
            account.pin_hash,
            account.is_active,
            to_db_timestamp(account.created_date),
        ],
    )?;
    Ok(())
}

/// Set an account's balance. Only the transaction engine (and account
/// creation) may call this, always in the same unit of work as the
/// matching transaction record insert.
pub fn update_balance(conn: &Connection, account_id: i64, balance: Decimal) -> Result<()> {
    conn.execute(
        "UPDATE accounts SET balance = ? WHERE id = ?",
        params![dec_to_f64(balance), account_id],
    )?;
    Ok(())
}

/// Insert an immutable transaction record
pub fn insert_transaction(conn: &Connection, tx: &Transaction) -> Result<()> {
    conn.execute(
        "INSERT INTO transactions (id, transaction_number, account_id, tx_type, amount,
                                   balance_after, description, to_account_number,
                                   transaction_date)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            tx.id,
            tx.transaction_number,
            tx.account_id,
            tx.tx_type.as_str(),
            dec_to_f64(tx.amount),
            dec_to_f64(tx.balance_after),
            tx.description,
            tx.to_account_number,
            to_db_timestamp(tx.transaction_date),
        ],
    )?;
    Ok(())
}

// === Row mapping ===

fn row_to_account(row: &duckdb::Row) -> Account {
    // Column order matches ACCOUNT_COLUMNS
    let type_str: String = row.get(6).unwrap_or_default();
    let balance_str: String = row.get(7).unwrap_or_default();
    let created_str: String = row.get(10).unwrap_or_default();

    Account {
        id: row.get(0).unwrap_or_default(),
        account_number: row.get(1).unwrap_or_default(),
        holder_name: row.get(2).unwrap_or_default(),
        email: row.get(3).unwrap_or_default(),
        phone: row.get(4).unwrap_or_default(),
        address: row.get(5).unwrap_or_default(),
        account_type: type_str.parse().unwrap_or(AccountType::Savings),
        balance: Decimal::from_str_exact(&balance_str).unwrap_or_default(),
        pin_hash: row.get(8).unwrap_or_default(),
        is_active: row.get(9).unwrap_or_default(),
        created_date: parse_timestamp(&created_str),
    }
}

fn row_to_transaction(row: &duckdb::Row) -> Transaction {
    row_to_transaction_at(row, 0)
}

/// Map a transaction whose columns start at `base` (joined queries prefix
/// other columns)
fn row_to_transaction_at(row: &duckdb::Row, base: usize) -> Transaction {
    // Column order matches TRANSACTION_COLUMNS
    let type_str: String = row.get(base + 3).unwrap_or_default();
    let amount_str: String = row.get(base + 4).unwrap_or_default();
    let balance_after_str: String = row.get(base + 5).unwrap_or_default();
    let date_str: String = row.get(base + 8).unwrap_or_default();

    Transaction {
        id: row.get(base).unwrap_or_default(),
        transaction_number: row.get(base + 1).unwrap_or_default(),
        account_id: row.get(base + 2).unwrap_or_default(),
        tx_type: type_str.parse().unwrap_or(TransactionType::Deposit),
        amount: Decimal::from_str_exact(&amount_str).unwrap_or_default(),
        balance_after: Decimal::from_str_exact(&balance_after_str).unwrap_or_default(),
        description: row.get(base + 6).ok(),
        to_account_number: row.get(base + 7).ok(),
        transaction_date: parse_timestamp(&date_str),
    }
}

// === Helper functions ===

fn qualified_transaction_columns(alias: &str) -> String {
    TRANSACTION_COLUMNS
        .split(", ")
        .map(|c| format!("{}.{}", alias, c.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Format a UTC timestamp the way DuckDB's TIMESTAMP type ingests it
fn to_db_timestamp(dt: DateTime<Utc>) -> String {
    dt.naive_utc().format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

/// DECIMAL(18,2) columns are bound as f64; DuckDB rounds to the column
/// scale on insert. Reads go through ::VARCHAR for exact Decimal parsing.
fn dec_to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.with_timezone(&Utc);
    }
    // DuckDB prints TIMESTAMP as "YYYY-MM-DD HH:MM:SS[.ffffff]"
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_error_detection() {
        assert!(is_retryable_error("IO Error: database is locked"));
        assert!(is_retryable_error("Resource temporarily unavailable"));
        assert!(!is_retryable_error("Catalog Error: table missing"));
    }

    #[test]
    fn test_qualified_transaction_columns() {
        let cols = qualified_transaction_columns("t");
        assert!(cols.starts_with("t.id, t.transaction_number"));
        assert!(cols.contains("t.amount::VARCHAR"));
    }

    #[test]
    fn test_timestamp_roundtrip() {
        let dt = Utc::now();
        let parsed = parse_timestamp(&to_db_timestamp(dt));
        // Microsecond precision survives the round trip
        assert_eq!(dt.timestamp_micros(), parsed.timestamp_micros());
    }
}
