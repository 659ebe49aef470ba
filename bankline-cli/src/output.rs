//! Output formatting utilities

use anyhow::Result;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use rust_decimal::Decimal;
use serde::Serialize;

use bankline_core::services::LedgerEntry;
use bankline_core::{Account, OperationResult, Transaction};

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Format a monetary amount for display
pub fn fmt_money(amount: Decimal) -> String {
    format!("${:.2}", amount)
}

/// Print an operation result: JSON when asked, otherwise the display
/// message colored by outcome
pub fn print_result<T: Serialize>(result: &OperationResult<T>, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }
    if result.success {
        success(&result.message);
    } else {
        error(&result.message);
    }
    Ok(())
}

/// Account listing table
pub fn account_table(accounts: &[Account]) -> Table {
    let mut table = create_table();
    table.set_header(vec!["Account #", "Name", "Email", "Type", "Balance", "Created"]);
    for account in accounts {
        table.add_row(vec![
            account.account_number.clone(),
            account.holder_name.clone(),
            account.email.clone(),
            account.account_type.to_string(),
            fmt_money(account.balance),
            account.created_date.format("%Y-%m-%d").to_string(),
        ]);
    }
    table
}

fn transaction_row(transaction: &Transaction) -> Vec<String> {
    vec![
        transaction.transaction_number.clone(),
        transaction.tx_type.to_string(),
        fmt_money(transaction.amount),
        fmt_money(transaction.balance_after),
        transaction.transaction_date.format("%Y-%m-%d").to_string(),
        transaction.description.clone().unwrap_or_default(),
        transaction.to_account_number.clone().unwrap_or_default(),
    ]
}

/// Single-account history table
pub fn history_table(transactions: &[Transaction]) -> Table {
    let mut table = create_table();
    table.set_header(vec!["TXN #", "Type", "Amount", "Balance", "Date", "Description", "To"]);
    for transaction in transactions {
        table.add_row(transaction_row(transaction));
    }
    table
}

/// Cross-account transaction table (admin view)
pub fn ledger_table(entries: &[LedgerEntry]) -> Table {
    let mut table = create_table();
    table.set_header(vec![
        "TXN #", "Account", "Type", "Amount", "Balance", "Date", "Description", "To",
    ]);
    for entry in entries {
        let mut row = transaction_row(&entry.transaction);
        row.insert(1, entry.account_number.clone());
        table.add_row(row);
    }
    table
}
