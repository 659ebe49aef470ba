//! Admin commands - account listings, search, transactions, statistics

use anyhow::{anyhow, Result};
use clap::Subcommand;
use colored::Colorize;

use bankline_core::{AccountType, TransactionType};

use super::get_context;
use crate::output;

#[derive(Subcommand)]
pub enum AdminCommands {
    /// List all active accounts
    Accounts {
        /// Only show accounts of this type
        #[arg(long = "type")]
        account_type: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search accounts by name, email or account number
    Search {
        /// Substring to search for
        term: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List recent transactions across all accounts
    Transactions {
        /// Number of recent transactions to show
        #[arg(long)]
        limit: Option<i64>,
        /// Only show transactions of this type
        #[arg(long = "type")]
        tx_type: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show aggregate account statistics
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: AdminCommands) -> Result<()> {
    match command {
        AdminCommands::Accounts { account_type, json } => run_accounts(account_type, json),
        AdminCommands::Search { term, json } => run_search(&term, json),
        AdminCommands::Transactions { limit, tx_type, json } => {
            run_transactions(limit, tx_type, json)
        }
        AdminCommands::Stats { json } => run_stats(json),
    }
}

fn run_accounts(account_type: Option<String>, json: bool) -> Result<()> {
    let ctx = get_context()?;

    let accounts = match account_type {
        Some(t) => {
            let parsed: AccountType = t.parse().map_err(|e: String| anyhow!(e))?;
            ctx.accounts.list_by_type(parsed)
        }
        None => ctx.accounts.list_all(),
    }
    .map_err(|e| anyhow!("{}", e))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&accounts)?);
        return Ok(());
    }

    if accounts.is_empty() {
        println!("No accounts found.");
        return Ok(());
    }
    println!("{}", output::account_table(&accounts));
    Ok(())
}

fn run_search(term: &str, json: bool) -> Result<()> {
    if term.trim().is_empty() {
        return Err(anyhow!("Search term cannot be empty."));
    }

    let ctx = get_context()?;
    let accounts = ctx.accounts.search(term).map_err(|e| anyhow!("{}", e))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&accounts)?);
        return Ok(());
    }

    println!("{}", format!("Search results for '{}'", term).bold());
    if accounts.is_empty() {
        println!("No accounts found.");
        return Ok(());
    }
    println!("{}", output::account_table(&accounts));
    Ok(())
}

fn run_transactions(limit: Option<i64>, tx_type: Option<String>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let limit = limit.unwrap_or(ctx.config.default_admin_limit);

    let entries = match tx_type {
        Some(t) => {
            let parsed: TransactionType = t.parse().map_err(|e: String| anyhow!(e))?;
            ctx.reporting.transactions_by_type(parsed, Some(limit))
        }
        None => ctx.reporting.all_transactions(Some(limit)),
    }
    .map_err(|e| anyhow!("{}", e))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }
    println!("{}", output::ledger_table(&entries));
    Ok(())
}

fn run_stats(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let stats = ctx.reporting.statistics().map_err(|e| anyhow!("{}", e))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", "Account Statistics".bold());
    println!("  Total Accounts: {}", stats.total_accounts);
    println!("  Total Bank Balance: {}", output::fmt_money(stats.total_balance));
    println!("  Savings Accounts: {}", stats.savings_accounts);
    println!("  Checking Accounts: {}", stats.checking_accounts);
    println!("  Business Accounts: {}", stats.business_accounts);
    println!("  Fixed Deposit Accounts: {}", stats.fixed_deposit_accounts);
    Ok(())
}
