//! Status command - database summary

use anyhow::{anyhow, Result};
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use super::get_context;
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let status = ctx.reporting.status().map_err(|e| anyhow!("{}", e))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "Bankline Status".bold());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(vec!["Accounts", &status.total_accounts.to_string()]);
    table.add_row(vec!["Transactions", &status.total_transactions.to_string()]);
    table.add_row(vec!["Total Balance", &output::fmt_money(status.total_balance)]);
    println!("{}", table);
    println!();

    if let (Some(earliest), Some(latest)) =
        (&status.earliest_transaction, &status.latest_transaction)
    {
        println!("Transaction date range: {} to {}", earliest, latest);
    }

    Ok(())
}
