//! History command - transaction history for one account

use anyhow::{anyhow, Result};
use chrono::NaiveDate;

use super::{authenticate, get_context};
use crate::output;

pub fn run(
    account: &str,
    limit: Option<i64>,
    from: Option<&str>,
    to: Option<&str>,
    json: bool,
) -> Result<()> {
    let ctx = get_context()?;
    authenticate(&ctx, account)?;

    let from_date = from.map(parse_date).transpose()?;
    let to_date = to.map(parse_date).transpose()?;
    let limit = limit.unwrap_or(ctx.config.default_history_limit);

    let transactions = ctx
        .reporting
        .history(account, Some(limit), from_date, to_date)
        .map_err(|e| anyhow!("{}", e))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&transactions)?);
        return Ok(());
    }

    if transactions.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    println!("{}", output::history_table(&transactions));
    Ok(())
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| anyhow!("Invalid date format. Use YYYY-MM-DD"))
}
