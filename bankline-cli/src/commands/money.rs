//! Money commands - balance, deposit, withdraw, transfer

use anyhow::{anyhow, Result};
use rust_decimal::Decimal;
use serde_json::json;

use bankline_core::services::{TransferReceipt, TxReceipt};
use bankline_core::OperationResult;

use super::{authenticate, get_context};
use crate::output;

pub fn run_balance(account: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    authenticate(&ctx, account)?;

    let balance = ctx
        .reporting
        .account_balance(account)
        .map_err(|e| anyhow!("{}", e))?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "accountNumber": account,
                "balance": balance,
            }))?
        );
    } else {
        println!("Current Balance: {}", output::fmt_money(balance));
    }
    Ok(())
}

pub fn run_deposit(
    account: &str,
    amount: Decimal,
    description: Option<String>,
    json: bool,
) -> Result<()> {
    let ctx = get_context()?;
    authenticate(&ctx, account)?;

    let result: OperationResult<TxReceipt> = ctx
        .transactions
        .deposit(account, amount, description.as_deref())
        .into();
    output::print_result(&result, json)
}

pub fn run_withdraw(
    account: &str,
    amount: Decimal,
    description: Option<String>,
    json: bool,
) -> Result<()> {
    let ctx = get_context()?;
    authenticate(&ctx, account)?;

    let result: OperationResult<TxReceipt> = ctx
        .transactions
        .withdraw(account, amount, description.as_deref())
        .into();
    output::print_result(&result, json)
}

pub fn run_transfer(
    from: &str,
    to: &str,
    amount: Decimal,
    description: Option<String>,
    json: bool,
) -> Result<()> {
    let ctx = get_context()?;
    authenticate(&ctx, from)?;

    let result: OperationResult<TransferReceipt> = ctx
        .transactions
        .transfer(from, to, amount, description.as_deref())
        .into();
    output::print_result(&result, json)
}
