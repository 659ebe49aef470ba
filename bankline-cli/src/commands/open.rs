//! Open command - create a new account

use anyhow::{anyhow, Result};
use dialoguer::{Input, Password};
use rust_decimal::Decimal;

use bankline_core::{AccountProfile, AccountType};

use super::get_context;
use crate::output;

#[allow(clippy::too_many_arguments)]
pub fn run(
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    account_type: Option<String>,
    initial: Option<Decimal>,
    json: bool,
) -> Result<()> {
    let ctx = get_context()?;

    let name = prompt_if_missing(name, "Full name")?;
    let email = prompt_if_missing(email, "Email")?;
    let phone = prompt_if_missing(phone, "Phone number")?;
    let address = prompt_if_missing(address, "Address")?;

    let type_str = match account_type {
        Some(t) => t,
        None => Input::new()
            .with_prompt("Account type (savings/checking/business/fixed-deposit)")
            .default("savings".to_string())
            .interact_text()?,
    };
    let account_type: AccountType = type_str.parse().map_err(|e: String| anyhow!(e))?;

    let pin = Password::new()
        .with_prompt("Set 4-digit PIN")
        .with_confirmation("Confirm PIN", "PINs do not match")
        .interact()?;

    let initial = match initial {
        Some(amount) => amount,
        None => Input::new()
            .with_prompt("Initial deposit amount")
            .default("0.00".to_string())
            .interact_text()?
            .parse::<Decimal>()
            .map_err(|_| anyhow!("Invalid initial deposit amount."))?,
    };

    let profile = AccountProfile {
        holder_name: name,
        email,
        phone,
        address,
    };

    match ctx.accounts.create_account(profile, &pin, initial, account_type) {
        Ok(account) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&account)?);
                return Ok(());
            }
            output::success("Account created successfully!");
            println!("  Account Number: {}", account.account_number);
            println!("  Account Type: {}", account.account_type);
            println!("  Initial Balance: {}", output::fmt_money(account.balance));
            Ok(())
        }
        Err(e) => {
            output::error(&e.to_string());
            Ok(())
        }
    }
}

fn prompt_if_missing(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Ok(Input::new().with_prompt(prompt).interact_text()?),
    }
}
