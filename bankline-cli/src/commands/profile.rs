//! Profile commands - update details, close account

use anyhow::{anyhow, Result};
use dialoguer::{Confirm, Input, Password};

use bankline_core::AccountProfile;

use super::{authenticate, get_context};
use crate::output;

/// Interactive profile update. Each prompt defaults to the current value;
/// an empty PIN keeps the existing one.
pub fn run_update(account_number: &str) -> Result<()> {
    let ctx = get_context()?;
    let account = authenticate(&ctx, account_number)?;

    println!("Press Enter to keep the current value.");

    let holder_name: String = Input::new()
        .with_prompt("Name")
        .default(account.holder_name.clone())
        .interact_text()?;
    let email: String = Input::new()
        .with_prompt("Email")
        .default(account.email.clone())
        .interact_text()?;
    let phone: String = Input::new()
        .with_prompt("Phone")
        .default(account.phone.clone())
        .interact_text()?;
    let address: String = Input::new()
        .with_prompt("Address")
        .default(account.address.clone())
        .interact_text()?;

    let new_pin = Password::new()
        .with_prompt("New PIN (leave blank to keep current)")
        .allow_empty_password(true)
        .interact()?;
    let new_pin = if new_pin.is_empty() {
        None
    } else {
        Some(new_pin)
    };

    let profile = AccountProfile {
        holder_name,
        email,
        phone,
        address,
    };

    match ctx
        .accounts
        .update_profile(account_number, profile, new_pin.as_deref())
    {
        Ok(_) => {
            output::success("Profile updated successfully!");
            Ok(())
        }
        Err(e) => {
            output::error(&e.to_string());
            Ok(())
        }
    }
}

/// Soft-close an account after PIN authentication
pub fn run_close(account_number: &str, force: bool) -> Result<()> {
    let ctx = get_context()?;
    authenticate(&ctx, account_number)?;

    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Close account {}?", account_number))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let closed = ctx
        .accounts
        .deactivate(account_number)
        .map_err(|e| anyhow!("{}", e))?;
    if closed {
        output::success(&format!("Account {} closed.", account_number));
    } else {
        output::error("Account not found or inactive.");
    }
    Ok(())
}
