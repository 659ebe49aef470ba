//! Seed command - demo data

use anyhow::Result;
use bankline_core::services::DEMO_PINS;

use super::get_context;
use crate::output;

pub fn run(force: bool, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let result = ctx.seed.seed(force)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    output::success(&format!("Seeded {} demo accounts.", result.accounts_created));
    for (number, pin) in result.account_numbers.iter().zip(DEMO_PINS) {
        println!("  {} (PIN {})", number, pin);
    }
    Ok(())
}
