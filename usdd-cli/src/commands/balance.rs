//! Balance and supply commands

use std::str::FromStr;

use anyhow::{Context, Result};
use colored::Colorize;
use usdd_core::{LedgerError, Name};

use super::get_context;

pub fn run(owner: &str, json: bool) -> Result<()> {
    let owner = Name::from_str(owner).with_context(|| format!("Invalid identity '{}'", owner))?;
    let ctx = get_context()?;

    // No holding reads as zero here; the ledger itself treats it as missing
    let balance = match ctx.token_service.balance(&owner) {
        Ok(balance) => balance,
        Err(e) if matches!(e.downcast_ref::<LedgerError>(), Some(LedgerError::NoBalance(_))) => {
            usdd_core::Asset::zero(ctx.config.symbol.clone())
        }
        Err(e) => return Err(e),
    };
    let interest = ctx.token_service.interest(&owner)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "owner": owner,
                "balance": balance,
                "interest": interest,
            }))?
        );
        return Ok(());
    }

    println!("{}", owner.as_str().bold());
    println!("  Balance:  {}", balance);
    println!("  Interest: {}", interest);
    Ok(())
}

pub fn run_supply(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let supply = ctx.token_service.supply()?;

    if json {
        println!("{}", serde_json::json!({ "supply": supply }));
    } else {
        println!("{}", supply);
    }
    Ok(())
}
