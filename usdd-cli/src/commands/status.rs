//! Status command - supply summary and holders

use anyhow::Result;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use super::get_context;
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let status = ctx.status_service.get_status()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", format!("{} Ledger Status", status.symbol).bold());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(vec!["Ledger", status.ledger_account.as_str()]);
    table.add_row(vec!["Treasury", status.treasury_account.as_str()]);
    table.add_row(vec!["Identities", &status.total_identities.to_string()]);
    table.add_row(vec!["Holders", &status.total_holders.to_string()]);

    let Some(token) = &status.token else {
        println!("{}", table);
        println!();
        output::info("Token not created yet.");
        return Ok(());
    };

    table.add_row(vec!["Issuer", token.issuer.as_str()]);
    table.add_row(vec!["Supply", token.supply.as_str()]);
    table.add_row(vec!["Max supply", token.max_supply.as_str()]);
    table.add_row(vec!["Accrued interest (units)", &token.accrued_interest.to_string()]);
    println!("{}", table);

    if !token.conserved {
        println!();
        output::error(&format!(
            "Balances add up to {} units, which does not match the supply",
            token.circulating
        ));
    }

    if !status.holders.is_empty() {
        println!();
        println!("{}", "Holders".bold());
        let mut holders = output::create_table();
        holders.set_header(vec!["Owner", "Balance", "Interest"]);
        for holder in &status.holders {
            holders.add_row(vec![&holder.owner, &holder.balance, &holder.interest]);
        }
        println!("{}", holders);
    }

    Ok(())
}
