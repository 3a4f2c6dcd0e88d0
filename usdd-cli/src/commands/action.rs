//! Ledger action commands - create, issue, transfer, claim

use std::process::exit;
use std::str::FromStr;

use anyhow::{Context, Result};
use colored::Colorize;
use usdd_core::domain::{DistributionMode, DistributionReport};
use usdd_core::{Action, Asset, Name, OperationResult, Receipt, SignerSet};

use super::{get_context, get_logger};
use crate::output;

pub fn create(issuer: &str, maximum_supply: &str, auth: &[String], json: bool) -> Result<()> {
    let action = Action::Create {
        issuer: parse_name(issuer)?,
        maximum_supply: parse_asset(maximum_supply)?,
    };
    execute(action, auth, json)
}

pub fn issue(to: &str, quantity: &str, memo: String, auth: &[String], json: bool) -> Result<()> {
    let action = Action::Issue {
        to: parse_name(to)?,
        quantity: parse_asset(quantity)?,
        memo,
    };
    execute(action, auth, json)
}

pub fn transfer(
    from: &str,
    to: &str,
    quantity: &str,
    memo: String,
    auth: &[String],
    json: bool,
) -> Result<()> {
    let action = Action::Transfer {
        from: parse_name(from)?,
        to: parse_name(to)?,
        quantity: parse_asset(quantity)?,
        memo,
    };
    execute(action, auth, json)
}

pub fn claim(owner: &str, auth: &[String], json: bool) -> Result<()> {
    let action = Action::Claim {
        owner: parse_name(owner)?,
    };
    execute(action, auth, json)
}

fn parse_name(raw: &str) -> Result<Name> {
    Name::from_str(raw).with_context(|| format!("Invalid identity '{}'", raw))
}

fn parse_asset(raw: &str) -> Result<Asset> {
    Asset::from_str(raw).with_context(|| format!("Invalid quantity '{}'", raw))
}

fn parse_signers(auth: &[String]) -> Result<SignerSet> {
    let names = auth
        .iter()
        .map(|raw| parse_name(raw))
        .collect::<Result<Vec<_>>>()?;
    Ok(SignerSet::new(names))
}

/// Run one action chain and report the outcome
fn execute(action: Action, auth: &[String], json: bool) -> Result<()> {
    let logger = get_logger();
    let name = action.name();
    let signers = parse_signers(auth)?;
    if signers.is_empty() && !json {
        output::warning("No signers given (-p/--auth); only unauthenticated checks can pass.");
    }

    let ctx = get_context()?;
    let outcome = ctx.token_service.execute(action, &signers);
    if let Some(logger) = &logger {
        // Logging should never break the app
        let _ = logger.log_outcome(name, &outcome);
    }

    match outcome {
        Ok(receipt) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&OperationResult::ok(receipt))?);
            } else {
                print_receipt(&receipt);
            }
            Ok(())
        }
        Err(e) => {
            if json {
                let message = format!("{:#}", e);
                println!(
                    "{}",
                    serde_json::to_string_pretty(&OperationResult::<Receipt>::fail(message))?
                );
                exit(1);
            }
            Err(e)
        }
    }
}

fn describe(action: &Action) -> String {
    match action {
        Action::Create {
            issuer,
            maximum_supply,
        } => format!("create {} max {}", issuer, maximum_supply),
        Action::Issue { to, quantity, memo } => with_memo(format!("issue {} to {}", quantity, to), memo),
        Action::Transfer {
            from,
            to,
            quantity,
            memo,
        } => with_memo(format!("transfer {} {} -> {}", quantity, from, to), memo),
        Action::Claim { owner } => format!("claim by {}", owner),
    }
}

fn with_memo(text: String, memo: &str) -> String {
    if memo.is_empty() {
        text
    } else {
        format!("{} ({})", text, memo)
    }
}

fn print_receipt(receipt: &Receipt) {
    output::success(&format!("✓ Applied {} action(s)", receipt.actions.len()));

    let mut table = output::create_table();
    table.set_header(vec!["#", "Action", "Forwarded by", "Notified"]);
    for (i, executed) in receipt.actions.iter().enumerate() {
        let notified = executed
            .notified
            .iter()
            .map(|n| n.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            (i + 1).to_string(),
            describe(&executed.action),
            executed
                .forwarded_by
                .as_ref()
                .map(|n| n.to_string())
                .unwrap_or_else(|| "-".to_string()),
            notified,
        ]);
    }
    println!("{}", table);

    for report in &receipt.distributions {
        print_distribution(report);
    }
}

fn print_distribution(report: &DistributionReport) {
    let mode = match report.mode {
        DistributionMode::Immediate => "paid out",
        DistributionMode::Accrual => "accrued",
    };
    println!();
    if report.skipped {
        output::info(&format!(
            "Distribution of {} skipped: no supply to share against",
            report.pool
        ));
        return;
    }
    println!(
        "{} {} {} across {} holder(s), {} to treasury",
        "Interest".bold(),
        report.pool,
        mode,
        report.shares.len(),
        report.remainder
    );
}
