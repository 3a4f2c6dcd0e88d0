//! Account command - manage the identity directory

use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Subcommand;
use usdd_core::{LogEvent, Name};

use super::{get_context, get_logger, log_event};
use crate::output;

#[derive(Subcommand)]
pub enum AccountCommands {
    /// Register a new identity
    New {
        /// Identity name: up to 12 characters from a-z, 1-5 and '.'
        name: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List registered identities
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: AccountCommands) -> Result<()> {
    match command {
        AccountCommands::New { name, json } => {
            let name = Name::from_str(&name).with_context(|| format!("Invalid identity '{}'", name))?;
            let ctx = get_context()?;
            let created = ctx.token_service.add_identity(&name)?;
            log_event(&get_logger(), LogEvent::new("account_created").with_command("account"));

            if json {
                println!("{}", serde_json::json!({ "name": name, "created": created }));
            } else if created {
                output::success(&format!("✓ Registered {}", name));
            } else {
                output::warning(&format!("{} is already registered", name));
            }
        }
        AccountCommands::List { json } => {
            let ctx = get_context()?;
            let identities = ctx.token_service.identities()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&identities)?);
                return Ok(());
            }
            for name in identities {
                println!("{}", name);
            }
        }
    }
    Ok(())
}
