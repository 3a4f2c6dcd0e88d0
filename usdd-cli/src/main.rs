//! USDD CLI - interest-bearing token ledger in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{account, action, balance, logs, status};

/// USDD - interest-bearing token ledger
#[derive(Parser)]
#[command(name = "usdd", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new token symbol (requires the ledger's signature)
    Create {
        /// Identity allowed to issue the token
        issuer: String,
        /// Maximum supply, e.g. "1000000.0000 USDD"
        maximum_supply: String,
        /// Identity signing this action (repeatable)
        #[arg(short = 'p', long = "auth")]
        auth: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Issue new supply (requires the issuer's signature)
    Issue {
        /// Recipient; issuing to the issuer itself distributes interest
        to: String,
        /// Quantity, e.g. "10.0000 USDD"
        quantity: String,
        /// Memo; "claim" on a self-issue accrues instead of paying out
        #[arg(short, long, default_value = "")]
        memo: String,
        /// Identity signing this action (repeatable)
        #[arg(short = 'p', long = "auth")]
        auth: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Transfer tokens between identities
    Transfer {
        from: String,
        to: String,
        /// Quantity, e.g. "1.5000 USDD"
        quantity: String,
        /// Memo; a 0x address when withdrawing to the ledger
        #[arg(short, long, default_value = "")]
        memo: String,
        /// Identity signing this action (repeatable)
        #[arg(short = 'p', long = "auth")]
        auth: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Claim accrued interest into the owner's balance
    Claim {
        owner: String,
        /// Identity signing this action (repeatable)
        #[arg(short = 'p', long = "auth")]
        auth: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show an identity's balance and accrued interest
    Balance {
        owner: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the current supply
    Supply {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show ledger status and holders
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage known identities
    Account {
        #[command(subcommand)]
        command: account::AccountCommands,
    },

    /// View and manage application logs
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Create { issuer, maximum_supply, auth, json } => {
            action::create(&issuer, &maximum_supply, &auth, json)
        }
        Commands::Issue { to, quantity, memo, auth, json } => {
            action::issue(&to, &quantity, memo, &auth, json)
        }
        Commands::Transfer { from, to, quantity, memo, auth, json } => {
            action::transfer(&from, &to, &quantity, memo, &auth, json)
        }
        Commands::Claim { owner, auth, json } => action::claim(&owner, &auth, json),
        Commands::Balance { owner, json } => balance::run(&owner, json),
        Commands::Supply { json } => balance::run_supply(json),
        Commands::Status { json } => status::run(json),
        Commands::Account { command } => account::run(command),
        Commands::Logs { command } => logs::run(command),
    }
}
