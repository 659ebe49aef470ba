//! Bankline CLI - bank accounts in your terminal

use std::process::ExitCode;
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

mod commands;
mod output;

use bankline_core::services::UsageEvent;
use commands::{admin, history, money, open, profile, seed, status};

/// Bankline - bank account console
#[derive(Parser)]
#[command(name = "bl", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a new account
    Open {
        /// Account holder's full name
        #[arg(long)]
        name: Option<String>,
        /// Email address
        #[arg(long)]
        email: Option<String>,
        /// Phone number
        #[arg(long)]
        phone: Option<String>,
        /// Postal address
        #[arg(long)]
        address: Option<String>,
        /// Account type (savings, checking, business, fixed-deposit)
        #[arg(long = "type")]
        account_type: Option<String>,
        /// Initial deposit amount
        #[arg(long)]
        initial: Option<Decimal>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show current balance (asks for the PIN)
    Balance {
        /// Account number
        account: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Deposit money (asks for the PIN)
    Deposit {
        /// Account number
        account: String,
        /// Amount to deposit
        amount: Decimal,
        /// Optional description
        #[arg(long)]
        description: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Withdraw money (asks for the PIN)
    Withdraw {
        /// Account number
        account: String,
        /// Amount to withdraw
        amount: Decimal,
        /// Optional description
        #[arg(long)]
        description: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Transfer money between accounts (asks for the source PIN)
    Transfer {
        /// Source account number
        from: String,
        /// Destination account number
        to: String,
        /// Amount to transfer
        amount: Decimal,
        /// Optional description
        #[arg(long)]
        description: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show transaction history (asks for the PIN)
    History {
        /// Account number
        account: String,
        /// Number of recent transactions to show
        #[arg(long)]
        limit: Option<i64>,
        /// Earliest date to include (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Latest date to include (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update profile details (asks for the PIN)
    Update {
        /// Account number
        account: String,
    },

    /// Close an account (asks for the PIN)
    Close {
        /// Account number
        account: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Administrative views
    Admin {
        #[command(subcommand)]
        command: admin::AdminCommands,
    },

    /// Seed demo accounts
    Seed {
        /// Wipe existing data before seeding
        #[arg(long)]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show database status summary
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    /// Command name for usage logging
    fn name(&self) -> &'static str {
        match self {
            Commands::Open { .. } => "open",
            Commands::Balance { .. } => "balance",
            Commands::Deposit { .. } => "deposit",
            Commands::Withdraw { .. } => "withdraw",
            Commands::Transfer { .. } => "transfer",
            Commands::History { .. } => "history",
            Commands::Update { .. } => "update",
            Commands::Close { .. } => "close",
            Commands::Admin { .. } => "admin",
            Commands::Seed { .. } => "seed",
            Commands::Status { .. } => "status",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let command_name = cli.command.name();
    let start = Instant::now();

    let result = run(cli);

    // Usage logging is best effort and must never break the command
    if let Some(logger) = commands::get_logger() {
        let _ = logger.log(UsageEvent {
            command: command_name.to_string(),
            success: result.is_ok(),
            duration_ms: start.elapsed().as_millis() as u64,
            error: result.as_ref().err().map(|e| e.to_string()),
        });
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Open { name, email, phone, address, account_type, initial, json } => {
            open::run(name, email, phone, address, account_type, initial, json)
        }
        Commands::Balance { account, json } => money::run_balance(&account, json),
        Commands::Deposit { account, amount, description, json } => {
            money::run_deposit(&account, amount, description, json)
        }
        Commands::Withdraw { account, amount, description, json } => {
            money::run_withdraw(&account, amount, description, json)
        }
        Commands::Transfer { from, to, amount, description, json } => {
            money::run_transfer(&from, &to, amount, description, json)
        }
        Commands::History { account, limit, from, to, json } => {
            history::run(&account, limit, from.as_deref(), to.as_deref(), json)
        }
        Commands::Update { account } => profile::run_update(&account),
        Commands::Close { account, force } => profile::run_close(&account, force),
        Commands::Admin { command } => admin::run(command),
        Commands::Seed { force, json } => seed::run(force, json),
        Commands::Status { json } => status::run(json),
    }
}
