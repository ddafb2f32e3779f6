use std::fs::File;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};

use crate::application::{LedgerService, SessionGate};
use crate::domain::{Cents, format_cents, parse_cents};
use crate::io::StatementExporter;

/// Teller - Single-User Account Ledger
#[derive(Parser)]
#[command(name = "teller")]
#[command(about = "A local-first account ledger with withdrawal limits and durable history")]
#[command(version)]
pub struct Cli {
    /// Account data file path
    #[arg(short, long, default_value = "accounts.json")]
    pub data: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// Credentials every account-scoped command authenticates with.
#[derive(Args)]
pub struct SessionArgs {
    /// Account id
    #[arg(long)]
    pub account: String,

    /// Account PIN
    #[arg(long)]
    pub pin: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the account store (seeds demo accounts on first run)
    Init,

    /// Show the account balance
    Balance {
        #[command(flatten)]
        session: SessionArgs,
    },

    /// Deposit an amount into the account
    Deposit {
        /// Amount to deposit (e.g., "500" or "500.00")
        amount: String,

        #[command(flatten)]
        session: SessionArgs,
    },

    /// Withdraw an amount from the account
    Withdraw {
        /// Amount to withdraw (e.g., "500" or "500.00")
        amount: String,

        #[command(flatten)]
        session: SessionArgs,
    },

    /// Transfer funds to another account
    Transfer {
        /// Amount to transfer (e.g., "500" or "500.00")
        amount: String,

        /// Destination account id
        #[arg(long)]
        to: String,

        #[command(flatten)]
        session: SessionArgs,
    },

    /// Show the mini statement (most recent transactions)
    Statement {
        #[command(flatten)]
        session: SessionArgs,
    },

    /// Change the account PIN
    ChangePin {
        /// New PIN (4-6 digits)
        #[arg(long)]
        new_pin: String,

        /// Re-enter the new PIN
        #[arg(long)]
        confirm: String,

        #[command(flatten)]
        session: SessionArgs,
    },

    /// Export the full stored history as CSV
    Export {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        #[command(flatten)]
        session: SessionArgs,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let Cli { data, command } = self;

        match command {
            Commands::Init => {
                LedgerService::open(&data)?;
                println!("Account store initialized: {}", data);
            }

            Commands::Balance { session } => {
                let mut gate = open_session(&data, &session)?;
                let snapshot = gate.snapshot()?;
                println!(
                    "Balance for {} ({}): {}",
                    snapshot.name,
                    snapshot.id,
                    format_cents(snapshot.balance)
                );
                gate.end_session()?;
            }

            Commands::Deposit { amount, session } => {
                let amount = parse_amount(&amount)?;
                let mut gate = open_session(&data, &session)?;
                let balance = gate.deposit(amount)?;
                println!(
                    "Deposited {}. New balance: {}",
                    format_cents(amount),
                    format_cents(balance)
                );
                gate.end_session()?;
            }

            Commands::Withdraw { amount, session } => {
                let amount = parse_amount(&amount)?;
                let mut gate = open_session(&data, &session)?;
                let balance = gate.withdraw(amount)?;
                println!(
                    "Dispensed {}. New balance: {}",
                    format_cents(amount),
                    format_cents(balance)
                );
                gate.end_session()?;
            }

            Commands::Transfer {
                amount,
                to,
                session,
            } => {
                let amount = parse_amount(&amount)?;
                let mut gate = open_session(&data, &session)?;
                let receipt = gate.transfer(&to, amount)?;
                println!(
                    "Transferred {} to {}. New balance: {}",
                    format_cents(receipt.amount),
                    to,
                    format_cents(receipt.source_balance)
                );
                gate.end_session()?;
            }

            Commands::Statement { session } => {
                let mut gate = open_session(&data, &session)?;
                let snapshot = gate.snapshot()?;
                println!(
                    "Mini statement for {} ({})",
                    snapshot.name, snapshot.id
                );
                if snapshot.recent.is_empty() {
                    println!("  (no transactions)");
                } else {
                    println!(
                        "  {:<19}  {:<12}  {:>12}  {:>12}  meta",
                        "time", "type", "amount", "balance"
                    );
                    for tx in &snapshot.recent {
                        println!(
                            "  {:<19}  {:<12}  {:>12}  {:>12}  {}",
                            tx.time.format("%Y-%m-%d %H:%M:%S"),
                            tx.kind.as_str(),
                            format_cents(tx.amount),
                            format_cents(tx.balance),
                            tx.meta
                        );
                    }
                }
                println!("Current balance: {}", format_cents(snapshot.balance));
                gate.end_session()?;
            }

            Commands::ChangePin {
                new_pin,
                confirm,
                session,
            } => {
                let mut gate = open_session(&data, &session)?;
                gate.change_pin(&session.pin, &new_pin, &confirm)?;
                println!("PIN updated successfully.");
                gate.end_session()?;
            }

            Commands::Export { output, session } => {
                let mut gate = open_session(&data, &session)?;
                let exporter = StatementExporter::new(gate.service());
                match output {
                    Some(path) => {
                        let file = File::create(&path)
                            .with_context(|| format!("Failed to create {}", path))?;
                        let count = exporter.export_csv(&session.account, file)?;
                        println!("Exported {} transaction(s) to {}", count, path);
                    }
                    None => {
                        exporter.export_csv(&session.account, std::io::stdout())?;
                    }
                }
                gate.end_session()?;
            }
        }

        Ok(())
    }
}

fn parse_amount(raw: &str) -> Result<Cents> {
    parse_cents(raw).context("Invalid amount format. Use '50.00' or '50'")
}

fn open_session(data: &str, session: &SessionArgs) -> Result<SessionGate> {
    let service = LedgerService::open(data)?;
    let mut gate = SessionGate::new(service);
    if !gate.authenticate(&session.account, &session.pin) {
        bail!("Invalid account or PIN.");
    }
    Ok(gate)
}
