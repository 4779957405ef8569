use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use engine::{Amount, TransactionKind};

#[derive(Debug, Parser)]
#[command(name = "pocketbook")]
#[command(about = "Income/expense summaries over a remote ledger")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Default, Args)]
pub struct GlobalArgs {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    pub config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:3000).
    #[arg(long, global = true)]
    pub base_url: Option<String>,
    /// Override timezone (IANA name). The token is never read from CLI.
    #[arg(long, global = true)]
    pub timezone: Option<String>,
    /// Override log level.
    #[arg(long, global = true)]
    pub level: Option<String>,
}

/// One line typed into `pocketbook shell`.
#[derive(Debug, Parser)]
#[command(name = "pocketbook", no_binary_name = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Totals for a day, month or year (`2024-03-05`, `2024-03`, `2024`,
    /// `today`, `month`, `year`). Defaults to today.
    Summary { period: Option<String> },
    /// Twelve-month breakdown of a year. Defaults to the current year.
    Year { year: Option<i32> },
    /// Per-day totals of a month (`YYYY-MM`). Defaults to the current month.
    Days { month: Option<String> },
    /// Transactions of a month, newest first.
    List { month: Option<String> },
    /// Record a new transaction.
    Add(EntryArgs),
    /// Replace an existing transaction.
    Edit {
        id: String,
        /// Date the transaction is currently filed under.
        #[arg(long)]
        previous_date: NaiveDate,
        #[command(flatten)]
        entry: EntryArgs,
    },
    /// Delete a transaction.
    Delete {
        id: String,
        /// Date the transaction is filed under.
        #[arg(long)]
        date: NaiveDate,
    },
    /// Write a month's transactions as CSV.
    Export {
        month: Option<String>,
        /// Output file; stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Drop every cached summary.
    Refresh,
    /// Read commands from stdin, one per line, sharing one cache.
    Shell,
}

#[derive(Debug, Args)]
pub struct EntryArgs {
    /// income, expense or saving.
    #[arg(long)]
    pub kind: TransactionKind,
    /// Amount in minor units, e.g. `12,000`.
    #[arg(long)]
    pub amount: Amount,
    #[arg(long)]
    pub category: i64,
    /// Defaults to today in the configured timezone.
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long, default_value = "")]
    pub description: String,
}
