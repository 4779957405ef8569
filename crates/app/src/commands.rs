use std::io::Write;

use chrono::{Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use clap::Parser;
use engine::{Ledger, LedgerApi, PeriodKey, TransactionId, TransactionInput, TransactionRecord};
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::{
    cli::{Command, EntryArgs, ShellLine},
    error::{AppError, Result},
    render,
};

pub struct Context<A> {
    ledger: Ledger<A>,
    timezone: Tz,
}

impl<A: LedgerApi> Context<A> {
    pub fn new(ledger: Ledger<A>, timezone: Tz) -> Self {
        Self { ledger, timezone }
    }

    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }

    fn period(&self, raw: Option<&str>) -> Result<PeriodKey> {
        let today = self.today();
        match raw.unwrap_or("today") {
            "today" => Ok(PeriodKey::day(today)),
            "month" => Ok(PeriodKey::month_of(today)),
            "year" => Ok(PeriodKey::year(today.year())),
            other => Ok(other.parse()?),
        }
    }

    fn month(&self, raw: Option<&str>) -> Result<(i32, u32)> {
        let key = match raw {
            None | Some("month") => PeriodKey::month_of(self.today()),
            Some(other) => other.parse()?,
        };
        match key {
            PeriodKey::Month { year, month } => Ok((year, month)),
            other => Err(AppError::Usage(format!("expected YYYY-MM, got {other}"))),
        }
    }

    fn input(&self, entry: EntryArgs) -> TransactionInput {
        TransactionInput::new(
            entry.date.unwrap_or_else(|| self.today()),
            entry.amount.minor(),
            entry.kind,
            entry.category,
            entry.description,
        )
    }
}

/// Runs one top-level command; `shell` reads further commands from stdin.
pub async fn run<A: LedgerApi, W: Write>(
    ctx: &Context<A>,
    command: Command,
    out: &mut W,
) -> Result<()> {
    match command {
        Command::Shell => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            shell(ctx, stdin, out).await
        }
        command => execute(ctx, command, out).await,
    }
}

/// Line-oriented loop over `input`. A failing line is reported and the loop
/// goes on; `quit`, `exit` or end of input stops it.
pub async fn shell<A, R, W>(ctx: &Context<A>, input: R, out: &mut W) -> Result<()>
where
    A: LedgerApi,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if matches!(line, "quit" | "exit") {
            break;
        }

        let words = match shell_words::split(line) {
            Ok(words) => words,
            Err(err) => {
                writeln!(out, "error: {err}")?;
                continue;
            }
        };
        let command = match ShellLine::try_parse_from(words) {
            Ok(parsed) => parsed.command,
            Err(err) => {
                write!(out, "{err}")?;
                continue;
            }
        };

        if let Err(err) = execute(ctx, command, out).await {
            tracing::debug!("shell command failed: {err:?}");
            writeln!(out, "error: {err}")?;
        }
        out.flush()?;
    }
    Ok(())
}

async fn execute<A: LedgerApi, W: Write>(
    ctx: &Context<A>,
    command: Command,
    out: &mut W,
) -> Result<()> {
    match command {
        Command::Summary { period } => {
            let key = ctx.period(period.as_deref())?;
            let summary = ctx.ledger.summary(key).await?;
            render::summary(out, &key, &summary)?;
        }
        Command::Year { year } => {
            let year = year.unwrap_or_else(|| ctx.today().year());
            let summary = ctx.ledger.year_summary(year).await?;
            render::year(out, &summary)?;
        }
        Command::Days { month } => {
            let (year, month) = ctx.month(month.as_deref())?;
            let summary = ctx.ledger.daily_summaries(year, month).await?;
            render::days(out, &summary)?;
        }
        Command::List { month } => {
            let (year, month) = ctx.month(month.as_deref())?;
            let records = ctx.ledger.transactions(year, month).await?;
            render::transactions(out, &records)?;
        }
        Command::Add(entry) => {
            let record = ctx.ledger.create_transaction(ctx.input(entry)).await?;
            writeln!(out, "created {} on {}", record.id, record.date)?;
        }
        Command::Edit {
            id,
            previous_date,
            entry,
        } => {
            let id = TransactionId::new(id);
            let record = ctx
                .ledger
                .update_transaction(&id, previous_date, ctx.input(entry))
                .await?;
            writeln!(out, "updated {} on {}", record.id, record.date)?;
        }
        Command::Delete { id, date } => {
            let id = TransactionId::new(id);
            ctx.ledger.delete_transaction(&id, date).await?;
            writeln!(out, "deleted {id}")?;
        }
        Command::Export { month, output } => {
            let (year, month) = ctx.month(month.as_deref())?;
            let records = ctx.ledger.transactions(year, month).await?;
            match output {
                Some(path) => {
                    write_csv(std::fs::File::create(&path)?, &records)?;
                    writeln!(
                        out,
                        "exported {} transactions to {}",
                        records.len(),
                        path.display()
                    )?;
                }
                None => write_csv(&mut *out, &records)?,
            }
        }
        Command::Refresh => {
            ctx.ledger.refresh();
            writeln!(out, "cache cleared")?;
        }
        Command::Shell => return Err(AppError::Usage("already in a shell".to_string())),
    }
    Ok(())
}

#[derive(Serialize)]
struct ExportRow<'a> {
    id: &'a str,
    date: NaiveDate,
    kind: &'static str,
    amount: i64,
    category_id: i64,
    description: &'a str,
    created_at: String,
}

fn write_csv<W: Write>(writer: W, records: &[TransactionRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for record in records {
        writer.serialize(ExportRow {
            id: record.id.as_str(),
            date: record.date,
            kind: record.kind.as_str(),
            amount: record.amount.minor(),
            category_id: record.category_id,
            description: &record.description,
            created_at: record.created_at.to_rfc3339(),
        })?;
    }
    writer.flush()?;
    Ok(())
}
