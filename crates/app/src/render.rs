//! Plain-text tables for the terminal.

use std::io::{self, Write};

use engine::{Amount, MonthSummary, PeriodKey, PeriodSummary, TransactionRecord, YearSummary};

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

fn money(amount: Amount) -> String {
    format!("{:>14}", amount.to_string())
}

fn header(out: &mut impl Write, label: &str) -> io::Result<()> {
    writeln!(
        out,
        "{label:<10}{:>14}{:>14}{:>14}{:>14}",
        "income", "expense", "saving", "net"
    )
}

fn row(out: &mut impl Write, label: &str, summary: &PeriodSummary) -> io::Result<()> {
    writeln!(
        out,
        "{label:<10}{}{}{}{}",
        money(summary.income),
        money(summary.expense),
        money(summary.saving),
        money(summary.net())
    )
}

pub fn summary(out: &mut impl Write, key: &PeriodKey, summary: &PeriodSummary) -> io::Result<()> {
    writeln!(out, "{key}")?;
    writeln!(out, "  income  {}", money(summary.income))?;
    writeln!(out, "  expense {}", money(summary.expense))?;
    writeln!(out, "  saving  {}", money(summary.saving))?;
    writeln!(out, "  net     {}", money(summary.net()))?;
    writeln!(out, "  entries {:>14}", summary.count)
}

pub fn year(out: &mut impl Write, year: &YearSummary) -> io::Result<()> {
    header(out, &year.year.to_string())?;
    for (month, summary) in &year.months {
        let label = MONTH_NAMES
            .get((*month as usize).saturating_sub(1))
            .copied()
            .unwrap_or("?");
        row(out, label, summary)?;
    }
    row(out, "total", &year.total)
}

/// Only days with at least one entry are listed.
pub fn days(out: &mut impl Write, month: &MonthSummary) -> io::Result<()> {
    header(out, &month.key().to_string())?;
    for (date, summary) in month.days.iter().filter(|(_, day)| !day.is_empty()) {
        row(out, &date.format("%d %a").to_string(), summary)?;
    }
    row(out, "total", &month.total)
}

pub fn transactions(out: &mut impl Write, records: &[TransactionRecord]) -> io::Result<()> {
    if records.is_empty() {
        return writeln!(out, "no transactions");
    }
    for record in records {
        writeln!(
            out,
            "{}  {:<8}{}  #{:<4} {:<12} {}",
            record.date,
            record.kind.as_str(),
            money(record.amount),
            record.category_id,
            record.id.as_str(),
            record.description
        )?;
    }
    Ok(())
}
