use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::domain::{ExpenseRecord, Ledger, format_cents, parse_cents};

use super::{Loaded, write_atomically};

const HEADER: [&str; 4] = ["Date", "Description", "Category", "Amount"];

/// One CSV row as written on disk. Columns other than `Date` may be missing
/// from older files and are back-filled.
#[derive(Debug, Deserialize)]
struct ExpenseRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Description", default)]
    description: String,
    #[serde(rename = "Category", default)]
    category: String,
    #[serde(rename = "Amount", default)]
    amount: String,
}

impl ExpenseRow {
    fn into_record(self) -> Result<ExpenseRecord> {
        let date = parse_record_date(&self.date)?;
        let amount_cents = if self.amount.trim().is_empty() {
            0
        } else {
            parse_cents(&self.amount)
                .with_context(|| format!("Invalid amount '{}'", self.amount))?
        };
        Ok(ExpenseRecord::new(
            date,
            self.description,
            self.category,
            amount_cents,
        ))
    }
}

/// Parse a stored date. Plain `YYYY-MM-DD` is what we write; timestamps
/// with a time part are accepted and truncated to the day.
pub fn parse_record_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }

    anyhow::bail!("Invalid date '{}'", s)
}

fn read_ledger(path: &Path) -> Result<Ledger> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut records = Vec::new();
    for (index, row) in reader.deserialize::<ExpenseRow>().enumerate() {
        let line = index + 2; // header is line 1
        let record = row
            .map_err(anyhow::Error::from)
            .and_then(ExpenseRow::into_record)
            .with_context(|| format!("{}: bad row at line {}", path.display(), line))?;
        records.push(record);
    }

    Ok(Ledger::from_records(records))
}

/// Load the ledger, substituting an empty one if the file can't be read.
pub fn load_ledger(path: &Path) -> Loaded<Ledger> {
    match read_ledger(path) {
        Ok(ledger) => {
            tracing::debug!(path = %path.display(), records = ledger.len(), "loaded ledger");
            Loaded::Read(ledger)
        }
        Err(err) => {
            let reason = format!("{:#}", err);
            tracing::debug!(path = %path.display(), %reason, "ledger unreadable, starting empty");
            Loaded::Fallback {
                value: Ledger::new(),
                reason,
            }
        }
    }
}

/// Write the whole ledger, header first, in insertion order.
pub fn save_ledger(path: &Path, ledger: &Ledger) -> Result<()> {
    write_atomically(path, |out| {
        let mut writer = csv::Writer::from_writer(out);
        writer.write_record(HEADER)?;
        for record in ledger.records() {
            writer.write_record([
                record.date.format("%Y-%m-%d").to_string(),
                record.description.clone(),
                record.category.clone(),
                format_cents(record.amount_cents),
            ])?;
        }
        writer.flush()?;
        Ok(())
    })
    .with_context(|| format!("Failed to save ledger to {}", path.display()))?;

    tracing::debug!(path = %path.display(), records = ledger.len(), "saved ledger");
    Ok(())
}

/// Create a header-only ledger file if none exists. Returns true if created.
pub fn ensure_ledger_file(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    save_ledger(path, &Ledger::new())?;
    Ok(true)
}
