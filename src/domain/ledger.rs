use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Cents, ExpenseRecord, ValidationError};

/// Category filter value that disables category filtering.
pub const ALL_CATEGORIES: &str = "All";

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Only(String),
}

impl CategoryFilter {
    /// `None` and the "All" sentinel both mean no filtering.
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            None | Some(ALL_CATEGORIES) => CategoryFilter::All,
            Some(name) => CategoryFilter::Only(name.to_string()),
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(name) => name == category,
        }
    }
}

/// Append-only list of expenses, kept in the order they were recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    records: Vec<ExpenseRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap records read back from storage. They are taken as-is, since the
    /// backing file can be edited by hand.
    pub fn from_records(records: Vec<ExpenseRecord>) -> Self {
        Self { records }
    }

    pub fn add(&mut self, record: ExpenseRecord) -> Result<(), ValidationError> {
        record.validate()?;
        self.records.push(record);
        Ok(())
    }

    pub fn records(&self) -> &[ExpenseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records dated within `range` whose category passes `category`,
    /// in insertion order.
    pub fn filter(&self, range: DateRange, category: &CategoryFilter) -> Vec<&ExpenseRecord> {
        self.records
            .iter()
            .filter(|r| range.contains(r.date) && category.matches(&r.category))
            .collect()
    }

    /// Earliest and latest expense dates, or `None` for an empty ledger.
    pub fn date_bounds(&self) -> Option<DateRange> {
        let first = self.records.first()?.date;
        let (start, end) = self
            .records
            .iter()
            .fold((first, first), |(start, end), r| {
                (start.min(r.date), end.max(r.date))
            });
        Some(DateRange::new(start, end))
    }
}

/// Sum of the amounts of the given records.
///
/// Loaded amounts are not validated, so the sum saturates at the `Cents`
/// bounds instead of overflowing.
pub fn total<'a>(records: impl IntoIterator<Item = &'a ExpenseRecord>) -> Cents {
    records
        .into_iter()
        .fold(0, |sum: Cents, r| sum.saturating_add(r.amount_cents))
}

/// Sum of amounts grouped by category, over whatever records are passed in.
pub fn totals_by_category<'a>(
    records: impl IntoIterator<Item = &'a ExpenseRecord>,
) -> BTreeMap<String, Cents> {
    let mut totals: BTreeMap<String, Cents> = BTreeMap::new();

    for record in records {
        let sum = totals.entry(record.category.clone()).or_insert(0);
        *sum = sum.saturating_add(record.amount_cents);
    }

    totals
}
