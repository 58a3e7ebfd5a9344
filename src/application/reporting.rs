use std::cmp::Reverse;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Cents, ExpenseRecord, total};

/// Spending per category over a date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryReport {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub categories: Vec<CategorySummary>,
    pub total: Cents,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    pub total: Cents,
    pub count: i64,
    pub average: Cents,
    pub percentage: f64,
}

/// Filtered expense list plus its total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseListing {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub expenses: Vec<ExpenseRecord>,
    pub total: Cents,
}

impl CategoryReport {
    /// Aggregate `records` by category. Largest totals come first; ties are
    /// broken by name.
    pub fn build<'a>(
        from_date: NaiveDate,
        to_date: NaiveDate,
        records: impl IntoIterator<Item = &'a ExpenseRecord> + Clone,
    ) -> Self {
        let total = total(records.clone());

        let mut aggregates: BTreeMap<&str, (Cents, i64)> = BTreeMap::new();
        for record in records {
            let entry = aggregates.entry(record.category.as_str()).or_insert((0, 0));
            entry.0 = entry.0.saturating_add(record.amount_cents);
            entry.1 += 1;
        }

        let mut categories: Vec<CategorySummary> = aggregates
            .into_iter()
            .map(|(category, (sum, count))| CategorySummary {
                category: category.to_string(),
                total: sum,
                count,
                average: sum / count,
                percentage: if total == 0 {
                    0.0
                } else {
                    sum as f64 * 100.0 / total as f64
                },
            })
            .collect();
        categories.sort_by_key(|c| Reverse(c.total));

        Self {
            from_date,
            to_date,
            categories,
            total,
        }
    }
}
