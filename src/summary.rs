//! Dashboard totals computed on the client.
//!
//! The backend normally provides the summary; this is used when the
//! dashboard falls back to demo data and by the chat stub.

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate};

use crate::constants::{RECENT_TRANSACTIONS, UNCATEGORISED_LABEL};
use crate::models::{
    Category, CategoryTotal, DashboardSummary, SummaryPeriod, Transaction, TransactionKind,
};

/// Inclusive date window for a period, `None` meaning unbounded.
pub fn period_window(period: SummaryPeriod, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    match period {
        SummaryPeriod::Week => Some((today - Duration::days(6), today)),
        SummaryPeriod::Month => {
            let start = today.with_day(1)?;
            let next_month = match today.month() {
                12 => NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)?,
                m => NaiveDate::from_ymd_opt(today.year(), m + 1, 1)?,
            };
            Some((start, next_month.pred_opt()?))
        }
        SummaryPeriod::Year => {
            let start = NaiveDate::from_ymd_opt(today.year(), 1, 1)?;
            let end = NaiveDate::from_ymd_opt(today.year(), 12, 31)?;
            Some((start, end))
        }
        SummaryPeriod::All => None,
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn summarize(
    transactions: &[Transaction],
    categories: &[Category],
    period: SummaryPeriod,
    today: NaiveDate,
) -> DashboardSummary {
    let window = period_window(period, today);
    let in_window: Vec<&Transaction> = transactions
        .iter()
        .filter(|tx| match window {
            Some((from, to)) => tx.date >= from && tx.date <= to,
            None => true,
        })
        .collect();

    let mut total_income = 0.0;
    let mut total_expense = 0.0;
    let mut per_category: HashMap<Option<u32>, f64> = HashMap::new();

    for tx in &in_window {
        match tx.kind {
            TransactionKind::Income => total_income += tx.amount,
            TransactionKind::Expense => {
                total_expense += tx.amount;
                *per_category.entry(tx.category_id).or_insert(0.0) += tx.amount;
            }
        }
    }

    let names: HashMap<u32, &str> = categories.iter().map(|c| (c.id, c.name.as_str())).collect();
    let mut by_category: Vec<CategoryTotal> = per_category
        .into_iter()
        .map(|(category_id, total)| CategoryTotal {
            category_id,
            name: category_id
                .and_then(|id| names.get(&id).copied())
                .unwrap_or(UNCATEGORISED_LABEL)
                .to_string(),
            total: round_cents(total),
        })
        .collect();
    by_category.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });

    let mut recent: Vec<Transaction> = in_window.into_iter().cloned().collect();
    recent.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
    recent.truncate(RECENT_TRANSACTIONS);

    DashboardSummary {
        period,
        total_income: round_cents(total_income),
        total_expense: round_cents(total_expense),
        net: round_cents(total_income - total_expense),
        by_category,
        recent,
    }
}
