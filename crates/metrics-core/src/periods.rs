//! Statement-period selection shared by the three statement collections.
//! Reporting periods are not evenly spaced, so "previous" means the
//! next-most-recent row by date, not the prior calendar quarter.

use chrono::NaiveDate;

use crate::types::{BalanceSheetPeriod, CashFlowPeriod, IncomeStatementPeriod};

/// A statement row with a reporting-period date.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

impl Dated for BalanceSheetPeriod {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for IncomeStatementPeriod {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for CashFlowPeriod {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Row with the maximum reporting date.
pub fn latest<T: Dated>(rows: &[T]) -> Option<&T> {
    rows.iter().max_by_key(|r| r.date())
}

/// Row whose reporting date matches `date` exactly.
pub fn as_of<T: Dated>(rows: &[T], date: NaiveDate) -> Option<&T> {
    rows.iter().find(|r| r.date() == date)
}

/// Next-most-recent row strictly before `date`.
pub fn previous<T: Dated>(rows: &[T], date: NaiveDate) -> Option<&T> {
    rows.iter().filter(|r| r.date() < date).max_by_key(|r| r.date())
}

/// `Some(date)` selects the exact period, `None` the latest row.
pub fn select<T: Dated>(rows: &[T], period: Option<NaiveDate>) -> Option<&T> {
    match period {
        Some(date) => as_of(rows, date),
        None => latest(rows),
    }
}
