//! # Period Summaries
//!
//! Monthly income/expense/balance aggregation and the history-view
//! filter/sort. Both are pure functions over an explicit transaction
//! snapshot; this module never reaches into storage.
//!
//! ## Date Semantics
//! Ledger dates are calendar days (`YYYY-MM-DD`). Matching a month is
//! literal year/month decomposition of the stored date; no timezone
//! conversion is ever applied, so a movement recorded on the 1st stays on
//! the 1st regardless of where it is read.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{LedgerTransaction, TransactionKind};

// =============================================================================
// Period Summary
// =============================================================================

/// Monthly totals shown on the summary cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub total_income: Money,
    pub total_expense: Money,
    /// `total_income - total_expense`; negative when expenses dominate.
    pub balance: Money,
}

impl PeriodSummary {
    /// Summary of an empty period.
    pub const fn zero() -> Self {
        PeriodSummary {
            total_income: Money::zero(),
            total_expense: Money::zero(),
            balance: Money::zero(),
        }
    }
}

/// Aggregates the transactions falling in the given month/year.
///
/// ## Example
/// ```rust
/// use caja_core::period::aggregate_period;
///
/// let summary = aggregate_period(&[], 1, 2024);
/// assert!(summary.balance.is_zero());
/// ```
pub fn aggregate_period(
    transactions: &[LedgerTransaction],
    month: u32,
    year: i32,
) -> PeriodSummary {
    let mut total_income = Money::zero();
    let mut total_expense = Money::zero();

    for tx in transactions {
        if tx.date.month() != month || tx.date.year() != year {
            continue;
        }
        match tx.kind {
            TransactionKind::Income => total_income += tx.amount(),
            TransactionKind::Expense => total_expense += tx.amount(),
        }
    }

    PeriodSummary {
        total_income,
        total_expense,
        balance: total_income - total_expense,
    }
}

// =============================================================================
// History Filter
// =============================================================================

/// Optional filters for the movement history view.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LedgerFilter {
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub kind: Option<TransactionKind>,
}

impl LedgerFilter {
    /// Empty filter: matches everything.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    fn matches(&self, tx: &LedgerTransaction) -> bool {
        self.month.map_or(true, |m| tx.date.month() == m)
            && self.year.map_or(true, |y| tx.date.year() == y)
            && self.kind.map_or(true, |k| tx.kind == k)
    }
}

/// Filters and sorts transactions for display: newest date first, ties in
/// their incoming order (stable sort).
pub fn filter_and_sort(
    transactions: &[LedgerTransaction],
    filter: &LedgerFilter,
) -> Vec<LedgerTransaction> {
    let mut view: Vec<LedgerTransaction> = transactions
        .iter()
        .filter(|tx| filter.matches(tx))
        .cloned()
        .collect();
    view.sort_by(|a, b| b.date.cmp(&a.date));
    view
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LedgerCategory;
    use chrono::{NaiveDate, Utc};

    fn tx(date: &str, kind: TransactionKind, amount_cents: i64) -> LedgerTransaction {
        let category = match kind {
            TransactionKind::Income => LedgerCategory::OtrosIngresos,
            TransactionKind::Expense => LedgerCategory::OtrosGastos,
        };
        LedgerTransaction {
            id: format!("{date}-{amount_cents}"),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            kind,
            category,
            description: "movimiento".to_string(),
            amount_cents,
            payment_method: None,
            sale: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_input_yields_zeros() {
        assert_eq!(aggregate_period(&[], 1, 2024), PeriodSummary::zero());
    }

    #[test]
    fn test_aggregate_filters_by_month_and_year() {
        let txs = vec![
            tx("2024-01-15", TransactionKind::Income, 50_000),
            tx("2024-02-01", TransactionKind::Expense, 20_000),
        ];

        let january = aggregate_period(&txs, 1, 2024);
        assert_eq!(january.total_income.cents(), 50_000);
        assert_eq!(january.total_expense.cents(), 0);
        assert_eq!(january.balance.cents(), 50_000);

        let february = aggregate_period(&txs, 2, 2024);
        assert_eq!(february.total_income.cents(), 0);
        assert_eq!(february.total_expense.cents(), 20_000);
        assert_eq!(february.balance.cents(), -20_000);
    }

    #[test]
    fn test_same_day_of_other_year_excluded() {
        let txs = vec![
            tx("2023-01-15", TransactionKind::Income, 10_000),
            tx("2024-01-15", TransactionKind::Income, 50_000),
        ];
        let summary = aggregate_period(&txs, 1, 2024);
        assert_eq!(summary.total_income.cents(), 50_000);
    }

    #[test]
    fn test_aggregation_is_additive_over_disjoint_months() {
        let txs = vec![
            tx("2024-01-10", TransactionKind::Income, 30_000),
            tx("2024-01-20", TransactionKind::Expense, 12_000),
            tx("2024-02-05", TransactionKind::Income, 45_000),
            tx("2024-02-28", TransactionKind::Expense, 7_000),
        ];

        let jan = aggregate_period(&txs, 1, 2024);
        let feb = aggregate_period(&txs, 2, 2024);
        let whole: Vec<_> = txs.clone();

        let combined_income = jan.total_income + feb.total_income;
        let combined_expense = jan.total_expense + feb.total_expense;

        let all_income: Money = whole
            .iter()
            .filter(|t| t.kind == TransactionKind::Income)
            .map(|t| t.amount())
            .sum();
        let all_expense: Money = whole
            .iter()
            .filter(|t| t.kind == TransactionKind::Expense)
            .map(|t| t.amount())
            .sum();

        assert_eq!(combined_income, all_income);
        assert_eq!(combined_expense, all_expense);
        assert_eq!(jan.balance + feb.balance, all_income - all_expense);
    }

    #[test]
    fn test_filter_and_sort_descending_by_date() {
        let txs = vec![
            tx("2024-01-10", TransactionKind::Income, 1),
            tx("2024-03-01", TransactionKind::Expense, 2),
            tx("2024-02-15", TransactionKind::Income, 3),
        ];

        let view = filter_and_sort(&txs, &LedgerFilter::new());
        let dates: Vec<String> = view.iter().map(|t| t.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-03-01", "2024-02-15", "2024-01-10"]);
    }

    #[test]
    fn test_filter_by_kind_and_month() {
        let txs = vec![
            tx("2024-01-10", TransactionKind::Income, 1),
            tx("2024-01-12", TransactionKind::Expense, 2),
            tx("2024-02-15", TransactionKind::Income, 3),
        ];

        let incomes = filter_and_sort(&txs, &LedgerFilter::new().kind(TransactionKind::Income));
        assert_eq!(incomes.len(), 2);

        let january = filter_and_sort(&txs, &LedgerFilter::new().month(1).year(2024));
        assert_eq!(january.len(), 2);

        let january_expenses = filter_and_sort(
            &txs,
            &LedgerFilter::new()
                .month(1)
                .year(2024)
                .kind(TransactionKind::Expense),
        );
        assert_eq!(january_expenses.len(), 1);
        assert_eq!(january_expenses[0].amount_cents, 2);
    }

    #[test]
    fn test_ties_keep_incoming_order() {
        let mut a = tx("2024-01-10", TransactionKind::Income, 1);
        a.id = "first".to_string();
        let mut b = tx("2024-01-10", TransactionKind::Income, 2);
        b.id = "second".to_string();

        let view = filter_and_sort(&[a, b], &LedgerFilter::new());
        assert_eq!(view[0].id, "first");
        assert_eq!(view[1].id, "second");
    }
}
