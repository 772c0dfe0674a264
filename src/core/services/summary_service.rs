//! Totals and chart series derived from the ledger.

use std::{collections::BTreeMap, ops::Add};

use rust_decimal::Decimal;
use serde::Serialize;

use crate::ledger::{Transaction, TransactionKind, YearMonth};

/// Income, expense and balance over a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
}

impl Summary {
    fn record(&mut self, txn: &Transaction) {
        match txn.kind {
            TransactionKind::Income => self.total_income += txn.amount,
            TransactionKind::Expense => self.total_expense += txn.amount,
        }
        self.balance = self.total_income - self.total_expense;
    }
}

impl Add for Summary {
    type Output = Summary;

    fn add(self, other: Summary) -> Summary {
        let total_income = self.total_income + other.total_income;
        let total_expense = self.total_expense + other.total_expense;
        Summary {
            total_income,
            total_expense,
            balance: total_income - total_expense,
        }
    }
}

/// One bar pair of the monthly income vs expense chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTotals {
    pub month: YearMonth,
    pub income: Decimal,
    pub expense: Decimal,
}

impl MonthlyTotals {
    fn empty(month: YearMonth) -> Self {
        Self {
            month,
            income: Decimal::ZERO,
            expense: Decimal::ZERO,
        }
    }

    pub fn net(&self) -> Decimal {
        self.income - self.expense
    }
}

/// Stateless aggregation over borrowed transactions.
pub struct SummaryService;

impl SummaryService {
    pub fn summary<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Summary {
        transactions
            .into_iter()
            .fold(Summary::default(), |mut acc, txn| {
                acc.record(txn);
                acc
            })
    }

    /// Expense totals per category. Categories without expenses are omitted.
    pub fn expenses_by_category<'a>(
        transactions: impl IntoIterator<Item = &'a Transaction>,
    ) -> BTreeMap<String, Decimal> {
        let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
        for txn in transactions.into_iter().filter(|txn| txn.is_expense()) {
            *totals.entry(txn.category.clone()).or_default() += txn.amount;
        }
        totals
    }

    /// Income and expense per month, oldest month first, without empty months.
    pub fn monthly_series<'a>(
        transactions: impl IntoIterator<Item = &'a Transaction>,
    ) -> Vec<MonthlyTotals> {
        let mut buckets: BTreeMap<YearMonth, MonthlyTotals> = BTreeMap::new();
        for txn in transactions {
            let month = txn.month();
            let bucket = buckets
                .entry(month)
                .or_insert_with(|| MonthlyTotals::empty(month));
            match txn.kind {
                TransactionKind::Income => bucket.income += txn.amount,
                TransactionKind::Expense => bucket.expense += txn.amount,
            }
        }
        buckets.into_values().collect()
    }

    /// Total expense recorded against one category.
    pub fn category_spent<'a>(
        transactions: impl IntoIterator<Item = &'a Transaction>,
        category: &str,
    ) -> Decimal {
        transactions
            .into_iter()
            .filter(|txn| txn.is_expense() && txn.category == category)
            .map(|txn| txn.amount)
            .sum()
    }
}
