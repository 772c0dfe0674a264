use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::ledger::{Ledger, Transaction, YearMonth};

use super::{
    budget_service::{BudgetAlert, BudgetEvaluation, BudgetService, BudgetThresholds},
    filter_service::{FilterCriteria, FilterService},
    summary_service::{MonthlyTotals, Summary, SummaryService},
};

/// Everything a front end needs to redraw after a ledger change.
///
/// Aggregates always cover the full ledger; only `visible` honours the filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub summary: Summary,
    pub expenses_by_category: BTreeMap<String, Decimal>,
    pub monthly_series: Vec<MonthlyTotals>,
    pub visible: Vec<Transaction>,
    pub budgets: Vec<BudgetEvaluation>,
    pub alerts: Vec<BudgetAlert>,
    pub months: Vec<YearMonth>,
    pub categories: Vec<String>,
}

impl Dashboard {
    pub fn build(ledger: &Ledger, criteria: &FilterCriteria, thresholds: &BudgetThresholds) -> Self {
        let transactions = ledger.transactions.as_slice();
        let budgets = BudgetService::evaluate(&ledger.budgets, transactions, thresholds);
        let alerts = BudgetService::alerts(&budgets);
        Self {
            summary: SummaryService::summary(transactions),
            expenses_by_category: SummaryService::expenses_by_category(transactions),
            monthly_series: SummaryService::monthly_series(transactions),
            visible: FilterService::filter(transactions, criteria).cloned().collect(),
            budgets,
            alerts,
            months: FilterService::available_months(transactions),
            categories: FilterService::available_categories(transactions),
        }
    }

    pub fn has_transactions(&self) -> bool {
        !self.months.is_empty()
    }
}
