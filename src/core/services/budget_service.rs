//! Provides budget-vs-spend evaluation and overage alerts.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    currency::CurrencyFormatter,
    errors::{LedgerError, Result},
    ledger::{Budget, BudgetMap, Transaction},
};

use super::summary_service::SummaryService;

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Percentages above which a budget is flagged. Presentation tiers, not invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetThresholds {
    pub warning_percent: Decimal,
    pub danger_percent: Decimal,
}

impl Default for BudgetThresholds {
    fn default() -> Self {
        Self {
            warning_percent: Decimal::from(70),
            danger_percent: Decimal::from(90),
        }
    }
}

impl BudgetThresholds {
    pub fn validate(&self) -> Result<()> {
        if self.warning_percent <= Decimal::ZERO || self.warning_percent > self.danger_percent {
            return Err(LedgerError::validation(format!(
                "budget thresholds must satisfy 0 < warning ({}) <= danger ({})",
                self.warning_percent, self.danger_percent
            )));
        }
        Ok(())
    }

    pub fn severity(&self, percentage: Decimal) -> BudgetSeverity {
        if percentage > self.danger_percent {
            BudgetSeverity::Danger
        } else if percentage > self.warning_percent {
            BudgetSeverity::Warning
        } else {
            BudgetSeverity::Ok
        }
    }
}

/// Progress-bar tier derived from the spent percentage alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetSeverity {
    Ok,
    Warning,
    Danger,
}

/// Overall status, ordered by visual severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    Ok,
    Warning,
    Danger,
    Exceeded,
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BudgetStatus::Ok => "ok",
            BudgetStatus::Warning => "warning",
            BudgetStatus::Danger => "danger",
            BudgetStatus::Exceeded => "exceeded",
        };
        f.write_str(label)
    }
}

/// Spend measured against one category limit.
///
/// `severity` and `exceeded` are independent: a category can be in the danger
/// tier and over its limit at the same time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetEvaluation {
    pub category: String,
    pub limit: Decimal,
    pub spent: Decimal,
    pub percentage: Decimal,
    pub severity: BudgetSeverity,
    pub exceeded: bool,
}

impl BudgetEvaluation {
    pub fn status(&self) -> BudgetStatus {
        if self.exceeded {
            return BudgetStatus::Exceeded;
        }
        match self.severity {
            BudgetSeverity::Ok => BudgetStatus::Ok,
            BudgetSeverity::Warning => BudgetStatus::Warning,
            BudgetSeverity::Danger => BudgetStatus::Danger,
        }
    }

    /// Amount spent beyond the limit, if any.
    pub fn overage(&self) -> Option<Decimal> {
        self.exceeded.then(|| self.spent - self.limit)
    }

    /// Percentage clamped to 100 for progress bars.
    pub fn progress_percent(&self) -> Decimal {
        self.percentage.min(ONE_HUNDRED)
    }
}

/// Notice raised for a category whose spend went over its limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetAlert {
    pub category: String,
    pub overage: Decimal,
}

impl BudgetAlert {
    pub fn message(&self, formatter: &CurrencyFormatter) -> String {
        format!(
            "{}: Exceeded budget by {}",
            self.category,
            formatter.format(self.overage)
        )
    }
}

impl fmt::Display for BudgetAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message(&CurrencyFormatter::default()))
    }
}

/// Stateless budgeting utilities over borrowed ledger data.
pub struct BudgetService;

impl BudgetService {
    /// Evaluates every budget against the expense totals of `transactions`,
    /// in category order.
    pub fn evaluate(
        budgets: &BudgetMap,
        transactions: &[Transaction],
        thresholds: &BudgetThresholds,
    ) -> Vec<BudgetEvaluation> {
        let spent_by_category = SummaryService::expenses_by_category(transactions);
        budgets
            .iter()
            .filter_map(|budget| {
                let spent = spent_by_category
                    .get(&budget.category)
                    .copied()
                    .unwrap_or(Decimal::ZERO);
                Self::evaluate_budget(&budget, spent, thresholds)
            })
            .collect()
    }

    /// Evaluates a single budget. Returns `None` for a non-positive limit.
    ///
    /// A percentage outside the `Decimal` range saturates at [`Decimal::MAX`];
    /// `exceeded` compares the amounts directly.
    pub fn evaluate_budget(
        budget: &Budget,
        spent: Decimal,
        thresholds: &BudgetThresholds,
    ) -> Option<BudgetEvaluation> {
        if budget.limit <= Decimal::ZERO {
            return None;
        }
        let percentage = spent
            .checked_div(budget.limit)
            .and_then(|ratio| ratio.checked_mul(ONE_HUNDRED))
            .unwrap_or(Decimal::MAX);
        Some(BudgetEvaluation {
            category: budget.category.clone(),
            limit: budget.limit,
            spent,
            percentage,
            severity: thresholds.severity(percentage),
            exceeded: spent > budget.limit,
        })
    }

    /// Alerts for exceeded categories only.
    pub fn alerts(evaluations: &[BudgetEvaluation]) -> Vec<BudgetAlert> {
        evaluations
            .iter()
            .filter_map(|evaluation| {
                evaluation.overage().map(|overage| BudgetAlert {
                    category: evaluation.category.clone(),
                    overage,
                })
            })
            .collect()
    }
}
