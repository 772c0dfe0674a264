use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A spending guardrail for a single category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub category: String,
    pub limit: Decimal,
}

impl Budget {
    pub fn new(category: impl Into<String>, limit: Decimal) -> Self {
        Self {
            category: category.into(),
            limit,
        }
    }
}

/// Category name to spending limit. Persisted as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BudgetMap(BTreeMap<String, Decimal>);

impl BudgetMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites a limit, returning the previous one.
    pub fn set(&mut self, category: impl Into<String>, limit: Decimal) -> Option<Decimal> {
        self.0.insert(category.into(), limit)
    }

    pub fn get(&self, category: &str) -> Option<Decimal> {
        self.0.get(category).copied()
    }

    pub fn remove(&mut self, category: &str) -> Option<Decimal> {
        self.0.remove(category)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Budgets ordered by category name.
    pub fn iter(&self) -> impl Iterator<Item = Budget> + '_ {
        self.0
            .iter()
            .map(|(category, limit)| Budget::new(category.clone(), *limit))
    }
}

impl FromIterator<(String, Decimal)> for BudgetMap {
    fn from_iter<I: IntoIterator<Item = (String, Decimal)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
