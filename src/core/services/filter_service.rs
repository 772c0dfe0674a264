//! Produces the visible subset of the ledger for list views.

use std::{collections::BTreeSet, str::FromStr};

use crate::{
    errors::{LedgerError, Result},
    ledger::{Transaction, TransactionKind, YearMonth},
};

const ALL: &str = "all";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MonthFilter {
    #[default]
    All,
    Month(YearMonth),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum KindFilter {
    #[default]
    All,
    Only(TransactionKind),
}

impl FromStr for MonthFilter {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self> {
        if value.trim() == ALL {
            Ok(MonthFilter::All)
        } else {
            value.parse().map(MonthFilter::Month)
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self> {
        Ok(if value == ALL {
            CategoryFilter::All
        } else {
            CategoryFilter::Named(value.to_string())
        })
    }
}

impl FromStr for KindFilter {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self> {
        if value.trim() == ALL {
            Ok(KindFilter::All)
        } else {
            value.parse().map(KindFilter::Only)
        }
    }
}

/// The four list filters. All of them must pass for a transaction to be shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub month: MonthFilter,
    pub category: CategoryFilter,
    pub kind: KindFilter,
    pub search_text: String,
}

impl FilterCriteria {
    /// Criteria that let every transaction through.
    pub fn all() -> Self {
        Self::default()
    }

    /// Builds criteria from raw picker values, where `"all"` disables a filter.
    pub fn parse(month: &str, category: &str, kind: &str, search_text: &str) -> Result<Self> {
        Ok(Self {
            month: month.parse()?,
            category: category.parse()?,
            kind: kind.parse()?,
            search_text: search_text.to_string(),
        })
    }

    pub fn with_month(mut self, month: YearMonth) -> Self {
        self.month = MonthFilter::Month(month);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = CategoryFilter::Named(category.into());
        self
    }

    pub fn with_kind(mut self, kind: TransactionKind) -> Self {
        self.kind = KindFilter::Only(kind);
        self
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    pub fn is_unfiltered(&self) -> bool {
        *self == Self::all()
    }

    /// `needle` is the lower-cased search text.
    fn matches(&self, txn: &Transaction, needle: &str) -> bool {
        if let MonthFilter::Month(month) = &self.month {
            if !month.contains(txn.date) {
                return false;
            }
        }
        if let CategoryFilter::Named(category) = &self.category {
            if txn.category != *category {
                return false;
            }
        }
        if let KindFilter::Only(kind) = self.kind {
            if txn.kind != kind {
                return false;
            }
        }
        needle.is_empty() || txn.title.to_lowercase().contains(needle)
    }
}

/// Stateless list filtering and filter-option helpers.
pub struct FilterService;

impl FilterService {
    /// Lazily yields matching transactions in ledger order. The iterator can be
    /// cloned to walk the same view again.
    pub fn filter<'a>(
        transactions: &'a [Transaction],
        criteria: &'a FilterCriteria,
    ) -> impl Iterator<Item = &'a Transaction> + Clone + 'a {
        let needle = criteria.search_text.to_lowercase();
        transactions
            .iter()
            .filter(move |txn| criteria.matches(txn, &needle))
    }

    /// Distinct months present in the ledger, newest first.
    pub fn available_months(transactions: &[Transaction]) -> Vec<YearMonth> {
        let months: BTreeSet<YearMonth> = transactions.iter().map(Transaction::month).collect();
        months.into_iter().rev().collect()
    }

    /// Distinct categories present in the ledger, sorted by name.
    pub fn available_categories(transactions: &[Transaction]) -> Vec<String> {
        let categories: BTreeSet<&str> = transactions
            .iter()
            .map(|txn| txn.category.as_str())
            .collect();
        categories.into_iter().map(str::to_string).collect()
    }
}
