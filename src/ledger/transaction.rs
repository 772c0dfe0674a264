use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::month::YearMonth;
use crate::{
    currency::parse_amount,
    errors::{LedgerError, Result},
};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(LedgerError::validation(format!(
                "unknown transaction type `{other}` (expected income or expense)"
            ))),
        }
    }
}

/// A recorded income or expense entry. Never edited after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub title: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: String,
    pub date: NaiveDate,
}

impl Transaction {
    /// Validates raw form input and assigns the supplied id.
    pub fn from_draft(id: impl Into<String>, draft: TransactionDraft) -> Result<Self> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(LedgerError::validation("title must not be empty"));
        }
        let category = draft.category.trim();
        if category.is_empty() {
            return Err(LedgerError::validation("category must not be empty"));
        }
        let amount = parse_amount(&draft.amount)?;
        let date = match draft.date.as_deref() {
            Some(raw) => parse_date(raw)?,
            None => return Err(LedgerError::validation("date is required")),
        };
        Ok(Self {
            id: id.into(),
            title: title.to_string(),
            amount,
            kind: draft.kind,
            category: category.to_string(),
            date,
        })
    }

    pub fn month(&self) -> YearMonth {
        YearMonth::from_date(self.date)
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Display date such as `Jan 5, 2024`.
    pub fn display_date(&self) -> String {
        self.date.format("%b %-d, %Y").to_string()
    }
}

/// Unvalidated user input for a new transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDraft {
    pub title: String,
    pub amount: String,
    pub kind: TransactionKind,
    pub category: String,
    pub date: Option<String>,
}

impl TransactionDraft {
    pub fn new(
        title: impl Into<String>,
        amount: impl Into<String>,
        kind: TransactionKind,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            amount: amount.into(),
            kind,
            category: category.into(),
            date: None,
        }
    }

    pub fn on(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }
}

/// Parses an ISO `yyyy-mm-dd` date.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::validation("date is required"));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| LedgerError::validation(format!("`{trimmed}` is not a yyyy-mm-dd date")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> TransactionDraft {
        TransactionDraft::new("  Salary ", "1000", TransactionKind::Income, "Work").on("2024-01-05")
    }

    #[test]
    fn from_draft_trims_and_parses_fields() {
        let txn = Transaction::from_draft("1", draft()).expect("valid draft");
        assert_eq!(txn.title, "Salary");
        assert_eq!(txn.amount, Decimal::new(1000, 0));
        assert_eq!(txn.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(txn.month().to_string(), "2024-01");
        assert_eq!(txn.display_date(), "Jan 5, 2024");
    }

    #[test]
    fn from_draft_rejects_invalid_input() {
        let mut empty_title = draft();
        empty_title.title = "   ".into();
        assert!(Transaction::from_draft("1", empty_title)
            .unwrap_err()
            .is_validation());

        let mut zero = draft();
        zero.amount = "0".into();
        assert!(Transaction::from_draft("1", zero).unwrap_err().is_validation());

        let mut missing_date = draft();
        missing_date.date = None;
        assert!(Transaction::from_draft("1", missing_date)
            .unwrap_err()
            .is_validation());

        let bad_date = draft().on("05/01/2024");
        assert!(Transaction::from_draft("1", bad_date)
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn serializes_kind_under_type_key() {
        let txn = Transaction::from_draft("42", draft()).unwrap();
        let json = serde_json::to_value(&txn).unwrap();
        assert_eq!(json["type"], "income");
        assert_eq!(json["date"], "2024-01-05");
        assert_eq!(json["amount"].as_f64(), Some(1000.0));
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!(
            "Expense".parse::<TransactionKind>().unwrap(),
            TransactionKind::Expense
        );
        assert!("transfer".parse::<TransactionKind>().is_err());
    }
}
