use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{budget::BudgetMap, transaction::Transaction};
use crate::currency::ensure_amount_bounds;

/// In-memory snapshot of every transaction and budget.
///
/// Transactions are kept newest-inserted-first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub budgets: BudgetMap,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_transaction(&mut self, transaction: Transaction) {
        self.transactions.insert(0, transaction);
    }

    pub fn remove_transaction(&mut self, id: &str) -> Option<Transaction> {
        let index = self.transactions.iter().position(|txn| txn.id == id)?;
        Some(self.transactions.remove(index))
    }

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.transaction(id).is_some()
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty() && self.budgets.is_empty()
    }

    pub fn clear(&mut self) {
        self.transactions.clear();
        self.budgets.clear();
    }

    /// Lists invariant violations found in a loaded snapshot.
    pub fn integrity_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        let mut seen = HashSet::new();
        for txn in &self.transactions {
            if !seen.insert(txn.id.as_str()) {
                issues.push(format!("duplicate transaction id {}", txn.id));
            }
            if let Err(err) = ensure_amount_bounds(txn.amount, "amount") {
                issues.push(format!("transaction {}: {}", txn.id, err));
            }
            if txn.title.trim().is_empty() {
                issues.push(format!("transaction {} has an empty title", txn.id));
            }
        }
        for budget in self.budgets.iter() {
            if let Err(err) = ensure_amount_bounds(budget.limit, "limit") {
                issues.push(format!("budget for {}: {}", budget.category, err));
            }
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{TransactionDraft, TransactionKind};
    use rust_decimal::Decimal;

    fn txn(id: &str, amount: &str) -> Transaction {
        let draft = TransactionDraft::new("Coffee", amount, TransactionKind::Expense, "Food")
            .on("2024-02-01");
        Transaction::from_draft(id, draft).unwrap()
    }

    #[test]
    fn insert_places_newest_first() {
        let mut ledger = Ledger::new();
        ledger.insert_transaction(txn("1", "3"));
        ledger.insert_transaction(txn("2", "4"));
        let ids: Vec<_> = ledger.transactions.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["2", "1"]);
    }

    #[test]
    fn remove_returns_none_for_unknown_id() {
        let mut ledger = Ledger::new();
        ledger.insert_transaction(txn("1", "3"));
        assert!(ledger.remove_transaction("nope").is_none());
        assert!(ledger.remove_transaction("1").is_some());
        assert_eq!(ledger.transaction_count(), 0);
    }

    #[test]
    fn integrity_issues_flags_duplicates_and_bad_amounts() {
        let mut ledger = Ledger::new();
        ledger.insert_transaction(txn("1", "3"));
        ledger.insert_transaction(txn("1", "3"));
        let mut broken = txn("2", "3");
        broken.amount = Decimal::ZERO;
        ledger.insert_transaction(broken);
        ledger.budgets.set("Food", Decimal::NEGATIVE_ONE);

        let issues = ledger.integrity_issues();
        assert_eq!(issues.len(), 3, "unexpected issues: {issues:?}");
    }

    #[test]
    fn integrity_issues_flags_out_of_range_amounts() {
        let mut ledger = Ledger::new();
        let mut huge = txn("1", "3");
        huge.amount = Decimal::from_str_exact("50000000000000000000000000000").unwrap();
        ledger.insert_transaction(huge);
        let mut precise = txn("2", "3");
        precise.amount = Decimal::new(123_456, 5);
        ledger.insert_transaction(precise);
        ledger.insert_transaction(txn("3", "1000000000000"));
        ledger
            .budgets
            .set("Food", Decimal::new(1_000_000_000_001, 0));

        let issues = ledger.integrity_issues();
        assert_eq!(issues.len(), 3, "unexpected issues: {issues:?}");
        assert!(issues.iter().any(|issue| issue.contains("must not exceed")));
        assert!(issues.iter().any(|issue| issue.contains("decimal places")));
        assert!(issues.iter().any(|issue| issue.starts_with("budget for Food")));
    }
}
