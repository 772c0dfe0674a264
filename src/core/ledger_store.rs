//! Owns the ledger snapshot and keeps it in sync with a [`KeyValueStore`].

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::{
    currency::parse_amount,
    errors::{LedgerError, Result},
    ledger::{Budget, BudgetMap, Ledger, Transaction, TransactionDraft},
    storage::{KeyValueStore, BUDGETS_KEY, TRANSACTIONS_KEY},
};

use super::time::Clock;

/// Outcome of loading persisted state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub transactions: usize,
    pub budgets: usize,
    /// Set when stored data was unreadable and the ledger fell back to empty.
    pub recovered_from: Option<String>,
}

/// Source of truth for transactions and budgets.
///
/// Every mutation is persisted before it returns; when persistence fails the
/// in-memory change is rolled back so the store keeps matching what was last
/// written.
pub struct LedgerStore {
    storage: Box<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    ledger: Ledger,
}

impl LedgerStore {
    /// Creates an empty store without touching the backend.
    pub fn new(storage: Box<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            storage,
            clock,
            ledger: Ledger::default(),
        }
    }

    /// Creates a store and loads it, resetting to empty when stored data is corrupt.
    pub fn open(storage: Box<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Result<(Self, LoadReport)> {
        let mut store = Self::new(storage, clock);
        let report = match store.load() {
            Ok(report) => report,
            Err(err) if err.is_corrupt_state() => {
                warn!("discarding unreadable ledger data: {}", err);
                store.ledger = Ledger::default();
                LoadReport {
                    recovered_from: Some(err.to_string()),
                    ..LoadReport::default()
                }
            }
            Err(err) => return Err(err),
        };
        Ok((store, report))
    }

    /// Replaces the in-memory ledger with the persisted one.
    ///
    /// Missing or blank entries load as empty collections. On error the current
    /// ledger is left untouched.
    pub fn load(&mut self) -> Result<LoadReport> {
        let transactions: Vec<Transaction> =
            read_entry(self.storage.as_ref(), TRANSACTIONS_KEY)?.unwrap_or_default();
        let budgets: BudgetMap = read_entry(self.storage.as_ref(), BUDGETS_KEY)?.unwrap_or_default();
        let ledger = Ledger {
            transactions,
            budgets,
        };
        let issues = ledger.integrity_issues();
        if !issues.is_empty() {
            return Err(LedgerError::CorruptState(issues.join("; ")));
        }
        self.ledger = ledger;
        info!(
            "loaded {} transaction(s) and {} budget(s)",
            self.ledger.transaction_count(),
            self.ledger.budgets.len()
        );
        Ok(LoadReport {
            transactions: self.ledger.transaction_count(),
            budgets: self.ledger.budgets.len(),
            recovered_from: None,
        })
    }

    /// Writes both entries to the backend.
    pub fn persist(&self) -> Result<()> {
        let transactions = serde_json::to_string(&self.ledger.transactions)?;
        let budgets = serde_json::to_string(&self.ledger.budgets)?;
        self.storage.set(TRANSACTIONS_KEY, &transactions)?;
        self.storage.set(BUDGETS_KEY, &budgets)?;
        debug!(
            "persisted {} transaction(s) and {} budget(s)",
            self.ledger.transaction_count(),
            self.ledger.budgets.len()
        );
        Ok(())
    }

    /// Validates the draft, records it at the head of the ledger and persists.
    pub fn add_transaction(&mut self, draft: TransactionDraft) -> Result<Transaction> {
        let transaction = Transaction::from_draft(self.next_id(), draft)?;
        let created = transaction.clone();
        self.commit(|ledger| ledger.insert_transaction(transaction))?;
        info!(
            "added {} `{}` ({}) as {}",
            created.kind, created.title, created.amount, created.id
        );
        Ok(created)
    }

    /// Removes a transaction. Unknown ids are a no-op reported as `false`.
    pub fn delete_transaction(&mut self, id: &str) -> Result<bool> {
        if !self.ledger.contains_id(id) {
            debug!("delete ignored, transaction {} not found", id);
            return Ok(false);
        }
        self.commit(|ledger| ledger.remove_transaction(id))?;
        info!("deleted transaction {}", id);
        Ok(true)
    }

    /// Sets or overwrites the limit for a category.
    pub fn set_budget(&mut self, category: &str, amount: &str) -> Result<Budget> {
        let category = category.trim();
        if category.is_empty() {
            return Err(LedgerError::validation("budget category must not be empty"));
        }
        let limit = parse_amount(amount)?;
        let previous = self.commit(|ledger| ledger.budgets.set(category, limit))?;
        match previous {
            Some(old) => info!("budget for {} changed from {} to {}", category, old, limit),
            None => info!("budget for {} set to {}", category, limit),
        }
        Ok(Budget::new(category, limit))
    }

    /// Drops the limit for a category, returning whether one existed.
    pub fn remove_budget(&mut self, category: &str) -> Result<bool> {
        if self.ledger.budgets.get(category).is_none() {
            return Ok(false);
        }
        self.commit(|ledger| ledger.budgets.remove(category))?;
        info!("budget for {} removed", category);
        Ok(true)
    }

    /// Clears every transaction and budget. Callers confirm with the user first.
    pub fn reset_all(&mut self) -> Result<()> {
        self.commit(Ledger::clear)?;
        warn!("ledger reset, all transactions and budgets cleared");
        Ok(())
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.ledger.transactions
    }

    pub fn budgets(&self) -> &BudgetMap {
        &self.ledger.budgets
    }

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.ledger.transaction(id)
    }

    /// Like [`LedgerStore::transaction`], but an unknown id is a `NotFound` error.
    pub fn require_transaction(&self, id: &str) -> Result<&Transaction> {
        self.ledger
            .transaction(id)
            .ok_or_else(|| LedgerError::NotFound(format!("transaction `{id}`")))
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Millisecond timestamp id, bumped until unique within the ledger.
    fn next_id(&self) -> String {
        let mut candidate = self.clock.now().timestamp_millis();
        while self.ledger.contains_id(&candidate.to_string()) {
            candidate += 1;
        }
        candidate.to_string()
    }

    fn commit<T>(&mut self, change: impl FnOnce(&mut Ledger) -> T) -> Result<T> {
        let snapshot = self.ledger.clone();
        let outcome = change(&mut self.ledger);
        if let Err(err) = self.persist() {
            warn!("persist failed, rolling back change: {}", err);
            self.ledger = snapshot;
            if let Err(resync) = self.persist() {
                warn!("could not restore persisted state: {}", resync);
            }
            return Err(err);
        }
        Ok(outcome)
    }
}

fn read_entry<T: DeserializeOwned>(storage: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    match storage.get(key)? {
        Some(raw) if !raw.trim().is_empty() => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| LedgerError::CorruptState(format!("`{key}` entry: {err}"))),
        _ => Ok(None),
    }
}
