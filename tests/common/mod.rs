#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use expense_core::{
    core::{FixedClock, LedgerStore},
    errors::{LedgerError, Result},
    ledger::{TransactionDraft, TransactionKind},
    storage::{KeyValueStore, MemoryStore},
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// 2023-11-14T22:13:20Z
pub const BASE_MILLIS: i64 = 1_700_000_000_000;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a unique directory that outlives the calling test.
pub fn temp_home() -> std::path::PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

/// A store over shared in-memory entries, with a frozen clock.
pub fn memory_store() -> (LedgerStore, MemoryStore) {
    let backend = MemoryStore::new();
    let store = LedgerStore::new(
        Box::new(backend.clone()),
        Arc::new(FixedClock::at_millis(BASE_MILLIS)),
    );
    (store, backend)
}

pub fn expense(title: &str, amount: &str, category: &str, date: &str) -> TransactionDraft {
    TransactionDraft::new(title, amount, TransactionKind::Expense, category).on(date)
}

pub fn income(title: &str, amount: &str, category: &str, date: &str) -> TransactionDraft {
    TransactionDraft::new(title, amount, TransactionKind::Income, category).on(date)
}

/// Memory-backed store whose writes can be switched to fail.
#[derive(Clone, Default)]
pub struct FailingStore {
    inner: MemoryStore,
    fail_writes: Arc<AtomicBool>,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail_writes.store(failing, Ordering::SeqCst);
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.get(key).ok().flatten()
    }
}

impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(LedgerError::Storage("disk full".into()));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.inner.remove(key)
    }
}
