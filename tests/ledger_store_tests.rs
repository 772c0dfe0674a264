mod common;

use std::sync::Arc;

use common::{expense, income, memory_store, FailingStore, BASE_MILLIS};
use expense_core::{
    core::{FixedClock, LedgerStore},
    errors::LedgerError,
    storage::{JsonFileStore, KeyValueStore, MemoryStore, BUDGETS_KEY, TRANSACTIONS_KEY},
};
use rust_decimal_macros::dec;
use serde_json::Value;
use tempfile::tempdir;

fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::at_millis(BASE_MILLIS))
}

#[test]
fn json_store_survives_reopen() {
    let dir = tempdir().unwrap();
    {
        let backend = JsonFileStore::new(dir.path().to_path_buf()).unwrap();
        let mut store = LedgerStore::new(Box::new(backend), clock());
        store
            .add_transaction(income("Salary", "1000", "Work", "2024-01-05"))
            .unwrap();
        store
            .add_transaction(expense("Rent", "500", "Housing", "2024-01-01"))
            .unwrap();
        store.set_budget("Housing", "400").unwrap();
    }

    let backend = JsonFileStore::new(dir.path().to_path_buf()).unwrap();
    let (store, report) = LedgerStore::open(Box::new(backend), clock()).unwrap();
    assert_eq!(report.transactions, 2);
    assert_eq!(report.budgets, 1);
    assert!(report.recovered_from.is_none());

    let titles: Vec<_> = store.transactions().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, ["Rent", "Salary"]);
    assert_eq!(store.budgets().get("Housing"), Some(dec!(400)));
}

#[test]
fn json_store_round_trips_every_field() {
    let dir = tempdir().unwrap();
    let amounts = [
        "0.01",
        "19.99",
        "1234.57",
        "100.10",
        "0.1",
        "999999999999.99",
        "1000000000000",
    ];
    let (created, limits) = {
        let backend = JsonFileStore::new(dir.path().to_path_buf()).unwrap();
        let mut store = LedgerStore::new(Box::new(backend), clock());
        let created: Vec<_> = amounts
            .iter()
            .enumerate()
            .map(|(idx, amount)| {
                let draft = if idx % 2 == 0 {
                    expense(&format!("Item {idx}"), amount, "Misc", "2024-02-29")
                } else {
                    income(&format!("Refund {idx}"), amount, "Work", "1999-12-31")
                };
                store.add_transaction(draft).unwrap()
            })
            .collect();
        store.set_budget("Misc", "0.01").unwrap();
        store.set_budget("Work", "1000000000000").unwrap();
        store.set_budget("Food", "250.75").unwrap();
        (created, store.budgets().clone())
    };

    let backend = JsonFileStore::new(dir.path().to_path_buf()).unwrap();
    let (reloaded, report) = LedgerStore::open(Box::new(backend), clock()).unwrap();
    assert!(report.recovered_from.is_none());
    assert_eq!(reloaded.transactions().len(), created.len());
    for txn in &created {
        assert_eq!(reloaded.transaction(&txn.id), Some(txn));
    }
    assert_eq!(reloaded.budgets(), &limits);
}

#[test]
fn out_of_range_amounts_are_rejected_before_storage() {
    let (mut store, backend) = memory_store();
    for amount in [
        "50000000000000000000000000000",
        "1000000000000.01",
        "0.123456789012345678",
        "4.999",
    ] {
        let err = store
            .add_transaction(expense("Big", amount, "Misc", "2024-01-01"))
            .unwrap_err();
        assert!(err.is_validation(), "unexpected error for {amount}: {err}");
        assert!(store.set_budget("Misc", amount).unwrap_err().is_validation());
    }
    assert!(store.transactions().is_empty());
    assert!(backend.keys().is_empty());
}

#[test]
fn stored_amounts_beyond_the_cap_count_as_corruption() {
    let oversized = r#"[
        {"id":"1","title":"A","amount":5e28,"type":"expense","category":"Food","date":"2024-01-01"}
    ]"#;
    let backend = MemoryStore::with_entries([(TRANSACTIONS_KEY, oversized)]);
    let mut store = LedgerStore::new(Box::new(backend.clone()), clock());
    assert!(store.load().unwrap_err().is_corrupt_state());

    let (store, report) = LedgerStore::open(Box::new(backend), clock()).unwrap();
    assert!(store.transactions().is_empty());
    assert!(report.recovered_from.is_some());

    let huge_limit = MemoryStore::with_entries([(BUDGETS_KEY, r#"{"Food":1e20}"#)]);
    let mut store = LedgerStore::new(Box::new(huge_limit), clock());
    assert!(store.load().unwrap_err().is_corrupt_state());
}

#[test]
fn stored_entries_keep_the_legacy_shape() {
    let (mut store, backend) = memory_store();
    store
        .add_transaction(expense("Coffee", "4.50", "Food", "2024-03-01"))
        .unwrap();
    store.set_budget("Food", "120").unwrap();

    let raw = backend.get(TRANSACTIONS_KEY).unwrap().unwrap();
    let parsed: Value = serde_json::from_str(&raw).unwrap();
    let entry = &parsed[0];
    assert_eq!(entry["id"], Value::String(BASE_MILLIS.to_string()));
    assert_eq!(entry["title"], "Coffee");
    assert_eq!(entry["amount"].as_f64(), Some(4.5));
    assert_eq!(entry["type"], "expense");
    assert_eq!(entry["category"], "Food");
    assert_eq!(entry["date"], "2024-03-01");

    let budgets: Value = serde_json::from_str(&backend.get(BUDGETS_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(budgets["Food"].as_f64(), Some(120.0));
}

#[test]
fn ids_stay_unique_under_a_frozen_clock() {
    let (mut store, _) = memory_store();
    let ids: Vec<String> = (0..5)
        .map(|idx| {
            store
                .add_transaction(expense(&format!("Item {idx}"), "1", "Misc", "2024-03-01"))
                .unwrap()
                .id
        })
        .collect();
    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), 5);
}

#[test]
fn validation_failures_leave_the_ledger_untouched() {
    let (mut store, backend) = memory_store();
    for draft in [
        expense("", "5", "Food", "2024-03-01"),
        expense("Lunch", "0", "Food", "2024-03-01"),
        expense("Lunch", "-4", "Food", "2024-03-01"),
        expense("Lunch", "abc", "Food", "2024-03-01"),
        expense("Lunch", "5", "Food", "03/01/2024"),
        expense("Lunch", "5", "  ", "2024-03-01"),
    ] {
        let err = store.add_transaction(draft).unwrap_err();
        assert!(err.is_validation(), "unexpected error: {err}");
    }
    assert!(store.set_budget("Food", "0").unwrap_err().is_validation());
    assert!(store.transactions().is_empty());
    assert!(backend.keys().is_empty());
}

#[test]
fn deleting_unknown_id_is_a_quiet_no_op() {
    let (mut store, backend) = memory_store();
    assert!(!store.delete_transaction("nope").unwrap());
    assert!(backend.keys().is_empty());

    let created = store
        .add_transaction(expense("Taxi", "18", "Travel", "2024-02-02"))
        .unwrap();
    assert!(store.delete_transaction(&created.id).unwrap());
    assert!(!store.delete_transaction(&created.id).unwrap());
    assert!(store.transactions().is_empty());
}

#[test]
fn set_budget_overwrites_previous_limit() {
    let (mut store, _) = memory_store();
    store.set_budget("Food", "100").unwrap();
    let budget = store.set_budget("Food", "250.5").unwrap();
    assert_eq!(budget.limit, dec!(250.5));
    assert_eq!(store.budgets().len(), 1);
}

#[test]
fn failed_persist_rolls_back_in_memory_change() {
    let backend = FailingStore::new();
    let mut store = LedgerStore::new(Box::new(backend.clone()), clock());
    store
        .add_transaction(expense("Rent", "500", "Housing", "2024-01-01"))
        .unwrap();
    let saved = backend.raw(TRANSACTIONS_KEY);

    backend.set_failing(true);
    let err = store
        .add_transaction(expense("Lunch", "12", "Food", "2024-01-02"))
        .unwrap_err();
    assert!(matches!(err, LedgerError::Storage(_)));
    assert!(store.set_budget("Food", "50").is_err());
    assert!(store.reset_all().is_err());

    assert_eq!(store.transactions().len(), 1);
    assert!(store.budgets().is_empty());
    assert_eq!(backend.raw(TRANSACTIONS_KEY), saved);
}

#[test]
fn unreadable_entries_recover_to_an_empty_ledger() {
    let backend = MemoryStore::with_entries([(TRANSACTIONS_KEY, "{not json")]);
    let mut strict = LedgerStore::new(Box::new(backend.clone()), clock());
    assert!(strict.load().unwrap_err().is_corrupt_state());

    let (store, report) = LedgerStore::open(Box::new(backend), clock()).unwrap();
    assert!(store.transactions().is_empty());
    assert!(report.recovered_from.is_some());
}

#[test]
fn stored_invariant_violations_count_as_corruption() {
    let duplicate = r#"[
        {"id":"1","title":"A","amount":5,"type":"expense","category":"Food","date":"2024-01-01"},
        {"id":"1","title":"B","amount":6,"type":"expense","category":"Food","date":"2024-01-02"}
    ]"#;
    let backend = MemoryStore::with_entries([(TRANSACTIONS_KEY, duplicate)]);
    let mut store = LedgerStore::new(Box::new(backend), clock());
    assert!(store.load().unwrap_err().is_corrupt_state());

    let negative_budget = MemoryStore::with_entries([(BUDGETS_KEY, r#"{"Food":-5}"#)]);
    let mut store = LedgerStore::new(Box::new(negative_budget), clock());
    assert!(store.load().unwrap_err().is_corrupt_state());
}

#[test]
fn blank_entries_load_as_empty() {
    let backend = MemoryStore::with_entries([(TRANSACTIONS_KEY, ""), (BUDGETS_KEY, "  ")]);
    let mut store = LedgerStore::new(Box::new(backend), clock());
    let report = store.load().unwrap();
    assert_eq!(report.transactions, 0);
    assert_eq!(report.budgets, 0);
}

#[test]
fn reset_clears_everything_and_persists() {
    let (mut store, backend) = memory_store();
    store
        .add_transaction(expense("Rent", "500", "Housing", "2024-01-01"))
        .unwrap();
    store.set_budget("Housing", "400").unwrap();
    store.reset_all().unwrap();

    assert!(store.transactions().is_empty());
    assert!(store.budgets().is_empty());
    assert_eq!(backend.get(TRANSACTIONS_KEY).unwrap().as_deref(), Some("[]"));
    assert_eq!(backend.get(BUDGETS_KEY).unwrap().as_deref(), Some("{}"));
}
