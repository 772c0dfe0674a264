mod common;

use assert_fs::prelude::*;
use chrono::NaiveDate;
use common::{expense, income};
use expense_core::{
    core::services::{ExportService, CSV_HEADER},
    ledger::Transaction,
};
use insta::assert_snapshot;
use regex::Regex;

fn ledger() -> Vec<Transaction> {
    vec![
        Transaction::from_draft("1706745600000", expense("Lunch, with team", "12.50", "Food", "2024-02-01"))
            .unwrap(),
        Transaction::from_draft("1704412800000", income("Salary", "1000", "Work", "2024-01-05")).unwrap(),
    ]
}

#[test]
fn csv_lists_transactions_in_ledger_order() {
    let csv = ExportService::to_csv(&ledger()).unwrap();
    assert_snapshot!(csv, @r###"
    ID,Title,Amount,Type,Category,Date
    1706745600000,"Lunch, with team",12.5,expense,Food,2024-02-01
    1704412800000,"Salary",1000,income,Work,2024-01-05
    "###);
}

#[test]
fn csv_starts_with_header_and_has_one_row_per_transaction() {
    let csv = ExportService::to_csv(&ledger()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], CSV_HEADER);
    assert_eq!(lines.len(), 3);
    assert!(!csv.ends_with('\n'));
}

#[test]
fn empty_ledger_export_is_rejected() {
    let dir = assert_fs::TempDir::new().unwrap();
    let today = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
    let err = ExportService::write_csv(&[], dir.path(), today).unwrap_err();
    assert!(err.is_validation());
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[test]
fn write_csv_creates_dated_file() {
    let dir = assert_fs::TempDir::new().unwrap();
    let target = dir.child("exports");
    let today = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
    let path = ExportService::write_csv(&ledger(), target.path(), today).unwrap();

    let name = path.file_name().and_then(|n| n.to_str()).unwrap();
    let pattern = Regex::new(r"^transactions_\d{4}-\d{2}-\d{2}\.csv$").unwrap();
    assert!(pattern.is_match(name), "unexpected file name {name}");
    target
        .child("transactions_2024-03-09.csv")
        .assert(predicates::str::starts_with(CSV_HEADER));
}
