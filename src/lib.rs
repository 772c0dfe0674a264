#![doc(test(attr(deny(warnings))))]

//! Expense Core offers the ledger, filtering, aggregation and budget evaluation
//! primitives behind a personal income/expense tracker, plus a small CLI.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

pub use crate::core::{
    services::{
        BudgetAlert, BudgetEvaluation, BudgetService, BudgetStatus, BudgetThresholds, Dashboard,
        ExportService, FilterCriteria, FilterService, Summary, SummaryService,
    },
    LedgerStore, LoadReport,
};
pub use errors::{LedgerError, Result};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Expense Core tracing initialized.");
    });
}
