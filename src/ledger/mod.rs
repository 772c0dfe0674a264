//! Ledger domain models and persistence-friendly types.

pub mod budget;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod month;
pub mod transaction;

pub use budget::{Budget, BudgetMap};
pub use ledger::Ledger;
pub use month::YearMonth;
pub use transaction::{parse_date, Transaction, TransactionDraft, TransactionKind};
