//! CSV export of the ledger.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use tracing::info;

use crate::{
    currency::plain_amount,
    errors::{LedgerError, Result},
    ledger::Transaction,
};

pub const CSV_HEADER: &str = "ID,Title,Amount,Type,Category,Date";

pub struct ExportService;

impl ExportService {
    /// Renders transactions in ledger order.
    ///
    /// Titles are wrapped in double quotes without escaping embedded quotes or
    /// commas, matching files produced by earlier versions.
    pub fn to_csv(transactions: &[Transaction]) -> Result<String> {
        if transactions.is_empty() {
            return Err(LedgerError::validation("no transactions to export"));
        }
        let mut lines = Vec::with_capacity(transactions.len() + 1);
        lines.push(CSV_HEADER.to_string());
        lines.extend(transactions.iter().map(|txn| {
            format!(
                "{},\"{}\",{},{},{},{}",
                txn.id,
                txn.title,
                plain_amount(txn.amount),
                txn.kind,
                txn.category,
                txn.date.format("%Y-%m-%d")
            )
        }));
        Ok(lines.join("\n"))
    }

    pub fn export_file_name(date: NaiveDate) -> String {
        format!("transactions_{}.csv", date.format("%Y-%m-%d"))
    }

    /// Writes the CSV into `dir` under a dated file name and returns its path.
    pub fn write_csv(transactions: &[Transaction], dir: &Path, today: NaiveDate) -> Result<PathBuf> {
        let csv = Self::to_csv(transactions)?;
        fs::create_dir_all(dir)?;
        let path = dir.join(Self::export_file_name(today));
        fs::write(&path, csv)?;
        info!(
            "exported {} transaction(s) to {}",
            transactions.len(),
            path.display()
        );
        Ok(path)
    }
}
