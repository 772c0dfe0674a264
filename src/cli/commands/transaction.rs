use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::{ArgumentShape, CommandEntry};
use crate::cli::table::{Table, TableColumn};
use crate::core::services::{FilterCriteria, FilterService};
use crate::errors::LedgerError;
use crate::ledger::{Transaction, TransactionDraft, TransactionKind};

use super::key_values;

const ADD_USAGE: &str = "add <title> <amount> <income|expense> <category> [yyyy-mm-dd]";
const DELETE_USAGE: &str = "delete <id>";
const LIST_USAGE: &str = "list [month=yyyy-mm|all] [category=<name>|all] [type=income|expense|all] [search=<text>]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("add", "Record an income or expense", ADD_USAGE, cmd_add)
            .with_arguments(ArgumentShape::TransactionFields),
        CommandEntry::new("delete", "Delete a transaction by id", DELETE_USAGE, cmd_delete),
        CommandEntry::new("list", "List transactions, optionally filtered", LIST_USAGE, cmd_list)
            .with_arguments(ArgumentShape::Filters),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [title, amount, kind, category, rest @ ..] = args else {
        return Err(CommandError::usage(ADD_USAGE));
    };
    if rest.len() > 1 {
        return Err(CommandError::usage(ADD_USAGE));
    }
    let kind: TransactionKind = kind.parse()?;
    let date = match rest.first() {
        Some(date) => date.to_string(),
        None => context.store.clock().today().format("%Y-%m-%d").to_string(),
    };
    let draft = TransactionDraft::new(*title, *amount, kind, *category).on(date);
    let created = context.store.add_transaction(draft)?;
    io::print_success(format!(
        "Added {} `{}` ({}) as {}.",
        created.kind,
        created.title,
        context.formatter().format(created.amount),
        created.id
    ));
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [id] = args else {
        return Err(CommandError::usage(DELETE_USAGE));
    };
    let existing = match context.store.require_transaction(id) {
        Ok(existing) => existing,
        Err(LedgerError::NotFound(_)) => {
            io::print_warning(format!("Transaction `{}` not found.", id));
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };
    let prompt = format!("Delete `{}` from {}?", existing.title, existing.display_date());
    if !context.confirm(&prompt, false)? {
        io::print_info("Delete cancelled.");
        return Ok(());
    }
    if context.store.delete_transaction(id)? {
        io::print_success(format!("Deleted transaction {}.", id));
    }
    Ok(())
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let criteria = parse_criteria(args)?;
    let transactions = context.store.transactions();
    if transactions.is_empty() {
        io::print_info("No transactions recorded yet.");
        return Ok(());
    }
    let visible: Vec<&Transaction> = FilterService::filter(transactions, &criteria).collect();
    if visible.is_empty() {
        io::print_info("No transactions match the current filters.");
        return Ok(());
    }
    transaction_table(context, &visible).print();
    Ok(())
}

pub(crate) fn parse_criteria(args: &[&str]) -> Result<FilterCriteria, CommandError> {
    let (mut month, mut category, mut kind, mut search) = ("all", "all", "all", "");
    for (key, value) in key_values(args).map_err(CommandError::InvalidArguments)? {
        match key {
            "month" => month = value,
            "category" => category = value,
            "type" => kind = value,
            "search" => search = value,
            other => {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown filter `{other}` (expected month, category, type or search)"
                )))
            }
        }
    }
    Ok(FilterCriteria::parse(month, category, kind, search)?)
}

fn transaction_table(context: &ShellContext, transactions: &[&Transaction]) -> Table {
    let formatter = context.formatter();
    let mut table = Table::new(
        Some("Transactions"),
        vec![
            TableColumn::new("ID", 13),
            TableColumn::new("Date", 12),
            TableColumn::new("Title", 16),
            TableColumn::new("Category", 10),
            TableColumn::new("Amount", 10).right(),
        ],
    );
    for txn in transactions {
        table.add_row(vec![
            txn.id.clone(),
            txn.display_date(),
            txn.title.clone(),
            txn.category.clone(),
            formatter.format_signed(txn.amount, txn.is_income()),
        ]);
    }
    table
}
