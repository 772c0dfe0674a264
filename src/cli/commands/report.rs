use rust_decimal::Decimal;

use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::{ArgumentShape, CommandEntry};
use crate::cli::table::{Table, TableColumn};
use crate::core::services::{FilterCriteria, FilterService, SummaryService};
use crate::currency::format_percent;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "summary",
            "Show total income, expenses and balance",
            "summary [month=yyyy-mm] [category=<name>] [type=<kind>] [search=<text>]",
            cmd_summary,
        )
        .with_arguments(ArgumentShape::Filters),
        CommandEntry::new(
            "categories",
            "Show expense totals per category",
            "categories",
            cmd_categories,
        ),
        CommandEntry::new(
            "monthly",
            "Show income and expenses per month",
            "monthly",
            cmd_monthly,
        ),
        CommandEntry::new(
            "filters",
            "Show the months and categories available for filtering",
            "filters",
            cmd_filters,
        ),
    ]
}

/// Totals over the whole ledger, or over the filtered view when filters are given.
fn cmd_summary(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let criteria = super::transaction::parse_criteria(args)?;
    let dashboard = context.dashboard(&criteria);
    let summary = if criteria.is_unfiltered() {
        dashboard.summary
    } else {
        SummaryService::summary(&dashboard.visible)
    };
    let formatter = context.formatter();
    output::section("Summary");
    output::plain(format!("Income:   {}", formatter.format(summary.total_income)));
    output::plain(format!("Expenses: {}", formatter.format(summary.total_expense)));
    output::plain(format!("Balance:  {}", formatter.format(summary.balance)));
    Ok(())
}

fn cmd_categories(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let dashboard = context.dashboard(&FilterCriteria::all());
    if dashboard.expenses_by_category.is_empty() {
        io::print_info("No expenses recorded yet.");
        return Ok(());
    }
    let formatter = context.formatter();
    let total = dashboard.summary.total_expense;
    let mut table = Table::new(
        Some("Expenses by category"),
        vec![
            TableColumn::new("Category", 12),
            TableColumn::new("Spent", 10).right(),
            TableColumn::new("Share", 6).right(),
        ],
    );
    for (category, spent) in &dashboard.expenses_by_category {
        let share = spent
            .checked_div(total)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .unwrap_or(Decimal::ZERO);
        table.add_row(vec![
            category.clone(),
            formatter.format(*spent),
            format_percent(share),
        ]);
    }
    table.print();
    Ok(())
}

fn cmd_monthly(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let dashboard = context.dashboard(&FilterCriteria::all());
    if !dashboard.has_transactions() {
        io::print_info("No transactions recorded yet.");
        return Ok(());
    }
    let formatter = context.formatter();
    let mut table = Table::new(
        Some("Monthly income vs expenses"),
        vec![
            TableColumn::new("Month", 8),
            TableColumn::new("Income", 10).right(),
            TableColumn::new("Expenses", 10).right(),
            TableColumn::new("Net", 10).right(),
        ],
    );
    for month in &dashboard.monthly_series {
        table.add_row(vec![
            month.month.short_label(),
            formatter.format(month.income),
            formatter.format(month.expense),
            formatter.format(month.net()),
        ]);
    }
    table.print();
    Ok(())
}

fn cmd_filters(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let transactions = context.store.transactions();
    let months = FilterService::available_months(transactions);
    let categories = FilterService::available_categories(transactions);
    output::section("Months");
    if months.is_empty() {
        output::plain("  (none)");
    }
    for month in months {
        output::plain(format!("  {}  {}", month, month.label()));
    }
    output::section("Categories");
    if categories.is_empty() {
        output::plain("  (none)");
    }
    for category in categories {
        output::plain(format!("  {}", category));
    }
    Ok(())
}
