use rust_decimal::{prelude::ToPrimitive, Decimal};

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::{ArgumentShape, CommandEntry};
use crate::cli::table::{Table, TableColumn};
use crate::core::services::{BudgetEvaluation, BudgetService};
use crate::currency::format_percent;

const BUDGET_USAGE: &str = "budget <set <category> <amount> | list | remove <category>>";
const BAR_WIDTH: usize = 10;
const USED_DISPLAY_CAP: Decimal = Decimal::from_parts(9_999, 0, 0, false, 0);

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("budget", "Manage category budgets", BUDGET_USAGE, cmd_budget)
            .with_arguments(ArgumentShape::BudgetAction),
        CommandEntry::new(
            "alerts",
            "Show categories that exceeded their budget",
            "alerts",
            cmd_alerts,
        ),
    ]
}

fn cmd_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        ["set", category, amount] => {
            let budget = context.store.set_budget(category, amount)?;
            io::print_success(format!(
                "Budget for {} set to {}.",
                budget.category,
                context.formatter().format(budget.limit)
            ));
            Ok(())
        }
        ["remove", category] => {
            if context.store.remove_budget(category)? {
                io::print_success(format!("Budget for {} removed.", category));
            } else {
                io::print_warning(format!("No budget set for {}.", category));
            }
            Ok(())
        }
        ["list"] | [] => list_budgets(context),
        _ => Err(CommandError::usage(BUDGET_USAGE)),
    }
}

fn list_budgets(context: &ShellContext) -> CommandResult {
    let evaluations = BudgetService::evaluate(
        context.store.budgets(),
        context.store.transactions(),
        &context.config.budget_thresholds,
    );
    if evaluations.is_empty() {
        io::print_info("No budgets set. Use `budget set <category> <amount>`.");
        return Ok(());
    }
    let formatter = context.formatter();
    let mut table = Table::new(
        Some("Budgets"),
        vec![
            TableColumn::new("Category", 12),
            TableColumn::new("Limit", 10).right(),
            TableColumn::new("Spent", 10).right(),
            TableColumn::new("Used", 7).right(),
            TableColumn::new("Progress", BAR_WIDTH + 2),
            TableColumn::new("Status", 8),
        ],
    );
    for evaluation in &evaluations {
        table.add_row(vec![
            evaluation.category.clone(),
            formatter.format(evaluation.limit),
            formatter.format(evaluation.spent),
            used_label(evaluation),
            progress_bar(evaluation),
            evaluation.status().to_string(),
        ]);
    }
    table.print();
    Ok(())
}

fn used_label(evaluation: &BudgetEvaluation) -> String {
    if evaluation.percentage > USED_DISPLAY_CAP {
        format!(">{USED_DISPLAY_CAP}%")
    } else {
        format_percent(evaluation.percentage)
    }
}

/// Fixed-width bar filled up to the capped progress, e.g. `[#######...]`.
fn progress_bar(evaluation: &BudgetEvaluation) -> String {
    let filled = (evaluation.progress_percent() * Decimal::from(BAR_WIDTH) / Decimal::ONE_HUNDRED)
        .round()
        .to_usize()
        .unwrap_or(0)
        .min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

fn cmd_alerts(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let evaluations = BudgetService::evaluate(
        context.store.budgets(),
        context.store.transactions(),
        &context.config.budget_thresholds,
    );
    let alerts = BudgetService::alerts(&evaluations);
    if alerts.is_empty() {
        io::print_success("All budgets are within their limits.");
        return Ok(());
    }
    let formatter = context.formatter();
    for alert in alerts {
        io::print_warning(alert.message(&formatter));
    }
    Ok(())
}
