use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::core::services::ExportService;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "export",
            "Write all transactions to a dated CSV file",
            "export [directory]",
            cmd_export,
        ),
        CommandEntry::new(
            "reset",
            "Delete every transaction and budget",
            "reset",
            cmd_reset,
        ),
    ]
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() > 1 {
        return Err(CommandError::usage("export [directory]"));
    }
    let transactions = context.store.transactions();
    if transactions.is_empty() {
        io::print_warning("Nothing to export: no transactions recorded.");
        return Ok(());
    }
    let dir = context.export_dir(args.first().copied());
    let today = context.store.clock().today();
    let path = ExportService::write_csv(transactions, &dir, today)?;
    io::print_success(format!(
        "Exported {} transaction(s) to {}.",
        transactions.len(),
        path.display()
    ));
    Ok(())
}

fn cmd_reset(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.confirm("Delete ALL transactions and budgets? This cannot be undone.", false)? {
        io::print_info("Reset cancelled.");
        return Ok(());
    }
    context.store.reset_all()?;
    io::print_success("All data cleared.");
    Ok(())
}
