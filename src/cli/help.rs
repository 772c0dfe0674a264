use crate::cli::output;
use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::cli::table::{Table, TableColumn};

pub fn print_overview(registry: &CommandRegistry) {
    for (group, entries) in registry.grouped() {
        let mut table = Table::new(
            Some(group.title()),
            vec![TableColumn::new("Command", 10), TableColumn::new("Description", 20)],
        );
        for entry in entries {
            table.add_row(vec![entry.name, entry.description]);
        }
        table.print();
    }
    output::hint("Use `help <command>` for details.");
}

pub fn print_command(entry: &CommandEntry) {
    output::section(format!("Help: {}", entry.name));
    output::plain(format!("  {}", entry.description));
    output::plain(format!("  usage: {}", entry.usage));
}
