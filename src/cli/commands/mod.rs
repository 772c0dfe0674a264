pub mod budget;
pub mod data;
pub mod report;
pub mod system;
pub mod transaction;

use crate::cli::registry::{CommandGroup, CommandRegistry};

/// Registers every command, grouped for help output.
pub(crate) fn register_all(registry: &mut CommandRegistry) {
    registry.register_group(CommandGroup::Transactions, transaction::definitions());
    registry.register_group(CommandGroup::Reports, report::definitions());
    registry.register_group(CommandGroup::Budgets, budget::definitions());
    registry.register_group(CommandGroup::Data, data::definitions());
    registry.register_group(CommandGroup::System, system::definitions());
}

/// Splits `key=value` arguments, rejecting anything else.
pub(crate) fn key_values<'a>(args: &[&'a str]) -> Result<Vec<(&'a str, &'a str)>, String> {
    args.iter()
        .map(|arg| {
            arg.split_once('=')
                .map(|(key, value)| (key.trim(), value.trim()))
                .ok_or_else(|| format!("expected key=value, got `{arg}`"))
        })
        .collect()
}
