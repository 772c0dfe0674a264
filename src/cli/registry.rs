use strsim::levenshtein;

use crate::cli::core::CommandResult;
use crate::cli::shell_context::ShellContext;

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

const SUGGESTION_DISTANCE: usize = 3;

/// Help sections, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CommandGroup {
    Transactions,
    Reports,
    Budgets,
    Data,
    System,
}

impl CommandGroup {
    pub fn title(self) -> &'static str {
        match self {
            CommandGroup::Transactions => "Transactions",
            CommandGroup::Reports => "Reports",
            CommandGroup::Budgets => "Budgets",
            CommandGroup::Data => "Data",
            CommandGroup::System => "System",
        }
    }
}

/// Shape of a command's arguments, used by tab completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArgumentShape {
    #[default]
    Free,
    /// `add <title> <amount> <kind> <category> [date]`
    TransactionFields,
    /// `month=`, `category=`, `type=` and `search=` pairs.
    Filters,
    /// `set|list|remove` followed by a category.
    BudgetAction,
    /// One of a fixed set of words.
    Choice(&'static [&'static str]),
    /// Another command's name.
    CommandName,
}

pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
    pub arguments: ArgumentShape,
    pub group: CommandGroup,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
            arguments: ArgumentShape::Free,
            group: CommandGroup::System,
        }
    }

    pub fn with_arguments(mut self, arguments: ArgumentShape) -> Self {
        self.arguments = arguments;
        self
    }
}

/// Commands in registration order. Lookup ignores ASCII case.
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `entries` under `group`. A repeated name replaces the earlier
    /// entry in place.
    pub fn register_group(&mut self, group: CommandGroup, entries: Vec<CommandEntry>) {
        for mut entry in entries {
            entry.group = group;
            match self.position(entry.name) {
                Some(index) => self.entries[index] = entry,
                None => self.entries.push(entry),
            }
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.name.eq_ignore_ascii_case(name))
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.position(name).map(|index| &self.entries[index])
    }

    pub fn handler(&self, name: &str) -> Option<CommandHandler> {
        self.get(name).map(|entry| entry.handler)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }

    /// Entries bucketed by group, groups in display order.
    pub fn grouped(&self) -> Vec<(CommandGroup, Vec<&CommandEntry>)> {
        let mut groups: Vec<(CommandGroup, Vec<&CommandEntry>)> = Vec::new();
        for entry in &self.entries {
            match groups.iter_mut().find(|(group, _)| *group == entry.group) {
                Some((_, members)) => members.push(entry),
                None => groups.push((entry.group, vec![entry])),
            }
        }
        groups.sort_by_key(|(group, _)| *group);
        groups
    }

    /// Closest command name to a mistyped `input`, if any is near enough.
    pub fn suggest(&self, input: &str) -> Option<&'static str> {
        let needle = input.to_lowercase();
        self.names()
            .map(|name| (levenshtein(name, &needle), name))
            .filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, name)| name)
    }
}
