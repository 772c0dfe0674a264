use std::{
    fmt,
    io::{self, BufRead},
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;

use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::output::info as output_info;
use crate::cli::registry::{ArgumentShape, CommandRegistry};
use crate::core::{services::FilterService, LedgerStore};

/// When set, commands are read line by line from stdin without prompts.
pub const SCRIPT_ENV: &str = "EXPENSE_CORE_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<LedgerCompleter, DefaultHistory>::new()?;
    editor.set_helper(Some(LedgerCompleter::new(&context.registry)));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    while context.running {
        if let Some(completer) = editor.helper_mut() {
            completer.refresh(&context.store);
        }
        let prompt = context.prompt();
        let line = editor.readline(&prompt);

        match line {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                editor.add_history_entry(trimmed).ok();

                match handle_line(context, trimmed) {
                    Ok(LoopControl::Continue) => {}
                    Ok(LoopControl::Exit) => break,
                    Err(err) => context.report_error(err)?,
                }
            }
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Err(ReadlineError::Eof) => {
                output_info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        if !context.running {
            break;
        }
        let line = line?;
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }
        match handle_line(context, &line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err)?,
        }
    }
    Ok(())
}

fn handle_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let tokens = match parse_command_line(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            context.print_warning(&err.message);
            return Ok(LoopControl::Continue);
        }
    };

    if tokens.is_empty() {
        return Ok(LoopControl::Continue);
    }

    let raw = &tokens[0];
    let command = raw.to_lowercase();
    let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();

    match context.dispatch(&command, raw, &args) {
        Ok(LoopControl::Exit) => {
            context.running = false;
            Ok(LoopControl::Exit)
        }
        other => other,
    }
}

const FILTER_KEYS: [&str; 4] = ["month", "category", "type", "search"];
const KIND_WORDS: [&str; 2] = ["income", "expense"];
const BUDGET_ACTIONS: [&str; 3] = ["set", "list", "remove"];
const ALL: &str = "all";

/// Tab completion over command names, filter pairs and the months and
/// categories present in the ledger.
struct LedgerCompleter {
    commands: Vec<(&'static str, &'static str, ArgumentShape)>,
    months: Vec<String>,
    categories: Vec<String>,
}

impl LedgerCompleter {
    fn new(registry: &CommandRegistry) -> Self {
        let commands = registry
            .names()
            .filter_map(|name| registry.get(name))
            .map(|entry| (entry.name, entry.usage, entry.arguments))
            .collect();
        Self {
            commands,
            months: Vec::new(),
            categories: Vec::new(),
        }
    }

    /// Reloads months and categories after the ledger changed.
    fn refresh(&mut self, store: &LedgerStore) {
        let transactions = store.transactions();
        self.months = FilterService::available_months(transactions)
            .iter()
            .map(ToString::to_string)
            .collect();
        let mut categories = FilterService::available_categories(transactions);
        categories.extend(store.budgets().iter().map(|budget| budget.category));
        categories.sort();
        categories.dedup();
        self.categories = categories;
    }

    fn shape_of(&self, command: &str) -> Option<ArgumentShape> {
        self.commands
            .iter()
            .find(|(name, _, _)| name.eq_ignore_ascii_case(command))
            .map(|(_, _, shape)| *shape)
    }

    /// Start offset of the word under the cursor and its completions.
    fn candidates(&self, line: &str) -> (usize, Vec<String>) {
        let start = line
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let word = &line[start..];
        let head = &line[..start];
        let preceding = split(head)
            .unwrap_or_else(|_| head.split_whitespace().map(str::to_string).collect());

        let Some((command, args)) = preceding.split_first() else {
            let names = self.commands.iter().map(|(name, _, _)| name.to_string());
            return (start, matching(names, word));
        };
        let options: Vec<String> = match self.shape_of(command) {
            Some(ArgumentShape::Filters) => return (start, self.filter_candidates(args, word)),
            Some(ArgumentShape::TransactionFields) => match args.len() {
                2 => words(&KIND_WORDS),
                3 => self.categories.clone(),
                _ => Vec::new(),
            },
            Some(ArgumentShape::BudgetAction) => match args {
                [] => words(&BUDGET_ACTIONS),
                [action] if action == "set" || action == "remove" => self.categories.clone(),
                _ => Vec::new(),
            },
            Some(ArgumentShape::Choice(choices)) if args.is_empty() => words(choices),
            Some(ArgumentShape::CommandName) if args.is_empty() => self
                .commands
                .iter()
                .map(|(name, _, _)| name.to_string())
                .collect(),
            _ => Vec::new(),
        };
        (start, matching(options, word))
    }

    /// `key=` prefixes for unused filters, or `key=value` once a key is typed.
    fn filter_candidates(&self, args: &[String], word: &str) -> Vec<String> {
        match word.split_once('=') {
            Some((key, value)) => {
                let values = match key.to_ascii_lowercase().as_str() {
                    "month" => self.months.clone(),
                    "category" => self.categories.clone(),
                    "type" => words(&KIND_WORDS),
                    _ => return Vec::new(),
                };
                let values = std::iter::once(ALL.to_string()).chain(values);
                matching(values, value)
                    .into_iter()
                    .map(|value| format!("{key}={value}"))
                    .collect()
            }
            None => {
                let unused = FILTER_KEYS
                    .iter()
                    .filter(|key| !args.iter().any(|arg| arg.starts_with(&format!("{key}="))))
                    .map(|key| format!("{key}="));
                matching(unused, word)
            }
        }
    }

    /// Usage tail for a command typed in full and followed by a space.
    fn usage_hint(&self, line: &str) -> Option<String> {
        let typed = line.strip_suffix(' ')?.trim_start();
        let (name, usage, _) = self
            .commands
            .iter()
            .find(|(name, _, _)| name.eq_ignore_ascii_case(typed))?;
        usage
            .strip_prefix(name)
            .map(str::trim_start)
            .filter(|tail| !tail.is_empty())
            .map(str::to_string)
    }
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|word| word.to_string()).collect()
}

/// Candidates starting with `prefix`, ignoring case.
fn matching(candidates: impl IntoIterator<Item = String>, prefix: &str) -> Vec<String> {
    let needle = prefix.to_lowercase();
    candidates
        .into_iter()
        .filter(|candidate| candidate.to_lowercase().starts_with(&needle))
        .collect()
}

impl Helper for LedgerCompleter {}

impl Completer for LedgerCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, found) = self.candidates(&line[..pos]);
        let pairs = found
            .into_iter()
            .map(|candidate| Pair {
                display: candidate.clone(),
                replacement: candidate,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for LedgerCompleter {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &ReadlineContext<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        self.usage_hint(line)
    }
}

impl Highlighter for LedgerCompleter {}

impl Validator for LedgerCompleter {}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input).map_err(|err| ParseError {
        message: err.to_string(),
    })
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_arguments_stay_together() {
        let tokens = parse_command_line(r#"add "Weekly groceries" 52.10 expense Food"#).unwrap();
        assert_eq!(tokens[1], "Weekly groceries");
        assert_eq!(tokens.len(), 5);
    }

    #[test]
    fn unbalanced_quotes_are_reported() {
        assert!(parse_command_line(r#"add "Coffee 3 expense"#).is_err());
    }

    fn completer() -> LedgerCompleter {
        let mut registry = CommandRegistry::new();
        crate::cli::commands::register_all(&mut registry);
        let mut completer = LedgerCompleter::new(&registry);
        completer.months = vec!["2024-01".into(), "2024-02".into()];
        completer.categories = vec!["Food".into(), "Fun".into(), "Housing".into()];
        completer
    }

    #[test]
    fn first_word_completes_command_names() {
        let (start, found) = completer().candidates("al");
        assert_eq!(start, 0);
        assert_eq!(found, ["alerts"]);
        assert_eq!(completer().candidates("Mo").1, ["monthly"]);
    }

    #[test]
    fn filter_commands_offer_unused_keys() {
        let (start, found) = completer().candidates("list month=2024-01 ");
        assert_eq!(start, 19);
        assert_eq!(found, ["category=", "type=", "search="]);
        assert_eq!(completer().candidates("summary s").1, ["search="]);
    }

    #[test]
    fn filter_values_come_from_the_ledger() {
        let completer = completer();
        assert_eq!(
            completer.candidates("list month=").1,
            ["month=all", "month=2024-01", "month=2024-02"]
        );
        assert_eq!(
            completer.candidates("summary category=f").1,
            ["category=Food", "category=Fun"]
        );
        assert_eq!(completer.candidates("list type=e").1, ["type=expense"]);
        assert!(completer.candidates("list search=").1.is_empty());
    }

    #[test]
    fn add_completes_kind_then_category() {
        let completer = completer();
        assert_eq!(completer.candidates("add Rent 500 ").1, ["income", "expense"]);
        assert_eq!(
            completer.candidates(r#"add "Weekly groceries" 52.10 expense Ho"#).1,
            ["Housing"]
        );
        assert!(completer.candidates("add Re").1.is_empty());
    }

    #[test]
    fn budget_completes_action_then_category() {
        let completer = completer();
        assert_eq!(completer.candidates("budget ").1, ["set", "list", "remove"]);
        assert_eq!(completer.candidates("budget remove F").1, ["Food", "Fun"]);
        assert!(completer.candidates("budget list ").1.is_empty());
        assert_eq!(completer.candidates("theme d").1, ["dark"]);
        assert_eq!(completer.candidates("help bu").1, ["budget"]);
    }

    #[test]
    fn usage_hint_follows_a_complete_command() {
        let completer = completer();
        assert_eq!(
            completer.usage_hint("delete ").as_deref(),
            Some("<id>")
        );
        assert!(completer.usage_hint("delete").is_none());
        assert!(completer.usage_hint("exit ").is_none());
    }
}
