//! Command dispatch, error reporting and shell context helpers.

use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use dialoguer::theme::ColorfulTheme;
use rustyline::error::ReadlineError;
use tracing::debug;

pub use crate::errors::CliError;
use crate::{
    config::{ConfigError, ConfigManager},
    core::{
        services::{Dashboard, FilterCriteria},
        utils, LedgerStore, SystemClock,
    },
    currency::CurrencyFormatter,
    errors::LedgerError,
    storage::JsonFileStore,
};

use super::commands;
use super::io as cli_io;
use super::registry::CommandRegistry;
pub use super::shell_context::{CliMode, ShellContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Core(#[from] LedgerError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl CommandError {
    pub(crate) fn usage(usage: &str) -> Self {
        CommandError::InvalidArguments(format!("usage: {usage}"))
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Core(inner) => CliError::Core(inner),
            CommandError::InvalidArguments(message) => CliError::Input(message),
            other => CliError::Command(other.to_string()),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Core(LedgerError::Io(err))
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<ReadlineError> for CliError {
    fn from(err: ReadlineError) -> Self {
        CliError::Input(err.to_string())
    }
}

impl ShellContext {
    /// Opens the shell against the data directory resolved from the environment.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_home(mode, utils::app_data_dir())
    }

    pub fn with_home(mode: CliMode, home: PathBuf) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config_manager = ConfigManager::with_base_dir(&home)?;
        let config = config_manager.load()?;
        cli_io::apply_config(&config);

        let storage = JsonFileStore::new(utils::store_dir_in(&home))?;
        let (store, report) = LedgerStore::open(Box::new(storage), Arc::new(SystemClock))?;
        if let Some(reason) = &report.recovered_from {
            cli_io::print_warning(format!(
                "Stored data could not be read and was reset: {}",
                reason
            ));
        }
        debug!("shell opened at {}", home.display());

        Ok(ShellContext {
            mode,
            registry,
            store,
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            home,
            running: true,
        })
    }

    pub(crate) fn prompt(&self) -> String {
        format!("expense-core [{}]> ", self.store.ledger().transaction_count())
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = crate::cli::shell::parse_command_line(line)
            .map_err(|err| CommandError::InvalidArguments(err.to_string()))?;
        let Some((first, rest)) = tokens.split_first() else {
            return Ok(LoopControl::Continue);
        };
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        self.dispatch(&first.to_lowercase(), first, &args)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        if let Some(name) = self.registry.suggest(input) {
            cli_io::print_info(format!("Suggestion: `{}`?", name));
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        self.confirm("Exit shell?", true).map_err(CliError::from)
    }

    /// Asks a yes/no question. Script mode always answers yes.
    pub(crate) fn confirm(&self, prompt: &str, default: bool) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, default)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(&message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Core(LedgerError::Validation(message)) => {
                cli_io::print_error(format!("Invalid input: {}", message));
                Ok(())
            }
            other => {
                cli_io::print_error(other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn print_warning(&self, message: &str) {
        cli_io::print_warning(message);
    }

    pub(crate) fn formatter(&self) -> CurrencyFormatter {
        self.config.formatter()
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        cli_io::apply_config(&self.config);
        Ok(())
    }

    pub(crate) fn dashboard(&self, criteria: &FilterCriteria) -> Dashboard {
        Dashboard::build(self.store.ledger(), criteria, &self.config.budget_thresholds)
    }

    /// Export destination: explicit argument, then config, then `<home>/exports`.
    pub(crate) fn export_dir(&self, requested: Option<&str>) -> PathBuf {
        match (requested, &self.config.export_dir) {
            (Some(dir), _) => PathBuf::from(dir),
            (None, Some(configured)) => configured.clone(),
            (None, None) => utils::export_dir_in(self.home()),
        }
    }

    pub(crate) fn home(&self) -> &Path {
        &self.home
    }
}
