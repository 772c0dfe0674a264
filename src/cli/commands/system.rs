use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::io;
use crate::cli::registry::{ArgumentShape, CommandEntry};
use crate::config::Theme;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "theme",
            "Show, set or toggle the colour theme",
            "theme [light|dark|toggle]",
            cmd_theme,
        )
        .with_arguments(ArgumentShape::Choice(&["light", "dark", "toggle"])),
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        )
        .with_arguments(ArgumentShape::CommandName),
        CommandEntry::new("version", "Show the build version", "version", cmd_version),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_theme(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let next = match args {
        [] => {
            io::print_info(format!("Current theme: {}.", context.config.theme));
            return Ok(());
        }
        ["toggle"] => context.config.theme.toggled(),
        [value] => value.parse::<Theme>()?,
        _ => return Err(CommandError::usage("theme [light|dark|toggle]")),
    };
    context.config.theme = next;
    context.persist_config()?;
    io::print_success(format!("Theme set to {}.", next));
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    io::print_info(format!("Expense Core {}", env!("CARGO_PKG_VERSION")));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(command) = args.first().map(|name| name.to_lowercase()) {
        if let Some(entry) = context.registry.get(&command) {
            help::print_command(entry);
        } else {
            context.suggest_command(args[0]);
        }
        return Ok(());
    }

    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
