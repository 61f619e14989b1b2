//! Command dispatch: interactive shell, config and completion commands

use std::io;
use std::path::PathBuf;

use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::shell::Shell;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        None => cmd_shell(cli),
        Some(Commands::Config { command }) => cmd_config(cli, command),
        Some(Commands::Completion { shell }) => cmd_completion(*shell),
    }
}

fn working_dir() -> CliResult<PathBuf> {
    std::env::current_dir()
        .map_err(|e| InfraError::io("resolve working directory", e).into())
}

/// Layered settings plus the `--snapshot` override.
fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let cwd = working_dir()?;
    let settings = Settings::load(Some(&cwd))?;
    Ok(match &cli.snapshot {
        Some(path) => settings.with_snapshot_path(path.clone()),
        None => settings,
    })
}

fn console_err(e: io::Error) -> CliError {
    InfraError::io("console", e).into()
}

#[instrument(skip(cli))]
fn cmd_shell(cli: &Cli) -> CliResult<()> {
    let settings = load_settings(cli)?;
    debug!("settings: {:?}", settings);
    let container = ServiceContainer::new(settings);
    let (mut service, outcome) = container.dictionary_service();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = Shell::new(&mut service, stdin.lock(), stdout.lock());
    shell.report_load(&outcome).map_err(console_err)?;
    shell.run().map_err(console_err)
}

fn cmd_config(cli: &Cli, cmd: &ConfigCommands) -> CliResult<()> {
    let mut stdout = io::stdout();
    match cmd {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&mut stdout, &settings.to_toml()?).map_err(console_err)
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".into())
                })?
            } else {
                local_config_path(&working_dir()?)
            };
            if path.exists() {
                return Err(CliError::Usage(format!(
                    "config file already exists: {}",
                    path.display()
                )));
            }
            let fs = RealFileSystem;
            fs.ensure_parent(&path)
                .and_then(|()| fs.write(&path, &Settings::template()))
                .map_err(|e| InfraError::io(format!("write config {}", path.display()), e))?;
            output::success(&mut stdout, &format!("Created {}", path.display()))
                .map_err(console_err)
        }
        ConfigCommands::Path => {
            let global = global_config_path();
            let local = local_config_path(&working_dir()?);
            let describe = |path: &PathBuf| {
                let marker = if path.exists() { "" } else { " (not found)" };
                format!("{}{}", path.display(), marker)
            };
            output::info(
                &mut stdout,
                &format!(
                    "Global: {}",
                    global
                        .as_ref()
                        .map_or_else(|| "(unavailable)".to_string(), describe)
                ),
            )
            .and_then(|()| output::info(&mut stdout, &format!("Local:  {}", describe(&local))))
            .map_err(console_err)
        }
    }
}

fn cmd_completion(shell: clap_complete::Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
