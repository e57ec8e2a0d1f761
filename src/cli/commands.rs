//! Command dispatch

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::Process;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, run with --help for usage".into(),
        ));
    };

    if let Commands::Completion { shell } = command {
        return completion(*shell);
    }

    let config_dir = match &cli.config_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()
            .map_err(|e| InfraError::io("determine working directory", e))?,
    };
    let settings = Settings::load(Some(&config_dir))?;
    debug!("settings: {:?}", settings);

    match command {
        Commands::Convert {
            input,
            output,
            root_tag,
            comments,
            stdout,
        } => convert(
            settings,
            input.as_deref(),
            output.as_deref(),
            root_tag.as_deref(),
            *comments,
            *stdout,
        ),
        Commands::List { input } => list(settings, input.as_deref()),
        Commands::Config { command } => config(&settings, command, &config_dir),
        Commands::Completion { .. } => Ok(()),
    }
}

#[instrument(skip(settings))]
fn convert(
    mut settings: Settings,
    input: Option<&Path>,
    output: Option<&Path>,
    root_tag: Option<&str>,
    comments: bool,
    stdout: bool,
) -> CliResult<()> {
    if let Some(tag) = root_tag {
        if tag.trim().is_empty() {
            return Err(CliError::InvalidArgs("--root-tag must not be empty".into()));
        }
        settings.root_tag = tag.to_string();
    }
    settings.include_comments |= comments;

    let input = input.map(Path::to_path_buf).unwrap_or_else(|| settings.input.clone());
    let output = output.map(Path::to_path_buf).unwrap_or_else(|| settings.output.clone());
    let container = ServiceContainer::new(settings);
    let service = container.conversion_service();

    if stdout {
        let (document, summary) = service.convert_to_string(&input)?;
        io::stdout()
            .write_all(document.as_bytes())
            .map_err(|e| InfraError::io("write document to stdout", e))?;
        debug!("wrote {} processes to stdout", summary.processes);
        return Ok(());
    }

    let summary = service.convert(&input, &output)?;
    if summary.processes == 0 {
        output::warning(&format!("no processes found in {}", input.display()));
    }
    output::success(&format!(
        "Converted {} processes ({} data rows) to {}",
        summary.processes,
        summary.rows,
        output.display()
    ));
    Ok(())
}

#[instrument(skip(settings))]
fn list(settings: Settings, input: Option<&Path>) -> CliResult<()> {
    let input = input.map(Path::to_path_buf).unwrap_or_else(|| settings.input.clone());
    let container = ServiceContainer::new(settings);
    let processes = container.conversion_service().read_processes(&input)?;

    output::header(&format!("{} processes in {}", processes.len(), input.display()));
    for (index, process) in processes.iter().enumerate() {
        output::detail(&describe(index, process));
    }
    Ok(())
}

/// One summary line per process.
pub fn describe(index: usize, process: &Process) -> String {
    let reaction = match process.product() {
        Some(product) if process.is_reversible() => format!("{} <-> {}", process.target, product),
        Some(product) => format!("{} -> {}", process.target, product),
        None => process.target.clone(),
    };
    let parameter = match (process.threshold(), process.mass_ratio()) {
        (Some(threshold), _) => format!("threshold={}", threshold),
        (None, Some(mass_ratio)) => format!("mass_ratio={}", mass_ratio),
        (None, None) => String::new(),
    };
    format!(
        "{:>4}  {:<10}  {}  {}  ({} rows)",
        index,
        process.kind(),
        reaction,
        parameter,
        process.data.len()
    )
}

fn config(settings: &Settings, command: &ConfigCommands, config_dir: &Path) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            let global = global_config_path();
            let local: PathBuf = local_config_path(config_dir);
            match global {
                Some(path) => output::detail(&format!("global: {}{}", path.display(), exists_marker(&path))),
                None => output::detail("global: (no config directory on this platform)"),
            }
            output::detail(&format!("local:  {}{}", local.display(), exists_marker(&local)));
        }
    }
    Ok(())
}

fn exists_marker(path: &Path) -> &'static str {
    if path.exists() {
        ""
    } else {
        " (missing)"
    }
}

fn completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
