//! Command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::services::{compare, TranscriptDiff};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::infrastructure::{InfraError, ServiceContainer};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see `domnav --help`".to_string(),
        ));
    };
    match command {
        Commands::Completion { shell } => {
            cmd_completion(*shell);
            Ok(())
        }
        Commands::Config { command } => cmd_config(cli, command),
        Commands::Run { input, output } => {
            cmd_run(&container(cli)?, input.as_deref(), output.as_deref())
        }
        Commands::Check { input, expected } => {
            cmd_check(&container(cli)?, input.as_deref(), expected)
        }
        Commands::Tree { input } => cmd_tree(&container(cli)?, input.as_deref()),
    }
}

fn container(cli: &Cli) -> CliResult<ServiceContainer> {
    let settings = Settings::load(cli.config.as_deref())?;
    debug!(?settings, "settings loaded");
    Ok(ServiceContainer::new(settings))
}

fn describe(path: Option<&Path>, fallback: &str) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| fallback.to_string())
}

fn open_input(container: &ServiceContainer, input: Option<&Path>) -> CliResult<Box<dyn io::BufRead>> {
    container
        .fs
        .open_input(input)
        .map_err(|e| InfraError::io(format!("open input {}", describe(input, "<stdin>")), e).into())
}

#[instrument(level = "debug", skip(container))]
pub fn cmd_run(
    container: &ServiceContainer,
    input: Option<&Path>,
    output_path: Option<&Path>,
) -> CliResult<()> {
    let reader = open_input(container, input)?;
    let writer = container.fs.open_output(output_path).map_err(|e| {
        InfraError::io(format!("create output {}", describe(output_path, "<stdout>")), e)
    })?;

    let summary = container.session.run(reader, writer)?;
    if !summary.skipped.is_empty() {
        output::warning(&format!(
            "skipped {} malformed case(s): {:?}",
            summary.skipped.len(),
            summary.skipped
        ));
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
pub fn cmd_check(
    container: &ServiceContainer,
    input: Option<&Path>,
    expected: &Path,
) -> CliResult<()> {
    let expected_text = container
        .fs
        .read_to_string(expected)
        .map_err(|e| InfraError::io(format!("read transcript {}", expected.display()), e))?;
    let reader = open_input(container, input)?;
    let (actual, summary) = container.session.run_to_string(reader)?;

    match compare(&actual, &expected_text) {
        TranscriptDiff::Match => {
            output::success(&format!(
                "output matches transcript ({} case(s))",
                summary.answered
            ));
            Ok(())
        }
        TranscriptDiff::Mismatch {
            line,
            actual,
            expected,
        } => {
            output::header(&format!("line {line}:"));
            output::diff_remove(&expected.unwrap_or_else(|| "<end of transcript>".into()));
            output::diff_add(&actual.unwrap_or_else(|| "<end of output>".into()));
            Err(CliError::TranscriptMismatch { line })
        }
    }
}

#[instrument(level = "debug", skip(container))]
pub fn cmd_tree(container: &ServiceContainer, input: Option<&Path>) -> CliResult<()> {
    let reader = open_input(container, input)?;
    for tree in container.session.render_trees(reader)? {
        output::header(&container.settings.header_for(tree.case));
        print!("{}", tree.diagram);
        output::info(&format!(
            "depth {}, leaves: {}",
            tree.depth,
            tree.leaves.join(", ")
        ));
    }
    Ok(())
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(cli.config.as_deref())?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            let global = global_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<unavailable>".to_string());
            let local = match &cli.config {
                Some(path) => path.display().to_string(),
                None => std::env::current_dir()
                    .map(|dir| local_config_path(&dir).display().to_string())
                    .unwrap_or_else(|_| ".domnav.toml".to_string()),
            };
            output::info(&format!("global: {global}"));
            output::info(&format!("local:  {local}"));
        }
    }
    Ok(())
}

fn cmd_completion(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    eprintln!("Generating completion file for {shell:?}...");
    generate(shell, &mut cmd, name, &mut io::stdout());
}
