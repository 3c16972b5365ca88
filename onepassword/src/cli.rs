///
/// This module implements the CLI interface for onepassword: command parsing,
/// config resolution and rendering of results.
///
/// All 1Password logic (argument building, subprocess handling, decoding, errors)
/// lives in [`onepassword-core`]. This module is strictly CLI glue.
///
/// ## How To Use
/// - For command-line users: run the `onepassword` binary with `--help`.
/// - For programmatic/integration use: call [`run`] with a constructed [`Cli`], or
///   [`execute`] with any [`CommandRunner`] and writer.
///
/// [`onepassword-core`]: ../../onepassword_core/
use crate::load_config::{load_config, CliConfig, Overrides};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use onepassword_core::{
    get_op_cli_version, list_vaults, CommandRunner, OnePassword, OpCommand, SystemRunner,
};
use std::io::Write;
use std::path::PathBuf;

/// Read vaults, items and documents through the 1Password CLI.
#[derive(Debug, Parser)]
#[clap(
    name = "onepassword",
    version,
    about = "Read 1Password vaults, items and documents through the `op` CLI"
)]
pub struct Cli {
    /// Vault to read from (default: Private)
    #[clap(long, global = true)]
    pub vault: Option<String>,

    /// Path or name of the `op` executable (default: op)
    #[clap(long = "op-bin", global = true)]
    pub op_bin: Option<PathBuf>,

    /// Optional YAML config file with `vault` and `op_bin` keys
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the installed 1Password CLI version
    Version,
    /// List all vaults the account can access
    Vaults,
    /// List items in the vault
    Items {
        /// Filter by category (repeatable)
        #[clap(long = "category")]
        categories: Vec<String>,
        /// Filter by tag (repeatable)
        #[clap(long = "tag")]
        tags: Vec<String>,
    },
    /// Print an item as JSON
    Get {
        /// Item name or ID
        item: String,
        /// Narrow the response to these field labels (repeatable)
        #[clap(long = "field")]
        fields: Vec<String>,
    },
    /// Print the value of one field of an item
    Value { item: String, field: String },
    /// Print an item's username
    Username { item: String },
    /// Print an item's password
    Password { item: String },
    /// Print an item's unique ID
    Uuid { item: String },
    /// Fetch a document item
    Document {
        item: String,
        /// Write the document here instead of stdout
        #[clap(long, short)]
        output: Option<PathBuf>,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Version => "version",
            Commands::Vaults => "vaults",
            Commands::Items { .. } => "items",
            Commands::Get { .. } => "get",
            Commands::Value { .. } => "value",
            Commands::Username { .. } => "username",
            Commands::Password { .. } => "password",
            Commands::Uuid { .. } => "uuid",
            Commands::Document { .. } => "document",
        }
    }
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    let overrides = Overrides {
        vault: cli.vault,
        op_bin: cli.op_bin.map(|p| p.to_string_lossy().into_owned()),
    };
    let config = load_config(cli.config.as_deref(), overrides)?;

    let mut stdout = std::io::stdout();
    execute(&config, cli.command, SystemRunner::new(), &mut stdout).await
}

/// Runs one subcommand against `runner`, rendering results to `out`.
pub async fn execute<R, W>(
    config: &CliConfig,
    command: Commands,
    runner: R,
    out: &mut W,
) -> Result<()>
where
    R: CommandRunner,
    W: Write,
{
    let name = command.name();
    tracing::info!(command = name, vault = %config.vault, "Executing command");
    let op_command = OpCommand::new(config.op_bin.clone());

    match command {
        Commands::Version => {
            let version = get_op_cli_version(&runner, &op_command).await?;
            writeln!(out, "{version}")?;
        }
        Commands::Vaults => {
            let vaults = list_vaults(&runner, &op_command).await?;
            write_json(out, &vaults)?;
        }
        Commands::Items { categories, tags } => {
            let op = connect(runner, op_command, config).await?;
            let items = op.list_items(&categories, &tags).await?;
            write_json(out, &items)?;
        }
        Commands::Get { item, fields } => {
            let op = connect(runner, op_command, config).await?;
            let value = op.get_item(&item, fields.as_slice()).await?;
            write_json(out, &value)?;
        }
        Commands::Value { item, field } => {
            let op = connect(runner, op_command, config).await?;
            writeln!(out, "{}", op.get_value(&item, &field).await?)?;
        }
        Commands::Username { item } => {
            let op = connect(runner, op_command, config).await?;
            writeln!(out, "{}", op.get_username(&item).await?)?;
        }
        Commands::Password { item } => {
            let op = connect(runner, op_command, config).await?;
            writeln!(out, "{}", op.get_password(&item).await?)?;
        }
        Commands::Uuid { item } => {
            let op = connect(runner, op_command, config).await?;
            writeln!(out, "{}", op.get_uuid(&item).await?)?;
        }
        Commands::Document { item, output } => {
            let op = connect(runner, op_command, config).await?;
            let bytes = op.get_document(&item).await?;
            match output {
                Some(path) => {
                    let target = path.display();
                    std::fs::write(&path, &bytes)
                        .with_context(|| format!("writing document to {target}"))?;
                    tracing::info!(path = %target, bytes = bytes.len(), "Document written");
                }
                None => out.write_all(&bytes)?,
            }
        }
    }
    out.flush()?;

    tracing::info!(command = name, "Command complete");
    Ok(())
}

async fn connect<R: CommandRunner>(
    runner: R,
    op_command: OpCommand,
    config: &CliConfig,
) -> Result<OnePassword<R>> {
    let vault = config.vault.clone();
    let op = OnePassword::with_command(runner, op_command, vault).await?;
    Ok(op)
}

fn write_json<W: Write>(out: &mut W, value: &serde_json::Value) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("rendering JSON output")?;
    writeln!(out, "{rendered}")?;
    Ok(())
}
