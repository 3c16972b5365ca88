/// `load_config` module: resolves which vault and which `op` executable the CLI uses.
///
/// Settings come from four layers, highest precedence first:
///   1. command-line flags (`--vault`, `--op-bin`)
///   2. environment (`ONEPASSWORD_VAULT`, `ONEPASSWORD_OP_BIN`)
///   3. an optional YAML file (`--config`), keys `vault` and `op_bin`
///   4. defaults (`Private`, `op`)
///
/// No secrets are read here: `op` authenticates on its own.
///
/// # Errors
/// All errors in this module use `anyhow::Error` and are surfaced at the CLI boundary.
use anyhow::{Context, Result};
use onepassword_core::command::DEFAULT_PROGRAM;
use onepassword_core::DEFAULT_VAULT;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{error, info};

pub const VAULT_ENV: &str = "ONEPASSWORD_VAULT";
pub const OP_BIN_ENV: &str = "ONEPASSWORD_OP_BIN";

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub vault: String,
    pub op_bin: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            vault: DEFAULT_VAULT.to_string(),
            op_bin: DEFAULT_PROGRAM.to_string(),
        }
    }
}

/// On-disk shape; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub vault: Option<String>,
    #[serde(default)]
    pub op_bin: Option<String>,
}

/// Values given explicitly on the command line.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub vault: Option<String>,
    pub op_bin: Option<String>,
}

/// Reads and parses a YAML config file.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<FileConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let content = fs::read_to_string(path_ref).map_err(|e| {
        error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
        anyhow::anyhow!("Failed to read config file {:?}: {}", path_ref, e)
    })?;

    // An empty file is a valid, empty config.
    if content.trim().is_empty() {
        return Ok(FileConfig::default());
    }

    let parsed: FileConfig = serde_yaml::from_str(&content).map_err(|e| {
        error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
        anyhow::anyhow!("Failed to parse config YAML: {e}")
    })?;
    Ok(parsed)
}

/// Merges flags, environment, file and defaults into a [`CliConfig`].
pub fn load_config(config_path: Option<&Path>, overrides: Overrides) -> Result<CliConfig> {
    let file = match config_path {
        Some(path) => load_file(path).with_context(|| format!("loading {}", path.display()))?,
        None => FileConfig::default(),
    };

    let defaults = CliConfig::default();
    let vault = overrides
        .vault
        .or_else(|| non_empty_env(VAULT_ENV))
        .or(file.vault)
        .unwrap_or(defaults.vault);
    let op_bin = overrides
        .op_bin
        .or_else(|| non_empty_env(OP_BIN_ENV))
        .or(file.op_bin)
        .unwrap_or(defaults.op_bin);

    if vault.trim().is_empty() {
        anyhow::bail!("vault name must not be empty");
    }

    let config = CliConfig { vault, op_bin };
    info!(vault = %config.vault, op_bin = %config.op_bin, "Config resolved");
    Ok(config)
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
