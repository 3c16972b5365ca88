//! # client: typed access to vaults, items and documents through `op`
//!
//! Every operation builds an argument vector with [`OpCommand`], hands it to a
//! [`CommandRunner`], and maps the outcome onto [`OnePasswordError`]:
//!   - the executable is missing            -> [`OnePasswordError::CliNotFound`]
//!   - `op` exits non-zero                  -> [`OnePasswordError::Runtime`] (carrying stderr)
//!   - stdout is not JSON                   -> [`OnePasswordError::Json`]
//!   - a required key is absent             -> [`OnePasswordError::ValueNotFound`]
//!
//! No credentials are handled here: `op` uses whatever session or service
//! account the environment provides.
//!
//! # Navigation
//! - Free functions: [`get_op_cli_version`], [`run_cmd`], [`list_vaults`], [`vaults`]
//! - Vault-scoped client: [`OnePassword`]

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::command::OpCommand;
use crate::contract::{CommandOutput, CommandRunner};
use crate::error::{OnePasswordError, Result};
use crate::models::{ItemSummary, Vault};
use crate::version::CliVersion;

/// Vault used when none is given.
pub const DEFAULT_VAULT: &str = "Private";

/// Asks `op` for its version.
///
/// The exit status is not inspected: whatever `op --version` prints must parse as a version.
pub async fn get_op_cli_version<R>(runner: &R, command: &OpCommand) -> Result<CliVersion>
where
    R: CommandRunner + ?Sized,
{
    let output = runner
        .run(command.program(), &command.version_args())
        .await
        .map_err(|e| {
            error!(program = command.program(), error = ?e, "Failed to launch op");
            OnePasswordError::from_spawn(e)
        })?;

    let version: CliVersion = output.stdout_text().parse()?;
    debug!(%version, "Detected 1Password CLI version");
    Ok(version)
}

/// Runs `op` and fails unless it exits zero.
pub async fn run_cmd<R>(
    runner: &R,
    command: &OpCommand,
    args: &[String],
) -> Result<CommandOutput>
where
    R: CommandRunner + ?Sized,
{
    let output = runner
        .run(command.program(), args)
        .await
        .map_err(OnePasswordError::from_spawn)?;

    if !output.success() {
        error!(
            subcommand = args.first().map(String::as_str).unwrap_or_default(),
            status = ?output.status,
            "op exited unsuccessfully"
        );
        return Err(OnePasswordError::Runtime(format!(
            "Encountered an error when calling subprocess, got: {}",
            output.stderr_text().trim_end()
        )));
    }
    Ok(output)
}

/// Lists every vault the signed-in account can access, as raw JSON.
pub async fn list_vaults<R>(runner: &R, command: &OpCommand) -> Result<Value>
where
    R: CommandRunner + ?Sized,
{
    let output = run_cmd(runner, command, &command.vault_list_args()).await?;
    decode(&output)
}

/// Typed form of [`list_vaults`].
pub async fn vaults<R>(runner: &R, command: &OpCommand) -> Result<Vec<Vault>>
where
    R: CommandRunner + ?Sized,
{
    let output = run_cmd(runner, command, &command.vault_list_args()).await?;
    decode(&output)
}

fn decode<T: DeserializeOwned>(output: &CommandOutput) -> Result<T> {
    serde_json::from_slice(&output.stdout).map_err(|e| {
        error!(error = %e, stdout_len = output.stdout.len(), "op response is not valid JSON");
        let message = format!("Cannot JSON load response from 1Password. Got {e}");
        OnePasswordError::Json(message)
    })
}

fn missing(key: &str) -> OnePasswordError {
    OnePasswordError::ValueNotFound(format!("Value not found. Got error: '{key}'"))
}

/// Vault-scoped entry point for all item and document reads.
///
/// Construction verifies that `op` is installed by asking for its version.
#[derive(Debug)]
pub struct OnePassword<R> {
    runner: R,
    command: OpCommand,
    vault: String,
    cli_version: CliVersion,
}

impl<R: CommandRunner> OnePassword<R> {
    /// Connects to the default `op` on `PATH` for `vault`.
    pub async fn new(runner: R, vault: impl Into<String>) -> Result<Self> {
        Self::with_command(runner, OpCommand::default(), vault).await
    }

    /// Like [`OnePassword::new`] but with an explicit `op` program.
    pub async fn with_command(
        runner: R,
        command: OpCommand,
        vault: impl Into<String>,
    ) -> Result<Self> {
        let vault = vault.into();
        let cli_version = get_op_cli_version(&runner, &command).await?;
        info!(vault = %vault, %cli_version, program = command.program(), "1Password client ready");
        Ok(Self {
            runner,
            command,
            vault,
            cli_version,
        })
    }

    pub fn vault(&self) -> &str {
        &self.vault
    }

    pub fn cli_version(&self) -> &CliVersion {
        &self.cli_version
    }

    /// Fetches an item by name or ID. With `fields`, `op` narrows the response
    /// to those labels: a single object for one field, an array for several.
    pub async fn get_item<S: AsRef<str>>(&self, item: &str, fields: &[S]) -> Result<Value> {
        debug!(vault = %self.vault, item, field_count = fields.len(), "Getting item");
        let args = self.command.item_get_args(item, &self.vault, fields);
        let output = run_cmd(&self.runner, &self.command, &args).await?;
        decode(&output)
    }

    /// Value of a single field of `item`.
    pub async fn get_value(&self, item: &str, field: &str) -> Result<String> {
        let response = self.get_item(item, &[field]).await?;
        match response.get("value") {
            Some(Value::String(value)) => Ok(value.clone()),
            Some(other) => {
                let kind = json_kind(other);
                error!(item, field, kind, "Field value is not a string");
                Err(missing("value"))
            }
            None => {
                error!(item, field, "Field value missing from op response");
                Err(missing("value"))
            }
        }
    }

    pub async fn get_username(&self, item: &str) -> Result<String> {
        self.get_value(item, "username").await
    }

    pub async fn get_password(&self, item: &str) -> Result<String> {
        self.get_value(item, "password").await
    }

    /// Unique ID of `item`.
    pub async fn get_uuid(&self, item: &str) -> Result<String> {
        const NO_FIELDS: &[&str] = &[];
        let response = self.get_item(item, NO_FIELDS).await?;
        match response.get("id").and_then(Value::as_str) {
            Some(id) => Ok(id.to_string()),
            None => Err(missing("id")),
        }
    }

    /// Raw bytes of a document item.
    pub async fn get_document(&self, item: &str) -> Result<Vec<u8>> {
        debug!(vault = %self.vault, item, "Getting document");
        let args = self.command.document_get_args(item, &self.vault);
        let output = run_cmd(&self.runner, &self.command, &args).await?;
        info!(item, bytes = output.stdout.len(), "Document retrieved");
        Ok(output.stdout)
    }

    /// Lists the vault's items, optionally filtered by categories and tags.
    pub async fn list_items<S: AsRef<str>>(&self, categories: &[S], tags: &[S]) -> Result<Value> {
        let args = self.command.item_list_args(&self.vault, categories, tags);
        let output = run_cmd(&self.runner, &self.command, &args).await?;
        decode(&output)
    }

    /// Typed form of [`OnePassword::list_items`].
    pub async fn items<S: AsRef<str>>(
        &self,
        categories: &[S],
        tags: &[S],
    ) -> Result<Vec<ItemSummary>> {
        let args = self.command.item_list_args(&self.vault, categories, tags);
        let output = run_cmd(&self.runner, &self.command, &args).await?;
        let items: Vec<ItemSummary> = decode(&output)?;
        debug!(vault = %self.vault, count = items.len(), "Listed items");
        Ok(items)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::MockCommandRunner;
    use std::io::{Error, ErrorKind};

    fn is_version_call(program: &str, args: &[String]) -> bool {
        program == "op" && args == ["--version".to_string()]
    }

    fn runner_with_version() -> MockCommandRunner {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(is_version_call)
            .times(1)
            .returning(|_, _| Ok(CommandOutput::ok("2.23.0\n")));
        runner
    }

    #[tokio::test]
    async fn new_records_cli_version_and_vault() {
        let op = OnePassword::new(runner_with_version(), DEFAULT_VAULT)
            .await
            .expect("client should connect");
        assert_eq!(op.vault(), "Private");
        assert_eq!(op.cli_version(), &CliVersion::new(2, 23, 0));
    }

    #[tokio::test]
    async fn new_fails_when_op_is_missing() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .times(1)
            .returning(|_, _| Err(Error::from(ErrorKind::NotFound)));
        let err = OnePassword::new(runner, "Private").await.unwrap_err();
        assert!(matches!(err, OnePasswordError::CliNotFound(_)));
    }

    #[tokio::test]
    async fn run_cmd_reports_stderr_on_failure() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .returning(|_, _| Ok(CommandOutput::failed(1, "I have failed\n")));
        let args = ["nonexistent", "please", "fail"].map(String::from);
        let command = OpCommand::default();
        let err = run_cmd(&runner, &command, &args).await.unwrap_err();
        assert_eq!(
            err,
            OnePasswordError::Runtime(
                "Encountered an error when calling subprocess, got: I have failed".into()
            )
        );
    }

    #[tokio::test]
    async fn get_value_rejects_non_string_values() {
        let mut runner = runner_with_version();
        runner
            .expect_run()
            .withf(|_, args| args.first().map(String::as_str) == Some("item"))
            .returning(|_, _| Ok(CommandOutput::ok(r#"{"id":"n","value":42}"#)));
        let op = OnePassword::new(runner, "Private").await.unwrap();
        let err = op.get_value("foo", "pin").await.unwrap_err();
        assert!(matches!(err, OnePasswordError::ValueNotFound(_)));
    }
}
