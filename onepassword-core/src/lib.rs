#![doc = "onepassword-core: typed client for the 1Password CLI (`op`)."]

//! This crate wraps the `op` binary: it builds argument vectors, runs them
//! through a mockable [`contract::CommandRunner`], decodes JSON responses and
//! maps failures onto [`error::OnePasswordError`].
//!
//! # Usage
//! ```no_run
//! use onepassword_core::{OnePassword, SystemRunner};
//!
//! # async fn demo() -> onepassword_core::Result<()> {
//! let op = OnePassword::new(SystemRunner::new(), "Private").await?;
//! let password = op.get_password("Coffee").await?;
//! # let _ = password;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod command;
pub mod contract;
pub mod error;
pub mod models;
pub mod runner;
pub mod version;

pub use client::{get_op_cli_version, list_vaults, run_cmd, vaults, OnePassword, DEFAULT_VAULT};
pub use command::OpCommand;
pub use contract::{CommandOutput, CommandRunner};
pub use error::{OnePasswordError, Result};
pub use models::{ItemSummary, Vault, VaultRef};
pub use runner::SystemRunner;
pub use version::CliVersion;
