use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::contract::{CommandOutput, CommandRunner};

/// Launches real processes with `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, program: &str, args: &[String]) -> std::io::Result<CommandOutput> {
        tracing::debug!(
            program = program,
            arg_count = args.len(),
            "Spawning process"
        );

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await;

        match output {
            Ok(out) => {
                tracing::debug!(
                    program = program,
                    status = ?out.status.code(),
                    stdout_len = out.stdout.len(),
                    stderr_len = out.stderr.len(),
                    "Process finished"
                );
                Ok(CommandOutput {
                    status: out.status.code(),
                    stdout: out.stdout,
                    stderr: out.stderr,
                })
            }
            Err(e) => {
                tracing::debug!(program = program, error = ?e, "Failed to launch process");
                Err(e)
            }
        }
    }
}
