use std::process::Stdio;

use eyre::{Context, Result};
use tokio::process::Command;
use tracing::debug;

/// What an external program left behind once it exited
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was terminated by a signal
    pub status: Option<i32>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    pub fn status_str(&self) -> String {
        match self.status {
            Some(code) => code.to_string(),
            None => "signal".to_owned(),
        }
    }
}

/// Runs external programs to completion. Swapped for canned output in tests.
#[async_trait::async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn execute(&self, program: &str, args: &[String]) -> Result<CommandOutput>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

#[async_trait::async_trait]
impl ProcessRunner for SystemRunner {
    async fn execute(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        debug!("program={} args={}", program, args.join(" "));
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .context(format!("Spawn {program}"))?;
        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            status: output.status.code(),
        })
    }
}
