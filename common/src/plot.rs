use std::path::{Path, PathBuf};

use eyre::{Context, ContextCompat, Result};
use tokio::fs::write;
use tracing::{debug, warn};

use crate::util::{CommandOutput, ProcessRunner};

/// A script written to disk for the lifetime of the value and removed on drop
#[derive(Debug)]
pub struct ScriptFile {
    path: PathBuf,
}

impl ScriptFile {
    pub async fn create(path: impl Into<PathBuf>, contents: &str) -> Result<Self> {
        let path = path.into();
        write(&path, contents)
            .await
            .context(format!("Write plot script {}", path.display()))?;
        debug!("Wrote plot script {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScriptFile {
    fn drop(&mut self) {
        if let Err(err) = std::fs::remove_file(&self.path) {
            warn!("Could not remove plot script {}: {err}", self.path.display());
        }
    }
}

/// Hands `script` to the plotting program through a scratch file at `script_path`.
///
/// The scratch file is gone once this returns, whether or not the program
/// could be run. The program's exit status is only logged.
pub async fn render_script(
    runner: &dyn ProcessRunner,
    program: &str,
    script_path: &Path,
    script: &str,
) -> Result<CommandOutput> {
    let file = ScriptFile::create(script_path, script).await?;
    let arg = file
        .path()
        .to_str()
        .context("Plot script path is not valid UTF-8")?
        .to_owned();
    let output = runner
        .execute(program, &[arg])
        .await
        .context(format!("Run {program}"))?;
    if !output.success() {
        warn!(
            "{program} exited with status {}: {}",
            output.status_str(),
            output.stderr.trim()
        );
    }
    Ok(output)
}
