//! Site build trigger.
//!
//! Runs the configured generator once, synchronously, in the project root.
//! The exit status is the only success signal; stderr is captured so a
//! failed build can be reported verbatim.
use std::path::Path;
use std::process::{Command, ExitStatus};
use thiserror::Error;

use crate::config::BuildConfig;

/// Errors that abort a validation run before the feed is inspected.
#[derive(Debug, Error)]
pub enum BuildError {
    /// `build.command` is an empty list.
    #[error("Build command is empty")]
    EmptyCommand,

    /// The program could not be started (not installed, not executable).
    #[error("Failed to start build command '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    /// The build ran and exited unsuccessfully.
    #[error("Build failed ({status}): {stderr}")]
    Failed { status: ExitStatus, stderr: String },
}

/// Runs the site build in `project_root` and waits for it to finish.
///
/// No retries: a single failed build aborts the run.
pub fn render_site(build: &BuildConfig, project_root: &Path) -> Result<(), BuildError> {
    let (program, args) = build
        .command
        .split_first()
        .ok_or(BuildError::EmptyCommand)?;

    tracing::info!(
        program = %program,
        args = ?args,
        cwd = %project_root.display(),
        "Running site build"
    );

    let output = Command::new(program)
        .args(args)
        .current_dir(project_root)
        .output()
        .map_err(|source| BuildError::Spawn {
            program: program.clone(),
            source,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        tracing::error!(status = %output.status, "Site build failed");
        return Err(BuildError::Failed {
            status: output.status,
            stderr,
        });
    }

    tracing::debug!(
        stdout_bytes = output.stdout.len(),
        stderr_bytes = output.stderr.len(),
        "Site build finished"
    );
    Ok(())
}
