//! External process execution
//!
//! Git clones and tag listings go through a [`ProcessRunner`] so the rest of
//! the crate never spawns processes directly.

use crate::error::{MarathonError, MarathonResult};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Runs external commands and captures their output
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run `program` with `args` in `cwd`, returning stdout on success
    async fn run(&self, program: &str, args: &[&str], cwd: &Path) -> MarathonResult<String>;
}

/// Process runner backed by `tokio::process`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessRunner;

#[async_trait]
impl ProcessRunner for SystemProcessRunner {
    async fn run(&self, program: &str, args: &[&str], cwd: &Path) -> MarathonResult<String> {
        let command = format!("{} {}", program, args.join(" "));
        debug!("Executing in {}: {}", cwd.display(), command);

        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| MarathonError::command_failed(command.clone(), e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MarathonError::command_exec(command, stderr.trim()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[cfg(unix)]
    #[tokio::test]
    async fn captures_stdout() {
        let temp = TempDir::new().unwrap();
        let out = SystemProcessRunner
            .run("sh", &["-c", "echo hello"], temp.path())
            .await
            .unwrap();
        assert_eq!(out.trim(), "hello");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn runs_in_working_directory() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("marker"), "").unwrap();
        let out = SystemProcessRunner
            .run("ls", &[], temp.path())
            .await
            .unwrap();
        assert!(out.contains("marker"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failure_reports_stderr() {
        let temp = TempDir::new().unwrap();
        let err = SystemProcessRunner
            .run("sh", &["-c", "echo broken >&2; exit 3"], temp.path())
            .await
            .unwrap_err();
        match err {
            MarathonError::CommandExecution { stderr, .. } => assert_eq!(stderr, "broken"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn missing_program_fails() {
        let temp = TempDir::new().unwrap();
        let err = SystemProcessRunner
            .run("marathon-no-such-program", &[], temp.path())
            .await
            .unwrap_err();
        assert!(matches!(err, MarathonError::CommandFailed { .. }));
    }
}
