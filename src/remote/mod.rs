//! Remote staging
//!
//! Downloads script files over HTTP and clones git repositories. The
//! resolver only sees the [`Fetcher`] trait; [`NetworkFetcher`] is the
//! implementation used by the binary:
//! - HTTP(S) downloads with `ureq` on a blocking task
//! - `git clone --depth 1` through a [`ProcessRunner`]

pub mod process;

pub use process::{ProcessRunner, SystemProcessRunner};

use crate::error::{MarathonError, MarathonResult};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Fetches remote scripts and repositories
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Download the resource at `url`
    async fn download(&self, url: &str) -> MarathonResult<Vec<u8>>;

    /// Clone the repository at `url` (optionally at `branch`) into the
    /// existing, empty `destination` folder
    async fn clone_repository(
        &self,
        url: &str,
        branch: Option<&str>,
        destination: &Path,
    ) -> MarathonResult<()>;
}

/// Fetcher using the network and the system `git`
pub struct NetworkFetcher {
    runner: Arc<dyn ProcessRunner>,
}

impl NetworkFetcher {
    /// Create a fetcher that runs git through `runner`
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }
}

impl Default for NetworkFetcher {
    fn default() -> Self {
        Self::new(Arc::new(SystemProcessRunner))
    }
}

#[async_trait]
impl Fetcher for NetworkFetcher {
    async fn download(&self, url: &str) -> MarathonResult<Vec<u8>> {
        debug!("Downloading {}", url);

        let target = url.to_string();
        let result = tokio::task::spawn_blocking(move || -> Result<Vec<u8>, ureq::Error> {
            let mut response = ureq::get(target.as_str()).call()?;
            response.body_mut().read_to_vec()
        })
        .await
        .map_err(|e| MarathonError::Internal(format!("Download task failed: {}", e)))?;

        result.map_err(|e| MarathonError::FailedToDownloadScript {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    async fn clone_repository(
        &self,
        url: &str,
        branch: Option<&str>,
        destination: &Path,
    ) -> MarathonResult<()> {
        let destination_str = destination.to_string_lossy();
        let args = clone_args(url, branch, &destination_str);
        let cwd = destination.parent().unwrap_or(destination);

        info!("Cloning {}", url);
        self.runner
            .run("git", &args, cwd)
            .await
            .map_err(|e| MarathonError::FailedToDownloadScript {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(())
    }
}

/// Arguments for a shallow `git clone`
fn clone_args<'a>(url: &'a str, branch: Option<&'a str>, destination: &'a str) -> Vec<&'a str> {
    let mut args = vec!["clone", "--quiet", "--depth", "1"];
    if let Some(branch) = branch {
        args.extend(["--branch", branch]);
    }
    args.extend(["--", url, destination]);
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingRunner {
        calls: Mutex<Vec<(String, Vec<String>, PathBuf)>>,
        fail: bool,
    }

    #[async_trait]
    impl ProcessRunner for RecordingRunner {
        async fn run(&self, program: &str, args: &[&str], cwd: &Path) -> MarathonResult<String> {
            self.calls.lock().unwrap().push((
                program.to_string(),
                args.iter().map(|a| a.to_string()).collect(),
                cwd.to_path_buf(),
            ));
            if self.fail {
                Err(MarathonError::command_exec("git clone", "repository not found"))
            } else {
                Ok(String::new())
            }
        }
    }

    #[test]
    fn clone_args_without_branch() {
        assert_eq!(
            clone_args("https://host/a.git", None, "/tmp/a"),
            vec!["clone", "--quiet", "--depth", "1", "--", "https://host/a.git", "/tmp/a"]
        );
    }

    #[test]
    fn clone_args_with_branch() {
        let args = clone_args("https://host/a.git", Some("dev"), "/tmp/a");
        assert_eq!(&args[4..6], &["--branch", "dev"]);
    }

    #[tokio::test]
    async fn clone_runs_git_in_parent_folder() {
        let runner = Arc::new(RecordingRunner::default());
        let fetcher = NetworkFetcher::new(runner.clone());

        fetcher
            .clone_repository("https://host/a.git", Some("main"), Path::new("/tmp/stage/a"))
            .await
            .unwrap();

        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "git");
        assert!(calls[0].1.contains(&"main".to_string()));
        assert_eq!(calls[0].2, PathBuf::from("/tmp/stage"));
    }

    #[tokio::test]
    async fn clone_failure_is_download_error() {
        let runner = Arc::new(RecordingRunner {
            fail: true,
            ..Default::default()
        });
        let fetcher = NetworkFetcher::new(runner);

        let err = fetcher
            .clone_repository("https://host/a.git", None, Path::new("/tmp/stage/a"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            MarathonError::FailedToDownloadScript { ref url, ref reason }
                if url == "https://host/a.git" && reason.contains("repository not found")
        ));
    }
}
