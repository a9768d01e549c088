//! Sync Publisher
//!
//! After the store file changes it is staged, committed and pushed from a
//! local git working copy. Best-effort: no conflict handling and no rollback
//! of the local file when a later step fails.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::Arc;

use crate::config::SyncConfig;
use crate::error::{PlantError, Result};

pub trait Publisher: Send + Sync {
    fn publish(&self, store_file: &Path) -> Result<()>;
}

/// Publisher used when no working copy is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledPublisher;

impl Publisher for DisabledPublisher {
    fn publish(&self, store_file: &Path) -> Result<()> {
        tracing::debug!(file = %store_file.display(), "sync disabled, not publishing");
        Ok(())
    }
}

/// Commits and pushes through the `git` executable.
#[derive(Debug, Clone)]
pub struct GitPublisher {
    repo_dir: PathBuf,
    remote: String,
    branch: Option<String>,
}

impl GitPublisher {
    pub fn new(config: &SyncConfig) -> Self {
        Self {
            repo_dir: config.repo_dir.clone(),
            remote: config.remote.clone(),
            branch: config.branch.clone(),
        }
    }

    /// Path of `store_file` relative to the working copy.
    fn relative_path(&self, store_file: &Path) -> Result<PathBuf> {
        let repo = self
            .repo_dir
            .canonicalize()
            .map_err(|e| PlantError::store_io(&self.repo_dir, e))?;
        let file = store_file
            .canonicalize()
            .map_err(|e| PlantError::store_io(store_file, e))?;

        file.strip_prefix(&repo)
            .map(Path::to_path_buf)
            .map_err(|_| PlantError::Git {
                command: "add".to_string(),
                stderr: format!(
                    "{} is outside the working copy {}",
                    file.display(),
                    repo.display()
                ),
            })
    }

    fn git(&self, args: &[&str]) -> Result<Output> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_dir)
            .output()
            .map_err(|e| PlantError::Git {
                command: args.first().copied().unwrap_or_default().to_string(),
                stderr: e.to_string(),
            })?;
        Ok(output)
    }

    fn git_checked(&self, args: &[&str]) -> Result<()> {
        let output = self.git(args)?;
        if !output.status.success() {
            return Err(PlantError::Git {
                command: args.first().copied().unwrap_or_default().to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }

    /// Exit code 1 from `git diff --cached --quiet` means something is staged.
    fn has_staged_changes(&self) -> Result<bool> {
        let output = self.git(&["diff", "--cached", "--quiet"])?;
        Ok(!output.status.success())
    }
}

impl Publisher for GitPublisher {
    fn publish(&self, store_file: &Path) -> Result<()> {
        let relative = self.relative_path(store_file)?;
        let relative = relative.to_string_lossy();

        self.git_checked(&["add", "--", &*relative])?;

        if !self.has_staged_changes()? {
            tracing::info!(file = %relative, "store unchanged in git, nothing to publish");
            return Ok(());
        }

        let message = commit_message(store_file);
        self.git_checked(&["commit", "-m", message.as_str()])?;

        let refspec = self.branch.as_deref().unwrap_or("HEAD");
        self.git_checked(&["push", self.remote.as_str(), refspec])?;

        tracing::info!(
            file = %relative,
            remote = %self.remote,
            refspec = %refspec,
            "published plant store"
        );
        Ok(())
    }
}

pub fn commit_message(store_file: &Path) -> String {
    let name = store_file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| store_file.display().to_string());
    format!("Updated {} with new plant data", name)
}

/// Publisher for `config`: git when a working copy is configured, otherwise
/// a no-op.
pub fn publisher_for(config: Option<&SyncConfig>) -> Arc<dyn Publisher> {
    match config {
        Some(sync) => Arc::new(GitPublisher::new(sync)),
        None => Arc::new(DisabledPublisher),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn git_available() -> bool {
        Command::new("git")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn run(dir: &Path, args: &[&str]) {
        let status = Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .unwrap()
            .status;
        assert!(status.success(), "git {:?} failed", args);
    }

    #[test]
    fn test_commit_message_uses_file_name() {
        assert_eq!(
            commit_message(Path::new("/srv/data/output.csv")),
            "Updated output.csv with new plant data"
        );
    }

    #[test]
    fn test_disabled_publisher_is_noop() {
        assert!(DisabledPublisher.publish(Path::new("output.csv")).is_ok());
    }

    #[test]
    fn test_file_outside_working_copy_is_rejected() {
        let repo = tempfile::tempdir().unwrap();
        let elsewhere = tempfile::tempdir().unwrap();
        let file = elsewhere.path().join("output.csv");
        std::fs::write(&file, "Flower Name\nrose\n").unwrap();

        let publisher = GitPublisher::new(&SyncConfig {
            repo_dir: repo.path().to_path_buf(),
            remote: "origin".to_string(),
            branch: None,
        });

        match publisher.publish(&file) {
            Err(PlantError::Git { command, stderr }) => {
                assert_eq!(command, "add");
                assert!(stderr.contains("outside the working copy"));
            }
            other => panic!("expected git error, got {:?}", other),
        }
    }

    #[test]
    fn test_publish_commits_and_pushes_to_remote() {
        if !git_available() {
            eprintln!("Skipping test (git not available)");
            return;
        }

        let remote = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        run(remote.path(), &["init", "--bare", "-q"]);
        run(work.path(), &["init", "-q"]);
        run(work.path(), &["config", "user.email", "plants@example.com"]);
        run(work.path(), &["config", "user.name", "Plant Bot"]);
        run(work.path(), &["config", "commit.gpgsign", "false"]);
        let remote_url = remote.path().to_string_lossy().to_string();
        run(work.path(), &["remote", "add", "origin", remote_url.as_str()]);

        let file = work.path().join("output.csv");
        std::fs::write(&file, "Flower Name,Family\nrose,Rosaceae\n").unwrap();

        let publisher = GitPublisher::new(&SyncConfig {
            repo_dir: work.path().to_path_buf(),
            remote: "origin".to_string(),
            branch: None,
        });
        publisher.publish(&file).unwrap();

        let log = Command::new("git")
            .args(["log", "--all", "--format=%s"])
            .current_dir(remote.path())
            .output()
            .unwrap();
        let log = String::from_utf8_lossy(&log.stdout);
        assert!(log.contains("Updated output.csv with new plant data"));

        // Second publish with no change is a no-op rather than a failed commit.
        publisher.publish(&file).unwrap();
    }
}
