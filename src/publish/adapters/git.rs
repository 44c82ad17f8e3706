//! Version control through the `git` command line.

use camino::{Utf8Path, Utf8PathBuf};
use std::process::Command;
use tracing::debug;

use crate::publish::{
    domain::{BranchName, RemoteName},
    ports::{VcsError, VcsResult, VersionControl},
};

/// Porcelain status prefix of untracked files.
const UNTRACKED_PREFIX: &str = "??";

/// Runs `git -C <workdir> ...` for each operation.
#[derive(Debug, Clone)]
pub struct GitCli {
    workdir: Utf8PathBuf,
}

impl GitCli {
    /// Creates an adapter for the working copy at `workdir`.
    #[must_use]
    pub fn new(workdir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    /// Returns the working copy root.
    #[must_use]
    pub fn workdir(&self) -> &Utf8Path {
        &self.workdir
    }

    fn run<I, S>(&self, args: I) -> VcsResult<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|arg| arg.as_ref().to_owned()).collect();
        let command = format!("git {}", args.join(" "));
        debug!(command = %command, "running version control");
        let output = Command::new("git")
            .arg("-C")
            .arg(self.workdir.as_std_path())
            .args(&args)
            .output()
            .map_err(VcsError::spawn)?;
        if !output.status.success() {
            return Err(VcsError::CommandFailed {
                command,
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Extracts tracked, modified paths from `git status --porcelain` output.
fn tracked_changes(porcelain: &str) -> Vec<String> {
    porcelain
        .lines()
        .filter(|line| !line.is_empty() && !line.starts_with(UNTRACKED_PREFIX))
        .filter_map(|line| line.get(3..))
        .map(str::to_owned)
        .collect()
}

impl VersionControl for GitCli {
    fn modified_paths(&self) -> VcsResult<Vec<String>> {
        let status = self.run(["status", "--porcelain"])?;
        Ok(tracked_changes(&status))
    }

    fn checkout(&self, branch: &BranchName) -> VcsResult<()> {
        self.run(["checkout", branch.as_str()]).map(drop)
    }

    fn add(&self, files: &[Utf8PathBuf]) -> VcsResult<()> {
        let mut args = vec!["add".to_owned(), "--".to_owned()];
        args.extend(files.iter().map(ToString::to_string));
        self.run(args).map(drop)
    }

    fn commit(&self, message: &str) -> VcsResult<()> {
        self.run(["commit", "-m", message]).map(drop)
    }

    fn push(&self, remote: &RemoteName, branch: &BranchName, force: bool) -> VcsResult<()> {
        let mut args = vec!["push"];
        if force {
            args.push("--force");
        }
        args.extend([remote.as_str(), branch.as_str()]);
        self.run(args).map(drop)
    }

    fn pull(&self, remote: &RemoteName, branch: &BranchName) -> VcsResult<()> {
        self.run(["pull", remote.as_str(), branch.as_str()]).map(drop)
    }

    fn rebase(&self, upstream: &str) -> VcsResult<()> {
        self.run(["rebase", upstream]).map(drop)
    }
}
