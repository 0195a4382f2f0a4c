//! Repository status lookups backed by the `git` binary.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use recap_cluster::{RepoStatus, RepoStatusProvider};
use wait_timeout::ChildExt;

pub const DEFAULT_GIT_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone)]
/// Runs `git status --porcelain=v1 --branch` per repository.
pub struct GitRepoStatusProvider {
    git_binary: PathBuf,
    timeout: Duration,
}

impl Default for GitRepoStatusProvider {
    fn default() -> Self {
        Self {
            git_binary: PathBuf::from("git"),
            timeout: Duration::from_millis(DEFAULT_GIT_TIMEOUT_MS),
        }
    }
}

impl GitRepoStatusProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_git_binary(mut self, git_binary: impl Into<PathBuf>) -> Self {
        self.git_binary = git_binary.into();
        self
    }

    fn run_status(&self, repo: &Path) -> Option<String> {
        let mut child = match Command::new(&self.git_binary)
            .arg("-C")
            .arg(repo)
            .args(["status", "--porcelain=v1", "--branch"])
            .env("GIT_OPTIONAL_LOCKS", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => child,
            Err(error) => {
                tracing::debug!(repo = %repo.display(), error = %error, "failed to spawn git");
                return None;
            }
        };

        // Drain stdout off-thread so a large status listing cannot fill the pipe.
        let mut stdout = child.stdout.take()?;
        let reader = std::thread::spawn(move || {
            let mut raw = String::new();
            stdout.read_to_string(&mut raw).map(|_| raw)
        });

        match child.wait_timeout(self.timeout) {
            Ok(Some(status)) if status.success() => {}
            Ok(Some(status)) => {
                tracing::debug!(repo = %repo.display(), status = %status, "git status failed");
                let _ = reader.join();
                return None;
            }
            Ok(None) => {
                let _ = child.kill();
                let _ = child.wait();
                let _ = reader.join();
                tracing::debug!(
                    repo = %repo.display(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "git status timed out"
                );
                return None;
            }
            Err(error) => {
                let _ = child.kill();
                let _ = child.wait();
                let _ = reader.join();
                tracing::debug!(repo = %repo.display(), error = %error, "failed while waiting for git");
                return None;
            }
        }

        reader.join().ok()?.ok()
    }
}

impl RepoStatusProvider for GitRepoStatusProvider {
    fn status(&self, repo: &Path) -> Option<RepoStatus> {
        let raw = self.run_status(repo)?;
        let status = parse_porcelain_status(&raw);
        if status.is_none() {
            tracing::debug!(repo = %repo.display(), "unparseable git status output");
        }
        status
    }
}

/// Parses `git status --porcelain=v1 --branch` output.
///
/// The index column marks staged changes; the worktree column and untracked
/// entries mark unstaged ones. Returns `None` when the branch header is missing
/// or an entry line is malformed.
pub fn parse_porcelain_status(raw: &str) -> Option<RepoStatus> {
    let mut lines = raw.lines();
    let header = lines.next()?.strip_prefix("## ")?;
    let mut status = RepoStatus {
        ahead: parse_ahead(header)?,
        ..RepoStatus::default()
    };

    for line in lines {
        if line.is_empty() {
            continue;
        }
        let bytes = line.as_bytes();
        if bytes.len() < 4 || bytes[2] != b' ' {
            return None;
        }
        match (bytes[0], bytes[1]) {
            (b'?', b'?') => status.unstaged = true,
            (b'!', b'!') => {}
            (index, worktree) => {
                if index != b' ' {
                    status.staged = true;
                }
                if worktree != b' ' {
                    status.unstaged = true;
                }
            }
        }
    }
    Some(status)
}

fn parse_ahead(header: &str) -> Option<u32> {
    let Some(open) = header.rfind('[') else {
        return Some(0);
    };
    let tracking = header[open + 1..].strip_suffix(']')?;
    for part in tracking.split(',') {
        if let Some(count) = part.trim().strip_prefix("ahead ") {
            return count.trim().parse().ok();
        }
    }
    Some(0)
}
