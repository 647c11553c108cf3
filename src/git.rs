//! Read-only git queries over the desktop repository, via the git CLI.

use log::warn;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::LastSync;

/// Fallback baseline when neither an explicit commit nor a recorded
/// checkpoint is available.
pub const DEFAULT_SINCE: &str = "HEAD~10";

/// One entry from `git log --oneline`: short hash plus subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub hash: String,
    pub message: String,
}

/// Inspects the desktop repository's history using the git CLI.
///
/// Queries never fail hard: a repository that cannot be read (missing path,
/// not a repository, unknown revision) yields empty results, with the cause
/// logged at warn level. The analysis still produces a report either way.
pub struct GitInspector {
    repo_path: PathBuf,
}

impl GitInspector {
    pub fn new(repo_path: &Path) -> Self {
        Self {
            repo_path: repo_path.to_path_buf(),
        }
    }

    /// Run a git command in the repository and return trimmed stdout.
    ///
    /// Spawn failures and non-zero exits both collapse to `None` after a
    /// warning; callers translate that into an empty result.
    fn run_git(&self, args: &[&str]) -> Option<String> {
        let output = match Command::new("git")
            .args(args)
            .current_dir(&self.repo_path)
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                warn!("Failed to run 'git {}': {e}", args.join(" "));
                return None;
            }
        };

        if !output.status.success() {
            warn!(
                "git {} failed in {}: {}",
                args.join(" "),
                self.repo_path.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return None;
        }

        Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Commits reachable from HEAD but not from `since`, newest first.
    ///
    /// Lines that do not split into a hash and a message are skipped.
    pub fn recent_commits(&self, since: &str) -> Vec<Commit> {
        let range = format!("{since}..HEAD");
        let stdout = match self.run_git(&["log", &range, "--oneline"]) {
            Some(stdout) => stdout,
            None => return Vec::new(),
        };

        stdout
            .lines()
            .filter_map(|line| {
                let (hash, message) = line.split_once(' ')?;
                Some(Commit {
                    hash: hash.to_string(),
                    message: message.to_string(),
                })
            })
            .collect()
    }

    /// Repository-relative paths touched between `since` and HEAD.
    pub fn changed_files(&self, since: &str) -> BTreeSet<String> {
        let range = format!("{since}..HEAD");
        let stdout = match self.run_git(&["diff", "--name-only", &range]) {
            Some(stdout) => stdout,
            None => return BTreeSet::new(),
        };

        stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Full hash of the current HEAD commit, if the repository has one.
    pub fn head_commit(&self) -> Option<String> {
        self.run_git(&["rev-parse", "HEAD"])
            .filter(|hash| !hash.is_empty())
    }
}

/// Picks the analysis baseline: an explicit commit wins, then the recorded
/// checkpoint, then the fixed ten-commit window. A checkpoint with an empty
/// hash (recorded while the head was unreadable) is treated as absent.
pub fn resolve_since(explicit: Option<&str>, last_sync: Option<&LastSync>) -> String {
    if let Some(commit) = explicit {
        return commit.to_string();
    }

    last_sync
        .map(|sync| sync.commit_hash.as_str())
        .filter(|hash| !hash.is_empty())
        .unwrap_or(DEFAULT_SINCE)
        .to_string()
}
