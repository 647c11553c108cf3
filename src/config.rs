use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the sync configuration file, looked up in the invocation directory.
pub const CONFIG_FILE_NAME: &str = ".sync-config.yaml";

/// Severity assigned to a sync trigger rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// Returns the lowercase name used in config files and reports
    pub fn as_str(&self) -> &str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

/// Downstream repository a change may need to be mirrored to.
///
/// Declaration order matters: `Core` sorts before `Android`, which fixes the
/// section order of the rendered recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetRepo {
    Core,
    Android,
}

impl TargetRepo {
    /// Returns the lowercase name used in config files and reports
    pub fn as_str(&self) -> &str {
        match self {
            TargetRepo::Core => "core",
            TargetRepo::Android => "android",
        }
    }
}

/// Root document of `.sync-config.yaml`.
///
/// Loaded once at startup, mutated only when the last-sync checkpoint is
/// recorded, and written back to the same file at the end of a non-dry run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Repositories this tool knows about
    pub repos: RepoMap,

    /// Trigger rules: glob patterns plus a content regex, keyed by name
    #[serde(default)]
    pub triggers: BTreeMap<String, TriggerRule>,

    /// Sync components: glob-only rules, keyed by name
    #[serde(default)]
    pub sync_components: BTreeMap<String, ComponentRule>,

    /// Checkpoint from the previous run, absent on first use
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<LastSync>,
}

/// The `repos` table. Only the desktop-app entry exists today; the hyphenated
/// key comes from the on-disk schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoMap {
    #[serde(rename = "desktop-app")]
    pub desktop_app: RepoEntry,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoEntry {
    /// Filesystem path to the repository's working copy
    pub path: PathBuf,
}

/// A trigger rule: activation requires a glob match AND a content-regex hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerRule {
    /// Glob patterns matched against repository-relative paths
    pub files: Vec<String>,
    /// Regex searched for in the current content of glob-matched files
    pub pattern: String,
    pub severity: Severity,
    pub sync_to: Vec<TargetRepo>,
}

/// A sync component: activation requires only a glob match, no content check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentRule {
    pub description: String,
    pub files: ComponentFiles,
    pub sync_to: Vec<TargetRepo>,
}

/// Per-repository glob lists for a component. Mirrors the nested `files`
/// table in the YAML schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentFiles {
    #[serde(rename = "desktop-app")]
    pub desktop_app: Vec<String>,
}

/// The last-sync checkpoint: where the previous analysis ended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastSync {
    /// RFC 3339 timestamp of the recording run
    pub timestamp: String,
    /// Head commit at the time of recording; empty when it could not be read
    pub commit_hash: String,
    /// Reserved; always written empty
    #[serde(default)]
    pub synced_changes: Vec<String>,
}

impl SyncConfig {
    /// Loads the sync configuration from `path`.
    ///
    /// Callers are expected to check for the file's existence first; a missing
    /// file and a malformed file both surface here as errors.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read sync config: {}", path.display()))?;

        let config: SyncConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse sync config: {}", path.display()))?;

        Ok(config)
    }

    /// Writes the configuration back to `path` in block-style YAML.
    ///
    /// Field order follows the struct declarations, so repeated saves produce
    /// minimal diffs.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_yaml::to_string(self).context("Failed to serialize sync config")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write sync config: {}", path.display()))?;

        Ok(())
    }

    /// Path of the desktop-app working copy this config describes
    pub fn desktop_path(&self) -> &Path {
        &self.repos.desktop_app.path
    }
}
