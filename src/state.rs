//! Last-sync checkpoint recording.

use chrono::Local;

use crate::config::{LastSync, SyncConfig};
use crate::git::GitInspector;

/// Overwrites the config's checkpoint with the current head and timestamp.
///
/// The previous checkpoint is replaced wholesale; no history accumulates.
/// When the head cannot be read the hash is recorded empty, which the next
/// run's baseline resolution treats as no checkpoint at all. Persisting the
/// updated config is the caller's job.
pub fn record_sync(inspector: &GitInspector, config: &mut SyncConfig) {
    let commit_hash = inspector.head_commit().unwrap_or_default();

    config.last_sync = Some(LastSync {
        timestamp: Local::now().to_rfc3339(),
        commit_hash,
        synced_changes: Vec::new(),
    });
}
