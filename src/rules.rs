//! Trigger and sync-component evaluation against the changed-file set.
//!
//! Triggers pair file globs with a content regex and require both to hit;
//! sync components are glob-only. Both rule sets are evaluated independently
//! over the same change set.

use glob::Pattern;
use log::warn;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use crate::config::{ComponentRule, Severity, TargetRepo, TriggerRule};

/// A trigger rule that fired for one of its glob patterns.
///
/// A rule with several glob patterns can fire several times, once per
/// pattern that matched; each activation carries only that pattern's files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivatedTrigger {
    pub name: String,
    pub severity: Severity,
    pub files: Vec<String>,
    pub sync_to: Vec<TargetRepo>,
}

/// A sync component whose watched files were touched.
///
/// Files accumulate across the component's patterns; a path matching two
/// patterns appears twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffectedComponent {
    pub name: String,
    pub description: String,
    pub files: Vec<String>,
    pub sync_to: Vec<TargetRepo>,
}

/// Changed files matching a glob pattern, in sorted order.
///
/// Default match options apply, so `*` and `?` may cross `/` and `*.rs`
/// matches `src/packet.rs`. An invalid pattern matches nothing.
fn glob_matches(pattern: &str, changed: &BTreeSet<String>) -> Vec<String> {
    let pattern = match Pattern::new(pattern) {
        Ok(pattern) => pattern,
        Err(e) => {
            warn!("Invalid glob pattern '{pattern}': {e}");
            return Vec::new();
        }
    };

    changed
        .iter()
        .filter(|path| pattern.matches(path))
        .cloned()
        .collect()
}

/// Whether the file's current on-disk content matches the trigger regex.
///
/// The check reads the working tree, not the diff, so a file deleted in the
/// analyzed range never matches.
fn content_matches(repo_root: &Path, file: &str, regex: &Regex) -> bool {
    match fs::read_to_string(repo_root.join(file)) {
        Ok(content) => regex.is_match(&content),
        Err(_) => false,
    }
}

/// Evaluates every trigger rule against the changed-file set.
///
/// Rules are visited in name order. A trigger whose regex does not compile
/// is skipped with a warning and cannot activate.
pub fn evaluate_triggers(
    repo_root: &Path,
    changed: &BTreeSet<String>,
    triggers: &BTreeMap<String, TriggerRule>,
) -> Vec<ActivatedTrigger> {
    let mut activated = Vec::new();

    for (name, rule) in triggers {
        let regex = match Regex::new(&rule.pattern) {
            Ok(regex) => regex,
            Err(e) => {
                warn!("Invalid content pattern in trigger '{name}': {e}");
                continue;
            }
        };

        for pattern in &rule.files {
            let matched = glob_matches(pattern, changed);
            if matched.is_empty() {
                continue;
            }

            let content_hit = matched
                .iter()
                .any(|file| content_matches(repo_root, file, &regex));

            if content_hit {
                activated.push(ActivatedTrigger {
                    name: name.clone(),
                    severity: rule.severity,
                    files: matched,
                    sync_to: rule.sync_to.clone(),
                });
            }
        }
    }

    activated
}

/// Evaluates every sync component against the changed-file set.
///
/// No content check: a glob hit alone marks the component affected.
pub fn evaluate_components(
    changed: &BTreeSet<String>,
    components: &BTreeMap<String, ComponentRule>,
) -> Vec<AffectedComponent> {
    let mut affected = Vec::new();

    for (name, rule) in components {
        let mut files = Vec::new();
        for pattern in &rule.files.desktop_app {
            files.extend(glob_matches(pattern, changed));
        }

        if !files.is_empty() {
            affected.push(AffectedComponent {
                name: name.clone(),
                description: rule.description.clone(),
                files,
                sync_to: rule.sync_to.clone(),
            });
        }
    }

    affected
}
