//! Advisory report assembly and rendering.
//!
//! The report layout is fixed: banner header, commit summary, activated
//! triggers, affected components, per-target recommendations with their
//! static action checklists, then reference code snippets. Sections render
//! in that order every run so consecutive reports diff cleanly.

use anyhow::{Context, Result};
use colored::Colorize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{Severity, TargetRepo};
use crate::git::Commit;
use crate::rules::{ActivatedTrigger, AffectedComponent};
use crate::snippet;

/// Commits listed before the "... and N more" tail note.
const MAX_COMMITS_SHOWN: usize = 5;
/// Snippet section caps: files per component, snippets per file.
const MAX_SNIPPET_FILES: usize = 2;
const MAX_SNIPPETS_PER_FILE: usize = 3;

/// Everything one analysis run learned, ready for rendering.
#[derive(Debug)]
pub struct SyncReport {
    /// Local time the analysis ran, `%Y-%m-%d %H:%M:%S`
    pub generated_at: String,
    /// Commits in the analyzed range, newest first
    pub commits: Vec<Commit>,
    pub changed_files: BTreeSet<String>,
    pub triggers: Vec<ActivatedTrigger>,
    pub components: Vec<AffectedComponent>,
}

impl SyncReport {
    /// Builds a report stamped with the current local time.
    pub fn new(
        commits: Vec<Commit>,
        changed_files: BTreeSet<String>,
        triggers: Vec<ActivatedTrigger>,
        components: Vec<AffectedComponent>,
    ) -> Self {
        SyncReport {
            generated_at: chrono::Local::now()
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            commits,
            changed_files,
            triggers,
            components,
        }
    }

    /// Per-target union of trigger names and `<component> component` labels.
    ///
    /// Only targets with at least one label get an entry, so an empty map
    /// means no sync is needed anywhere.
    pub fn sync_recommendations(&self) -> BTreeMap<TargetRepo, BTreeSet<String>> {
        let mut needed: BTreeMap<TargetRepo, BTreeSet<String>> = BTreeMap::new();

        for trigger in &self.triggers {
            for target in &trigger.sync_to {
                needed
                    .entry(*target)
                    .or_default()
                    .insert(trigger.name.clone());
            }
        }

        for component in &self.components {
            for target in &component.sync_to {
                needed
                    .entry(*target)
                    .or_default()
                    .insert(format!("{} component", component.name));
            }
        }

        needed
    }

    /// Renders the full advisory report.
    ///
    /// `repo_root` is the desktop working copy; snippet extraction reads
    /// component files relative to it.
    pub fn render(&self, repo_root: &Path) -> String {
        let rule = "=".repeat(80);
        let thin_rule = "-".repeat(80);
        let mut lines: Vec<String> = Vec::new();

        lines.push(rule.clone());
        lines.push("COSMIC CONNECT - MULTI-REPOSITORY SYNC REPORT".to_string());
        lines.push(rule.clone());
        lines.push(format!("\nGenerated: {}", self.generated_at));
        lines.push(format!(
            "Found {} commits with {} changed files\n",
            self.commits.len(),
            self.changed_files.len()
        ));

        lines.push("\n📝 RECENT COMMITS".to_string());
        lines.push(thin_rule.clone());
        for commit in self.commits.iter().take(MAX_COMMITS_SHOWN) {
            lines.push(format!("  {} {}", commit.hash, commit.message));
        }
        if self.commits.len() > MAX_COMMITS_SHOWN {
            lines.push(format!(
                "  ... and {} more",
                self.commits.len() - MAX_COMMITS_SHOWN
            ));
        }

        if self.triggers.is_empty() {
            lines.push("\n\n✅ No critical sync triggers activated".to_string());
        } else {
            lines.push("\n\n🚨 ACTIVATED SYNC TRIGGERS".to_string());
            lines.push(thin_rule.clone());

            for trigger in &self.triggers {
                lines.push(format!(
                    "\n{} {} [{}]",
                    severity_marker(trigger.severity),
                    trigger.name.to_uppercase(),
                    trigger.severity.as_str()
                ));
                lines.push(format!("   Sync to: {}", join_targets(&trigger.sync_to)));
                lines.push(format!("   Files: {}", trigger.files.join(", ")));
            }
        }

        if !self.components.is_empty() {
            lines.push("\n\n📦 AFFECTED COMPONENTS".to_string());
            lines.push(thin_rule.clone());

            for component in &self.components {
                lines.push(format!("\n🔧 {}", component.name.to_uppercase()));
                lines.push(format!("   Description: {}", component.description));
                lines.push(format!("   Sync to: {}", join_targets(&component.sync_to)));
                lines.push("   Changed files:".to_string());
                for file in &component.files {
                    lines.push(format!("      - {file}"));
                }
            }
        }

        lines.push("\n\n💡 SYNC RECOMMENDATIONS".to_string());
        lines.push(rule.clone());

        let recommendations = self.sync_recommendations();

        if let Some(items) = recommendations.get(&TargetRepo::Core) {
            lines.push("\n🦀 COSMIC-CONNECT-CORE (Rust)".to_string());
            lines.push(thin_rule.clone());
            lines.push("Changes needed:".to_string());
            for item in items {
                lines.push(format!("  • {item}"));
            }
            lines.push("\nRecommended actions:".to_string());
            lines.push("  1. Review protocol changes in desktop-app".to_string());
            lines.push("  2. Update core/src/lib.rs with new types".to_string());
            lines.push("  3. Ensure crypto module is in sync".to_string());
            lines.push("  4. Run core tests".to_string());
            lines.push("  5. Update core CHANGELOG.md".to_string());
        }

        if let Some(items) = recommendations.get(&TargetRepo::Android) {
            lines.push("\n\n🤖 COSMIC-CONNECT-ANDROID (Kotlin)".to_string());
            lines.push(thin_rule.clone());
            lines.push("Changes needed:".to_string());
            for item in items {
                lines.push(format!("  • {item}"));
            }
            lines.push("\nRecommended actions:".to_string());
            lines.push("  1. Review protocol changes in desktop-app".to_string());
            lines.push("  2. Update packet type definitions (Kotlin data classes)".to_string());
            lines.push("  3. Update error types (Kotlin sealed classes)".to_string());
            lines.push("  4. Update constants (ports, timeouts, versions)".to_string());
            lines.push("  5. Add new capabilities to manifest".to_string());
            lines.push("  6. Run Android tests".to_string());
            lines.push("  7. Update Android CHANGELOG.md".to_string());
        }

        if recommendations.is_empty() {
            lines.push("\n✨ No sync needed - changes are desktop-app specific".to_string());
        }

        if !self.components.is_empty() {
            lines.push("\n\n📄 CODE SNIPPETS FOR REFERENCE".to_string());
            lines.push(rule.clone());

            for component in &self.components {
                lines.push(format!("\n--- {} ---", component.name.to_uppercase()));

                for file in component.files.iter().take(MAX_SNIPPET_FILES) {
                    let snippets = snippet::extract_snippets(&repo_root.join(file));
                    if snippets.is_empty() {
                        continue;
                    }

                    lines.push(format!("\nFrom {file}:"));
                    for block in snippets.iter().take(MAX_SNIPPETS_PER_FILE) {
                        lines.push("```rust".to_string());
                        lines.push(block.trim_end().to_string());
                        lines.push("```\n".to_string());
                    }
                }
            }
        }

        lines.push(format!("\n{rule}"));
        lines.push("END OF SYNC REPORT".to_string());
        lines.push(rule);

        lines.join("\n")
    }
}

fn severity_marker(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "🔴",
        Severity::High => "🟠",
        Severity::Medium => "🟡",
        Severity::Low => "🟢",
    }
}

fn join_targets(targets: &[TargetRepo]) -> String {
    targets
        .iter()
        .map(TargetRepo::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Default report location: `sync-report-<timestamp>.md` inside the desktop
/// working copy.
pub fn default_report_path(repo_root: &Path) -> PathBuf {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    repo_root.join(format!("sync-report-{timestamp}.md"))
}

/// Writes the rendered report and confirms the location on the console.
pub fn save_report(report: &str, path: &Path) -> Result<()> {
    fs::write(path, report)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    println!(
        "\n{} {}",
        "📄 Report saved to:".green().bold(),
        path.display().to_string().cyan()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn pinned_report() -> SyncReport {
        SyncReport {
            generated_at: "2025-01-01 12:00:00".to_string(),
            commits: Vec::new(),
            changed_files: BTreeSet::new(),
            triggers: Vec::new(),
            components: Vec::new(),
        }
    }

    fn sample_trigger() -> ActivatedTrigger {
        ActivatedTrigger {
            name: "protocol-change".to_string(),
            severity: Severity::Critical,
            files: vec!["src/packet.rs".to_string()],
            sync_to: vec![TargetRepo::Core, TargetRepo::Android],
        }
    }

    fn sample_component() -> AffectedComponent {
        AffectedComponent {
            name: "network-layer".to_string(),
            description: "Device discovery and transport".to_string(),
            files: vec!["src/network/discovery.rs".to_string()],
            sync_to: vec![TargetRepo::Android],
        }
    }

    #[test]
    fn test_empty_report_carries_both_notices() {
        let repo = TempDir::new().unwrap();
        let rendered = pinned_report().render(repo.path());

        assert!(rendered.contains("COSMIC CONNECT - MULTI-REPOSITORY SYNC REPORT"));
        assert!(rendered.contains("Generated: 2025-01-01 12:00:00"));
        assert!(rendered.contains("Found 0 commits with 0 changed files"));
        assert!(rendered.contains("✅ No critical sync triggers activated"));
        assert!(rendered.contains("✨ No sync needed - changes are desktop-app specific"));
        assert!(rendered.contains("END OF SYNC REPORT"));

        assert!(!rendered.contains("🚨 ACTIVATED SYNC TRIGGERS"));
        assert!(!rendered.contains("📦 AFFECTED COMPONENTS"));
        assert!(!rendered.contains("📄 CODE SNIPPETS FOR REFERENCE"));
    }

    #[test]
    fn test_commit_list_truncated_after_five() {
        let repo = TempDir::new().unwrap();
        let mut report = pinned_report();
        report.commits = (0..7)
            .map(|i| Commit {
                hash: format!("hash{i}"),
                message: format!("commit number {i}"),
            })
            .collect();

        let rendered = report.render(repo.path());

        assert!(rendered.contains("  hash0 commit number 0"));
        assert!(rendered.contains("  hash4 commit number 4"));
        assert!(rendered.contains("  ... and 2 more"));
        assert!(!rendered.contains("commit number 5"));
    }

    #[test]
    fn test_trigger_section_lists_severity_and_files() {
        let repo = TempDir::new().unwrap();
        let mut report = pinned_report();
        report.triggers = vec![sample_trigger()];

        let rendered = report.render(repo.path());

        assert!(rendered.contains("🚨 ACTIVATED SYNC TRIGGERS"));
        assert!(rendered.contains("🔴 PROTOCOL-CHANGE [critical]"));
        assert!(rendered.contains("   Sync to: core, android"));
        assert!(rendered.contains("   Files: src/packet.rs"));
        assert!(!rendered.contains("✅ No critical sync triggers activated"));
    }

    #[test]
    fn test_trigger_recommended_under_both_targets() {
        let repo = TempDir::new().unwrap();
        let mut report = pinned_report();
        report.triggers = vec![sample_trigger()];

        let rendered = report.render(repo.path());

        assert!(rendered.contains("🦀 COSMIC-CONNECT-CORE (Rust)"));
        assert!(rendered.contains("🤖 COSMIC-CONNECT-ANDROID (Kotlin)"));
        assert_eq!(rendered.matches("  • protocol-change").count(), 2);
        assert!(!rendered.contains("✨ No sync needed"));
    }

    #[test]
    fn test_component_section_rendered() {
        let repo = TempDir::new().unwrap();
        let mut report = pinned_report();
        report.components = vec![sample_component()];

        let rendered = report.render(repo.path());

        assert!(rendered.contains("📦 AFFECTED COMPONENTS"));
        assert!(rendered.contains("🔧 NETWORK-LAYER"));
        assert!(rendered.contains("   Description: Device discovery and transport"));
        assert!(rendered.contains("   Sync to: android"));
        assert!(rendered.contains("      - src/network/discovery.rs"));
        assert!(rendered.contains("  • network-layer component"));
        assert!(!rendered.contains("🦀 COSMIC-CONNECT-CORE (Rust)"));
    }

    #[test]
    fn test_recommendations_union_per_target() {
        let mut report = pinned_report();
        report.triggers = vec![sample_trigger()];
        report.components = vec![sample_component()];

        let recommendations = report.sync_recommendations();

        let core: Vec<_> = recommendations[&TargetRepo::Core].iter().cloned().collect();
        assert_eq!(core, vec!["protocol-change"]);

        let android: Vec<_> = recommendations[&TargetRepo::Android]
            .iter()
            .cloned()
            .collect();
        assert_eq!(android, vec!["network-layer component", "protocol-change"]);
    }

    #[test]
    fn test_duplicate_activations_recommended_once() {
        let mut report = pinned_report();
        // Same trigger fired for two of its glob patterns
        report.triggers = vec![sample_trigger(), sample_trigger()];

        let recommendations = report.sync_recommendations();
        assert_eq!(recommendations[&TargetRepo::Core].len(), 1);
    }

    #[test]
    fn test_severity_markers() {
        let repo = TempDir::new().unwrap();
        let mut report = pinned_report();
        let mut trigger = sample_trigger();
        trigger.severity = Severity::Medium;
        report.triggers = vec![trigger];

        let rendered = report.render(repo.path());
        assert!(rendered.contains("🟡 PROTOCOL-CHANGE [medium]"));
    }

    #[test]
    fn test_snippets_rendered_from_component_files() {
        let repo = TempDir::new().unwrap();
        std::fs::create_dir_all(repo.path().join("src/network")).unwrap();
        std::fs::write(
            repo.path().join("src/network/discovery.rs"),
            "pub struct Beacon {\n    port: u16,\n}\n",
        )
        .unwrap();

        let mut report = pinned_report();
        report.components = vec![sample_component()];

        let rendered = report.render(repo.path());

        assert!(rendered.contains("📄 CODE SNIPPETS FOR REFERENCE"));
        assert!(rendered.contains("--- NETWORK-LAYER ---"));
        assert!(rendered.contains("From src/network/discovery.rs:"));
        assert!(rendered.contains("```rust"));
        assert!(rendered.contains("pub struct Beacon {"));
    }

    #[test]
    fn test_snippets_limited_to_two_files_per_component() {
        let repo = TempDir::new().unwrap();
        for name in ["a.rs", "b.rs", "c.rs"] {
            std::fs::write(
                repo.path().join(name),
                "pub struct Frame {\n    len: u16,\n}\n",
            )
            .unwrap();
        }

        let mut report = pinned_report();
        let mut component = sample_component();
        component.files = vec!["a.rs".to_string(), "b.rs".to_string(), "c.rs".to_string()];
        report.components = vec![component];

        let rendered = report.render(repo.path());

        assert!(rendered.contains("From a.rs:"));
        assert!(rendered.contains("From b.rs:"));
        assert!(!rendered.contains("From c.rs:"));
    }

    #[test]
    fn test_missing_component_file_renders_no_snippet_block() {
        let repo = TempDir::new().unwrap();
        let mut report = pinned_report();
        report.components = vec![sample_component()];

        let rendered = report.render(repo.path());

        assert!(rendered.contains("--- NETWORK-LAYER ---"));
        assert!(!rendered.contains("From src/network/discovery.rs:"));
    }

    #[test]
    fn test_default_report_path_shape() {
        let repo = TempDir::new().unwrap();
        let path = default_report_path(repo.path());

        assert_eq!(path.parent(), Some(repo.path()));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("sync-report-"));
        assert!(name.ends_with(".md"));
    }

    #[test]
    fn test_save_report_writes_file() {
        let repo = TempDir::new().unwrap();
        let path = repo.path().join("sync-report-test.md");

        save_report("report body", &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "report body");
    }
}
