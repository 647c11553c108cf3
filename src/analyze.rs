//! One-shot analysis pass over the desktop repository.

use colored::Colorize;
use log::debug;

use crate::config::SyncConfig;
use crate::git::{self, GitInspector};
use crate::report::SyncReport;
use crate::rules;

/// Runs the full analysis: resolve the baseline, enumerate the commit and
/// file delta, evaluate both rule sets, and assemble the report.
///
/// Progress is echoed to the console as the phases run; the returned report
/// carries everything the renderer needs.
pub fn analyze(config: &SyncConfig, since: Option<&str>) -> SyncReport {
    println!(
        "{}",
        "🔍 Analyzing changes in cosmic-connect-desktop-app...".bold()
    );

    let inspector = GitInspector::new(config.desktop_path());
    let since = git::resolve_since(since, config.last_sync.as_ref());
    debug!("Analysis baseline: {since}");

    let commits = inspector.recent_commits(&since);
    let changed_files = inspector.changed_files(&since);
    println!(
        "   Found {} commits with {} changed files\n",
        commits.len(),
        changed_files.len()
    );

    println!("{}", "🎯 Checking sync triggers...".bold());
    let triggers =
        rules::evaluate_triggers(config.desktop_path(), &changed_files, &config.triggers);
    debug!("{} trigger activation(s)", triggers.len());

    println!("{}", "📦 Analyzing affected components...".bold());
    let components = rules::evaluate_components(&changed_files, &config.sync_components);
    debug!("{} affected component(s)", components.len());

    SyncReport::new(commits, changed_files, triggers, components)
}
