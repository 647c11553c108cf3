//! # cosmic-connect-sync
//!
//! Advisory sync-impact analysis for the COSMIC Connect repository family.
//!
//! ## Overview
//!
//! The COSMIC Connect protocol is implemented three times: in
//! `cosmic-connect-desktop-app` (the reference), `cosmic-connect-core`
//! (Rust library) and `cosmic-connect-android` (Kotlin client). When the
//! desktop app changes, the siblings usually need matching updates. This
//! crate inspects the desktop repository's recent history, matches the
//! changed files against configurable trigger and component rules, and
//! renders an advisory report describing what should be mirrored where.
//!
//! The tool never modifies the downstream repositories; it only recommends.
//! Its single piece of state is the last-sync checkpoint written back into
//! `.sync-config.yaml` after a non-dry run, which becomes the default
//! comparison baseline for the next invocation.
//!
//! ## Analysis flow
//!
//! Configuration is loaded once, the commit/file delta is computed against
//! the resolved baseline ([`git`]), both rule sets are evaluated over the
//! delta ([`rules`]), reference snippets are pulled from affected files
//! ([`snippet`]), and everything is rendered into the fixed-format report
//! ([`report`]). A non-dry run finishes by recording the new checkpoint
//! ([`state`]).

/// Configuration document model for `.sync-config.yaml`.
///
/// Defines the repository table, trigger and sync-component rules, the
/// last-sync checkpoint, and the closed severity / target-repo enumerations.
/// Loading and saving go through serde_yaml; saves are block-style and
/// field-ordered for minimal diffs.
pub mod config;

/// Read-only git queries over the desktop repository.
///
/// Shells out to the git CLI for commit enumeration (`log`), changed-file
/// enumeration (`diff --name-only`) and head resolution (`rev-parse`).
/// Failed invocations degrade to empty results with a logged warning so a
/// report is always produced.
pub mod git;

/// Trigger and sync-component evaluation.
///
/// Triggers require a glob match plus a content-regex hit in the matched
/// files' current content; components are glob-only. Invalid patterns are
/// logged and treated as non-matching.
pub mod rules;

/// Heuristic extraction of declaration blocks for the report's reference
/// section. A line scan, not a parser.
pub mod snippet;

/// Report assembly and rendering in the fixed section order, plus report
/// file naming and saving.
pub mod report;

/// The end-to-end analysis pass wiring git queries and rule evaluation into
/// one [`report::SyncReport`].
pub mod analyze;

/// Last-sync checkpoint recording.
pub mod state;

/// Console logging setup.
pub mod logger;
