//! Heuristic extraction of declaration blocks for report reference material.

use std::fs;
use std::path::Path;

/// Line markers that open a declaration block.
const BLOCK_MARKERS: [&str; 4] = ["pub enum", "pub struct", "pub const", "impl"];

/// Pulls declaration-style blocks out of a source file.
///
/// This is a line scan, not a parser: a block opens at any line containing
/// one of the markers and closes at a line that is exactly `}` or at a
/// comment line directly following a blank line. A marker seen mid-block
/// starts the block over, and a block still open at end of file is dropped.
/// Nested braces and braces inside strings can mis-bound blocks; the output
/// is reference material only and never drives matching decisions.
///
/// An unreadable file yields no snippets.
pub fn extract_snippets(path: &Path) -> Vec<String> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => return Vec::new(),
    };

    let mut snippets = Vec::new();
    let mut block: Vec<&str> = Vec::new();
    let mut in_block = false;

    for line in content.lines() {
        if BLOCK_MARKERS.iter().any(|marker| line.contains(marker)) {
            in_block = true;
            block = vec![line];
        } else if in_block {
            let after_blank = block
                .last()
                .map(|prev| prev.trim().is_empty())
                .unwrap_or(false);
            block.push(line);

            let trimmed = line.trim();
            if trimmed == "}" || (trimmed.starts_with("//") && after_blank) {
                snippets.push(block.join("\n"));
                in_block = false;
                block = Vec::new();
            }
        }
    }

    snippets
}
