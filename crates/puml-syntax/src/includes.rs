//! `!include` directive discovery.
//!
//! The preview layer watches every file a diagram pulls in so it can
//! invalidate cached renders when one changes. This module scans a block's
//! source for `!include` directives, resolves them against the configured
//! search directories, and follows resolved files transitively.
//!
//! Directives are discovered, never spliced: no preprocessing of the source
//! happens here.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

static INCLUDE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*!include(?:sub|url)?\s+(.+)$").unwrap());

/// Maximum transitive include depth before scanning gives up.
const MAX_INCLUDE_DEPTH: usize = 10;

/// Result of scanning a block's includes.
#[derive(Debug, Default)]
pub struct IncludeScan {
    /// Resolved include paths, in first-seen order, deduplicated.
    pub paths: Vec<PathBuf>,
    /// Warnings generated during scanning (e.g. unresolved includes).
    pub warnings: Vec<String>,
}

/// Collect the files transitively included by a diagram source.
///
/// Each `!include` path is resolved against `search_dirs` in order; the
/// first directory containing the file wins. Standard-library includes
/// (`!include <aws/common>`) are skipped. Unresolved includes produce a
/// warning rather than failing the scan.
#[must_use]
pub fn collect_includes(source: &str, search_dirs: &[PathBuf]) -> IncludeScan {
    let mut scan = IncludeScan::default();
    collect_into(source, search_dirs, 0, &mut scan);
    scan
}

fn collect_into(source: &str, search_dirs: &[PathBuf], depth: usize, scan: &mut IncludeScan) {
    if depth > MAX_INCLUDE_DEPTH {
        scan.warnings
            .push(format!("Include depth exceeded maximum of {MAX_INCLUDE_DEPTH}"));
        return;
    }

    for caps in INCLUDE_PATTERN.captures_iter(source) {
        let include_path = caps.get(1).map_or("", |m| m.as_str()).trim();

        // Stdlib includes ship with the renderer, not the workspace
        if include_path.starts_with('<') && include_path.ends_with('>') {
            continue;
        }
        // Remote includes are not local files to watch
        if include_path.starts_with("http://") || include_path.starts_with("https://") {
            continue;
        }

        match resolve(include_path, search_dirs) {
            Some(full_path) => {
                if scan.paths.contains(&full_path) {
                    continue;
                }
                let content = std::fs::read_to_string(&full_path).unwrap_or_default();
                scan.paths.push(full_path);
                collect_into(&content, search_dirs, depth + 1, scan);
            }
            None => {
                let searched: Vec<_> = search_dirs
                    .iter()
                    .map(|d| d.join(include_path).display().to_string())
                    .collect();
                if searched.is_empty() {
                    scan.warnings.push(format!(
                        "Include file not found: '{include_path}' (no search directories configured)"
                    ));
                } else {
                    scan.warnings.push(format!(
                        "Include file not found: '{}' (searched: {})",
                        include_path,
                        searched.join(", ")
                    ));
                }
            }
        }
    }
}

fn resolve(include_path: &str, search_dirs: &[PathBuf]) -> Option<PathBuf> {
    if Path::new(include_path).is_absolute() {
        let path = PathBuf::from(include_path);
        return path.is_file().then_some(path);
    }
    search_dirs
        .iter()
        .map(|dir| dir.join(include_path))
        .find(|candidate| candidate.is_file())
}
