use std::path::{Path, PathBuf};

use anyhow::Result;
use globset::GlobBuilder;
use ignore::WalkBuilder;
use tracing::debug;

use crate::error::DiagError;

/// Collect the export files in `root` whose relative path matches `pattern`.
///
/// `*` never crosses a directory boundary, so `*.json` only sees the top
/// level while `**/*.json` descends. Ignore files are not honoured: every
/// export the pattern names is picked up. Results are sorted.
pub fn walk_inputs(root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let matcher = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|e| DiagError::InvalidOption(format!("invalid glob pattern '{pattern}': {e}")))?
        .compile_matcher();

    let mut builder = WalkBuilder::new(root);
    builder
        .standard_filters(false)
        .hidden(true) // skip hidden files, as shell globs do
        .follow_links(false);
    if !pattern.contains("**") {
        builder.max_depth(Some(pattern.matches('/').count() + 1));
    }

    let mut files = Vec::new();
    for entry in builder.build() {
        match entry {
            Ok(entry) => {
                if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                    continue;
                }
                let path = entry.path();
                let rel_path = path.strip_prefix(root).unwrap_or(path);
                if matcher.is_match(rel_path) {
                    files.push(path.to_path_buf());
                } else {
                    debug!("Not matching {}: {}", pattern, rel_path.display());
                }
            }
            Err(e) => {
                debug!("Walk error: {}", e);
            }
        }
    }

    files.sort();
    Ok(files)
}
