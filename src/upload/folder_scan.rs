use crate::error::ScanError;
use glob::Pattern;
use ignore::Walk;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Extensions offered by the file picker and accepted by folder import.
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["txt", "md", "json", "csv", "xml"];

const IGNORED_DIRS: [&str; 6] = [
    "node_modules",
    ".git",
    "dist",
    ".cache",
    "target",
    ".idea",
];

pub fn is_supported_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn compile_filter(filter: &str) -> Result<Pattern, ScanError> {
    let processed = if filter.starts_with("**/") {
        filter.to_string()
    } else {
        format!("**/{}", filter)
    };
    Pattern::new(&processed).map_err(|source| ScanError::InvalidPattern {
        pattern: filter.to_string(),
        source,
    })
}

fn in_ignored_dir(relative: &Path) -> bool {
    relative.components().any(|component| match component {
        Component::Normal(name) => name
            .to_str()
            .map(|name| IGNORED_DIRS.contains(&name))
            .unwrap_or(false),
        _ => false,
    })
}

/// Collects the supported files under `root`, honoring ignore files. When a
/// filter is given only paths relative to `root` that match it are kept.
pub fn scan_folder(root: &Path, filter: Option<&str>) -> Result<Vec<PathBuf>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let pattern = filter
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(compile_filter)
        .transpose()?;

    let mut files = Vec::new();
    for entry in Walk::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        let path = entry.path();
        if !path.is_file() || !is_supported_file(path) {
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        if in_ignored_dir(relative) {
            continue;
        }
        if let Some(pattern) = &pattern {
            if !pattern.matches_path(relative) {
                continue;
            }
        }

        files.push(path.to_path_buf());
    }

    files.sort();
    debug!(root = %root.display(), count = files.len(), "Scanned folder");
    Ok(files)
}
