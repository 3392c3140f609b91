//! Reglament discovery under a directory tree.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{IngestError, Result};

/// A reglament document and the service it describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReglamentFile {
    pub service: String,
    pub path: PathBuf,
}

/// Service name of a reglament: the file name up to its first `.`.
///
/// Returns `None` for names without a usable stem (such as dotfiles).
pub fn service_name(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let stem = file_name.split('.').next()?;
    if stem.is_empty() {
        None
    } else {
        Some(stem.to_string())
    }
}

/// Recursively lists the reglament XML files under `root`.
///
/// Returns files sorted by path so that every run visits them in the same order.
pub fn discover_reglaments(root: &Path) -> Result<Vec<ReglamentFile>> {
    if !root.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry_result in WalkDir::new(root).sort_by_file_name() {
        let entry = entry_result.map_err(|source| IngestError::Walk {
            path: root.to_path_buf(),
            source,
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        // Check for .xml extension (case-insensitive)
        let is_xml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"));
        if !is_xml {
            debug!(path = %path.display(), "skipping non-XML file");
            continue;
        }

        match service_name(path) {
            Some(service) => files.push(ReglamentFile {
                service,
                path: path.to_path_buf(),
            }),
            None => debug!(path = %path.display(), "skipping file without service name"),
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}
