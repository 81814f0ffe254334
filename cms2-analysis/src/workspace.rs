//! Workspace scanning for CMS-2 sources.

use cms2_parser::cms2::FILE_EXTENSIONS;
use ignore::WalkBuilder;
use std::fmt;
use std::path::{Path, PathBuf};

/// Errors raised while scanning a workspace root.
#[derive(Debug)]
pub enum ScanError {
    /// The root does not exist or is not a directory.
    InvalidRoot(PathBuf),
    /// The directory walk failed.
    Walk(ignore::Error),
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::InvalidRoot(path) => {
                write!(f, "workspace root is not a directory: {}", path.display())
            }
            ScanError::Walk(err) => write!(f, "workspace scan failed: {err}"),
        }
    }
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScanError::Walk(err) => Some(err),
            _ => None,
        }
    }
}

/// Whether a path looks like a CMS-2 source file.
pub fn is_source_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            FILE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// All CMS-2 source files under `root`, honoring gitignore rules.
///
/// Results are sorted so callers see a stable order.
pub fn scan_sources(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::InvalidRoot(root.to_path_buf()));
    }

    let mut sources = Vec::new();
    for result in WalkBuilder::new(root).build() {
        let entry = result.map_err(ScanError::Walk)?;
        if entry.file_type().map(|ft| ft.is_file()).unwrap_or(false)
            && is_source_path(entry.path())
        {
            sources.push(entry.path().to_path_buf());
        }
    }
    sources.sort();
    Ok(sources)
}
