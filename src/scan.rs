//! Directory scanning for merge candidates

use std::fs;
use std::path::{Path, PathBuf};

use glob::{glob_with, MatchOptions, Pattern};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// A PDF file discovered in the source directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    /// Full path to the file
    pub path: PathBuf,
    /// Size on disk when the directory was scanned
    pub size: u64,
}

impl InputFile {
    /// File name without the directory part
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// List the PDF files directly inside `dir`
///
/// Matching is non-recursive and ignores the case of the `.pdf` extension.
/// The returned order is unspecified; the merge step sorts it.
pub fn scan_directory(dir: &Path) -> Result<Vec<InputFile>> {
    if !dir.is_dir() {
        return Err(Error::NotFound(dir.to_path_buf()));
    }

    let escaped = Pattern::escape(&dir.to_string_lossy());
    let pattern = Path::new(&escaped).join("*.pdf");
    let options = MatchOptions {
        case_sensitive: false,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };

    let entries = glob_with(&pattern.to_string_lossy(), options)
        .map_err(|e| Error::InvalidGlob(e.to_string()))?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => {
                let metadata = match fs::metadata(&path) {
                    Ok(m) if m.is_file() => m,
                    Ok(_) => continue,
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "skipping unreadable entry");
                        continue;
                    }
                };
                files.push(InputFile { path, size: metadata.len() });
            }
            Err(e) => warn!(error = %e, "glob error while scanning {}", dir.display()),
        }
    }

    debug!(count = files.len(), dir = %dir.display(), "scanned directory");
    Ok(files)
}
