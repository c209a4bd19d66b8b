//! Narrowing the scanned files down to the user's choice

use std::collections::HashSet;
use std::fmt;

use tracing::warn;

use crate::scan::InputFile;

/// Which of the scanned files should be merged
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Every PDF in the directory
    All,
    /// Only the files with these names
    Chosen(Vec<String>),
}

/// Non-fatal problems found while applying a selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionWarning {
    /// Nothing was chosen, so every file is merged
    EmptySelection,
    /// A chosen name has no matching file on disk
    Missing { name: String },
}

impl fmt::Display for SelectionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionWarning::EmptySelection => {
                write!(f, "No files selected. Merging all files in the folder.")
            }
            SelectionWarning::Missing { name } => write!(f, "File not found: {}", name),
        }
    }
}

/// Outcome of [`select_files`]
#[derive(Debug, Clone, Default)]
pub struct Selected {
    pub files: Vec<InputFile>,
    pub warnings: Vec<SelectionWarning>,
}

/// Apply `selection` to the scanned `candidates`
///
/// Chosen names are re-checked against the disk, since files may have
/// disappeared after the scan.
pub fn select_files(candidates: Vec<InputFile>, selection: &Selection) -> Selected {
    let names = match selection {
        Selection::All => {
            return Selected { files: candidates, warnings: Vec::new() };
        }
        Selection::Chosen(names) if names.is_empty() => {
            warn!("empty selection, falling back to all files");
            return Selected {
                files: candidates,
                warnings: vec![SelectionWarning::EmptySelection],
            };
        }
        Selection::Chosen(names) => names,
    };

    let mut seen = HashSet::new();
    let mut selected = Selected::default();

    for name in names {
        if !seen.insert(name.as_str()) {
            continue;
        }

        match candidates.iter().find(|c| c.name() == *name) {
            Some(file) if file.path.is_file() => selected.files.push(file.clone()),
            _ => {
                warn!(name = %name, "selected file not found");
                selected.warnings.push(SelectionWarning::Missing { name: name.clone() });
            }
        }
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn make_files(dir: &Path, names: &[&str]) -> Vec<InputFile> {
        names
            .iter()
            .map(|name| {
                let path = dir.join(name);
                fs::write(&path, b"%PDF").unwrap();
                InputFile { path, size: 4 }
            })
            .collect()
    }

    fn chosen(names: &[&str]) -> Selection {
        Selection::Chosen(names.iter().map(|n| n.to_string()).collect())
    }

    #[test]
    fn test_select_all_returns_input_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let files = make_files(temp_dir.path(), &["b.pdf", "a.pdf"]);

        let selected = select_files(files.clone(), &Selection::All);
        assert_eq!(selected.files, files);
        assert!(selected.warnings.is_empty());
    }

    #[test]
    fn test_select_chosen_subset() {
        let temp_dir = TempDir::new().unwrap();
        let files = make_files(temp_dir.path(), &["a.pdf", "b.pdf", "c.pdf"]);

        let selected = select_files(files, &chosen(&["c.pdf", "a.pdf"]));
        let names: Vec<String> = selected.files.iter().map(InputFile::name).collect();
        assert_eq!(names, vec!["c.pdf", "a.pdf"]);
        assert!(selected.warnings.is_empty());
    }

    #[test]
    fn test_empty_choice_falls_back_to_all_with_warning() {
        let temp_dir = TempDir::new().unwrap();
        let files = make_files(temp_dir.path(), &["a.pdf", "b.pdf"]);

        let selected = select_files(files.clone(), &chosen(&[]));
        assert_eq!(selected.files, files);
        assert_eq!(selected.warnings, vec![SelectionWarning::EmptySelection]);
    }

    #[test]
    fn test_missing_choice_is_reported_and_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let files = make_files(temp_dir.path(), &["a.pdf", "b.pdf"]);
        fs::remove_file(temp_dir.path().join("b.pdf")).unwrap();

        let selected = select_files(files, &chosen(&["a.pdf", "b.pdf", "ghost.pdf"]));
        let names: Vec<String> = selected.files.iter().map(InputFile::name).collect();
        assert_eq!(names, vec!["a.pdf"]);
        assert_eq!(
            selected.warnings,
            vec![
                SelectionWarning::Missing { name: "b.pdf".to_string() },
                SelectionWarning::Missing { name: "ghost.pdf".to_string() },
            ]
        );
    }

    #[test]
    fn test_duplicate_choices_collapse() {
        let temp_dir = TempDir::new().unwrap();
        let files = make_files(temp_dir.path(), &["a.pdf"]);

        let selected = select_files(files, &chosen(&["a.pdf", "a.pdf"]));
        assert_eq!(selected.files.len(), 1);
    }

    #[test]
    fn test_warning_messages() {
        assert_eq!(
            SelectionWarning::EmptySelection.to_string(),
            "No files selected. Merging all files in the folder."
        );
        assert_eq!(
            SelectionWarning::Missing { name: "x.pdf".to_string() }.to_string(),
            "File not found: x.pdf"
        );
    }
}
