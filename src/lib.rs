//! PDF Merge Library
//!
//! Merges the PDF files of a directory into a single document.
//! This library provides functionality to:
//! - Scan a directory for PDF files
//! - Narrow the files down to a user selection
//! - Concatenate their pages in case-insensitive file name order
//! - Summarize the result for display
//!
//! # Example
//!
//! ```no_run
//! use pdf_merge::{merge, MergeOptions, Selection};
//! use std::path::Path;
//!
//! let result = merge(Path::new("handouts"), &Selection::All, "week-3", &MergeOptions::default())
//!     .expect("Failed to merge PDFs");
//!
//! for line in pdf_merge::report::summarize(&result) {
//!     println!("{}", line);
//! }
//! ```

pub mod error;
pub mod naming;
pub mod pdf;
pub mod report;
pub mod scan;
pub mod select;
pub mod shell;

use std::path::Path;
use tracing::info;

// Re-export commonly used items
pub use error::{Error, Result};
pub use pdf::{MergeOptions, MergeResult, OverwritePolicy};
pub use scan::InputFile;
pub use select::{Selection, SelectionWarning};

/// Merge the PDFs of `directory` into `<directory>/<output_name>`
///
/// `output_name` is resolved with [`naming::output_file_name`], so a blank
/// name produces a timestamped default. An existing file with the output
/// name is merged like any other input; it is only replaced once its pages
/// are part of the merge.
pub fn merge(
    directory: &Path,
    selection: &Selection,
    output_name: &str,
    options: &MergeOptions,
) -> Result<MergeResult> {
    let file_name = naming::output_file_name(output_name)?;
    let output_path = directory.join(&file_name);

    let candidates: Vec<InputFile> = scan::scan_directory(directory)?;
    if candidates.is_empty() {
        return Err(Error::EmptyInput(directory.to_path_buf()));
    }

    let aliases: Vec<InputFile> = candidates
        .iter()
        .filter(|f| pdf::is_output_alias(&f.path, &output_path))
        .cloned()
        .collect();

    let selected = select::select_files(candidates, selection);

    if let Some(skipped) = aliases.iter().find(|a| !selected.files.contains(a)) {
        return Err(Error::UnmergedInput(skipped.path.clone()));
    }
    info!(
        files = selected.files.len(),
        warnings = selected.warnings.len(),
        "selection applied"
    );

    let warnings = selected.warnings;
    match pdf::merge_files(selected.files, &output_path, options) {
        Ok(mut result) => {
            result.warnings = warnings;
            Ok(result)
        }
        Err(Error::NothingMerged { failures, .. }) => Err(Error::NothingMerged { failures, warnings }),
        Err(e) => Err(e),
    }
}
