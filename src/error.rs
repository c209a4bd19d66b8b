//! Error types for the PDF merge library

use std::path::PathBuf;
use thiserror::Error;

use crate::pdf::FileFailure;
use crate::select::SelectionWarning;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the PDF merge library
#[derive(Error, Debug)]
pub enum Error {
    /// PDF processing error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Source directory missing or not a directory
    #[error("The folder path is invalid or does not exist: {}", .0.display())]
    NotFound(PathBuf),

    /// No PDF files in the source directory
    #[error("No PDF files found in the specified folder: {}", .0.display())]
    EmptyInput(PathBuf),

    /// Invalid glob pattern
    #[error("Invalid glob pattern: {0}")]
    InvalidGlob(String),

    /// Output name cannot be used as a file name inside the source directory
    #[error("Invalid output name: {0:?}")]
    InvalidOutputName(String),

    /// Output exists and overwriting was refused
    #[error("Output file already exists: {}", .0.display())]
    OutputExists(PathBuf),

    /// The output would replace an input whose pages are not in the merge
    #[error("Refusing to overwrite {} because its pages were not merged", .0.display())]
    UnmergedInput(PathBuf),

    /// Writing the merged document failed
    #[error("Failed to write {}: {reason}", .path.display())]
    Write { path: PathBuf, reason: String },

    /// No input could be imported, or none was left after selection
    #[error("None of the selected files could be merged")]
    NothingMerged {
        failures: Vec<FileFailure>,
        warnings: Vec<SelectionWarning>,
    },

    /// Terminal prompt failed
    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Process exit code for a run that ended with this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::EmptyInput(_) => 2,
            Error::Write { .. } | Error::OutputExists(_) | Error::UnmergedInput(_) => 3,
            Error::NothingMerged { .. } => 4,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(Error::EmptyInput(PathBuf::from("in")).exit_code(), 2);
        assert_eq!(Error::OutputExists(PathBuf::from("out.pdf")).exit_code(), 3);
        assert_eq!(Error::UnmergedInput(PathBuf::from("a.pdf")).exit_code(), 3);
        assert_eq!(
            Error::Write { path: PathBuf::from("out.pdf"), reason: "disk full".to_string() }.exit_code(),
            3
        );
        assert_eq!(Error::NothingMerged { failures: vec![], warnings: vec![] }.exit_code(), 4);
        assert_eq!(Error::NotFound(PathBuf::from("missing")).exit_code(), 1);
    }

    #[test]
    fn test_write_error_message_names_path() {
        let err = Error::Write { path: PathBuf::from("out.pdf"), reason: "denied".to_string() };
        assert_eq!(err.to_string(), "Failed to write out.pdf: denied");
    }
}
