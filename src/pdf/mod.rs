//! PDF manipulation module

pub mod merge;

// Re-export commonly used items
pub use merge::{
    is_output_alias, merge_files, sort_for_merge, DocumentAccumulator, FileFailure, MergeOptions, MergeResult,
    OverwritePolicy,
};
