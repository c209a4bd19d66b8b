//! PDF merging functionality using lopdf

use std::cmp::Ordering;
use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use lopdf::{Dictionary, Document, Object, ObjectId};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::scan::InputFile;
use crate::select::SelectionWarning;

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic `Parent` chains in damaged files
const MAX_TREE_DEPTH: usize = 64;

/// What to do when the output file already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwritePolicy {
    /// Replace the existing file without asking
    #[default]
    Replace,
    /// Fail with [`Error::OutputExists`]
    Refuse,
}

/// Options for merging PDFs
#[derive(Clone)]
pub struct MergeOptions {
    pub overwrite: OverwritePolicy,
    /// Advanced once per input file; hidden unless the caller supplies one
    pub progress: ProgressBar,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            overwrite: OverwritePolicy::default(),
            progress: ProgressBar::hidden(),
        }
    }
}

/// An input file that could not be imported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Summary of a finished merge
#[derive(Debug, Clone)]
pub struct MergeResult {
    /// Where the merged document was written
    pub output_path: PathBuf,
    /// Number of input files whose pages made it into the output
    pub merged_count: usize,
    /// Number of pages in the output
    pub page_count: usize,
    /// Sum of the on-disk sizes of the merged input files
    pub total_bytes: u64,
    /// Files skipped because they could not be read as PDFs
    pub failures: Vec<FileFailure>,
    /// Problems found while applying the user's selection
    pub warnings: Vec<SelectionWarning>,
}

impl MergeResult {
    /// File name of the output document
    pub fn output_name(&self) -> String {
        self.output_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Compare file names ignoring case, independent of locale
///
/// Each character is replaced by its upper case form when that is a single
/// character, then names are compared by code point.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.chars().map(fold_case).cmp(b.chars().map(fold_case))
}

/// Simple upper case mapping; characters that expand (`ß` → `SS`) are kept
fn fold_case(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

/// Whether writing `output_path` would replace the input at `path`
///
/// Names differing only in ASCII case count as the same file when the output
/// path already resolves to something, which is what a case-insensitive
/// filesystem reports.
pub fn is_output_alias(path: &Path, output_path: &Path) -> bool {
    if path == output_path {
        return true;
    }
    let (Some(name), Some(output_name)) = (path.file_name(), output_path.file_name()) else {
        return false;
    };
    let same_name = name == output_name
        || (name.to_string_lossy().eq_ignore_ascii_case(&output_name.to_string_lossy())
            && output_path.exists());
    same_name && same_directory(path, output_path)
}

/// Whether two paths sit in the same directory, however it was spelled
fn same_directory(a: &Path, b: &Path) -> bool {
    let dir = |p: &Path| match p.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let (a, b) = (dir(a), dir(b));
    if a == b {
        return true;
    }
    match (fs::canonicalize(&a), fs::canonicalize(&b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Sort files into merge order
///
/// The sort is stable, so names that differ only in case keep their
/// relative order.
pub fn sort_for_merge(files: &mut [InputFile]) {
    files.sort_by(|a, b| compare_names(&a.name(), &b.name()));
}

/// Output document that source documents are appended to
///
/// Based on the lopdf merge example:
/// https://github.com/J-F-Liu/lopdf/blob/main/examples/merge.rs
pub struct DocumentAccumulator {
    document: Document,
    page_ids: Vec<ObjectId>,
}

impl Default for DocumentAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentAccumulator {
    pub fn new() -> Self {
        Self {
            document: Document::with_version("1.5"),
            page_ids: Vec::new(),
        }
    }

    /// Append every page of `source`, in its original order
    ///
    /// Returns the number of pages appended. The source document is consumed.
    pub fn append(&mut self, mut source: Document) -> usize {
        // Pages are re-parented under a single new Pages node, so attributes
        // they inherit from intermediate nodes must be copied onto them first.
        flatten_inherited_attributes(&mut source);

        // Renumber objects in this document to avoid conflicts
        source.renumber_objects_with(self.document.max_id + 1);
        self.document.max_id = self.document.max_id.max(source.max_id);

        let pages: Vec<ObjectId> = source.get_pages().into_values().collect();

        let objects = source
            .objects
            .into_iter()
            .filter(|(_, object)| !is_tree_root(object));
        self.document.objects.extend(objects);

        let appended = pages.len();
        self.page_ids.extend(pages);
        appended
    }

    /// Build the page tree and write the document to `output_path`
    ///
    /// The document is written to a temporary file next to the target and
    /// renamed into place, so a failed run never leaves a partial output.
    pub fn finish(mut self, output_path: &Path, policy: OverwritePolicy) -> Result<usize> {
        let pages_id = self.document.new_object_id();

        let kids: Vec<Object> = self
            .page_ids
            .iter()
            .map(|&id| Object::Reference(id))
            .collect();

        let mut pages_object = Dictionary::new();
        pages_object.set("Type", Object::Name(b"Pages".to_vec()));
        pages_object.set("Count", Object::Integer(self.page_ids.len() as i64));
        pages_object.set("Kids", Object::Array(kids));

        let catalog_id = self.document.new_object_id();
        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));

        self.document.objects.insert(catalog_id, Object::Dictionary(catalog));
        self.document.objects.insert(pages_id, Object::Dictionary(pages_object));
        self.document.trailer.set("Root", Object::Reference(catalog_id));

        for &page_id in &self.page_ids {
            if let Ok(Object::Dictionary(dict)) = self.document.get_object_mut(page_id) {
                dict.set("Parent", Object::Reference(pages_id));
            }
        }

        // Drops source catalogs' outlines, name trees and the like
        let pruned = self.document.prune_objects();
        debug!(count = pruned.len(), "pruned unreachable objects");

        write_document(&mut self.document, output_path, policy)?;
        Ok(self.page_ids.len())
    }
}

/// Copy inherited page attributes down onto every page of `doc`
fn flatten_inherited_attributes(doc: &mut Document) {
    let mut updates: Vec<(ObjectId, &[u8], Object)> = Vec::new();

    for page_id in doc.get_pages().into_values() {
        for key in INHERITABLE_KEYS {
            if let Some(value) = inherited_value(doc, page_id, key) {
                updates.push((page_id, key, value));
            }
        }
    }

    for (page_id, key, value) in updates {
        if let Ok(page) = doc.get_dictionary_mut(page_id) {
            page.set(key.to_vec(), value);
        }
    }
}

/// Value of `key` inherited by a page that does not set it itself
fn inherited_value(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut node = doc.get_dictionary(page_id).ok()?;
    if node.has(key) {
        return None;
    }

    for _ in 0..MAX_TREE_DEPTH {
        let parent_id = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_dictionary(parent_id).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
    }

    None
}

/// Whether `object` is a catalog or page tree node of a source document
fn is_tree_root(object: &Object) -> bool {
    match object {
        Object::Dictionary(dict) => matches!(
            dict.get(b"Type"),
            Ok(Object::Name(name)) if name == b"Catalog" || name == b"Pages"
        ),
        _ => false,
    }
}

fn write_document(doc: &mut Document, output_path: &Path, policy: OverwritePolicy) -> Result<()> {
    let write_error = |reason: String| Error::Write {
        path: output_path.to_path_buf(),
        reason,
    };

    let dir = match output_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| write_error(e.to_string()))?;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        doc.save_to(&mut writer).map_err(|e| write_error(e.to_string()))?;
        writer.flush().map_err(|e| write_error(e.to_string()))?;
    }
    temp.as_file().sync_all().map_err(|e| write_error(e.to_string()))?;

    let persisted = match policy {
        OverwritePolicy::Replace => temp.persist(output_path),
        OverwritePolicy::Refuse => temp.persist_noclobber(output_path),
    };

    match persisted {
        Ok(_) => Ok(()),
        Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
            Err(Error::OutputExists(output_path.to_path_buf()))
        }
        Err(e) => Err(write_error(e.error.to_string())),
    }
}

/// Load one input file and measure its size on disk
///
/// The file is read completely and closed before this returns.
fn import(file: &InputFile) -> std::result::Result<(Document, u64), String> {
    let document = Document::load(&file.path).map_err(|e| e.to_string())?;
    let size = fs::metadata(&file.path).map_err(|e| e.to_string())?.len();
    Ok((document, size))
}

/// Merge `files` into a single PDF at `output_path`
///
/// Files are merged in [`sort_for_merge`] order. A file that cannot be read
/// is recorded in [`MergeResult::failures`] and skipped; it never aborts the
/// merge. Nothing is written when no file could be read.
pub fn merge_files(
    mut files: Vec<InputFile>,
    output_path: &Path,
    options: &MergeOptions,
) -> Result<MergeResult> {
    sort_for_merge(&mut files);

    if options.overwrite == OverwritePolicy::Refuse && output_path.exists() {
        return Err(Error::OutputExists(output_path.to_path_buf()));
    }

    let progress = &options.progress;
    progress.set_length(files.len() as u64);

    let mut accumulator = DocumentAccumulator::new();
    let mut failures = Vec::new();
    let mut merged_count = 0;
    let mut total_bytes = 0u64;

    for file in &files {
        progress.set_message(file.name());

        match import(file) {
            Ok((document, size)) => {
                let pages = accumulator.append(document);
                debug!(file = %file.path.display(), pages, size, "appended");
                total_bytes += size;
                merged_count += 1;
            }
            Err(reason) => {
                warn!(file = %file.path.display(), %reason, "skipping unreadable PDF");
                failures.push(FileFailure { path: file.path.clone(), reason });
            }
        }

        progress.inc(1);
    }

    progress.finish_and_clear();

    if merged_count == 0 {
        return Err(Error::NothingMerged { failures, warnings: Vec::new() });
    }

    if let Some(failed) = failures.iter().find(|f| is_output_alias(&f.path, output_path)) {
        return Err(Error::UnmergedInput(failed.path.clone()));
    }

    let page_count = accumulator.finish(output_path, options.overwrite)?;
    info!(
        output = %output_path.display(),
        files = merged_count,
        pages = page_count,
        "merge written"
    );

    Ok(MergeResult {
        output_path: output_path.to_path_buf(),
        merged_count,
        page_count,
        total_bytes,
        failures,
        warnings: Vec::new(),
    })
}
