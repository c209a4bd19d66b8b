//! Shared helpers for building test PDFs

#![allow(dead_code)]

use lopdf::{dictionary, Document, Object, Stream};
use std::path::{Path, PathBuf};

/// Text marker drawn on page `index` (1-based) of a document labelled `label`
pub fn marker(label: &str, index: usize) -> String {
    format!("{}-p{}", label, index)
}

/// Write a PDF with `pages` pages into `dir/name`
///
/// Every page draws its [`marker`], so page order can be checked after a
/// merge. `MediaBox` and `Resources` live on the Pages node and are inherited.
pub fn write_pdf(dir: &Path, name: &str, label: &str, pages: usize) -> PathBuf {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for index in 1..=pages {
        let text = format!("BT /F1 24 Tf 72 720 Td ({}) Tj ET", marker(label, index));
        let content_id = doc.add_object(Stream::new(dictionary! {}, text.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => pages as i64,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let path = dir.join(name);
    doc.save(&path).expect("Failed to write test PDF");
    path
}

/// Write bytes that no PDF parser accepts
pub fn write_corrupt(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"this is definitely not a PDF document").expect("write corrupt file");
    path
}

/// Page count of a PDF, read from its page tree
pub fn count_pages(path: &Path) -> usize {
    let doc = Document::load(path).expect("Failed to load PDF");
    doc.get_pages().len()
}

/// Page markers of a merged PDF, in page order
pub fn page_markers(path: &Path) -> Vec<String> {
    let doc = Document::load(path).expect("Failed to load merged PDF");
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let content = doc.get_page_content(page_id).expect("page content");
            let text = String::from_utf8_lossy(&content);
            let start = text.find('(').expect("text operator") + 1;
            let end = text.find(')').expect("text operator");
            text[start..end].to_string()
        })
        .collect()
}
