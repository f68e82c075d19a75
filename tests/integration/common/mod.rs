//! Shared helpers for integration tests.
//!
//! PDFs are generated in memory with lopdf. Every page carries a text marker
//! `(<file>-p<n>)` in its content stream so merged output can be checked
//! page by page.

#![allow(dead_code)]

use lopdf::{Dictionary, Document, Object, Stream};
use pdfjoin::io::SelectedFile;
use std::path::{Path, PathBuf};

/// Build a PDF with `pages` pages marked with `tag`.
pub fn marked_pdf(tag: &str, pages: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::with_capacity(pages);
    for n in 1..=pages {
        let content = format!("BT /F1 12 Tf 72 720 Td ({tag}-p{n}) Tj ET");
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        let mut page = Dictionary::new();
        page.set("Type", Object::Name(b"Page".to_vec()));
        page.set("Parent", Object::Reference(pages_id));
        page.set("Contents", Object::Reference(content_id));
        page.set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ]),
        );
        kids.push(Object::Reference(doc.add_object(page)));
    }

    let mut tree = Dictionary::new();
    tree.set("Type", Object::Name(b"Pages".to_vec()));
    tree.set("Count", Object::Integer(pages as i64));
    tree.set("Kids", Object::Array(kids));
    doc.objects.insert(pages_id, Object::Dictionary(tree));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("Failed to serialize test PDF");
    buffer
}

/// An in-memory PDF file named `<tag>.pdf`.
pub fn pdf_file(tag: &str, pages: usize) -> SelectedFile {
    SelectedFile::from_bytes(format!("{tag}.pdf"), None, marked_pdf(tag, pages))
}

/// A file that claims to be a PDF but cannot be parsed.
pub fn corrupt_file(name: &str) -> SelectedFile {
    SelectedFile::from_bytes(name, Some("application/pdf"), b"%PDF-1.7\nnot really".to_vec())
}

/// Write a marked PDF to `dir/<tag>.pdf`.
pub fn write_pdf(dir: &Path, tag: &str, pages: usize) -> PathBuf {
    let path = dir.join(format!("{tag}.pdf"));
    std::fs::write(&path, marked_pdf(tag, pages)).expect("Failed to write test PDF");
    path
}

/// Page markers of a merged document, in page order.
///
/// Expects uncompressed content streams.
pub fn page_markers(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).expect("Merged output is not a valid PDF");

    doc.get_pages()
        .values()
        .map(|&page_id| {
            let page = doc.get_dictionary(page_id).expect("Page is not a dictionary");
            let content_id = page
                .get(b"Contents")
                .and_then(Object::as_reference)
                .expect("Page has no content reference");
            let stream = doc
                .get_object(content_id)
                .and_then(Object::as_stream)
                .expect("Content is not a stream");

            let text = String::from_utf8_lossy(&stream.content);
            let start = text.find('(').expect("No marker start") + 1;
            let end = text[start..].find(')').expect("No marker end") + start;
            text[start..end].to_string()
        })
        .collect()
}
