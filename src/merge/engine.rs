//! The PDF engine used by the merge executor.
//!
//! [`PdfEngine`] is the narrow set of document operations a merge needs:
//! create an empty document, load one from bytes, copy pages across, append
//! them and serialize the result. [`LopdfEngine`] implements it on top of
//! `lopdf`.

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::{PdfJoinError, Result};

/// Options for serializing a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOptions {
    /// Ask viewers to regenerate interactive form field appearances.
    pub update_field_appearances: bool,

    /// Compress streams before writing.
    pub compress: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            update_field_appearances: false,
            compress: true,
        }
    }
}

/// Document operations needed to merge PDFs.
pub trait PdfEngine {
    /// A loaded or newly created document.
    type Document;

    /// A page copied into a target document but not yet placed in its page tree.
    type Page;

    /// Engine name, used in diagnostics.
    fn name(&self) -> &str;

    /// Fail with [`PdfJoinError::DependencyMissing`] if the engine cannot be used.
    fn check_available(&self) -> Result<()>;

    /// Create an empty document with no pages.
    fn create(&self) -> Result<Self::Document>;

    /// Parse `bytes` as a PDF. `name` labels errors.
    fn load(&self, name: &str, bytes: &[u8]) -> Result<Self::Document>;

    /// Zero-based indices of every page of `doc`, in document order.
    fn page_indices(&self, doc: &Self::Document) -> Vec<usize>;

    /// Copy the pages at `indices` from `source` into `target`.
    ///
    /// The returned pages are in the order of `indices` and must be appended
    /// with [`PdfEngine::add_page`] to become visible.
    fn copy_pages(
        &self,
        target: &mut Self::Document,
        source: Self::Document,
        indices: &[usize],
    ) -> Result<Vec<Self::Page>>;

    /// Append `page` to the end of `target`.
    fn add_page(&self, target: &mut Self::Document, page: Self::Page) -> Result<()>;

    /// Number of pages in `doc`.
    fn page_count(&self, doc: &Self::Document) -> usize;

    /// Serialize `doc`.
    fn save(&self, doc: Self::Document, options: &SaveOptions) -> Result<Vec<u8>>;
}

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_ATTRIBUTES: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic `Parent` chains in malformed files.
const MAX_TREE_DEPTH: usize = 64;

/// A `lopdf` document together with the id of its page tree root.
#[derive(Debug, Clone)]
pub struct LopdfDocument {
    inner: Document,
    pages_root: ObjectId,
}

impl LopdfDocument {
    /// The underlying `lopdf` document.
    pub fn inner(&self) -> &Document {
        &self.inner
    }
}

/// Page copied by [`LopdfEngine::copy_pages`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LopdfPage(ObjectId);

/// [`PdfEngine`] backed by `lopdf`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfEngine;

impl LopdfEngine {
    /// Create the engine.
    pub fn new() -> Self {
        Self
    }
}

impl PdfEngine for LopdfEngine {
    type Document = LopdfDocument;
    type Page = LopdfPage;

    fn name(&self) -> &str {
        "lopdf"
    }

    fn check_available(&self) -> Result<()> {
        Ok(())
    }

    fn create(&self) -> Result<LopdfDocument> {
        let mut inner = Document::with_version("1.7");
        let pages_root = inner.new_object_id();

        let mut pages = Dictionary::new();
        pages.set("Type", Object::Name(b"Pages".to_vec()));
        pages.set("Kids", Object::Array(Vec::new()));
        pages.set("Count", Object::Integer(0));
        inner.objects.insert(pages_root, Object::Dictionary(pages));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_root));
        let catalog_id = inner.add_object(Object::Dictionary(catalog));

        inner.trailer.set("Root", Object::Reference(catalog_id));

        Ok(LopdfDocument { inner, pages_root })
    }

    fn load(&self, name: &str, bytes: &[u8]) -> Result<LopdfDocument> {
        let inner = Document::load_mem(bytes).map_err(|e| {
            let err_msg = e.to_string();
            if err_msg.contains("encrypt") || err_msg.contains("password") {
                PdfJoinError::encrypted_pdf(name)
            } else {
                PdfJoinError::failed_to_load_pdf(name, err_msg)
            }
        })?;

        if inner.is_encrypted() {
            return Err(PdfJoinError::encrypted_pdf(name));
        }

        let pages_root = inner
            .catalog()
            .and_then(|catalog| catalog.get(b"Pages"))
            .and_then(Object::as_reference)
            .map_err(|e| PdfJoinError::corrupted_pdf(name, format!("No page tree: {e}")))?;

        if inner.get_pages().is_empty() {
            return Err(PdfJoinError::corrupted_pdf(name, "PDF has no pages"));
        }

        Ok(LopdfDocument { inner, pages_root })
    }

    fn page_indices(&self, doc: &LopdfDocument) -> Vec<usize> {
        (0..doc.inner.get_pages().len()).collect()
    }

    fn copy_pages(
        &self,
        target: &mut LopdfDocument,
        source: LopdfDocument,
        indices: &[usize],
    ) -> Result<Vec<LopdfPage>> {
        let mut source = source.inner;

        // Move the source id space above everything the target already uses.
        source.renumber_objects_with(target.inner.max_id + 1);

        let page_ids: Vec<ObjectId> = source.get_pages().into_values().collect();
        let mut copied = Vec::with_capacity(indices.len());

        for &idx in indices {
            let page_id = *page_ids.get(idx).ok_or_else(|| {
                PdfJoinError::other(format!(
                    "Page index {idx} out of range (document has {} pages)",
                    page_ids.len()
                ))
            })?;

            // The page is about to leave its page tree.
            flatten_inherited_attributes(&mut source, page_id);
            copied.push(LopdfPage(page_id));
        }

        target.inner.max_id = target.inner.max_id.max(source.max_id);
        target.inner.objects.extend(source.objects);

        Ok(copied)
    }

    fn add_page(&self, target: &mut LopdfDocument, page: LopdfPage) -> Result<()> {
        let LopdfPage(page_id) = page;
        let pages_root = target.pages_root;

        target
            .inner
            .get_dictionary_mut(page_id)
            .map_err(|e| PdfJoinError::other(format!("Copied page is missing: {e}")))?
            .set("Parent", Object::Reference(pages_root));

        let pages = target
            .inner
            .get_dictionary_mut(pages_root)
            .map_err(|e| PdfJoinError::other(format!("Page tree root is missing: {e}")))?;

        match pages.get_mut(b"Kids") {
            Ok(Object::Array(kids)) => kids.push(Object::Reference(page_id)),
            _ => return Err(PdfJoinError::other("Page tree root has no Kids array")),
        }

        let count = pages.get(b"Count").and_then(Object::as_i64).unwrap_or(0);
        pages.set("Count", Object::Integer(count + 1));

        Ok(())
    }

    fn page_count(&self, doc: &LopdfDocument) -> usize {
        doc.inner.get_pages().len()
    }

    fn save(&self, doc: LopdfDocument, options: &SaveOptions) -> Result<Vec<u8>> {
        let mut doc = doc.inner;

        if options.update_field_appearances {
            let mut form = Dictionary::new();
            form.set("Fields", Object::Array(Vec::new()));
            form.set("NeedAppearances", Object::Boolean(true));
            doc.catalog_mut()
                .map_err(|e| PdfJoinError::serialization_failed(e.to_string()))?
                .set("AcroForm", Object::Dictionary(form));
        }

        // Source catalogs, outlines and info dictionaries were copied along
        // with the pages but nothing points at them any more.
        doc.prune_objects();
        doc.renumber_objects();

        if options.compress {
            doc.compress();
        }

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| PdfJoinError::serialization_failed(e.to_string()))?;

        Ok(buffer)
    }
}

/// Copy inheritable attributes from the page tree onto the page itself.
fn flatten_inherited_attributes(doc: &mut Document, page_id: ObjectId) {
    let mut inherited = Vec::new();

    if let Ok(page) = doc.get_dictionary(page_id) {
        for key in INHERITABLE_ATTRIBUTES {
            if page.has(key) {
                continue;
            }
            if let Some(value) = find_inherited(doc, page, key) {
                inherited.push((key, value));
            }
        }
    }

    if inherited.is_empty() {
        return;
    }

    if let Ok(page) = doc.get_dictionary_mut(page_id) {
        for (key, value) in inherited {
            page.set(key, value);
        }
    }
}

fn find_inherited(doc: &Document, page: &Dictionary, key: &[u8]) -> Option<Object> {
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();

    for _ in 0..MAX_TREE_DEPTH {
        let node = doc.get_dictionary(parent?).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    None
}
