use anyhow::{Context, Result};
use std::path::Path;

/// An opened PDF, as far as text extraction is concerned
pub trait PdfDocument: Send {
    /// Whether the document still requires a password
    fn is_encrypted(&self) -> bool;

    /// Attempt to decrypt with the given password
    fn decrypt(&mut self, password: &str) -> Result<()>;

    /// Number of pages
    fn page_count(&self) -> usize;

    /// Embedded text of the page at `index` (0-based, document order)
    fn page_text(&self, index: usize) -> Result<String>;
}

/// Opens PDF files
pub trait PdfBackend: Send + Sync {
    fn open(&self, path: &Path) -> Result<Box<dyn PdfDocument>>;
}

/// Pure Rust backend using `lopdf`
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfBackend;

impl PdfBackend for LopdfBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn PdfDocument>> {
        let doc = lopdf::Document::load(path)
            .with_context(|| format!("Failed to load PDF {}", path.display()))?;

        let encrypted = doc.is_encrypted();
        let page_numbers = doc.get_pages().into_keys().collect();

        Ok(Box::new(LopdfDocument {
            doc,
            page_numbers,
            encrypted,
        }))
    }
}

struct LopdfDocument {
    doc: lopdf::Document,
    /// 1-based page numbers in document order
    page_numbers: Vec<u32>,
    encrypted: bool,
}

impl PdfDocument for LopdfDocument {
    fn is_encrypted(&self) -> bool {
        self.encrypted
    }

    fn decrypt(&mut self, password: &str) -> Result<()> {
        self.doc
            .decrypt(password)
            .context("Failed to decrypt PDF with the supplied password")?;
        self.encrypted = false;
        self.page_numbers = self.doc.get_pages().into_keys().collect();
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.page_numbers.len()
    }

    fn page_text(&self, index: usize) -> Result<String> {
        let page_number = *self
            .page_numbers
            .get(index)
            .with_context(|| format!("Page index {} out of range", index))?;

        self.doc
            .extract_text(&[page_number])
            .with_context(|| format!("Failed to extract text from page {}", page_number))
    }
}
