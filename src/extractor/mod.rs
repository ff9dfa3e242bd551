//! PDF text extraction with OCR fallback
//!
//! Embedded text is read page by page. When a document yields no embedded
//! text at all (typically a scan), every page is rendered and run through
//! OCR instead. Failures of the underlying libraries only carry message
//! text, so they are mapped onto [`ExtractionError`] by keyword.

mod ocr;
mod pdf;

pub use ocr::{OcrEngine, PageImage, RenderedPages, TesseractOcr};
pub use pdf::{LopdfBackend, PdfBackend, PdfDocument};

use crate::config::ExtractionConfig;
use crate::error::ExtractionError;
use anyhow::{Context, Result};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// How the text of a document was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMethod {
    Embedded,
    Ocr,
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionMethod::Embedded => write!(f, "embedded"),
            ExtractionMethod::Ocr => write!(f, "ocr"),
        }
    }
}

/// Text extracted from a document. `text` is trimmed and never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedText {
    pub text: String,
    pub method: ExtractionMethod,
    pub page_count: usize,
}

/// Map an opaque library error message onto an extraction failure.
///
/// Best-effort: the keyword set is fixed and a message that happens to
/// mention one of the keywords for another reason will be misclassified.
pub fn classify_failure(message: &str) -> ExtractionError {
    let lower = message.to_lowercase();

    if lower.contains("encrypted") || lower.contains("password") {
        ExtractionError::Encrypted
    } else if lower.contains("corrupt") || lower.contains("broken") || lower.contains("cannot read")
    {
        ExtractionError::Corrupted
    } else {
        ExtractionError::Unknown(message.to_string())
    }
}

/// Extracts text from PDF files
#[derive(Clone)]
pub struct Extractor {
    backend: Arc<dyn PdfBackend>,
    ocr: Option<Arc<dyn OcrEngine>>,
}

impl Extractor {
    /// Create an extractor; `ocr` of `None` disables the OCR fallback
    pub fn new(backend: Arc<dyn PdfBackend>, ocr: Option<Arc<dyn OcrEngine>>) -> Self {
        Self { backend, ocr }
    }

    /// Extractor backed by lopdf and, if enabled, tesseract
    pub fn from_config(config: &ExtractionConfig) -> Self {
        let ocr: Option<Arc<dyn OcrEngine>> = if config.ocr_enabled {
            let engine = TesseractOcr::new(config);
            if !engine.is_available() {
                warn!("OCR tools not found, scanned PDFs will fail to extract");
            }
            Some(Arc::new(engine))
        } else {
            None
        };
        Self::new(Arc::new(LopdfBackend), ocr)
    }

    /// Extract the text of the PDF at `path`
    pub fn extract(&self, path: &Path) -> Result<ExtractedText, ExtractionError> {
        info!("Extracting text from PDF: {}", path.display());

        let mut document = self.backend.open(path).map_err(|e| {
            error!("Failed to open PDF: {:#}", e);
            classify_failure(&format!("{:#}", e))
        })?;

        if document.is_encrypted() {
            if let Err(e) = document.decrypt("") {
                error!("PDF is encrypted and cannot be decrypted without a password: {:#}", e);
                return Err(ExtractionError::Encrypted);
            }
            if document.is_encrypted() {
                error!("PDF is still encrypted after decryption attempt");
                return Err(ExtractionError::Encrypted);
            }
        }

        let page_count = document.page_count();
        let embedded = embedded_text(document.as_ref());
        drop(document);

        info!(
            "Completed embedded text extraction: {} pages, {} characters",
            page_count,
            embedded.chars().count()
        );

        let trimmed = embedded.trim();
        if !trimmed.is_empty() {
            return Ok(ExtractedText {
                text: trimmed.to_string(),
                method: ExtractionMethod::Embedded,
                page_count,
            });
        }

        let Some(ocr) = &self.ocr else {
            warn!("No embedded text found and OCR fallback is disabled");
            return Err(ExtractionError::NoTextFound);
        };

        info!("No embedded text found, attempting OCR fallback");
        let ocr_text = ocr_text(ocr.as_ref(), path).map_err(|e| {
            error!("OCR extraction failed: {:#}", e);
            classify_failure(&format!("{:#}", e))
        })?;

        let trimmed = ocr_text.trim();
        if trimmed.is_empty() {
            error!("OCR produced no text");
            return Err(ExtractionError::NoTextFound);
        }

        Ok(ExtractedText {
            text: trimmed.to_string(),
            method: ExtractionMethod::Ocr,
            page_count,
        })
    }
}

/// Join the embedded text of every page. A page that fails is logged and
/// contributes an empty string.
fn embedded_text(document: &dyn PdfDocument) -> String {
    let pages: Vec<String> = (0..document.page_count())
        .map(|index| {
            let page_number = index + 1;
            match document.page_text(index) {
                Ok(text) => {
                    debug!(
                        "Extracted page {} text length: {}",
                        page_number,
                        text.chars().count()
                    );
                    text
                }
                Err(e) => {
                    warn!("Error extracting text from page {}: {:#}", page_number, e);
                    String::new()
                }
            }
        })
        .collect();

    pages.join("\n")
}

fn ocr_text(ocr: &dyn OcrEngine, path: &Path) -> Result<String> {
    let rendered = ocr
        .render_pages(path)
        .context("OCR fallback failed to render pages")?;

    let mut pages = Vec::with_capacity(rendered.len());
    for page in rendered.pages() {
        let text = ocr
            .recognize_text(page)
            .with_context(|| format!("OCR fallback failed on page {}", page.page_number))?;
        debug!(
            "OCR extracted page {} text length: {}",
            page.page_number,
            text.chars().count()
        );
        pages.push(text);
    }

    let text = pages.join("\n");
    info!(
        "OCR extraction complete: {} pages, {} characters",
        rendered.len(),
        text.chars().count()
    );
    Ok(text)
}
