use crate::config::ExtractionConfig;
use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// A rendered page image awaiting recognition
#[derive(Debug, Clone, PartialEq)]
pub struct PageImage {
    /// 1-based page number
    pub page_number: usize,
    pub path: PathBuf,
}

/// Page images produced by [`OcrEngine::render_pages`]
///
/// Owns the scratch directory the images live in, if any; it is removed
/// when this value is dropped.
#[derive(Debug)]
pub struct RenderedPages {
    pages: Vec<PageImage>,
    _workdir: Option<TempDir>,
}

impl RenderedPages {
    pub fn new(pages: Vec<PageImage>) -> Self {
        Self {
            pages,
            _workdir: None,
        }
    }

    fn in_workdir(pages: Vec<PageImage>, workdir: TempDir) -> Self {
        Self {
            pages,
            _workdir: Some(workdir),
        }
    }

    pub fn pages(&self) -> &[PageImage] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Page rendering and text recognition
pub trait OcrEngine: Send + Sync {
    /// Render every page of the PDF at `path` to an image, in page order
    fn render_pages(&self, path: &Path) -> Result<RenderedPages>;

    /// Recognize the text on one page image
    fn recognize_text(&self, page: &PageImage) -> Result<String>;
}

/// OCR through the `pdftoppm` (poppler-utils) and `tesseract` CLIs
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    pdftoppm_path: String,
    tesseract_path: String,
    dpi: u32,
    language: String,
}

impl TesseractOcr {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            pdftoppm_path: config.pdftoppm_path.clone(),
            tesseract_path: config.tesseract_path.clone(),
            dpi: config.ocr_dpi,
            language: config.ocr_language.clone(),
        }
    }

    /// Check that both external tools can be spawned
    pub fn is_available(&self) -> bool {
        let pdftoppm = Command::new(&self.pdftoppm_path).arg("-v").output().is_ok();
        let tesseract = Command::new(&self.tesseract_path)
            .arg("--version")
            .output()
            .is_ok();

        if !pdftoppm {
            tracing::debug!("pdftoppm not found - install poppler-utils for OCR support");
        }
        if !tesseract {
            tracing::debug!("tesseract not found - install tesseract-ocr for OCR support");
        }

        pdftoppm && tesseract
    }
}

impl OcrEngine for TesseractOcr {
    fn render_pages(&self, path: &Path) -> Result<RenderedPages> {
        let workdir = tempfile::tempdir().context("Failed to create OCR scratch directory")?;
        let prefix = workdir.path().join("page");

        let output = Command::new(&self.pdftoppm_path)
            .arg("-png")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg(path)
            .arg(&prefix)
            .output()
            .with_context(|| format!("Failed to run {}", self.pdftoppm_path))?;

        if !output.status.success() {
            bail!(
                "pdftoppm exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        // pdftoppm zero-pads page numbers, so a lexical sort is page order
        let mut images: Vec<PathBuf> = std::fs::read_dir(workdir.path())
            .context("Failed to list rendered pages")?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "png"))
            .collect();
        images.sort();

        tracing::debug!("Rendered {} page images at {} dpi", images.len(), self.dpi);

        let pages = images
            .into_iter()
            .enumerate()
            .map(|(i, path)| PageImage {
                page_number: i + 1,
                path,
            })
            .collect();

        Ok(RenderedPages::in_workdir(pages, workdir))
    }

    fn recognize_text(&self, page: &PageImage) -> Result<String> {
        let output = Command::new(&self.tesseract_path)
            .arg(&page.path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .output()
            .with_context(|| {
                format!(
                    "Failed to run {} on page {}",
                    self.tesseract_path, page.page_number
                )
            })?;

        if !output.status.success() {
            bail!(
                "tesseract exited with {} on page {}: {}",
                output.status,
                page.page_number,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
