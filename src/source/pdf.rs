//! PDF page reading through `pdf_oxide`.

use super::PageTextSource;
use crate::error::{Error, Result};
use crate::layout::TextFragment;
use std::path::Path;

/// Reads positioned spans straight from a PDF file.
pub struct PdfOxideSource {
    document: pdf_oxide::PdfDocument,
}

impl PdfOxideSource {
    /// Open a PDF file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let document = pdf_oxide::PdfDocument::open(path).map_err(|e| Error::Pdf(e.to_string()))?;
        Ok(Self { document })
    }
}

impl PageTextSource for PdfOxideSource {
    fn page_count(&mut self) -> Result<usize> {
        self.document.page_count().map_err(|e| Error::Pdf(e.to_string()))
    }

    fn page_fragments(&mut self, page_index: usize) -> Result<Vec<TextFragment>> {
        let spans = self
            .document
            .extract_spans(page_index)
            .map_err(|e| Error::Pdf(e.to_string()))?;
        log::debug!("Page {}: {} spans", page_index, spans.len());
        Ok(spans
            .into_iter()
            .map(|span| TextFragment::new(span.text, span.bbox.x, span.bbox.y, span.bbox.width))
            .collect())
    }
}
