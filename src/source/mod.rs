//! Page text sources.
//!
//! The pipeline does not parse PDF files itself; it consumes positioned
//! fragments page by page through [`PageTextSource`].

#[cfg(feature = "pdf")]
mod pdf;

#[cfg(feature = "pdf")]
pub use pdf::PdfOxideSource;

use crate::error::{Error, Result};
use crate::layout::TextFragment;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Anything that can hand out the positioned text of a document's pages.
pub trait PageTextSource {
    /// Number of pages in the document.
    fn page_count(&mut self) -> Result<usize>;

    /// Fragments of one page (0-indexed), in extraction order.
    fn page_fragments(&mut self, page_index: usize) -> Result<Vec<TextFragment>>;

    /// Fragments of every page.
    fn all_pages(&mut self) -> Result<Vec<Vec<TextFragment>>> {
        let count = self.page_count()?;
        (0..count).map(|i| self.page_fragments(i)).collect()
    }
}

/// Pre-extracted fragments, typically loaded from a JSON dump.
///
/// ```json
/// { "pages": [[{ "text": "Fecha:", "x": 40.0, "y": 760.0, "width": 28.0 }]] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FragmentDump {
    /// Fragments per page
    pub pages: Vec<Vec<TextFragment>>,
}

impl FragmentDump {
    /// Wrap pages already in memory.
    pub fn new(pages: Vec<Vec<TextFragment>>) -> Self {
        Self { pages }
    }

    /// Load a dump from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Write the dump as pretty JSON.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), self)?;
        Ok(())
    }
}

impl PageTextSource for FragmentDump {
    fn page_count(&mut self) -> Result<usize> {
        Ok(self.pages.len())
    }

    fn page_fragments(&mut self, page_index: usize) -> Result<Vec<TextFragment>> {
        self.pages
            .get(page_index)
            .cloned()
            .ok_or_else(|| Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("page {} out of range ({} pages)", page_index, self.pages.len()),
            )))
    }
}
