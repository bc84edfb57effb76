//! # Acta Ingest
//!
//! Turns official rugby match reports ("actas") into per-player and per-match
//! statistics for a club dashboard.
//!
//! ## Stages
//!
//! - **Layout**: positioned text fragments are grouped into rows and the two
//!   team columns are located on each page
//! - **Extraction**: match header, both lineups, and the scoreboard,
//!   substitution and card timelines
//! - **Resolution**: the calendar match (or an external placeholder) and a
//!   roster or external-player identity for every listed player
//! - **Aggregation**: points, tries, cards and minutes played
//! - **Persistence**: one match row and one row per listed player, replaced
//!   on every run
//!
//! The data store is reached only through the traits in [`store`]; PDF
//! reading sits behind [`source::PageTextSource`] (the `pdf` feature adds a
//! reader built on `pdf_oxide`).
//!
//! ## Quick Start
//!
//! ```ignore
//! use acta_ingest::{FragmentDump, IngestConfig, IngestPipeline, LogProgress, MemoryBackend};
//!
//! let config = IngestConfig::for_club("Rugby Alcobendas", "RAL");
//! let pipeline = IngestPipeline::new(config)?;
//!
//! let mut source = FragmentDump::from_json_file("acta.json")?;
//! let mut store = MemoryBackend::load_json("store.json")?;
//! let report = pipeline.ingest(&mut source, &mut store, &mut LogProgress)?;
//!
//! println!("{}-{}", report.home_score, report.visitor_score);
//! store.save_json("store.json")?;
//! # Ok::<(), acta_ingest::Error>(())
//! ```

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Error handling
pub mod error;

// Configuration
pub mod config;

// Extracted match facts
pub mod model;

// Row reconstruction and column detection
pub mod layout;

// Metadata, lineup and timeline extraction
pub mod extractors;

// Page text input
pub mod source;

// Data store contracts
pub mod store;

// Match and player identity
pub mod resolver;

// Statistics
pub mod stats;

// Writing statistics
pub mod persistence;

// End-to-end orchestration
pub mod pipeline;

// Re-exports
pub use config::{EventCodeTable, IngestConfig, LabelConfig, LayoutConfig};
pub use error::{Error, IngestWarning, Result};
pub use extractors::Extraction;
pub use model::{ActaExtraction, EventKind, ExtractedPlayer, MatchEvent, MatchMetadata, Side, Substitution};
pub use pipeline::{IngestPipeline, IngestReport, IngestStage, LogProgress, NullProgress, ProgressSink, StatusLine};
pub use source::{FragmentDump, PageTextSource};
pub use store::{Backend, MatchKind, MatchRef, MemoryBackend};

#[cfg(feature = "pdf")]
#[cfg_attr(docsrs, doc(cfg(feature = "pdf")))]
pub use source::PdfOxideSource;

// Internal utilities
pub(crate) mod utils {
    //! Internal utility functions for the library.

    use std::cmp::Ordering;

    /// Safely compare two floating point numbers, handling NaN cases.
    ///
    /// NaN values are treated as equal to each other and greater than all other values.
    /// This ensures that sorting operations never panic due to NaN comparisons.
    #[inline]
    pub fn safe_float_cmp(a: f32, b: f32) -> Ordering {
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater, // NaN > all numbers
            (false, true) => Ordering::Less,    // all numbers < NaN
            (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_safe_float_cmp_normal() {
            assert_eq!(safe_float_cmp(1.0, 2.0), Ordering::Less);
            assert_eq!(safe_float_cmp(2.0, 1.0), Ordering::Greater);
            assert_eq!(safe_float_cmp(1.5, 1.5), Ordering::Equal);
        }

        #[test]
        fn test_safe_float_cmp_nan() {
            assert_eq!(safe_float_cmp(f32::NAN, f32::NAN), Ordering::Equal);
            assert_eq!(safe_float_cmp(f32::NAN, 0.0), Ordering::Greater);
            assert_eq!(safe_float_cmp(0.0, f32::NAN), Ordering::Less);
        }
    }
}

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
