//! Layout reconstruction for acta pages.
//!
//! - Baseline clustering (fragments → rows)
//! - Two-column split detection for lineups

pub mod clustering;
pub mod column_detector;
pub mod text_block;

// Re-export main types
pub use clustering::reconstruct_rows;
pub use column_detector::{detect_column_split, ColumnSplit, SplitSource};
pub use text_block::{TextFragment, TextRow};
