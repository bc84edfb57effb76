//! Two-column split detection for lineup pages.
//!
//! An acta prints the home lineup on the left half of the page and the
//! visitor lineup on the right half, under one header row naming both
//! columns. The split coordinate is taken from the visitor header; when the
//! headers are missing or implausible a configured fallback is used.

use crate::layout::text_block::{join_text, normalize_label, TextFragment, TextRow};

/// Where a column split came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SplitSource {
    /// Located from the home/visitor column headers
    Headers {
        /// x of the home header
        home_x: f32,
        /// x of the visitor header
        visitor_x: f32,
    },
    /// Headers missing or degenerate, configured value used
    Fallback,
}

/// A vertical cut separating the two team columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSplit {
    /// Fragments with `x` at or beyond this value belong to the right column
    pub x: f32,
    /// How the split was determined
    pub source: SplitSource,
}

impl ColumnSplit {
    /// Partition a row into left and right text.
    ///
    /// Each side is re-joined independently so that a player line on the
    /// left never absorbs fragments printed on the right.
    pub fn partition(&self, row: &TextRow) -> (String, String) {
        let (left, right): (Vec<TextFragment>, Vec<TextFragment>) = row
            .fragments()
            .iter()
            .cloned()
            .partition(|f| f.x < self.x);
        (join_text(&left), join_text(&right))
    }
}

/// Locate the column split of a lineup page.
///
/// # Arguments
///
/// * `rows` - Reconstructed rows of the page
/// * `home_label` - Header printed over the home column
/// * `visitor_label` - Header printed over the visitor column
/// * `gutter` - Margin left of the visitor header still counted as right column
/// * `fallback` - Split used when no usable header row exists
///
/// The first row containing a fragment equal to each header label wins. A
/// split left of (or at) the home header is degenerate and replaced by the
/// fallback.
pub fn detect_column_split(
    rows: &[TextRow],
    home_label: &str,
    visitor_label: &str,
    gutter: f32,
    fallback: f32,
) -> ColumnSplit {
    let home_label = normalize_label(home_label);
    let visitor_label = normalize_label(visitor_label);

    for row in rows {
        let find = |label: &str| {
            row.fragments()
                .iter()
                .find(|f| normalize_label(&f.text) == label)
                .map(|f| f.x)
        };
        let (Some(home_x), Some(visitor_x)) = (find(&home_label), find(&visitor_label)) else {
            continue;
        };

        let x = visitor_x - gutter;
        if x > home_x {
            log::debug!(
                "Column split at x={:.1} from headers (home={:.1}, visitor={:.1})",
                x,
                home_x,
                visitor_x
            );
            return ColumnSplit {
                x,
                source: SplitSource::Headers { home_x, visitor_x },
            };
        }

        log::debug!(
            "Degenerate column headers (home={:.1}, visitor={:.1}), using fallback",
            home_x,
            visitor_x
        );
        break;
    }

    ColumnSplit {
        x: fallback,
        source: SplitSource::Fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(y: f32, items: &[(&str, f32)]) -> TextRow {
        TextRow::new(
            y,
            items
                .iter()
                .map(|(t, x)| TextFragment::new(*t, *x, y, 20.0))
                .collect(),
        )
    }

    #[test]
    fn test_split_from_headers() {
        let rows = vec![
            row(700.0, &[("Fecha:", 40.0), ("09/03/2024", 90.0)]),
            row(650.0, &[("LOCAL", 40.0), ("VISITANTE", 320.0)]),
        ];
        let split = detect_column_split(&rows, "Local", "Visitante", 4.0, 297.5);
        assert_eq!(split.x, 316.0);
        assert!(matches!(split.source, SplitSource::Headers { .. }));
    }

    #[test]
    fn test_fallback_without_headers() {
        let rows = vec![row(650.0, &[("1", 40.0), ("Juan", 60.0)])];
        let split = detect_column_split(&rows, "LOCAL", "VISITANTE", 4.0, 297.5);
        assert_eq!(split.x, 297.5);
        assert_eq!(split.source, SplitSource::Fallback);
    }

    #[test]
    fn test_fallback_on_degenerate_headers() {
        let rows = vec![row(650.0, &[("VISITANTE", 40.0), ("LOCAL", 320.0)])];
        let split = detect_column_split(&rows, "LOCAL", "VISITANTE", 4.0, 297.5);
        assert_eq!(split.source, SplitSource::Fallback);
    }

    #[test]
    fn test_header_labels_must_match_whole_fragment() {
        // "Equipo Local:" must not be taken as the column header
        let rows = vec![row(700.0, &[("Equipo Local:", 40.0), ("Equipo Visitante:", 320.0)])];
        let split = detect_column_split(&rows, "LOCAL", "VISITANTE", 4.0, 250.0);
        assert_eq!(split.source, SplitSource::Fallback);
    }

    #[test]
    fn test_partition_rejoins_each_side() {
        let split = ColumnSplit {
            x: 297.5,
            source: SplitSource::Fallback,
        };
        let r = row(
            600.0,
            &[("1", 40.0), ("X", 55.0), ("PEREZ", 70.0), ("2", 310.0), ("GIL", 330.0)],
        );
        let (left, right) = split.partition(&r);
        assert_eq!(left, "1 X PEREZ");
        assert_eq!(right, "2 GIL");
    }
}
