//! Row reconstruction by baseline clustering.
//!
//! PDF pages carry no notion of a table row: a printed acta is a cloud of
//! independently positioned strings. Fragments that share a baseline (after
//! rounding to the configured granularity) are grouped into one [`TextRow`],
//! ordered left to right, and rows are ordered top to bottom.

use crate::layout::text_block::{TextFragment, TextRow};
use crate::utils::safe_float_cmp;
use std::collections::BTreeMap;

/// Group fragments into rows.
///
/// # Arguments
///
/// * `fragments` - Fragments of one page, in extraction order
/// * `granularity` - Baselines are rounded to multiples of this value
///
/// # Returns
///
/// Rows sorted by descending y (top of the page first). Within a row,
/// fragments are sorted by ascending x; fragments at the same x keep their
/// extraction order. Blank fragments and fragments with non-finite
/// coordinates are dropped. A page without text yields no rows.
///
/// # Examples
///
/// ```
/// use acta_ingest::layout::{reconstruct_rows, TextFragment};
///
/// let fragments = vec![
///     TextFragment::new("Visitante", 300.0, 700.2, 50.0),
///     TextFragment::new("Local", 40.0, 699.8, 30.0),
///     TextFragment::new("Fecha:", 40.0, 760.0, 30.0),
/// ];
/// let rows = reconstruct_rows(&fragments, 1.0);
/// assert_eq!(rows.len(), 2);
/// assert_eq!(rows[0].text(), "Fecha:");
/// assert_eq!(rows[1].text(), "Local Visitante");
/// ```
pub fn reconstruct_rows(fragments: &[TextFragment], granularity: f32) -> Vec<TextRow> {
    let granularity = if granularity > 0.0 { granularity } else { 1.0 };
    let mut groups: BTreeMap<i64, Vec<TextFragment>> = BTreeMap::new();

    for fragment in fragments {
        if fragment.is_blank() {
            continue;
        }
        if !fragment.x.is_finite() || !fragment.y.is_finite() {
            log::debug!("Dropping fragment '{}' with non-finite position", fragment.text);
            continue;
        }
        let key = (fragment.y / granularity).round() as i64;
        groups.entry(key).or_default().push(fragment.clone());
    }

    groups
        .into_iter()
        .rev()
        .map(|(key, mut group)| {
            // sort_by is stable: equal x keeps extraction order
            group.sort_by(|a, b| safe_float_cmp(a.x, b.x));
            TextRow::new(key as f32 * granularity, group)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn frag(text: &str, x: f32, y: f32) -> TextFragment {
        TextFragment::new(text, x, y, 20.0)
    }

    #[test]
    fn test_empty_page() {
        assert!(reconstruct_rows(&[], 1.0).is_empty());
    }

    #[test]
    fn test_blank_fragments_dropped() {
        let rows = reconstruct_rows(&[frag("  ", 0.0, 10.0), frag("", 5.0, 20.0)], 1.0);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_rows_top_to_bottom() {
        let fragments = vec![
            frag("Bottom", 0.0, 50.0),
            frag("Top", 0.0, 100.0),
            frag("Middle", 0.0, 75.0),
        ];
        let rows = reconstruct_rows(&fragments, 1.0);
        let texts: Vec<_> = rows.iter().map(|r| r.text()).collect();
        assert_eq!(texts, vec!["Top", "Middle", "Bottom"]);
    }

    #[test]
    fn test_same_rounded_y_is_one_row() {
        let fragments = vec![
            frag("Right", 100.0, 100.3),
            frag("Left", 0.0, 99.6),
            frag("Center", 50.0, 100.0),
        ];
        let rows = reconstruct_rows(&fragments, 1.0);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text(), "Left Center Right");
    }

    #[test]
    fn test_coarser_granularity_merges_rows() {
        let fragments = vec![frag("A", 0.0, 101.0), frag("B", 30.0, 101.9)];
        assert_eq!(reconstruct_rows(&fragments, 1.0).len(), 2);
        assert_eq!(reconstruct_rows(&fragments, 4.0).len(), 1);
    }

    proptest! {
        #[test]
        fn prop_shared_y_groups_into_one_sorted_row(
            y in 0i32..800,
            xs in proptest::collection::vec(0.0f32..595.0, 1..12),
        ) {
            let fragments: Vec<_> = xs
                .iter()
                .enumerate()
                .map(|(i, x)| frag(&format!("f{}", i), *x, y as f32))
                .collect();
            let rows = reconstruct_rows(&fragments, 1.0);
            prop_assert_eq!(rows.len(), 1);
            let row_xs: Vec<f32> = rows[0].fragments().iter().map(|f| f.x).collect();
            prop_assert!(row_xs.windows(2).all(|w| w[0] <= w[1]));
            prop_assert_eq!(row_xs.len(), xs.len());
        }
    }
}
