//! Positioned text fragments and the rows they are grouped into.

use serde::{Deserialize, Serialize};

/// A string anchored at a point of a PDF page.
///
/// Coordinates follow PDF user space: the origin is the bottom-left corner,
/// so larger `y` is higher on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    /// The text as extracted
    pub text: String,
    /// Left edge
    pub x: f32,
    /// Baseline
    pub y: f32,
    /// Rendered width
    #[serde(default)]
    pub width: f32,
}

impl TextFragment {
    /// Create a new fragment.
    pub fn new(text: impl Into<String>, x: f32, y: f32, width: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            width,
        }
    }

    /// Whether the fragment carries no visible text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Fragments sharing one rounded baseline, left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRow {
    /// Rounded baseline shared by the fragments
    pub y: f32,
    fragments: Vec<TextFragment>,
    text: String,
}

impl TextRow {
    /// Build a row from fragments already sorted by x.
    pub fn new(y: f32, fragments: Vec<TextFragment>) -> Self {
        let text = join_text(&fragments);
        Self { y, fragments, text }
    }

    /// The fragments of the row in reading order.
    pub fn fragments(&self) -> &[TextFragment] {
        &self.fragments
    }

    /// Space-joined text of every fragment.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the row text begins with `label` (case-insensitive).
    pub fn starts_with_label(&self, label: &str) -> bool {
        let label = normalize_label(label);
        !label.is_empty() && self.text.trim_start().to_lowercase().starts_with(&label)
    }

    /// Fragments remaining after the leading label fragments.
    ///
    /// Leading fragments are consumed while their text is still part of
    /// `label`, so both `["Minuto:", "12", ...]` and
    /// `["Dorsal", "Entra:", ...]` for label `"Dorsal Entra"` work. A
    /// fragment holding the end of the label and a value (`"Minuto: 12"`)
    /// contributes the value as a fragment at the same x. Returns every
    /// fragment when the row does not start with the label.
    pub fn values_after_label(&self, label: &str) -> Vec<TextFragment> {
        let label = normalize_label(label);
        if label.is_empty() {
            return self.fragments.clone();
        }

        let mut rest = label.as_str();
        for (idx, fragment) in self.fragments.iter().enumerate() {
            let text = fragment.text.trim();
            if let Some(after) = strip_prefix_ignore_case(text, rest) {
                let value = after.trim_start_matches(':').trim();
                if value.is_empty() {
                    return self.fragments[idx + 1..].to_vec();
                }
                // The label must end on a word boundary
                if after.starts_with(|c: char| c == ':' || c.is_whitespace()) {
                    let mut values = Vec::with_capacity(self.fragments.len() - idx);
                    values.push(TextFragment::new(value, fragment.x, fragment.y, fragment.width));
                    values.extend_from_slice(&self.fragments[idx + 1..]);
                    return values;
                }
                break;
            }

            let part = normalize_label(text);
            match rest.strip_prefix(part.as_str()) {
                Some(remaining) if !part.is_empty() && remaining.starts_with(' ') => {
                    rest = remaining.trim_start();
                },
                _ => break,
            }
        }
        self.fragments.clone()
    }
}

/// `text` without a case-insensitive `prefix`, if it starts with it.
fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let mut expected = prefix.chars().flat_map(char::to_lowercase);
    let mut pending = expected.next();
    for (idx, c) in text.char_indices() {
        let Some(want) = pending else {
            return Some(&text[idx..]);
        };
        let mut lower = c.to_lowercase();
        if lower.next() != Some(want) {
            return None;
        }
        pending = expected.next();
        for extra in lower {
            if pending != Some(extra) {
                return None;
            }
            pending = expected.next();
        }
    }
    pending.is_none().then_some("")
}

/// Join fragment texts with single spaces.
pub fn join_text(fragments: &[TextFragment]) -> String {
    fragments
        .iter()
        .map(|f| f.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lower-case, trim and drop a trailing colon.
pub(crate) fn normalize_label(label: &str) -> String {
    label.trim().trim_end_matches(':').trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(texts: &[&str]) -> TextRow {
        let fragments = texts
            .iter()
            .enumerate()
            .map(|(i, t)| TextFragment::new(*t, i as f32 * 40.0, 500.0, 30.0))
            .collect();
        TextRow::new(500.0, fragments)
    }

    #[test]
    fn test_row_text_is_space_joined() {
        let r = row(&["Fecha:", "09/03/2024"]);
        assert_eq!(r.text(), "Fecha: 09/03/2024");
    }

    #[test]
    fn test_values_after_single_label() {
        let r = row(&["Minuto:", "12", "35", "61"]);
        let fragments = r.values_after_label("Minuto");
        let values: Vec<_> = fragments.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(values, vec!["12", "35", "61"]);
    }

    #[test]
    fn test_values_after_multi_fragment_label() {
        let r = row(&["Dorsal", "Entra:", "16/1", "22/12"]);
        let values = r.values_after_label("Dorsal Entra");
        assert_eq!(values.len(), 2);
        assert_eq!(values[0].text, "16/1");
    }

    #[test]
    fn test_values_after_label_merged_with_first_value() {
        let r = row(&["Minuto: 12", "13"]);
        let values = r.values_after_label("Minuto");
        let texts: Vec<_> = values.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(texts, vec!["12", "13"]);
        assert_eq!(values[0].x, 0.0);

        let r = row(&["Dorsal", "Entra: 16/1", "22/12"]);
        let values = r.values_after_label("Dorsal Entra");
        assert_eq!(values[0].text, "16/1");
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_label_prefix_of_longer_word_is_not_stripped() {
        let r = row(&["Dorsales", "4"]);
        assert_eq!(r.values_after_label("Dorsal").len(), 2);
    }

    #[test]
    fn test_values_without_label_returns_all() {
        let r = row(&["12", "35"]);
        assert_eq!(r.values_after_label("Minuto").len(), 2);
    }

    #[test]
    fn test_starts_with_label_case_insensitive() {
        let r = row(&["TIPO", "E", "T"]);
        assert!(r.starts_with_label("Tipo"));
        assert!(!r.starts_with_label("Dorsal"));
    }
}
