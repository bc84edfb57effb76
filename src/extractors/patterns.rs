//! Regular expressions shared by the extractors.
//!
//! Value shapes (scores, player lines, minutes) are fixed and compiled once.
//! Label patterns depend on [`LabelConfig`] and are compiled per pipeline.

use crate::config::LabelConfig;
use crate::error::Result;
use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

lazy_static! {
    /// Final score, e.g. "24 - 17" or "24:17"
    pub(crate) static ref RE_SCORE: Regex = Regex::new(r"(\d{1,3})\s*[-:]\s*(\d{1,3})").unwrap();

    /// Lineup line: dorsal, optional status chars, name, license
    pub(crate) static ref RE_PLAYER_LINE: Regex =
        Regex::new(r"^(\d{1,2})\s+(?:([XxCc/]+)\s+)?(.+?)\s+(\d{4,10})$").unwrap();

    /// Minute with optional added time, e.g. "40+2"
    pub(crate) static ref RE_MINUTE: Regex = Regex::new(r"^(\d{1,3})(?:\s*\+\s*(\d{1,2}))?$").unwrap();

    /// Single dorsal
    pub(crate) static ref RE_DORSAL: Regex = Regex::new(r"^#?(\d{1,2})$").unwrap();

    /// Substitution pair "in/out"
    pub(crate) static ref RE_SUB_PAIR: Regex = Regex::new(r"^(\d{1,2})\s*[-/>]\s*(\d{1,2})$").unwrap();
}

/// Patterns built from the configured labels.
#[derive(Debug, Clone)]
pub struct LabelPatterns {
    /// `<date label>: DD/MM/YYYY`
    pub date: Regex,
    /// Home team label
    pub home_team: Regex,
    /// Visitor team label
    pub visitor_team: Regex,
    /// Final score label
    pub final_score: Regex,
    /// Kickoff time label, unset when the label is blank
    pub kickoff_time: Option<Regex>,
}

impl LabelPatterns {
    /// Compile the label patterns.
    pub fn new(labels: &LabelConfig) -> Result<Self> {
        Ok(Self {
            date: case_insensitive(&format!(
                r"{}\s*:?\s*(\d{{1,2}})/(\d{{1,2}})/(\d{{4}})",
                regex::escape(labels.date.trim())
            ))?,
            home_team: label_regex(&labels.home_team)?,
            visitor_team: label_regex(&labels.visitor_team)?,
            final_score: label_regex(&labels.final_score)?,
            kickoff_time: if labels.kickoff_time.trim().is_empty() {
                None
            } else {
                Some(label_regex(&labels.kickoff_time)?)
            },
        })
    }
}

/// A label followed by an optional colon.
fn label_regex(label: &str) -> Result<Regex> {
    case_insensitive(&format!(r"{}\s*:?", regex::escape(label.trim())))
}

fn case_insensitive(pattern: &str) -> Result<Regex> {
    Ok(RegexBuilder::new(pattern).case_insensitive(true).build()?)
}

/// Parse a printed minute, folding added time into the total.
///
/// Accepts "23", "23'", "40+2" (→ 42).
pub fn parse_minute(text: &str) -> Option<u32> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| !matches!(c, '\'' | '’' | '′' | '"'))
        .collect();
    let caps = RE_MINUTE.captures(cleaned.trim())?;
    let base: u32 = caps[1].parse().ok()?;
    let added: u32 = caps
        .get(2)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0);
    Some(base + added)
}

/// Parse a single dorsal.
pub fn parse_dorsal(text: &str) -> Option<u32> {
    RE_DORSAL.captures(text.trim())?[1].parse().ok()
}

/// Parse an "in/out" substitution pair.
pub fn parse_substitution_pair(text: &str) -> Option<(u32, u32)> {
    let caps = RE_SUB_PAIR.captures(text.trim())?;
    Some((caps[1].parse().ok()?, caps[2].parse().ok()?))
}
