//! Match metadata extraction: date, team names, final score.

use crate::config::IngestConfig;
use crate::error::{Error, IngestWarning, Result};
use crate::extractors::patterns::{LabelPatterns, RE_SCORE};
use crate::layout::TextRow;
use crate::model::MatchMetadata;
use chrono::NaiveDate;

/// Metadata as found in the rows; any field may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataScan {
    /// Match date
    pub date: Option<NaiveDate>,
    /// Home team name
    pub home_team_name: Option<String>,
    /// Visitor team name
    pub visitor_team_name: Option<String>,
    /// Final score (home, visitor)
    pub score: Option<(u32, u32)>,
}

impl MetadataScan {
    /// Name of the team that is not the own club, if both names were found.
    pub fn rival(&self, config: &IngestConfig) -> Option<&str> {
        let home = self.home_team_name.as_deref()?;
        let visitor = self.visitor_team_name.as_deref()?;
        Some(if config.is_own_team(home) { visitor } else { home })
    }

    /// Turn the scan into metadata, failing if the match cannot be identified.
    pub fn complete(self, config: &IngestConfig) -> Result<(MatchMetadata, Vec<IngestWarning>)> {
        let date = self.date.ok_or(Error::MissingMetadata { field: "date" })?;
        let (home, visitor) = match (self.home_team_name, self.visitor_team_name) {
            (Some(h), Some(v)) if !h.is_empty() && !v.is_empty() => (h, v),
            _ => return Err(Error::MissingMetadata { field: "rival" }),
        };

        let mut warnings = Vec::new();
        let is_own_team_home = config.is_own_team(&home);
        if !is_own_team_home && !config.is_own_team(&visitor) {
            log::warn!("Own club not found among '{}' and '{}'", home, visitor);
            warnings.push(IngestWarning::OwnTeamNotFound {
                home: home.clone(),
                visitor: visitor.clone(),
            });
        }

        let metadata = MatchMetadata {
            date,
            home_team_name: home,
            visitor_team_name: visitor,
            is_own_team_home,
            home_score: self.score.map(|(h, _)| h),
            visitor_score: self.score.map(|(_, v)| v),
        };
        Ok((metadata, warnings))
    }
}

/// Scan rows for the match date, both team names and the final score.
///
/// Each item is taken from the first row where it is found.
pub fn scan_metadata(rows: &[TextRow], patterns: &LabelPatterns, score_window: usize) -> MetadataScan {
    let mut scan = MetadataScan::default();

    for (idx, row) in rows.iter().enumerate() {
        let text = row.text();

        if scan.date.is_none() {
            scan.date = parse_date(patterns, text);
        }

        if scan.home_team_name.is_none() {
            if let Some((home, visitor)) = split_team_names(patterns, text) {
                log::debug!("Teams: home='{}' visitor='{}'", home, visitor);
                scan.home_team_name = Some(home);
                scan.visitor_team_name = Some(visitor);
            }
        }

        if scan.score.is_none() {
            if let Some(label) = patterns.final_score.find(text) {
                scan.score = score_in(patterns, &text[label.end()..]).or_else(|| {
                    rows.iter()
                        .skip(idx + 1)
                        .take(score_window)
                        .find_map(|r| score_in(patterns, r.text()))
                });
            }
        }
    }

    scan
}

fn parse_date(patterns: &LabelPatterns, text: &str) -> Option<NaiveDate> {
    let caps = patterns.date.captures(text)?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day);
    if date.is_none() {
        log::debug!("Ignoring impossible date {}/{}/{}", day, month, year);
    }
    date
}

/// Split a row holding both team labels into (home, visitor) names.
///
/// Each name runs from the end of its label to the start of the other label
/// or the end of the row, whichever comes first.
fn split_team_names(patterns: &LabelPatterns, text: &str) -> Option<(String, String)> {
    let home = patterns.home_team.find(text)?;
    let visitor = patterns.visitor_team.find(text)?;

    let name_after = |end: usize, other_start: usize| {
        let stop = if other_start >= end { other_start } else { text.len() };
        clean_team_name(&text[end..stop])
    };

    let home_name = name_after(home.end(), visitor.start());
    let visitor_name = name_after(visitor.end(), home.start());
    if home_name.is_empty() || visitor_name.is_empty() {
        return None;
    }
    Some((home_name, visitor_name))
}

fn clean_team_name(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c: char| c == ':' || c == '-' || c.is_whitespace())
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// First score in `text`, ignoring anything from the kickoff time label on.
fn score_in(patterns: &LabelPatterns, text: &str) -> Option<(u32, u32)> {
    let text = match patterns.kickoff_time.as_ref().and_then(|re| re.find(text)) {
        Some(time) => &text[..time.start()],
        None => text,
    };
    let caps = RE_SCORE.captures(text)?;
    Some((caps[1].parse().ok()?, caps[2].parse().ok()?))
}
