//! Configuration for acta ingestion.
//!
//! Every layout constant and document label lives here so that actas from
//! other federations or scanned at other resolutions can be handled without
//! code changes. The whole tree deserializes from JSON with every field
//! optional.

use crate::error::{Error, Result};
use crate::model::EventKind;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default rugby union match length in minutes.
pub const DEFAULT_MATCH_DURATION: u32 = 80;

/// Size of a starting lineup.
pub const DEFAULT_STARTER_COUNT: usize = 15;

/// Points awarded for a penalty try.
pub const DEFAULT_PENALTY_TRY_POINTS: u32 = 7;

/// Geometry parameters for row and column reconstruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Fragments whose y rounds to the same multiple of this value share a row.
    pub row_granularity: f32,

    /// Column split x-coordinate used when the lineup headers are missing.
    pub fallback_column_split: f32,

    /// Distance left of the visitor header still counted as visitor column.
    pub column_gutter: f32,

    /// Card dorsals left of this x are yellow cards, right of it red cards.
    pub card_midpoint_x: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        // A4 portrait is 595pt wide
        Self {
            row_granularity: 1.0,
            fallback_column_split: 297.5,
            column_gutter: 4.0,
            card_midpoint_x: 297.5,
        }
    }
}

/// Printed labels the extractors look for.
///
/// Matching is case-insensitive and ignores a trailing colon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Prefix of the match date (`Fecha: 09/03/2024`)
    pub date: String,
    /// Label preceding the home team name
    pub home_team: String,
    /// Label preceding the visitor team name
    pub visitor_team: String,
    /// Label near the final score
    pub final_score: String,
    /// Label of the kickoff time, never read as a score
    pub kickoff_time: String,
    /// Lineup column header over the home players
    pub home_column: String,
    /// Lineup column header over the visitor players
    pub visitor_column: String,
    /// Header opening the scoreboard section
    pub scoreboard_section: String,
    /// Header opening the substitutions section
    pub substitutions_section: String,
    /// Header opening the cards section
    pub cards_section: String,
    /// Headers that close any open section
    pub end_sections: Vec<String>,
    /// Team header switching the current side to HOME
    pub home_side: String,
    /// Team header switching the current side to VISITOR
    pub visitor_side: String,
    /// Slot row with event type codes
    pub type_row: String,
    /// Slot row with dorsals (or `in/out` pairs in substitutions)
    pub actor_row: String,
    /// Slot row with minutes
    pub minute_row: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            date: "Fecha".to_string(),
            home_team: "Equipo Local".to_string(),
            visitor_team: "Equipo Visitante".to_string(),
            final_score: "Resultado Final".to_string(),
            kickoff_time: "Hora".to_string(),
            home_column: "LOCAL".to_string(),
            visitor_column: "VISITANTE".to_string(),
            scoreboard_section: "MARCADOR".to_string(),
            substitutions_section: "CAMBIOS".to_string(),
            cards_section: "TARJETAS".to_string(),
            end_sections: vec!["OBSERVACIONES".to_string(), "FIRMAS".to_string()],
            home_side: "LOCAL".to_string(),
            visitor_side: "VISITANTE".to_string(),
            type_row: "Tipo".to_string(),
            actor_row: "Dorsal".to_string(),
            minute_row: "Minuto".to_string(),
        }
    }
}

/// Mapping from printed type codes to event kinds, in priority order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventCodeTable(pub IndexMap<String, EventKind>);

impl Default for EventCodeTable {
    fn default() -> Self {
        let mut codes = IndexMap::new();
        codes.insert("E".to_string(), EventKind::Try);
        codes.insert("T".to_string(), EventKind::Conversion);
        codes.insert("GC".to_string(), EventKind::PenaltyKick);
        codes.insert("P".to_string(), EventKind::PenaltyKick);
        codes.insert("D".to_string(), EventKind::DropGoal);
        codes.insert("EC".to_string(), EventKind::PenaltyTry);
        codes.insert("TA".to_string(), EventKind::YellowCard);
        codes.insert("TR".to_string(), EventKind::RedCard);
        Self(codes)
    }
}

impl EventCodeTable {
    /// Look up a printed code, ignoring case and surrounding punctuation.
    pub fn kind_of(&self, code: &str) -> Option<EventKind> {
        let code = code.trim().trim_matches(|c: char| !c.is_alphanumeric());
        self.0
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(code))
            .map(|(_, kind)| *kind)
    }
}

/// Acta ingestion configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Name variants of the own club (full name, abbreviation, ...).
    pub own_team_names: Vec<String>,

    /// Minutes a full match lasts; open intervals close here.
    pub match_duration: u32,

    /// Players per side forced to starter, in lineup order.
    pub starter_count: usize,

    /// Team-level points credited per penalty try.
    pub penalty_try_points: u32,

    /// Rows after the final-score label searched for the score.
    pub score_search_window: usize,

    /// Create an external match when no record exists.
    ///
    /// When false, an unknown match is a hard [`Error::MatchResolution`].
    pub create_external_matches: bool,

    /// Geometry parameters.
    pub layout: LayoutConfig,

    /// Document labels.
    pub labels: LabelConfig,

    /// Event type codes.
    pub codes: EventCodeTable,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl IngestConfig {
    /// Create new configuration with defaults and no own-club names.
    pub fn new() -> Self {
        Self {
            own_team_names: Vec::new(),
            match_duration: DEFAULT_MATCH_DURATION,
            starter_count: DEFAULT_STARTER_COUNT,
            penalty_try_points: DEFAULT_PENALTY_TRY_POINTS,
            score_search_window: 3,
            create_external_matches: true,
            layout: LayoutConfig::default(),
            labels: LabelConfig::default(),
            codes: EventCodeTable::default(),
        }
    }

    /// Configuration for a club known by a full name and an abbreviation.
    pub fn for_club(name: impl Into<String>, abbreviation: impl Into<String>) -> Self {
        Self::new().with_own_team_names(vec![name.into(), abbreviation.into()])
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the own-club name variants.
    pub fn with_own_team_names(mut self, names: Vec<String>) -> Self {
        self.own_team_names = names;
        self
    }

    /// Set the match duration in minutes.
    pub fn with_match_duration(mut self, minutes: u32) -> Self {
        self.match_duration = minutes;
        self
    }

    /// Allow or forbid creating external matches.
    pub fn with_external_match_creation(mut self, enable: bool) -> Self {
        self.create_external_matches = enable;
        self
    }

    /// Replace the layout parameters.
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Whether a printed team name refers to the own club.
    pub fn is_own_team(&self, team_name: &str) -> bool {
        let team = team_name.to_lowercase();
        self.own_team_names
            .iter()
            .map(|n| n.trim().to_lowercase())
            .any(|n| !n.is_empty() && team.contains(&n))
    }

    /// Check the configuration for values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.own_team_names.iter().all(|n| n.trim().is_empty()) {
            return Err(Error::InvalidConfig("own_team_names must not be empty".to_string()));
        }
        if self.match_duration == 0 {
            return Err(Error::InvalidConfig("match_duration must be positive".to_string()));
        }
        if self.layout.row_granularity.is_nan() || self.layout.row_granularity <= 0.0 {
            return Err(Error::InvalidConfig("row_granularity must be positive".to_string()));
        }
        if self.starter_count == 0 {
            return Err(Error::InvalidConfig("starter_count must be positive".to_string()));
        }
        Ok(())
    }
}
