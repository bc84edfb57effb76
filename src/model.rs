//! Structured match facts extracted from an acta.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// HOME or VISITOR designation of a team within one document.
///
/// Independent of which team is the own club.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    /// Home team (left column of the acta)
    Home,
    /// Visiting team (right column of the acta)
    Visitor,
}

impl Side {
    /// Both sides, home first.
    pub const BOTH: [Side; 2] = [Side::Home, Side::Visitor];

    /// The other side.
    pub fn opposite(self) -> Side {
        match self {
            Side::Home => Side::Visitor,
            Side::Visitor => Side::Home,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Home => f.write_str("HOME"),
            Side::Visitor => f.write_str("VISITOR"),
        }
    }
}

/// Kind of a scoring or disciplinary event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    /// Try (5 points)
    Try,
    /// Conversion (2 points)
    Conversion,
    /// Penalty kick at goal (3 points)
    PenaltyKick,
    /// Drop goal (3 points)
    DropGoal,
    /// Penalty try, a team-level score
    PenaltyTry,
    /// Temporary suspension
    YellowCard,
    /// Sending off
    RedCard,
}

impl EventKind {
    /// Whether this event changes the scoreboard.
    pub fn is_scoring(self) -> bool {
        !matches!(self, EventKind::YellowCard | EventKind::RedCard)
    }

    /// Upper-case name used in logs and warnings.
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Try => "TRY",
            EventKind::Conversion => "CONVERSION",
            EventKind::PenaltyKick => "PENALTY_KICK",
            EventKind::DropGoal => "DROP_GOAL",
            EventKind::PenaltyTry => "PENALTY_TRY",
            EventKind::YellowCard => "YELLOW_CARD",
            EventKind::RedCard => "RED_CARD",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Match-level facts read from the document header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchMetadata {
    /// Calendar date of the match
    pub date: NaiveDate,
    /// Printed home team name
    pub home_team_name: String,
    /// Printed visitor team name
    pub visitor_team_name: String,
    /// Whether the own club played at home
    pub is_own_team_home: bool,
    /// Final home score, when printed
    pub home_score: Option<u32>,
    /// Final visitor score, when printed
    pub visitor_score: Option<u32>,
}

impl MatchMetadata {
    /// Name of the team the own club played against.
    pub fn rival(&self) -> &str {
        let own = if self.is_own_team_home { Side::Home } else { Side::Visitor };
        self.team_name(own.opposite())
    }

    /// Printed name of the given side.
    pub fn team_name(&self, side: Side) -> &str {
        match side {
            Side::Home => &self.home_team_name,
            Side::Visitor => &self.visitor_team_name,
        }
    }
}

/// One lineup entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedPlayer {
    /// Dorsal worn in this match
    pub squad_number: u32,
    /// Printed full name
    pub full_name: String,
    /// Federation license id (4-10 digits)
    pub license_id: String,
    /// In the starting fifteen
    pub is_starter: bool,
    /// Captain flag
    pub is_captain: bool,
    /// Team column the player was listed under
    pub side: Side,
}

/// A scoring or disciplinary event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEvent {
    /// Side credited with the event
    pub side: Side,
    /// Event type
    pub kind: EventKind,
    /// Dorsal of the player; `None` for team-level events
    pub squad_number: Option<u32>,
    /// Match minute
    pub minute: u32,
    /// Type code as printed, kept for debugging
    pub raw_code: String,
}

/// A player replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substitution {
    /// Side making the change
    pub side: Side,
    /// Dorsal coming on
    pub squad_number_in: u32,
    /// Dorsal going off
    pub squad_number_out: u32,
    /// Match minute
    pub minute: u32,
}

/// Everything the extractors read from one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActaExtraction {
    /// Header facts
    pub metadata: MatchMetadata,
    /// Home lineup in document order
    pub home_players: Vec<ExtractedPlayer>,
    /// Visitor lineup in document order
    pub visitor_players: Vec<ExtractedPlayer>,
    /// Events in document order
    pub events: Vec<MatchEvent>,
    /// Substitutions in document order
    pub substitutions: Vec<Substitution>,
}

impl ActaExtraction {
    /// Lineup of the given side.
    pub fn players(&self, side: Side) -> &[ExtractedPlayer] {
        match side {
            Side::Home => &self.home_players,
            Side::Visitor => &self.visitor_players,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rival_follows_home_flag() {
        let mut meta = MatchMetadata {
            date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
            home_team_name: "CR Alcobendas".to_string(),
            visitor_team_name: "Club Rugby Valencia".to_string(),
            is_own_team_home: true,
            home_score: None,
            visitor_score: None,
        };
        assert_eq!(meta.rival(), "Club Rugby Valencia");
        meta.is_own_team_home = false;
        assert_eq!(meta.rival(), "CR Alcobendas");
    }

    #[test]
    fn test_side_serializes_upper_case() {
        assert_eq!(serde_json::to_string(&Side::Visitor).unwrap(), "\"VISITOR\"");
        assert_eq!(Side::Home.opposite(), Side::Visitor);
    }

    #[test]
    fn test_cards_are_not_scoring() {
        assert!(EventKind::PenaltyTry.is_scoring());
        assert!(!EventKind::YellowCard.is_scoring());
        assert_eq!(EventKind::DropGoal.to_string(), "DROP_GOAL");
    }
}
