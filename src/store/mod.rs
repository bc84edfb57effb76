//! Contracts of the backing data store.
//!
//! The hosted database behind the club dashboard is reached only through
//! these traits. Each trait covers one table family; [`Backend`] bundles them
//! for the pipeline. [`MemoryBackend`] is an in-process implementation.

pub mod memory;

pub use memory::{FailPoint, MemoryBackend};

use crate::error::Result;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A player of the own club's roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterPlayer {
    /// Roster id
    pub id: Uuid,
    /// Federation license id
    pub license_id: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
}

/// A match on the club calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledMatch {
    /// Match id
    pub id: Uuid,
    /// Kick-off date and time
    pub kickoff: NaiveDateTime,
    /// Name of the opponent, joined from the rival teams table
    pub opponent_name: Option<String>,
}

/// A match that is not on the club calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalMatch {
    /// External match id
    pub id: Uuid,
    /// Match date
    pub date: NaiveDate,
    /// Printed home team
    pub home_team_name: String,
    /// Printed visitor team
    pub visitor_team_name: String,
}

/// Data for creating an [`ExternalMatch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewExternalMatch {
    /// Match date
    pub date: NaiveDate,
    /// Printed home team
    pub home_team_name: String,
    /// Printed visitor team
    pub visitor_team_name: String,
}

/// A player of another club, known only by license.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalPlayer {
    /// External player id
    pub id: Uuid,
    /// Federation license id
    pub license_id: String,
    /// Printed name
    pub full_name: String,
}

/// Data for creating an [`ExternalPlayer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewExternalPlayer {
    /// Federation license id
    pub license_id: String,
    /// Printed name
    pub full_name: String,
}

/// Which table a match id points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchKind {
    /// Club calendar match
    Standard,
    /// External match placeholder
    External,
}

/// A resolved match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchRef {
    /// Match id
    pub id: Uuid,
    /// Table the id belongs to
    pub kind: MatchKind,
}

/// Match-level statistics row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStatsRow {
    /// Match id
    pub match_id: Uuid,
    /// Table of `match_id`
    pub match_kind: MatchKind,
    /// The acta has been ingested
    pub processed: bool,
    /// Final home score
    pub home_score: u32,
    /// Final visitor score
    pub visitor_score: u32,
    /// Home tries, penalty tries included
    pub home_tries: u32,
    /// Visitor tries, penalty tries included
    pub visitor_tries: u32,
}

impl MatchStatsRow {
    /// The match this row belongs to.
    pub fn match_ref(&self) -> MatchRef {
        MatchRef {
            id: self.match_id,
            kind: self.match_kind,
        }
    }
}

/// Player-level statistics row, one per listed player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStatsRow {
    /// Match id
    pub match_id: Uuid,
    /// Table of `match_id`
    pub match_kind: MatchKind,
    /// Own roster player, if resolved
    pub player_id: Option<Uuid>,
    /// External player, if resolved
    pub external_player_id: Option<Uuid>,
    /// Dorsal
    pub squad_number: u32,
    /// Printed license id
    pub license_id: String,
    /// Printed name
    pub display_name: String,
    /// Started the match
    pub is_starter: bool,
    /// Captain
    pub is_captain: bool,
    /// Minutes on the pitch
    pub minutes_played: u32,
    /// Tries
    pub tries: u32,
    /// Conversions
    pub conversions: u32,
    /// Penalty kicks
    pub penalty_kicks: u32,
    /// Drop goals
    pub drop_goals: u32,
    /// Yellow cards
    pub yellow_cards: u32,
    /// Red cards
    pub red_cards: u32,
    /// Listed in the matchday squad
    pub called_up: bool,
}

impl PlayerStatsRow {
    /// The match this row belongs to.
    pub fn match_ref(&self) -> MatchRef {
        MatchRef {
            id: self.match_id,
            kind: self.match_kind,
        }
    }
}

/// Own-club roster lookups.
pub trait RosterStore {
    /// Roster players whose license is in `license_ids`.
    fn roster_players_by_license(&self, license_ids: &[String]) -> Result<Vec<RosterPlayer>>;
}

/// Club calendar lookups.
pub trait MatchStore {
    /// Scheduled matches with kick-off in `[from, to)`, opponent name joined.
    fn matches_between(&self, from: NaiveDateTime, to: NaiveDateTime) -> Result<Vec<ScheduledMatch>>;
}

/// External match placeholders.
pub trait ExternalMatchStore {
    /// Exact lookup by date and both team names.
    fn find_external_match(
        &self,
        date: NaiveDate,
        home_team_name: &str,
        visitor_team_name: &str,
    ) -> Result<Option<ExternalMatch>>;

    /// Create a placeholder.
    fn create_external_match(&mut self, new: NewExternalMatch) -> Result<ExternalMatch>;
}

/// External player placeholders.
pub trait ExternalPlayerStore {
    /// External players whose license is in `license_ids`.
    fn external_players_by_license(&self, license_ids: &[String]) -> Result<Vec<ExternalPlayer>>;

    /// Insert a batch of players.
    fn insert_external_players(&mut self, players: &[NewExternalPlayer]) -> Result<Vec<ExternalPlayer>>;
}

/// Statistics tables.
pub trait StatsStore {
    /// Insert or replace the match-level row of `row.match_ref()`.
    fn upsert_match_stats(&mut self, row: &MatchStatsRow) -> Result<()>;

    /// Delete every player row of a match; returns how many were removed.
    fn delete_player_stats(&mut self, match_ref: MatchRef) -> Result<usize>;

    /// Insert player rows.
    fn insert_player_stats(&mut self, rows: &[PlayerStatsRow]) -> Result<()>;
}

/// Every store the pipeline talks to.
pub trait Backend: RosterStore + MatchStore + ExternalMatchStore + ExternalPlayerStore + StatsStore {}

impl<T> Backend for T where T: RosterStore + MatchStore + ExternalMatchStore + ExternalPlayerStore + StatsStore {}
