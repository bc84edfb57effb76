//! In-memory store with JSON snapshots.

use super::*;
use crate::error::Error;
use std::path::Path;

/// A write that [`MemoryBackend`] should fail on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    /// `upsert_match_stats`
    UpsertMatchStats,
    /// `delete_player_stats`
    DeletePlayerStats,
    /// `insert_player_stats`
    InsertPlayerStats,
}

/// Every table held in vectors.
///
/// Serializes to a single JSON document so the batch binary can work against
/// a file instead of the hosted database.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryBackend {
    /// Own club roster
    pub roster: Vec<RosterPlayer>,
    /// Club calendar
    pub matches: Vec<ScheduledMatch>,
    /// External match placeholders
    pub external_matches: Vec<ExternalMatch>,
    /// External player placeholders
    pub external_players: Vec<ExternalPlayer>,
    /// Match-level statistics
    pub match_stats: Vec<MatchStatsRow>,
    /// Player-level statistics
    pub player_stats: Vec<PlayerStatsRow>,
    /// Write to fail, for exercising error paths
    #[serde(skip)]
    pub fail_point: Option<FailPoint>,
}

impl MemoryBackend {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a snapshot.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Write a snapshot.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), self)?;
        Ok(())
    }

    /// Add a roster player, returning its id.
    pub fn add_roster_player(&mut self, license_id: &str, first_name: &str, last_name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.roster.push(RosterPlayer {
            id,
            license_id: license_id.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        });
        id
    }

    /// Add a calendar match, returning its id.
    pub fn add_scheduled_match(&mut self, kickoff: NaiveDateTime, opponent_name: Option<&str>) -> Uuid {
        let id = Uuid::new_v4();
        self.matches.push(ScheduledMatch {
            id,
            kickoff,
            opponent_name: opponent_name.map(str::to_string),
        });
        id
    }

    /// Player rows stored for a match.
    pub fn player_rows(&self, match_ref: MatchRef) -> Vec<&PlayerStatsRow> {
        self.player_stats
            .iter()
            .filter(|r| r.match_ref() == match_ref)
            .collect()
    }

    fn check(&self, point: FailPoint, operation: &'static str) -> Result<()> {
        if self.fail_point == Some(point) {
            return Err(Error::Store(format!("injected failure in {}", operation)));
        }
        Ok(())
    }
}

impl RosterStore for MemoryBackend {
    fn roster_players_by_license(&self, license_ids: &[String]) -> Result<Vec<RosterPlayer>> {
        Ok(self
            .roster
            .iter()
            .filter(|p| license_ids.contains(&p.license_id))
            .cloned()
            .collect())
    }
}

impl MatchStore for MemoryBackend {
    fn matches_between(&self, from: NaiveDateTime, to: NaiveDateTime) -> Result<Vec<ScheduledMatch>> {
        Ok(self
            .matches
            .iter()
            .filter(|m| m.kickoff >= from && m.kickoff < to)
            .cloned()
            .collect())
    }
}

impl ExternalMatchStore for MemoryBackend {
    fn find_external_match(
        &self,
        date: NaiveDate,
        home_team_name: &str,
        visitor_team_name: &str,
    ) -> Result<Option<ExternalMatch>> {
        Ok(self
            .external_matches
            .iter()
            .find(|m| {
                m.date == date
                    && m.home_team_name == home_team_name
                    && m.visitor_team_name == visitor_team_name
            })
            .cloned())
    }

    fn create_external_match(&mut self, new: NewExternalMatch) -> Result<ExternalMatch> {
        let created = ExternalMatch {
            id: Uuid::new_v4(),
            date: new.date,
            home_team_name: new.home_team_name,
            visitor_team_name: new.visitor_team_name,
        };
        self.external_matches.push(created.clone());
        Ok(created)
    }
}

impl ExternalPlayerStore for MemoryBackend {
    fn external_players_by_license(&self, license_ids: &[String]) -> Result<Vec<ExternalPlayer>> {
        Ok(self
            .external_players
            .iter()
            .filter(|p| license_ids.contains(&p.license_id))
            .cloned()
            .collect())
    }

    fn insert_external_players(&mut self, players: &[NewExternalPlayer]) -> Result<Vec<ExternalPlayer>> {
        let created: Vec<ExternalPlayer> = players
            .iter()
            .map(|p| ExternalPlayer {
                id: Uuid::new_v4(),
                license_id: p.license_id.clone(),
                full_name: p.full_name.clone(),
            })
            .collect();
        self.external_players.extend(created.iter().cloned());
        Ok(created)
    }
}

impl StatsStore for MemoryBackend {
    fn upsert_match_stats(&mut self, row: &MatchStatsRow) -> Result<()> {
        self.check(FailPoint::UpsertMatchStats, "upsert_match_stats")?;
        match self
            .match_stats
            .iter_mut()
            .find(|r| r.match_ref() == row.match_ref())
        {
            Some(existing) => *existing = row.clone(),
            None => self.match_stats.push(row.clone()),
        }
        Ok(())
    }

    fn delete_player_stats(&mut self, match_ref: MatchRef) -> Result<usize> {
        self.check(FailPoint::DeletePlayerStats, "delete_player_stats")?;
        let before = self.player_stats.len();
        self.player_stats.retain(|r| r.match_ref() != match_ref);
        Ok(before - self.player_stats.len())
    }

    fn insert_player_stats(&mut self, rows: &[PlayerStatsRow]) -> Result<()> {
        self.check(FailPoint::InsertPlayerStats, "insert_player_stats")?;
        self.player_stats.extend_from_slice(rows);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn kickoff(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_matches_between_is_half_open() {
        let mut store = MemoryBackend::new();
        store.add_scheduled_match(kickoff(9, 12), Some("CR Cisneros"));
        store.add_scheduled_match(kickoff(10, 0), Some("Liceo"));
        let found = store.matches_between(kickoff(9, 0), kickoff(10, 0)).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].opponent_name.as_deref(), Some("CR Cisneros"));
    }

    #[test]
    fn test_upsert_replaces() {
        let mut store = MemoryBackend::new();
        let mut row = MatchStatsRow {
            match_id: Uuid::new_v4(),
            match_kind: MatchKind::External,
            processed: true,
            home_score: 10,
            visitor_score: 3,
            home_tries: 2,
            visitor_tries: 0,
        };
        store.upsert_match_stats(&row).unwrap();
        row.home_score = 12;
        store.upsert_match_stats(&row).unwrap();
        assert_eq!(store.match_stats.len(), 1);
        assert_eq!(store.match_stats[0].home_score, 12);
    }

    #[test]
    fn test_fail_point() {
        let mut store = MemoryBackend::new();
        store.fail_point = Some(FailPoint::InsertPlayerStats);
        assert!(store.insert_player_stats(&[]).is_err());
        assert!(store
            .delete_player_stats(MatchRef {
                id: Uuid::new_v4(),
                kind: MatchKind::Standard
            })
            .is_ok());
    }

    #[test]
    fn test_snapshot_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let mut store = MemoryBackend::new();
        let id = store.add_roster_player("1234567", "Pablo", "Garcia");
        store.save_json(&path).unwrap();

        let loaded = MemoryBackend::load_json(&path).unwrap();
        assert_eq!(loaded.roster.len(), 1);
        assert_eq!(loaded.roster[0].id, id);
        assert!(loaded.fail_point.is_none());
    }
}
