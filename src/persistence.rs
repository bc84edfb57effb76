//! Writing aggregated statistics to the store.
//!
//! The write is three calls: upsert the match row, delete the match's player
//! rows, insert the new player rows. Running it twice for the same match
//! leaves the same rows. There is no transaction: a failure part-way leaves
//! whatever earlier calls already wrote, and the error names the call that
//! failed.

use crate::error::{Error, Result};
use crate::model::MatchMetadata;
use crate::resolver::ResolvedPlayer;
use crate::stats::MatchStats;
use crate::store::{MatchRef, MatchStatsRow, PlayerStatsRow, StatsStore};

/// What a persistence run wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistOutcome {
    /// Match-level row as written
    pub match_row: MatchStatsRow,
    /// Player rows as written
    pub player_rows: Vec<PlayerStatsRow>,
    /// Player rows removed before the insert
    pub replaced_rows: usize,
}

/// Build the match-level row.
pub fn match_row(match_ref: MatchRef, stats: &MatchStats, metadata: &MatchMetadata) -> MatchStatsRow {
    let (home_score, visitor_score) = stats.final_score(metadata);
    MatchStatsRow {
        match_id: match_ref.id,
        match_kind: match_ref.kind,
        processed: true,
        home_score,
        visitor_score,
        home_tries: stats.home.tries(),
        visitor_tries: stats.visitor.tries(),
    }
}

/// Build one player row per listed player, home first.
pub fn player_rows(match_ref: MatchRef, stats: &MatchStats) -> Vec<PlayerStatsRow> {
    stats
        .home
        .players
        .iter()
        .chain(stats.visitor.players.iter())
        .map(|p| player_row(match_ref, p))
        .collect()
}

fn player_row(match_ref: MatchRef, resolved: &ResolvedPlayer) -> PlayerStatsRow {
    let s = &resolved.stats;
    PlayerStatsRow {
        match_id: match_ref.id,
        match_kind: match_ref.kind,
        player_id: resolved.internal_id(),
        external_player_id: resolved.external_id(),
        squad_number: resolved.player.squad_number,
        license_id: resolved.player.license_id.clone(),
        display_name: resolved.player.full_name.clone(),
        is_starter: resolved.player.is_starter,
        is_captain: resolved.player.is_captain,
        minutes_played: s.minutes_played,
        tries: s.tries,
        conversions: s.conversions,
        penalty_kicks: s.penalty_kicks,
        drop_goals: s.drop_goals,
        yellow_cards: s.yellow_cards,
        red_cards: s.red_cards,
        called_up: true,
    }
}

/// Write the match row and replace the player rows of `match_ref`.
pub fn persist<S>(store: &mut S, match_ref: MatchRef, stats: &MatchStats, metadata: &MatchMetadata) -> Result<PersistOutcome>
where
    S: StatsStore + ?Sized,
{
    let match_row = match_row(match_ref, stats, metadata);
    store
        .upsert_match_stats(&match_row)
        .map_err(|e| failed("upsert match stats", e))?;
    log::debug!(
        "Match row {} written: {}-{}",
        match_ref.id,
        match_row.home_score,
        match_row.visitor_score
    );

    let replaced_rows = store
        .delete_player_stats(match_ref)
        .map_err(|e| failed("delete player stats", e))?;
    if replaced_rows > 0 {
        log::info!("Replacing {} existing player rows", replaced_rows);
    }

    let player_rows = player_rows(match_ref, stats);
    store
        .insert_player_stats(&player_rows)
        .map_err(|e| failed("insert player stats", e))?;
    log::info!("Inserted {} player rows", player_rows.len());

    Ok(PersistOutcome {
        match_row,
        player_rows,
        replaced_rows,
    })
}

fn failed(operation: &'static str, source: Error) -> Error {
    log::error!("{} failed: {}", operation, source);
    Error::Persistence {
        operation,
        reason: source.to_string(),
    }
}
