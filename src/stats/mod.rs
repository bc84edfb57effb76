//! Per-player and per-team statistics.
//!
//! Events are folded into the resolved lineups by side and dorsal; penalty
//! tries go to the team, not to a player. Minutes are derived from the
//! starting flags and the substitution list, see [`minutes`].

pub mod minutes;

use crate::config::IngestConfig;
use crate::error::IngestWarning;
use crate::model::{EventKind, MatchEvent, MatchMetadata, Side, Substitution};
use crate::resolver::ResolvedPlayer;

/// Points of a try.
pub const TRY_POINTS: u32 = 5;
/// Points of a conversion.
pub const CONVERSION_POINTS: u32 = 2;
/// Points of a penalty kick or a drop goal.
pub const KICK_POINTS: u32 = 3;

/// Counters of one player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsAccumulator {
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
    /// Minutes on the pitch
    pub minutes_played: u32,
    /// Minute the current stint started, while on the pitch
    pub active_from: Option<u32>,
}

impl StatsAccumulator {
    /// Count one event. Penalty tries are ignored here.
    pub fn record(&mut self, kind: EventKind) {
        match kind {
            EventKind::Try => self.tries += 1,
            EventKind::Conversion => self.conversions += 1,
            EventKind::PenaltyKick => self.penalty_kicks += 1,
            EventKind::DropGoal => self.drop_goals += 1,
            EventKind::YellowCard => self.yellow_cards += 1,
            EventKind::RedCard => self.red_cards += 1,
            EventKind::PenaltyTry => {},
        }
    }

    /// Points scored by the player.
    pub fn points(&self) -> u32 {
        TRY_POINTS * self.tries
            + CONVERSION_POINTS * self.conversions
            + KICK_POINTS * (self.penalty_kicks + self.drop_goals)
    }

    /// Start a stint unless one is already open.
    pub fn enter(&mut self, minute: u32) {
        if self.active_from.is_none() {
            self.active_from = Some(minute);
        }
    }

    /// Close the open stint, if any.
    pub fn leave(&mut self, minute: u32) {
        if let Some(from) = self.active_from.take() {
            self.minutes_played += minute.saturating_sub(from);
        }
    }

    /// Whether a stint is open.
    pub fn is_active(&self) -> bool {
        self.active_from.is_some()
    }
}

/// Team-level counters that belong to no player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeamAccumulator {
    /// Penalty tries awarded
    pub penalty_try_count: u32,
    /// Points from penalty tries
    pub penalty_try_points: u32,
}

/// One side's players and team counters.
#[derive(Debug, Clone, PartialEq)]
pub struct SideStats {
    /// Side
    pub side: Side,
    /// Players in lineup order
    pub players: Vec<ResolvedPlayer>,
    /// Team counters
    pub team: TeamAccumulator,
}

impl SideStats {
    /// Wrap a resolved lineup with empty team counters.
    pub fn new(side: Side, players: Vec<ResolvedPlayer>) -> Self {
        Self {
            side,
            players,
            team: TeamAccumulator::default(),
        }
    }

    /// Player wearing `squad_number`.
    pub fn player_mut(&mut self, squad_number: u32) -> Option<&mut ResolvedPlayer> {
        self.players
            .iter_mut()
            .find(|p| p.player.squad_number == squad_number)
    }

    /// Points from player events plus penalty tries.
    pub fn points(&self) -> u32 {
        self.players.iter().map(|p| p.stats.points()).sum::<u32>() + self.team.penalty_try_points
    }

    /// Player tries plus penalty tries.
    pub fn tries(&self) -> u32 {
        self.players.iter().map(|p| p.stats.tries).sum::<u32>() + self.team.penalty_try_count
    }
}

/// Statistics of both sides.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchStats {
    /// Home side
    pub home: SideStats,
    /// Visitor side
    pub visitor: SideStats,
    /// Events or substitutions that could not be attributed
    pub warnings: Vec<IngestWarning>,
}

impl MatchStats {
    /// Stats of one side.
    pub fn side(&self, side: Side) -> &SideStats {
        match side {
            Side::Home => &self.home,
            Side::Visitor => &self.visitor,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut SideStats {
        match side {
            Side::Home => &mut self.home,
            Side::Visitor => &mut self.visitor,
        }
    }

    /// Final score as `(home, visitor)`.
    ///
    /// The printed score wins; the computed points are used for a side the
    /// acta leaves blank.
    pub fn final_score(&self, metadata: &MatchMetadata) -> (u32, u32) {
        let computed = (self.home.points(), self.visitor.points());
        if let (Some(home), Some(visitor)) = (metadata.home_score, metadata.visitor_score) {
            if (home, visitor) != computed {
                log::warn!(
                    "Printed score {}-{} differs from events {}-{}",
                    home,
                    visitor,
                    computed.0,
                    computed.1
                );
            }
        }
        (
            metadata.home_score.unwrap_or(computed.0),
            metadata.visitor_score.unwrap_or(computed.1),
        )
    }
}

/// Fold events and substitutions into the resolved lineups.
pub fn aggregate(
    home: Vec<ResolvedPlayer>,
    visitor: Vec<ResolvedPlayer>,
    events: &[MatchEvent],
    substitutions: &[Substitution],
    config: &IngestConfig,
) -> MatchStats {
    let mut stats = MatchStats {
        home: SideStats::new(Side::Home, home),
        visitor: SideStats::new(Side::Visitor, visitor),
        warnings: Vec::new(),
    };

    for event in events {
        apply_event(&mut stats, event, config);
    }

    for side in Side::BOTH {
        let subs: Vec<Substitution> = substitutions
            .iter()
            .filter(|s| s.side == side)
            .cloned()
            .collect();
        let warnings = minutes::compute_minutes(stats.side_mut(side), &subs, config.match_duration);
        stats.warnings.extend(warnings);
    }

    log::info!(
        "Aggregated: home {} pts / {} tries, visitor {} pts / {} tries",
        stats.home.points(),
        stats.home.tries(),
        stats.visitor.points(),
        stats.visitor.tries()
    );
    stats
}

fn apply_event(stats: &mut MatchStats, event: &MatchEvent, config: &IngestConfig) {
    let side = stats.side_mut(event.side);

    if event.kind == EventKind::PenaltyTry {
        side.team.penalty_try_count += 1;
        side.team.penalty_try_points += config.penalty_try_points;
        return;
    }

    let Some(squad_number) = event.squad_number else {
        log::warn!("{} {} at minute {} has no dorsal", event.side, event.kind, event.minute);
        return;
    };

    match side.player_mut(squad_number) {
        Some(player) => player.stats.record(event.kind),
        None => {
            log::warn!(
                "{} {} at minute {}: no player #{}",
                event.side,
                event.kind,
                event.minute,
                squad_number
            );
            stats.warnings.push(IngestWarning::UnknownSquadNumber {
                side: event.side,
                kind: event.kind.to_string(),
                squad_number,
                minute: event.minute,
            });
        },
    }
}
