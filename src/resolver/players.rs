//! Mapping lineup entries to roster or external-player records.

use crate::config::IngestConfig;
use crate::error::{IngestWarning, Result};
use crate::model::{ExtractedPlayer, MatchMetadata, Side};
use crate::stats::StatsAccumulator;
use crate::store::{ExternalPlayerStore, NewExternalPlayer, RosterStore};
use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;
use uuid::Uuid;

/// Which record a lineup entry resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerIdentity {
    /// Own-club roster player
    Internal(Uuid),
    /// External player placeholder
    External(Uuid),
    /// Own-club player missing from the roster
    Unresolved,
}

/// A lineup entry with its identity and statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPlayer {
    /// The entry as extracted
    pub player: ExtractedPlayer,
    /// Resolved record
    pub identity: PlayerIdentity,
    /// Counters filled by the aggregator
    pub stats: StatsAccumulator,
}

impl ResolvedPlayer {
    /// Wrap an entry with empty statistics.
    pub fn new(player: ExtractedPlayer, identity: PlayerIdentity) -> Self {
        Self {
            player,
            identity,
            stats: StatsAccumulator::default(),
        }
    }

    /// Roster id, when the player is in the own roster.
    pub fn internal_id(&self) -> Option<Uuid> {
        match self.identity {
            PlayerIdentity::Internal(id) => Some(id),
            _ => None,
        }
    }

    /// External player id, when the player is an external placeholder.
    pub fn external_id(&self) -> Option<Uuid> {
        match self.identity {
            PlayerIdentity::External(id) => Some(id),
            _ => None,
        }
    }

    /// Whether the player is tracked as an external placeholder.
    pub fn is_external(&self) -> bool {
        matches!(self.identity, PlayerIdentity::External(_))
    }
}

/// Both lineups after resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedLineups {
    /// Home players, lineup order
    pub home: Vec<ResolvedPlayer>,
    /// Visitor players, lineup order
    pub visitor: Vec<ResolvedPlayer>,
    /// Own-club players not in the roster
    pub warnings: Vec<IngestWarning>,
}

/// Resolve both lineups.
///
/// A side is the own club when its printed name matches one of the
/// configured own-club names. Own-club players are looked up in the roster
/// and kept unresolved (with a warning) when absent. Players of the other
/// side are taken from the roster when present there, otherwise from the
/// external-player store, inserting any license not yet known.
pub fn resolve_players<B>(
    backend: &mut B,
    metadata: &MatchMetadata,
    home: &[ExtractedPlayer],
    visitor: &[ExtractedPlayer],
    config: &IngestConfig,
) -> Result<ResolvedLineups>
where
    B: RosterStore + ExternalPlayerStore + ?Sized,
{
    let mut resolved = ResolvedLineups::default();

    for side in Side::BOTH {
        let players = match side {
            Side::Home => home,
            Side::Visitor => visitor,
        };
        let own = config.is_own_team(metadata.team_name(side));
        log::info!(
            "Resolving {} {} players ({})",
            players.len(),
            side,
            if own { "own club" } else { "rival" }
        );

        let side_players = if own {
            resolve_own_side(&*backend, players, &mut resolved.warnings)?
        } else {
            resolve_rival_side(backend, players)?
        };
        match side {
            Side::Home => resolved.home = side_players,
            Side::Visitor => resolved.visitor = side_players,
        }
    }

    Ok(resolved)
}

fn unique_licenses(players: &[ExtractedPlayer]) -> Vec<String> {
    players
        .iter()
        .map(|p| p.license_id.clone())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

fn roster_ids<B>(backend: &B, licenses: &[String]) -> Result<HashMap<String, Uuid>>
where
    B: RosterStore + ?Sized,
{
    if licenses.is_empty() {
        return Ok(HashMap::new());
    }
    Ok(backend
        .roster_players_by_license(licenses)?
        .into_iter()
        .map(|p| (p.license_id, p.id))
        .collect())
}

fn resolve_own_side<B>(
    backend: &B,
    players: &[ExtractedPlayer],
    warnings: &mut Vec<IngestWarning>,
) -> Result<Vec<ResolvedPlayer>>
where
    B: RosterStore + ?Sized,
{
    let ids = roster_ids(backend, &unique_licenses(players))?;

    Ok(players
        .iter()
        .map(|p| match ids.get(&p.license_id) {
            Some(id) => ResolvedPlayer::new(p.clone(), PlayerIdentity::Internal(*id)),
            None => {
                log::warn!(
                    "Own player #{} {} (license {}) not in roster",
                    p.squad_number,
                    p.full_name,
                    p.license_id
                );
                warnings.push(IngestWarning::UnresolvedOwnPlayer {
                    squad_number: p.squad_number,
                    name: p.full_name.clone(),
                    license_id: p.license_id.clone(),
                });
                ResolvedPlayer::new(p.clone(), PlayerIdentity::Unresolved)
            },
        })
        .collect())
}

fn resolve_rival_side<B>(backend: &mut B, players: &[ExtractedPlayer]) -> Result<Vec<ResolvedPlayer>>
where
    B: RosterStore + ExternalPlayerStore + ?Sized,
{
    let licenses = unique_licenses(players);
    let internal = roster_ids(&*backend, &licenses)?;

    let external_licenses: Vec<String> = licenses
        .into_iter()
        .filter(|l| !internal.contains_key(l))
        .collect();

    let mut external = external_ids(&*backend, &external_licenses)?;

    // One insert per unknown license, first printed name wins
    let mut missing: IndexMap<&str, &str> = IndexMap::new();
    for p in players {
        if !internal.contains_key(&p.license_id) && !external.contains_key(&p.license_id) {
            missing
                .entry(p.license_id.as_str())
                .or_insert(p.full_name.as_str());
        }
    }

    if !missing.is_empty() {
        let batch: Vec<NewExternalPlayer> = missing
            .iter()
            .map(|(license, name)| NewExternalPlayer {
                license_id: license.to_string(),
                full_name: name.to_string(),
            })
            .collect();
        log::info!("Creating {} external players", batch.len());
        backend.insert_external_players(&batch)?;
        external = external_ids(&*backend, &external_licenses)?;
    }

    Ok(players
        .iter()
        .map(|p| {
            let identity = if let Some(id) = internal.get(&p.license_id) {
                PlayerIdentity::Internal(*id)
            } else if let Some(id) = external.get(&p.license_id) {
                PlayerIdentity::External(*id)
            } else {
                log::warn!("External player license {} still unknown after insert", p.license_id);
                PlayerIdentity::Unresolved
            };
            ResolvedPlayer::new(p.clone(), identity)
        })
        .collect())
}

fn external_ids<B>(backend: &B, licenses: &[String]) -> Result<HashMap<String, Uuid>>
where
    B: ExternalPlayerStore + ?Sized,
{
    if licenses.is_empty() {
        return Ok(HashMap::new());
    }
    Ok(backend
        .external_players_by_license(licenses)?
        .into_iter()
        .map(|p| (p.license_id, p.id))
        .collect())
}
