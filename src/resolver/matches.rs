//! Finding (or creating) the match record an acta belongs to.

use crate::config::IngestConfig;
use crate::error::{Error, Result};
use crate::model::MatchMetadata;
use crate::store::{ExternalMatchStore, MatchKind, MatchRef, MatchStore, NewExternalMatch, ScheduledMatch};
use chrono::{Days, NaiveTime};

/// Resolve the match of an acta.
///
/// 1. A calendar match on the same day whose opponent name contains, or is
///    contained in, the rival name (case-insensitive).
/// 2. An external match with the same date and team names.
/// 3. A new external match, when `config.create_external_matches` is set.
///
/// Fails with [`Error::MatchResolution`] when nothing is found and creation
/// is disabled or rejected by the store.
pub fn resolve_match<B>(backend: &mut B, metadata: &MatchMetadata, config: &IngestConfig) -> Result<MatchRef>
where
    B: MatchStore + ExternalMatchStore + ?Sized,
{
    let day_start = metadata.date.and_time(NaiveTime::MIN);
    let day_end = day_start
        .checked_add_days(Days::new(1))
        .ok_or_else(|| Error::MatchResolution(format!("date {} out of range", metadata.date)))?;

    let same_day = backend.matches_between(day_start, day_end)?;
    log::debug!("{} scheduled matches on {}", same_day.len(), metadata.date);

    if let Some(found) = pick_by_opponent(&same_day, metadata.rival()) {
        log::info!(
            "Matched calendar match {} vs '{}'",
            found.id,
            found.opponent_name.as_deref().unwrap_or_default()
        );
        return Ok(MatchRef {
            id: found.id,
            kind: MatchKind::Standard,
        });
    }

    if let Some(existing) = backend.find_external_match(
        metadata.date,
        &metadata.home_team_name,
        &metadata.visitor_team_name,
    )? {
        log::info!("Reusing external match {}", existing.id);
        return Ok(MatchRef {
            id: existing.id,
            kind: MatchKind::External,
        });
    }

    if !config.create_external_matches {
        return Err(Error::MatchResolution(format!(
            "no match on {} against '{}'",
            metadata.date,
            metadata.rival()
        )));
    }

    let created = backend
        .create_external_match(NewExternalMatch {
            date: metadata.date,
            home_team_name: metadata.home_team_name.clone(),
            visitor_team_name: metadata.visitor_team_name.clone(),
        })
        .map_err(|e| Error::MatchResolution(format!("could not create external match: {}", e)))?;
    log::info!(
        "Created external match {} ({} vs {})",
        created.id,
        created.home_team_name,
        created.visitor_team_name
    );
    Ok(MatchRef {
        id: created.id,
        kind: MatchKind::External,
    })
}

/// First match whose opponent name and `rival` contain one another.
fn pick_by_opponent<'m>(matches: &'m [ScheduledMatch], rival: &str) -> Option<&'m ScheduledMatch> {
    let rival = rival.trim().to_lowercase();
    if rival.is_empty() {
        return None;
    }
    matches.iter().find(|m| {
        let Some(opponent) = m.opponent_name.as_deref() else {
            return false;
        };
        let opponent = opponent.trim().to_lowercase();
        !opponent.is_empty() && (opponent.contains(&rival) || rival.contains(&opponent))
    })
}
