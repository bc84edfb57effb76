//! Minutes played from starters and substitutions.

use super::SideStats;
use crate::error::IngestWarning;
use crate::model::Substitution;

/// Fill `minutes_played` for every player of a side.
///
/// Starters enter at minute 0. Substitutions are applied in minute order,
/// clamped to `duration`: the outgoing player leaves, the incoming one enters
/// (a player already on the pitch keeps the earlier entry). Everyone still on
/// the pitch leaves at `duration`. Substitutions naming an unknown dorsal are
/// skipped for that player and reported.
pub fn compute_minutes(side: &mut SideStats, substitutions: &[Substitution], duration: u32) -> Vec<IngestWarning> {
    let mut warnings = Vec::new();

    for p in side.players.iter_mut() {
        p.stats.minutes_played = 0;
        p.stats.active_from = None;
        if p.player.is_starter {
            p.stats.enter(0);
        }
    }

    let mut ordered: Vec<&Substitution> = substitutions.iter().collect();
    ordered.sort_by_key(|s| s.minute);

    for sub in ordered {
        let minute = sub.minute.min(duration);

        match side.player_mut(sub.squad_number_out) {
            Some(out) => out.stats.leave(minute),
            None => warnings.push(unknown(sub, sub.squad_number_out)),
        }
        match side.player_mut(sub.squad_number_in) {
            Some(incoming) => incoming.stats.enter(minute),
            None => warnings.push(unknown(sub, sub.squad_number_in)),
        }
    }

    for p in side.players.iter_mut() {
        p.stats.leave(duration);
    }

    warnings
}

fn unknown(sub: &Substitution, squad_number: u32) -> IngestWarning {
    log::warn!(
        "{} substitution at minute {}: no player #{}",
        sub.side,
        sub.minute,
        squad_number
    );
    IngestWarning::UnknownSubstitutionPlayer {
        side: sub.side,
        squad_number,
        minute: sub.minute,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExtractedPlayer, Side};
    use crate::resolver::{PlayerIdentity, ResolvedPlayer};
    use proptest::prelude::*;

    fn side(count: u32) -> SideStats {
        SideStats::new(
            Side::Home,
            (1..=count)
                .map(|n| {
                    ResolvedPlayer::new(
                        ExtractedPlayer {
                            squad_number: n,
                            full_name: format!("P{}", n),
                            license_id: n.to_string(),
                            is_starter: n <= 15,
                            is_captain: false,
                            side: Side::Home,
                        },
                        PlayerIdentity::Unresolved,
                    )
                })
                .collect(),
        )
    }

    fn sub(squad_in: u32, squad_out: u32, minute: u32) -> Substitution {
        Substitution {
            side: Side::Home,
            squad_number_in: squad_in,
            squad_number_out: squad_out,
            minute,
        }
    }

    fn minutes_of(side: &SideStats, squad: u32) -> u32 {
        side.players
            .iter()
            .find(|p| p.player.squad_number == squad)
            .map(|p| p.stats.minutes_played)
            .unwrap()
    }

    #[test]
    fn test_no_substitutions() {
        let mut stats = side(18);
        let warnings = compute_minutes(&mut stats, &[], 80);
        assert!(warnings.is_empty());
        assert!((1..=15).all(|n| minutes_of(&stats, n) == 80));
        assert!((16..=18).all(|n| minutes_of(&stats, n) == 0));
    }

    #[test]
    fn test_single_substitution_with_short_duration() {
        let mut stats = side(16);
        compute_minutes(&mut stats, &[sub(16, 3, 55)], 70);
        assert_eq!(minutes_of(&stats, 3), 55);
        assert_eq!(minutes_of(&stats, 16), 15);
    }

    #[test]
    fn test_substitution_order_and_re_entry() {
        let mut stats = side(17);
        // Listed out of order: 16 comes on at 20, goes off at 60, 3 returns
        let subs = [sub(3, 16, 60), sub(16, 3, 20), sub(17, 1, 40)];
        compute_minutes(&mut stats, &subs, 80);
        assert_eq!(minutes_of(&stats, 16), 40);
        assert_eq!(minutes_of(&stats, 3), 20 + 20);
        assert_eq!(minutes_of(&stats, 1), 40);
        assert_eq!(minutes_of(&stats, 17), 40);
    }

    #[test]
    fn test_minute_beyond_duration_is_clamped() {
        let mut stats = side(16);
        compute_minutes(&mut stats, &[sub(16, 2, 85)], 80);
        assert_eq!(minutes_of(&stats, 2), 80);
        assert_eq!(minutes_of(&stats, 16), 0);
    }

    #[test]
    fn test_already_on_pitch_keeps_entry() {
        let mut stats = side(15);
        compute_minutes(&mut stats, &[sub(4, 99, 30)], 80);
        assert_eq!(minutes_of(&stats, 4), 80);
    }

    #[test]
    fn test_unknown_dorsal_warned() {
        let mut stats = side(15);
        let warnings = compute_minutes(&mut stats, &[sub(22, 5, 50)], 80);
        assert_eq!(minutes_of(&stats, 5), 50);
        assert_eq!(
            warnings,
            vec![IngestWarning::UnknownSubstitutionPlayer {
                side: Side::Home,
                squad_number: 22,
                minute: 50,
            }]
        );
    }

    proptest! {
        #[test]
        fn prop_minutes_never_exceed_duration(
            duration in 1u32..=100,
            raw in proptest::collection::vec((1u32..=23, 1u32..=23, 0u32..=120), 0..12),
        ) {
            let mut stats = side(23);
            let subs: Vec<Substitution> = raw.iter().map(|&(i, o, m)| sub(i, o, m)).collect();
            compute_minutes(&mut stats, &subs, duration);
            for p in &stats.players {
                prop_assert!(p.stats.minutes_played <= duration);
                prop_assert!(!p.stats.is_active());
            }
        }
    }
}
