//! Lineup extraction from the two team columns.

use crate::config::IngestConfig;
use crate::error::IngestWarning;
use crate::extractors::patterns::RE_PLAYER_LINE;
use crate::layout::{detect_column_split, TextRow};
use crate::model::{ExtractedPlayer, Side};
use std::collections::HashSet;

/// Both lineups of a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lineups {
    /// Home players in document order
    pub home: Vec<ExtractedPlayer>,
    /// Visitor players in document order
    pub visitor: Vec<ExtractedPlayer>,
    /// Duplicate dorsals that were skipped
    pub warnings: Vec<IngestWarning>,
}

/// Extract both lineups from the rows of every page.
///
/// Each page gets its own column split. A half-row that does not look like
/// `<dorsal> [status] <name> <license>` contributes nothing. After
/// extraction the first `starter_count` players of each side are marked as
/// starters and the rest as replacements, whatever status characters were
/// printed.
pub fn extract_lineups(pages: &[Vec<TextRow>], config: &IngestConfig) -> Lineups {
    let mut lineups = Lineups::default();
    let mut seen: [HashSet<u32>; 2] = [HashSet::new(), HashSet::new()];

    for rows in pages {
        let split = detect_column_split(
            rows,
            &config.labels.home_column,
            &config.labels.visitor_column,
            config.layout.column_gutter,
            config.layout.fallback_column_split,
        );

        for row in rows {
            let (left, right) = split.partition(row);
            for (side, text) in [(Side::Home, left), (Side::Visitor, right)] {
                let Some(player) = parse_player_line(&text, side) else {
                    continue;
                };
                let slot = side_index(side);
                if !seen[slot].insert(player.squad_number) {
                    lineups.warnings.push(IngestWarning::DuplicateSquadNumber {
                        side,
                        squad_number: player.squad_number,
                    });
                    continue;
                }
                match side {
                    Side::Home => lineups.home.push(player),
                    Side::Visitor => lineups.visitor.push(player),
                }
            }
        }
    }

    apply_starter_override(&mut lineups.home, config.starter_count);
    apply_starter_override(&mut lineups.visitor, config.starter_count);

    log::info!(
        "Lineups: {} home players, {} visitor players",
        lineups.home.len(),
        lineups.visitor.len()
    );
    lineups
}

/// Parse one column's text as a player line.
pub fn parse_player_line(text: &str, side: Side) -> Option<ExtractedPlayer> {
    let caps = RE_PLAYER_LINE.captures(text.trim())?;
    let squad_number = caps[1].parse().ok()?;
    let status = caps.get(2).map(|m| m.as_str()).unwrap_or("");

    Some(ExtractedPlayer {
        squad_number,
        full_name: caps[3].trim().to_string(),
        license_id: caps[4].to_string(),
        is_starter: status.contains(['X', 'x']),
        is_captain: status.contains(['C', 'c']),
        side,
    })
}

/// Force the first `starter_count` players to starters, the rest to bench.
fn apply_starter_override(players: &mut [ExtractedPlayer], starter_count: usize) {
    for (idx, player) in players.iter_mut().enumerate() {
        let starter = idx < starter_count;
        if player.is_starter != starter {
            log::debug!(
                "Overriding printed status of {} #{}: starter={}",
                player.side,
                player.squad_number,
                starter
            );
        }
        player.is_starter = starter;
    }
}

fn side_index(side: Side) -> usize {
    match side {
        Side::Home => 0,
        Side::Visitor => 1,
    }
}
