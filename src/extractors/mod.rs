//! Structured data extraction from reconstructed rows.
//!
//! Three independent passes read the same rows: [`metadata`] for the match
//! header, [`lineup`] for both squads and [`events`] for the scoreboard,
//! substitution and card timelines. [`extract_acta`] runs all three.

pub mod events;
pub mod lineup;
pub mod metadata;
pub mod patterns;

pub use events::{extract_timeline, Section, Timeline, TimelineScanner};
pub use lineup::{extract_lineups, parse_player_line, Lineups};
pub use metadata::{scan_metadata, MetadataScan};
pub use patterns::LabelPatterns;

use crate::config::IngestConfig;
use crate::error::{Error, IngestWarning, Result};
use crate::layout::TextRow;
use crate::model::ActaExtraction;

/// An extracted acta and the anomalies met on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Structured content
    pub acta: ActaExtraction,
    /// Non-fatal anomalies
    pub warnings: Vec<IngestWarning>,
}

/// Run every extractor over the rows of a document.
///
/// `pages` holds the rows of each page, top to bottom. Metadata and
/// timelines read the pages concatenated; lineups split columns per page.
pub fn extract_acta(pages: &[Vec<TextRow>], patterns: &LabelPatterns, config: &IngestConfig) -> Result<Extraction> {
    let rows: Vec<TextRow> = pages.iter().flatten().cloned().collect();
    if rows.is_empty() {
        return Err(Error::NoText);
    }

    let (metadata, mut warnings) =
        scan_metadata(&rows, patterns, config.score_search_window).complete(config)?;
    log::info!(
        "Acta {}: {} vs {}",
        metadata.date,
        metadata.home_team_name,
        metadata.visitor_team_name
    );

    let lineups = extract_lineups(pages, config);
    warnings.extend(lineups.warnings);

    let timeline = extract_timeline(&rows, config);
    warnings.extend(timeline.warnings);

    Ok(Extraction {
        acta: ActaExtraction {
            metadata,
            home_players: lineups.home,
            visitor_players: lineups.visitor,
            events: timeline.events,
            substitutions: timeline.substitutions,
        },
        warnings,
    })
}
