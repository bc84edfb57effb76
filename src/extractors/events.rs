//! Event timeline extraction.
//!
//! The event pages of an acta are organised in sections (scoreboard,
//! substitutions, cards), each split by team header into a home and a visitor
//! block. Inside a block, records are printed column-wise across three
//! labelled slot rows:
//!
//! ```text
//! MARCADOR
//! LOCAL
//! Tipo    E    T    GC   EC
//! Dorsal  11   10   10   -
//! Minuto  12   13   30   55
//! ```
//!
//! The k-th value of each slot row belongs to the same record. A
//! [`TimelineScanner`] walks the rows once, tracking section and side, and
//! fires a triad as soon as every slot the section needs has been seen.

use crate::config::IngestConfig;
use crate::error::IngestWarning;
use crate::extractors::patterns::{parse_dorsal, parse_minute, parse_substitution_pair};
use crate::layout::{TextFragment, TextRow};
use crate::model::{EventKind, MatchEvent, Side, Substitution};
use std::fmt;

/// Section of the event pages being scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Outside any event section
    None,
    /// Scoring events
    Scoreboard,
    /// Replacements
    Substitutions,
    /// Yellow and red cards
    Cards,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::None => "NONE",
            Section::Scoreboard => "SCOREBOARD",
            Section::Substitutions => "SUBSTITUTIONS",
            Section::Cards => "CARDS",
        };
        f.write_str(name)
    }
}

/// Slot rows waiting to be zipped into records.
#[derive(Debug, Default)]
struct PendingTriad {
    kinds: Option<Vec<TextFragment>>,
    actors: Option<Vec<TextFragment>>,
    minutes: Option<Vec<TextFragment>>,
}

impl PendingTriad {
    fn is_empty(&self) -> bool {
        self.kinds.is_none() && self.actors.is_none() && self.minutes.is_none()
    }

    fn clear(&mut self) {
        *self = PendingTriad::default();
    }
}

/// Events and substitutions read from a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    /// Scoring and disciplinary events in document order
    pub events: Vec<MatchEvent>,
    /// Substitutions in document order
    pub substitutions: Vec<Substitution>,
    /// Misaligned triads and skipped entries
    pub warnings: Vec<IngestWarning>,
}

/// Single-pass state machine over the rows of a document.
pub struct TimelineScanner<'a> {
    config: &'a IngestConfig,
    section: Section,
    side: Option<Side>,
    pending: PendingTriad,
    timeline: Timeline,
}

impl<'a> TimelineScanner<'a> {
    /// Create a scanner outside any section.
    pub fn new(config: &'a IngestConfig) -> Self {
        Self {
            config,
            section: Section::None,
            side: None,
            pending: PendingTriad::default(),
            timeline: Timeline::default(),
        }
    }

    /// Current section.
    pub fn section(&self) -> Section {
        self.section
    }

    /// Consume one row.
    pub fn feed(&mut self, row: &TextRow) {
        let config = self.config;
        let labels = &config.labels;

        if let Some(section) = self.section_header(row) {
            log::debug!("Section {} -> {}", self.section, section);
            self.enter(section, None);
            return;
        }

        if self.section == Section::None {
            return;
        }

        let home = row.starts_with_label(&labels.home_side);
        let visitor = row.starts_with_label(&labels.visitor_side);
        if home != visitor {
            let side = if home { Side::Home } else { Side::Visitor };
            log::debug!("{} section: side -> {}", self.section, side);
            self.enter(self.section, Some(side));
            return;
        }

        if self.side.is_none() {
            return;
        }

        if row.starts_with_label(&labels.type_row) {
            self.pending.kinds = Some(row.values_after_label(&labels.type_row));
        } else if row.starts_with_label(&labels.actor_row) {
            self.pending.actors = Some(row.values_after_label(&labels.actor_row));
        } else if row.starts_with_label(&labels.minute_row) {
            self.pending.minutes = Some(row.values_after_label(&labels.minute_row));
        } else {
            return;
        }

        self.fire_if_complete();
    }

    /// Finish scanning and return what was read.
    pub fn finish(self) -> Timeline {
        if !self.pending.is_empty() {
            log::debug!("Discarding incomplete {} triad at end of document", self.section);
        }
        log::info!(
            "Timeline: {} events, {} substitutions",
            self.timeline.events.len(),
            self.timeline.substitutions.len()
        );
        self.timeline
    }

    fn section_header(&self, row: &TextRow) -> Option<Section> {
        let labels = &self.config.labels;
        if row.starts_with_label(&labels.scoreboard_section) {
            Some(Section::Scoreboard)
        } else if row.starts_with_label(&labels.substitutions_section) {
            Some(Section::Substitutions)
        } else if row.starts_with_label(&labels.cards_section) {
            Some(Section::Cards)
        } else if labels.end_sections.iter().any(|l| row.starts_with_label(l)) {
            Some(Section::None)
        } else {
            None
        }
    }

    fn enter(&mut self, section: Section, side: Option<Side>) {
        if !self.pending.is_empty() {
            log::debug!("Discarding incomplete {} triad", self.section);
        }
        self.pending.clear();
        self.section = section;
        self.side = side;
    }

    fn fire_if_complete(&mut self) {
        let Some(side) = self.side else {
            return;
        };
        let ready = match self.section {
            Section::Substitutions => self.pending.actors.is_some() && self.pending.minutes.is_some(),
            Section::Scoreboard | Section::Cards => {
                self.pending.kinds.is_some()
                    && self.pending.actors.is_some()
                    && self.pending.minutes.is_some()
            },
            Section::None => false,
        };
        if !ready {
            return;
        }

        let pending = std::mem::take(&mut self.pending);
        let kinds = pending.kinds.unwrap_or_default();
        let actors = pending.actors.unwrap_or_default();
        let minutes = pending.minutes.unwrap_or_default();

        match self.section {
            Section::Scoreboard => self.fire_scoreboard(side, &kinds, &actors, &minutes),
            Section::Cards => self.fire_cards(side, &kinds, &actors, &minutes),
            Section::Substitutions => self.fire_substitutions(side, &actors, &minutes),
            Section::None => {},
        }
    }

    /// Number of records to zip; records a warning when rows disagree.
    fn zip_len(&mut self, lengths: Vec<usize>) -> usize {
        let zipped = lengths.iter().copied().min().unwrap_or(0);
        if lengths.iter().any(|&l| l != zipped) {
            log::warn!("{} triad rows misaligned: {:?}", self.section, lengths);
            self.timeline.warnings.push(IngestWarning::TruncatedTriad {
                section: self.section.to_string(),
                lengths,
                zipped,
            });
        }
        zipped
    }

    fn skip(&mut self, side: Side, values: &[&TextFragment], reason: &'static str) {
        let entry = values
            .iter()
            .map(|f| f.text.trim())
            .collect::<Vec<_>>()
            .join(" / ");
        log::warn!("Skipping {} {} entry '{}': {}", side, self.section, entry, reason);
        self.timeline.warnings.push(IngestWarning::UnreadableEntry {
            section: self.section.to_string(),
            side,
            entry,
            reason,
        });
    }

    fn fire_scoreboard(
        &mut self,
        side: Side,
        kinds: &[TextFragment],
        actors: &[TextFragment],
        minutes: &[TextFragment],
    ) {
        let n = self.zip_len(vec![kinds.len(), actors.len(), minutes.len()]);
        for k in 0..n {
            let code = kinds[k].text.trim();
            let entry = [&kinds[k], &actors[k], &minutes[k]];
            let Some(kind) = self.config.codes.kind_of(code) else {
                self.skip(side, &entry, "unknown event code");
                continue;
            };
            let Some(minute) = parse_minute(&minutes[k].text) else {
                self.skip(side, &entry, "unreadable minute");
                continue;
            };
            let squad_number = if kind == EventKind::PenaltyTry {
                None
            } else {
                match parse_dorsal(&actors[k].text) {
                    Some(n) => Some(n),
                    None => {
                        self.skip(side, &entry, "missing dorsal");
                        continue;
                    },
                }
            };
            self.timeline.events.push(MatchEvent {
                side,
                kind,
                squad_number,
                minute,
                raw_code: code.to_string(),
            });
        }
    }

    /// Card colour comes from where the dorsal is printed, not from the code.
    fn fire_cards(
        &mut self,
        side: Side,
        kinds: &[TextFragment],
        actors: &[TextFragment],
        minutes: &[TextFragment],
    ) {
        let n = self.zip_len(vec![kinds.len(), actors.len(), minutes.len()]);
        let midpoint = self.config.layout.card_midpoint_x;
        for k in 0..n {
            let (Some(squad_number), Some(minute)) =
                (parse_dorsal(&actors[k].text), parse_minute(&minutes[k].text))
            else {
                self.skip(side, &[&kinds[k], &actors[k], &minutes[k]], "unreadable dorsal or minute");
                continue;
            };
            let kind = if actors[k].x < midpoint {
                EventKind::YellowCard
            } else {
                EventKind::RedCard
            };
            self.timeline.events.push(MatchEvent {
                side,
                kind,
                squad_number: Some(squad_number),
                minute,
                raw_code: kinds[k].text.trim().to_string(),
            });
        }
    }

    fn fire_substitutions(&mut self, side: Side, actors: &[TextFragment], minutes: &[TextFragment]) {
        let n = self.zip_len(vec![actors.len(), minutes.len()]);
        for k in 0..n {
            let (Some((squad_number_in, squad_number_out)), Some(minute)) =
                (parse_substitution_pair(&actors[k].text), parse_minute(&minutes[k].text))
            else {
                self.skip(side, &[&actors[k], &minutes[k]], "unreadable dorsal pair or minute");
                continue;
            };
            self.timeline.substitutions.push(Substitution {
                side,
                squad_number_in,
                squad_number_out,
                minute,
            });
        }
    }
}

/// Scan all rows of a document for events and substitutions.
pub fn extract_timeline(rows: &[TextRow], config: &IngestConfig) -> Timeline {
    let mut scanner = TimelineScanner::new(config);
    for row in rows {
        scanner.feed(row);
    }
    scanner.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(y: f32, items: &[(&str, f32)]) -> TextRow {
        TextRow::new(
            y,
            items
                .iter()
                .map(|(t, x)| TextFragment::new(*t, *x, y, 15.0))
                .collect(),
        )
    }

    fn slot(y: f32, label: &str, values: &[&str]) -> TextRow {
        let mut items = vec![(label, 40.0)];
        for (i, v) in values.iter().enumerate() {
            items.push((v, 120.0 + i as f32 * 40.0));
        }
        row(y, &items)
    }

    fn config() -> IngestConfig {
        IngestConfig::for_club("Rugby Alcobendas", "RAL")
    }

    #[test]
    fn test_scoreboard_triad() {
        let rows = vec![
            row(800.0, &[("MARCADOR", 40.0)]),
            row(780.0, &[("LOCAL", 40.0)]),
            slot(760.0, "Tipo", &["E", "T", "GC"]),
            slot(740.0, "Dorsal", &["11", "10", "10"]),
            slot(720.0, "Minuto", &["12", "13", "30"]),
            row(700.0, &[("VISITANTE", 40.0)]),
            slot(680.0, "Tipo", &["D"]),
            slot(660.0, "Dorsal", &["22"]),
            slot(640.0, "Minuto", &["71"]),
        ];
        let timeline = extract_timeline(&rows, &config());
        assert_eq!(timeline.events.len(), 4);
        assert_eq!(timeline.events[0].kind, EventKind::Try);
        assert_eq!(timeline.events[0].squad_number, Some(11));
        assert_eq!(timeline.events[2].kind, EventKind::PenaltyKick);
        assert_eq!(timeline.events[2].minute, 30);
        assert_eq!(timeline.events[3].side, Side::Visitor);
        assert_eq!(timeline.events[3].kind, EventKind::DropGoal);
        assert!(timeline.warnings.is_empty());
    }

    #[test]
    fn test_multiple_triads_per_side() {
        let rows = vec![
            row(800.0, &[("MARCADOR", 40.0)]),
            row(780.0, &[("LOCAL", 40.0)]),
            slot(760.0, "Tipo", &["E"]),
            slot(740.0, "Dorsal", &["11"]),
            slot(720.0, "Minuto", &["12"]),
            slot(700.0, "Tipo", &["E", "T"]),
            slot(680.0, "Dorsal", &["14", "10"]),
            slot(660.0, "Minuto", &["50", "51"]),
        ];
        let timeline = extract_timeline(&rows, &config());
        assert_eq!(timeline.events.len(), 3);
        assert_eq!(timeline.events[2].minute, 51);
    }

    #[test]
    fn test_penalty_try_has_no_dorsal() {
        let rows = vec![
            row(800.0, &[("MARCADOR", 40.0)]),
            row(780.0, &[("VISITANTE", 40.0)]),
            slot(760.0, "Tipo", &["EC"]),
            slot(740.0, "Dorsal", &["-"]),
            slot(720.0, "Minuto", &["66"]),
        ];
        let timeline = extract_timeline(&rows, &config());
        assert_eq!(timeline.events.len(), 1);
        assert_eq!(timeline.events[0].kind, EventKind::PenaltyTry);
        assert_eq!(timeline.events[0].squad_number, None);
    }

    #[test]
    fn test_short_minute_row_truncates() {
        let rows = vec![
            row(800.0, &[("MARCADOR", 40.0)]),
            row(780.0, &[("LOCAL", 40.0)]),
            slot(760.0, "Tipo", &["E", "E", "T"]),
            slot(740.0, "Dorsal", &["11", "14", "10"]),
            slot(720.0, "Minuto", &["12", "20"]),
        ];
        let timeline = extract_timeline(&rows, &config());
        assert_eq!(timeline.events.len(), 2);
        assert_eq!(timeline.warnings.len(), 1);
        assert!(matches!(
            &timeline.warnings[0],
            IngestWarning::TruncatedTriad { zipped: 2, .. }
        ));
    }

    #[test]
    fn test_card_colour_from_position() {
        let rows = vec![
            row(800.0, &[("TARJETAS", 40.0)]),
            row(780.0, &[("LOCAL", 40.0)]),
            row(760.0, &[("Tipo", 40.0), ("TR", 120.0), ("TR", 400.0)]),
            row(740.0, &[("Dorsal", 40.0), ("4", 120.0), ("7", 400.0)]),
            row(720.0, &[("Minuto", 40.0), ("25", 120.0), ("60", 400.0)]),
        ];
        let timeline = extract_timeline(&rows, &config());
        assert_eq!(timeline.events.len(), 2);
        // printed code says red for both; the dorsal position decides
        assert_eq!(timeline.events[0].kind, EventKind::YellowCard);
        assert_eq!(timeline.events[0].raw_code, "TR");
        assert_eq!(timeline.events[1].kind, EventKind::RedCard);
    }

    #[test]
    fn test_substitution_pairs() {
        let rows = vec![
            row(800.0, &[("CAMBIOS", 40.0)]),
            row(780.0, &[("LOCAL", 40.0)]),
            slot(760.0, "Dorsal", &["16/1", "22/12"]),
            slot(740.0, "Minuto", &["45", "55"]),
        ];
        let timeline = extract_timeline(&rows, &config());
        assert_eq!(
            timeline.substitutions,
            vec![
                Substitution { side: Side::Home, squad_number_in: 16, squad_number_out: 1, minute: 45 },
                Substitution { side: Side::Home, squad_number_in: 22, squad_number_out: 12, minute: 55 },
            ]
        );
    }

    #[test]
    fn test_rows_without_side_are_ignored() {
        let rows = vec![
            row(800.0, &[("MARCADOR", 40.0)]),
            slot(760.0, "Tipo", &["E"]),
            slot(740.0, "Dorsal", &["11"]),
            slot(720.0, "Minuto", &["12"]),
        ];
        assert!(extract_timeline(&rows, &config()).events.is_empty());
    }

    #[test]
    fn test_section_change_clears_pending() {
        let rows = vec![
            row(800.0, &[("MARCADOR", 40.0)]),
            row(780.0, &[("LOCAL", 40.0)]),
            slot(760.0, "Tipo", &["E"]),
            slot(740.0, "Dorsal", &["11"]),
            row(730.0, &[("OBSERVACIONES", 40.0)]),
            slot(720.0, "Minuto", &["12"]),
        ];
        let config = config();
        let mut scanner = TimelineScanner::new(&config);
        for r in &rows {
            scanner.feed(r);
        }
        assert_eq!(scanner.section(), Section::None);
        assert!(scanner.finish().events.is_empty());
    }

    #[test]
    fn test_label_merged_with_first_minute() {
        let rows = vec![
            row(800.0, &[("MARCADOR", 40.0)]),
            row(780.0, &[("LOCAL", 40.0)]),
            slot(760.0, "Tipo:", &["E", "T"]),
            slot(740.0, "Dorsal:", &["11", "10"]),
            row(720.0, &[("Minuto: 12", 40.0), ("13", 160.0)]),
        ];
        let timeline = extract_timeline(&rows, &config());
        let events: Vec<_> = timeline
            .events
            .iter()
            .map(|e| (e.kind, e.squad_number, e.minute))
            .collect();
        assert_eq!(
            events,
            vec![(EventKind::Try, Some(11), 12), (EventKind::Conversion, Some(10), 13)]
        );
        assert!(timeline.warnings.is_empty());
    }

    #[test]
    fn test_unreadable_scoreboard_entries_are_warned() {
        let rows = vec![
            row(800.0, &[("MARCADOR", 40.0)]),
            row(780.0, &[("LOCAL", 40.0)]),
            slot(760.0, "Tipo", &["ZZ", "E", "T"]),
            slot(740.0, "Dorsal", &["11", "-", "10"]),
            slot(720.0, "Minuto", &["12", "20", "21"]),
        ];
        let timeline = extract_timeline(&rows, &config());
        assert_eq!(timeline.events.len(), 1);
        assert_eq!(timeline.events[0].kind, EventKind::Conversion);

        let reasons: Vec<_> = timeline
            .warnings
            .iter()
            .map(|w| match w {
                IngestWarning::UnreadableEntry { side, reason, .. } => (*side, *reason),
                other => panic!("unexpected warning: {:?}", other),
            })
            .collect();
        assert_eq!(
            reasons,
            vec![(Side::Home, "unknown event code"), (Side::Home, "missing dorsal")]
        );
        assert!(timeline.warnings[0].to_string().contains("ZZ / 11 / 12"));
    }
}
