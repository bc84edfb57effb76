#![allow(dead_code)]
//! Synthetic acta pages shared by the integration tests.
//!
//! Page 1 carries the header and both lineups; page 2 the scoreboard,
//! substitution and card sections.
//!
//! - Home (own club, RUGBY ALCOBENDAS): 16 players. Try by #11 (12'),
//!   conversion (13') and penalty kick (30') by #10. #16 replaces #3 at 55'.
//!   Yellow card for #4 (22').
//! - Visitor (CR CISNEROS): 15 players. Try by #2 (20'), penalty try (55').
//!   Red card for #6 (61').
//! - Printed score 10 - 12.

use acta_ingest::layout::TextFragment;
use acta_ingest::{FragmentDump, IngestConfig, MemoryBackend};
use chrono::NaiveDate;
use uuid::Uuid;

pub const HOME_TEAM: &str = "RUGBY ALCOBENDAS";
pub const VISITOR_TEAM: &str = "CR CISNEROS";
pub const HOME_PLAYERS: u32 = 16;
pub const VISITOR_PLAYERS: u32 = 15;

// ============================================================================
// Fragment helpers
// ============================================================================

pub fn frag(text: &str, x: f32, y: f32) -> TextFragment {
    TextFragment::new(text, x, y, text.chars().count() as f32 * 5.0)
}

/// A labelled slot row: label at the margin, values every 40 points.
pub fn slot_row(label: &str, values: &[&str], x0: f32, y: f32) -> Vec<TextFragment> {
    let mut row = vec![frag(label, 40.0, y)];
    for (i, v) in values.iter().enumerate() {
        row.push(frag(v, x0 + i as f32 * 40.0, y));
    }
    row
}

pub fn home_license(n: u32) -> String {
    format!("{}", 1_000_000 + n)
}

pub fn visitor_license(n: u32) -> String {
    format!("{}", 2_000_000 + n)
}

// ============================================================================
// Pages
// ============================================================================

pub fn header_and_lineups(score: Option<&str>) -> Vec<TextFragment> {
    let mut page = vec![
        frag("Fecha:", 40.0, 800.0),
        frag("09/03/2024", 80.0, 800.0),
        frag("Equipo Local:", 40.0, 780.0),
        frag(HOME_TEAM, 110.0, 780.0),
        frag("Equipo Visitante:", 320.0, 780.0),
        frag(VISITOR_TEAM, 410.0, 780.0),
        frag("LOCAL", 40.0, 720.0),
        frag("VISITANTE", 320.0, 720.0),
    ];
    if let Some(score) = score {
        page.push(frag("Resultado Final:", 40.0, 760.0));
        page.push(frag(score, 130.0, 760.0));
    }

    for n in 1..=HOME_PLAYERS.max(VISITOR_PLAYERS) {
        let y = 700.0 - (n - 1) as f32 * 14.0;
        if n <= HOME_PLAYERS {
            let status = match n {
                9 => "XC",
                1..=15 => "X",
                _ => "",
            };
            page.push(frag(&n.to_string(), 40.0, y));
            if !status.is_empty() {
                page.push(frag(status, 58.0, y));
            }
            page.push(frag(&format!("HOME PLAYER {}", n), 80.0, y));
            page.push(frag(&home_license(n), 230.0, y));
        }
        if n <= VISITOR_PLAYERS {
            page.push(frag(&n.to_string(), 320.0, y));
            page.push(frag("X", 338.0, y));
            page.push(frag(&format!("VISITOR PLAYER {}", n), 360.0, y));
            page.push(frag(&visitor_license(n), 510.0, y));
        }
    }
    page
}

pub fn events_page() -> Vec<TextFragment> {
    let mut page = Vec::new();
    let mut y = 800.0;
    let mut next = |rows: &mut Vec<TextFragment>, mut row: Vec<TextFragment>| {
        for f in row.iter_mut() {
            f.y = y;
        }
        rows.extend(row);
        y -= 20.0;
    };

    next(&mut page, vec![frag("MARCADOR", 40.0, 0.0)]);
    next(&mut page, vec![frag("LOCAL", 40.0, 0.0)]);
    next(&mut page, slot_row("Tipo", &["E", "T", "GC"], 120.0, 0.0));
    next(&mut page, slot_row("Dorsal", &["11", "10", "10"], 120.0, 0.0));
    next(&mut page, slot_row("Minuto", &["12", "13", "30"], 120.0, 0.0));
    next(&mut page, vec![frag("VISITANTE", 40.0, 0.0)]);
    next(&mut page, slot_row("Tipo", &["E", "EC"], 120.0, 0.0));
    next(&mut page, slot_row("Dorsal", &["2", "-"], 120.0, 0.0));
    next(&mut page, slot_row("Minuto", &["20", "55"], 120.0, 0.0));

    next(&mut page, vec![frag("CAMBIOS", 40.0, 0.0)]);
    next(&mut page, vec![frag("LOCAL", 40.0, 0.0)]);
    next(&mut page, slot_row("Dorsal", &["16/3"], 120.0, 0.0));
    next(&mut page, slot_row("Minuto", &["55"], 120.0, 0.0));

    next(&mut page, vec![frag("TARJETAS", 40.0, 0.0)]);
    next(&mut page, vec![frag("LOCAL", 40.0, 0.0)]);
    next(&mut page, slot_row("Tipo", &["TA"], 150.0, 0.0));
    next(&mut page, slot_row("Dorsal", &["4"], 150.0, 0.0));
    next(&mut page, slot_row("Minuto", &["22"], 150.0, 0.0));
    next(&mut page, vec![frag("VISITANTE", 40.0, 0.0)]);
    next(&mut page, slot_row("Tipo", &["TR"], 400.0, 0.0));
    next(&mut page, slot_row("Dorsal", &["6"], 400.0, 0.0));
    next(&mut page, slot_row("Minuto", &["61"], 400.0, 0.0));

    next(&mut page, vec![frag("OBSERVACIONES", 40.0, 0.0)]);
    next(&mut page, vec![frag("Sin incidencias", 40.0, 0.0)]);
    page
}

pub fn acta(score: Option<&str>) -> FragmentDump {
    FragmentDump::new(vec![header_and_lineups(score), events_page()])
}

// ============================================================================
// Store and config
// ============================================================================

pub fn config() -> IngestConfig {
    IngestConfig::for_club("Rugby Alcobendas", "RAL")
}

pub fn match_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
}

/// Store with the full home roster and, optionally, the calendar match.
pub fn store(with_calendar_match: bool) -> (MemoryBackend, Option<Uuid>) {
    let mut store = MemoryBackend::new();
    for n in 1..=HOME_PLAYERS {
        store.add_roster_player(&home_license(n), "Home", &format!("Player {}", n));
    }
    let match_id = with_calendar_match.then(|| {
        store.add_scheduled_match(match_day().and_hms_opt(12, 0, 0).unwrap(), Some("Cisneros"))
    });
    (store, match_id)
}
