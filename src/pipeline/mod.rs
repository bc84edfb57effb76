//! End-to-end ingestion of one acta.
//!
//! ```text
//! PageTextSource
//!     ↓
//! [reconstruct_rows] (fragments → rows, per page)
//!     ↓
//! [extract_acta] (metadata, lineups, timeline)
//!     ↓
//! [resolve_match] + [resolve_players]
//!     ↓
//! [aggregate] (points, tries, cards, minutes)
//!     ↓
//! [persist] (match row, player rows)
//! ```
//!
//! Stages run strictly in sequence. Fatal errors stop the run; anything else
//! becomes an [`IngestWarning`] in the [`IngestReport`].
//!
//! [reconstruct_rows]: crate::layout::reconstruct_rows
//! [extract_acta]: crate::extractors::extract_acta
//! [resolve_match]: crate::resolver::resolve_match
//! [resolve_players]: crate::resolver::resolve_players
//! [aggregate]: crate::stats::aggregate
//! [persist]: crate::persistence::persist

pub mod progress;

pub use progress::{IngestStage, LogProgress, NullProgress, ProgressSink, StatusLine};

use crate::config::IngestConfig;
use crate::error::{IngestWarning, Result};
use crate::extractors::{extract_acta, Extraction, LabelPatterns};
use crate::layout::{reconstruct_rows, TextFragment, TextRow};
use crate::model::{MatchEvent, MatchMetadata, Side, Substitution};
use crate::persistence::persist;
use crate::resolver::{resolve_match, resolve_players};
use crate::source::PageTextSource;
use crate::stats::aggregate;
use crate::store::{Backend, MatchRef, PlayerStatsRow};
use serde::Serialize;

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestReport {
    /// Match the statistics were written to
    pub match_ref: MatchRef,
    /// Extracted header
    pub metadata: MatchMetadata,
    /// Final home score as persisted
    pub home_score: u32,
    /// Final visitor score as persisted
    pub visitor_score: u32,
    /// Home tries, penalty tries included
    pub home_tries: u32,
    /// Visitor tries, penalty tries included
    pub visitor_tries: u32,
    /// Player rows as persisted
    pub player_rows: Vec<PlayerStatsRow>,
    /// Extracted events
    pub events: Vec<MatchEvent>,
    /// Extracted substitutions
    pub substitutions: Vec<Substitution>,
    /// Player rows replaced from an earlier run
    pub replaced_rows: usize,
    /// Non-fatal anomalies, rendered
    pub warnings: Vec<String>,
}

/// Runs the ingestion stages for one document at a time.
pub struct IngestPipeline {
    config: IngestConfig,
    patterns: LabelPatterns,
}

impl IngestPipeline {
    /// Validate `config` and compile its label patterns.
    pub fn new(config: IngestConfig) -> Result<Self> {
        config.validate()?;
        let patterns = LabelPatterns::new(&config.labels)?;
        Ok(Self { config, patterns })
    }

    /// Active configuration.
    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Rebuild the rows of each page.
    pub fn rows(&self, pages: &[Vec<TextFragment>]) -> Vec<Vec<TextRow>> {
        pages
            .iter()
            .map(|page| reconstruct_rows(page, self.config.layout.row_granularity))
            .collect()
    }

    /// Extract an acta from already-read pages.
    pub fn extract_pages(&self, pages: &[Vec<TextFragment>]) -> Result<Extraction> {
        let rows = self.rows(pages);
        log::debug!(
            "Rebuilt {} rows over {} pages",
            rows.iter().map(Vec::len).sum::<usize>(),
            rows.len()
        );
        extract_acta(&rows, &self.patterns, &self.config)
    }

    /// Read and extract a document without touching any store.
    pub fn extract<S>(&self, source: &mut S, progress: &mut dyn ProgressSink) -> Result<Extraction>
    where
        S: PageTextSource + ?Sized,
    {
        let result = self.read_and_extract(source, progress);
        if let Err(e) = &result {
            progress.status(IngestStage::Failed, &e.to_string());
        }
        result
    }

    /// Full run: read, extract, resolve, aggregate and persist.
    pub fn ingest<S, B>(&self, source: &mut S, backend: &mut B, progress: &mut dyn ProgressSink) -> Result<IngestReport>
    where
        S: PageTextSource + ?Sized,
        B: Backend + ?Sized,
    {
        let result = self
            .read_and_extract(source, progress)
            .and_then(|extraction| self.store_extraction(extraction, backend, progress));
        self.finish(result, progress)
    }

    /// Resolve, aggregate and persist an extraction obtained earlier.
    pub fn ingest_extracted<B>(
        &self,
        extraction: Extraction,
        backend: &mut B,
        progress: &mut dyn ProgressSink,
    ) -> Result<IngestReport>
    where
        B: Backend + ?Sized,
    {
        let result = self.store_extraction(extraction, backend, progress);
        self.finish(result, progress)
    }

    fn read_and_extract<S>(&self, source: &mut S, progress: &mut dyn ProgressSink) -> Result<Extraction>
    where
        S: PageTextSource + ?Sized,
    {
        progress.status(IngestStage::Reading, "reading page text");
        let pages = source.all_pages()?;

        progress.status(
            IngestStage::Extracting,
            &format!("{} pages", pages.len()),
        );
        self.extract_pages(&pages)
    }

    fn store_extraction<B>(
        &self,
        extraction: Extraction,
        backend: &mut B,
        progress: &mut dyn ProgressSink,
    ) -> Result<IngestReport>
    where
        B: Backend + ?Sized,
    {
        let Extraction { acta, mut warnings } = extraction;

        progress.status(
            IngestStage::ResolvingMatch,
            &format!("{} vs {} on {}", acta.metadata.home_team_name, acta.metadata.visitor_team_name, acta.metadata.date),
        );
        let match_ref = resolve_match(backend, &acta.metadata, &self.config)?;

        progress.status(
            IngestStage::ResolvingPlayers,
            &format!(
                "{} home, {} visitor players",
                acta.players(Side::Home).len(),
                acta.players(Side::Visitor).len()
            ),
        );
        let lineups = resolve_players(
            backend,
            &acta.metadata,
            acta.players(Side::Home),
            acta.players(Side::Visitor),
            &self.config,
        )?;
        warnings.extend(lineups.warnings);

        progress.status(
            IngestStage::Aggregating,
            &format!("{} events, {} substitutions", acta.events.len(), acta.substitutions.len()),
        );
        let stats = aggregate(
            lineups.home,
            lineups.visitor,
            &acta.events,
            &acta.substitutions,
            &self.config,
        );
        warnings.extend(stats.warnings.iter().cloned());

        progress.status(
            IngestStage::Persisting,
            &format!("{} player rows", stats.home.players.len() + stats.visitor.players.len()),
        );
        let outcome = persist(backend, match_ref, &stats, &acta.metadata)?;

        Ok(IngestReport {
            match_ref,
            metadata: acta.metadata,
            home_score: outcome.match_row.home_score,
            visitor_score: outcome.match_row.visitor_score,
            home_tries: outcome.match_row.home_tries,
            visitor_tries: outcome.match_row.visitor_tries,
            player_rows: outcome.player_rows,
            events: acta.events,
            substitutions: acta.substitutions,
            replaced_rows: outcome.replaced_rows,
            warnings: render(&warnings),
        })
    }

    fn finish(&self, result: Result<IngestReport>, progress: &mut dyn ProgressSink) -> Result<IngestReport> {
        match &result {
            Ok(report) => {
                for w in &report.warnings {
                    log::warn!("{}", w);
                }
                progress.status(
                    IngestStage::Done,
                    &format!(
                        "{} {}-{} {} ({} warnings)",
                        report.metadata.home_team_name,
                        report.home_score,
                        report.visitor_score,
                        report.metadata.visitor_team_name,
                        report.warnings.len()
                    ),
                );
            },
            Err(e) => progress.status(IngestStage::Failed, &e.to_string()),
        }
        result
    }
}

fn render(warnings: &[IngestWarning]) -> Vec<String> {
    warnings.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::source::FragmentDump;
    use crate::store::MemoryBackend;

    #[test]
    fn test_invalid_config_rejected() {
        let config = IngestConfig::new().with_match_duration(0);
        assert!(matches!(IngestPipeline::new(config), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_empty_document_fails_with_status() {
        let pipeline = IngestPipeline::new(IngestConfig::for_club("Rugby Alcobendas", "RAL")).unwrap();
        let mut source = FragmentDump::new(vec![Vec::new()]);
        let mut store = MemoryBackend::new();
        let mut status = StatusLine::new();

        let err = pipeline.ingest(&mut source, &mut store, &mut status).unwrap_err();
        assert!(matches!(err, Error::NoText));
        assert_eq!(status.stage(), Some(IngestStage::Failed));
        assert_eq!(status.text(), err.to_string());
        assert!(store.match_stats.is_empty());
    }
}
