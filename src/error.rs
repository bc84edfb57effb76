//! Error types for the acta ingestion pipeline.
//!
//! Fatal conditions are [`Error`] values and stop the pipeline before (or while)
//! writing. Recoverable anomalies are collected as [`IngestWarning`]s and the
//! run continues.

use crate::model::Side;

/// Result type alias for ingestion operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while ingesting a match report.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A piece of metadata needed to identify the match was not found
    #[error("Missing match metadata: {field} could not be extracted from the document")]
    MissingMetadata {
        /// Name of the missing field ("date", "rival", ...)
        field: &'static str,
    },

    /// The document produced no text rows at all
    #[error("No text found in document")]
    NoText,

    /// No match record could be found or created
    #[error("Match resolution failed: {0}")]
    MatchResolution(String),

    /// A read against a backing store failed
    #[error("Store error: {0}")]
    Store(String),

    /// A write against the statistics store failed
    #[error("Persistence error during {operation}: {reason}")]
    Persistence {
        /// Which write was in flight
        operation: &'static str,
        /// Underlying failure
        reason: String,
    },

    /// Configuration rejected by validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A label-derived pattern failed to compile
    #[error("Pattern error: {0}")]
    Regex(#[from] regex::Error),

    /// PDF reader error
    #[cfg(feature = "pdf")]
    #[error("PDF error: {0}")]
    Pdf(String),
}

/// A non-fatal anomaly found while ingesting.
///
/// Warnings never abort a run; they are logged and returned in the
/// [`IngestReport`](crate::pipeline::IngestReport).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IngestWarning {
    /// An event names a dorsal that no player of that side wears
    #[error("{side} event {kind} at minute {minute} references unknown squad number {squad_number}")]
    UnknownSquadNumber {
        /// Side of the event
        side: Side,
        /// Event type name
        kind: String,
        /// Dorsal referenced by the event
        squad_number: u32,
        /// Minute of the event
        minute: u32,
    },

    /// A substitution names a dorsal that no player of that side wears
    #[error("{side} substitution at minute {minute} references unknown squad number {squad_number}")]
    UnknownSubstitutionPlayer {
        /// Side of the substitution
        side: Side,
        /// Unknown dorsal
        squad_number: u32,
        /// Minute of the substitution
        minute: u32,
    },

    /// An own-club player whose license is not in the roster
    #[error("own player #{squad_number} {name} (license {license_id}) not found in roster")]
    UnresolvedOwnPlayer {
        /// Dorsal
        squad_number: u32,
        /// Printed name
        name: String,
        /// Printed license id
        license_id: String,
    },

    /// The same dorsal appeared twice in one side's lineup
    #[error("{side} lineup lists squad number {squad_number} more than once")]
    DuplicateSquadNumber {
        /// Side of the lineup
        side: Side,
        /// Repeated dorsal
        squad_number: u32,
    },

    /// Neither team name matched the configured own-club names
    #[error("neither '{home}' nor '{visitor}' matches the own club names")]
    OwnTeamNotFound {
        /// Extracted home team name
        home: String,
        /// Extracted visitor team name
        visitor: String,
    },

    /// The rows of a triad had different fragment counts
    #[error("{section} triad rows had {lengths:?} entries; only {zipped} records read")]
    TruncatedTriad {
        /// Section being scanned
        section: String,
        /// Fragment count per slot row
        lengths: Vec<usize>,
        /// Records actually emitted
        zipped: usize,
    },

    /// A triad entry that could not be turned into a record
    #[error("{side} {section} entry '{entry}' skipped: {reason}")]
    UnreadableEntry {
        /// Section being scanned
        section: String,
        /// Side of the block
        side: Side,
        /// Printed values of the entry
        entry: String,
        /// What could not be read
        reason: &'static str,
    },
}
