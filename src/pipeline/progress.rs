//! Stage reporting for front-ends.

use std::fmt;

/// Stages of one ingestion run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IngestStage {
    /// Reading page fragments
    Reading,
    /// Rebuilding rows and extracting structured data
    Extracting,
    /// Finding the match record
    ResolvingMatch,
    /// Mapping players to roster or external records
    ResolvingPlayers,
    /// Folding events and computing minutes
    Aggregating,
    /// Writing statistics
    Persisting,
    /// Finished successfully
    Done,
    /// Aborted; the message is the error
    Failed,
}

impl IngestStage {
    /// Short human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            IngestStage::Reading => "Reading document",
            IngestStage::Extracting => "Extracting acta",
            IngestStage::ResolvingMatch => "Resolving match",
            IngestStage::ResolvingPlayers => "Resolving players",
            IngestStage::Aggregating => "Computing statistics",
            IngestStage::Persisting => "Saving statistics",
            IngestStage::Done => "Done",
            IngestStage::Failed => "Failed",
        }
    }
}

impl fmt::Display for IngestStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Receives a status line at each stage boundary.
///
/// Any `FnMut(IngestStage, &str)` closure is a sink.
pub trait ProgressSink {
    /// A stage started (or the run ended, for `Done` and `Failed`).
    fn status(&mut self, _stage: IngestStage, _message: &str) {}
}

impl<F> ProgressSink for F
where
    F: FnMut(IngestStage, &str),
{
    fn status(&mut self, stage: IngestStage, message: &str) {
        self(stage, message)
    }
}

/// Discards every status.
pub struct NullProgress;

impl ProgressSink for NullProgress {}

/// Forwards statuses to the `log` facade.
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn status(&mut self, stage: IngestStage, message: &str) {
        match stage {
            IngestStage::Failed => log::error!("{}: {}", stage, message),
            _ => log::info!("{}: {}", stage, message),
        }
    }
}

/// Keeps only the latest status line, as a front-end status bar would.
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    stage: Option<IngestStage>,
    text: String,
}

impl StatusLine {
    /// Empty status.
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest stage, if any status arrived.
    pub fn stage(&self) -> Option<IngestStage> {
        self.stage
    }

    /// Latest status text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl ProgressSink for StatusLine {
    fn status(&mut self, stage: IngestStage, message: &str) {
        self.stage = Some(stage);
        self.text = if stage == IngestStage::Failed {
            message.to_string()
        } else {
            format!("{}: {}", stage, message)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_sink() {
        let mut seen = Vec::new();
        {
            let mut sink = |stage: IngestStage, _msg: &str| seen.push(stage);
            sink.status(IngestStage::Reading, "x");
            sink.status(IngestStage::Done, "y");
        }
        assert_eq!(seen, vec![IngestStage::Reading, IngestStage::Done]);
    }

    #[test]
    fn test_status_line_shows_error_only() {
        let mut line = StatusLine::new();
        line.status(IngestStage::Persisting, "12 rows");
        assert_eq!(line.text(), "Saving statistics: 12 rows");
        line.status(IngestStage::Failed, "database unreachable");
        assert_eq!(line.text(), "database unreachable");
        assert_eq!(line.stage(), Some(IngestStage::Failed));
    }
}
