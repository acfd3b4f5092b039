//! Error types for the dashboard engine.

use crate::amount::Amount;
use crate::status::InvalidTransition;
use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that end the run.
///
/// Everything per-record lives in [`RecordError`] instead: a bad row is
/// skipped and reported, never fatal.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to open or read an input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader failure
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Missing input file argument
    #[error(
        "Missing input file argument. \
         Usage: streams-dashboard <events.csv> [--period <second|min|hour|day>] [--tokens <tokens.csv>]"
    )]
    MissingArgument,

    /// A flag was given without its value
    #[error("Flag {0} requires a value")]
    MissingFlagValue(String),

    /// Unrecognized command-line argument
    #[error("Unexpected argument `{0}`")]
    UnexpectedArgument(String),
}

/// Why a single journal row or stream was rejected.
///
/// These are isolated to the record that caused them; the rest of the batch
/// keeps processing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// Stream identifier column is empty
    #[error("missing stream identifier")]
    MissingStream,

    /// Token identifier missing or empty
    #[error("missing token identifier")]
    MissingToken,

    /// Direction column absent on a create row
    #[error("missing direction")]
    MissingDirection,

    /// Direction value is neither `in` nor `out`
    #[error("unknown direction `{0}`")]
    UnknownDirection(String),

    /// Rate column absent on a create row
    #[error("missing per-second rate")]
    MissingRate,

    /// Rate value did not parse as a decimal
    #[error("unparseable rate `{0}`")]
    InvalidRate(String),

    /// Physically invalid negative rate
    #[error("negative rate `{0}`")]
    NegativeRate(Amount),

    /// Seconds column absent on an advance row
    #[error("missing seconds")]
    MissingSeconds,

    /// Seconds value did not parse as an integer
    #[error("unparseable seconds `{0}`")]
    InvalidSeconds(String),

    /// Physically invalid negative elapsed time
    #[error("negative elapsed seconds `{0}`")]
    NegativeElapsed(i64),

    /// Event kind not in the journal vocabulary
    #[error("unknown event `{0}`")]
    UnknownEvent(String),

    /// Event references a stream id that was never created
    #[error("no stream with id `{0}`")]
    UnknownStream(String),

    /// A create row reused an existing stream id
    #[error("duplicate stream id `{0}`")]
    DuplicateStream(String),

    /// A lifecycle event arrived in a state that does not permit it
    #[error(transparent)]
    Transition(#[from] InvalidTransition),
}

/// A per-row problem collected while replaying a journal.
///
/// Diagnostics are the queryable counterpart of the row-numbered log
/// warnings: consumers that want to surface skipped records (instead of
/// silently showing a smaller dashboard) read these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-indexed CSV row the problem occurred on (the header is row 1)
    pub row: usize,

    /// The stream the row referred to, when one was named
    pub stream_id: Option<String>,

    /// What went wrong
    pub error: RecordError,
}
