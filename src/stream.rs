//! Stream model and journal-row parsing.

use crate::amount::Amount;
use crate::error::RecordError;
use crate::status::{Direction, InvalidTransition, StreamEvent, StreamStatus};
use serde::Deserialize;
use std::str::FromStr;

/// A single payment stream between two accounts for one token.
///
/// `active_secs` only moves while the stream is active; pausing or
/// terminating freezes it, so the accrued value computed from it is frozen
/// too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stream {
    /// Unique stream identifier
    pub id: String,

    /// Token account the stream pays in
    pub token: String,

    /// Whether the stream pays into or out of the viewed account
    pub direction: Direction,

    /// Current lifecycle status
    pub status: StreamStatus,

    /// Value accrued per second of active time, in the token's natural unit
    pub rate_per_sec: Amount,

    /// Seconds the stream has spent in the active status
    pub active_secs: u64,
}

impl Stream {
    /// Creates a stream in the entry status with no accrued time.
    pub fn new(id: String, token: String, direction: Direction, rate_per_sec: Amount) -> Self {
        Stream {
            id,
            token,
            direction,
            status: StreamStatus::Initialized,
            rate_per_sec,
            active_secs: 0,
        }
    }

    /// Applies a lifecycle event to the stream's status machine.
    ///
    /// On rejection the stream is left unchanged.
    pub fn apply(&mut self, event: StreamEvent) -> std::result::Result<(), InvalidTransition> {
        self.status = self.status.apply(event)?;
        Ok(())
    }

    /// Adds elapsed wall-clock seconds to the stream's active time.
    ///
    /// Only an active stream accumulates; for every other status the clock
    /// is frozen and this returns `false` without touching the counter.
    pub fn advance(&mut self, seconds: u64) -> bool {
        if self.status.accrues() {
            self.active_secs += seconds;
            true
        } else {
            false
        }
    }
}

/// Raw journal row as read from CSV.
///
/// Expected columns: `event, stream, token, direction, rate_per_sec,
/// seconds`. Lifecycle rows fill only the first two; `create` rows add the
/// token, direction and rate; `advance` rows add the seconds column.
#[derive(Debug, Deserialize)]
pub struct EventRecord {
    /// Event kind: create, start, pause, resume, complete, interrupt, advance
    pub event: String,

    /// Stream identifier the event applies to
    pub stream: String,

    /// Token account (create rows only)
    pub token: Option<String>,

    /// `in` or `out` relative to the viewed account (create rows only)
    pub direction: Option<String>,

    /// Per-second accrual rate (create rows only)
    pub rate_per_sec: Option<String>,

    /// Elapsed active seconds to add (advance rows only)
    pub seconds: Option<String>,
}

/// A journal event validated into typed form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEvent {
    /// Stream the event applies to
    pub stream_id: String,

    /// What happened
    pub kind: EventKind,
}

/// The journal vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// Register a new stream in the entry status
    Create {
        token: String,
        direction: Direction,
        rate_per_sec: Amount,
    },

    /// Drive the stream's status machine
    Lifecycle(StreamEvent),

    /// Report elapsed wall-clock seconds
    Advance { seconds: u64 },
}

impl EventRecord {
    /// Validates the raw row into a typed event.
    ///
    /// Returns an error describing the first problem found; the caller
    /// decides whether to skip or abort (the engine skips).
    pub fn parse(&self) -> std::result::Result<ParsedEvent, RecordError> {
        let stream_id = self.stream.trim();
        if stream_id.is_empty() {
            return Err(RecordError::MissingStream);
        }

        let kind = match self.event.trim().to_lowercase().as_str() {
            "create" => EventKind::Create {
                token: self.parse_token()?,
                direction: self.parse_direction()?,
                rate_per_sec: self.parse_rate()?,
            },
            "start" => EventKind::Lifecycle(StreamEvent::Start),
            "pause" => EventKind::Lifecycle(StreamEvent::Pause),
            "resume" => EventKind::Lifecycle(StreamEvent::Resume),
            "complete" => EventKind::Lifecycle(StreamEvent::Complete),
            "interrupt" => EventKind::Lifecycle(StreamEvent::Interrupt),
            "advance" => EventKind::Advance {
                seconds: self.parse_seconds()?,
            },
            other => return Err(RecordError::UnknownEvent(other.to_string())),
        };

        Ok(ParsedEvent {
            stream_id: stream_id.to_string(),
            kind,
        })
    }

    fn parse_token(&self) -> std::result::Result<String, RecordError> {
        match &self.token {
            Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
            _ => Err(RecordError::MissingToken),
        }
    }

    fn parse_direction(&self) -> std::result::Result<Direction, RecordError> {
        let raw = match &self.direction {
            Some(direction) if !direction.trim().is_empty() => direction.trim(),
            _ => return Err(RecordError::MissingDirection),
        };
        Direction::parse(raw).ok_or_else(|| RecordError::UnknownDirection(raw.to_string()))
    }

    fn parse_rate(&self) -> std::result::Result<Amount, RecordError> {
        let raw = match &self.rate_per_sec {
            Some(rate) if !rate.trim().is_empty() => rate.trim(),
            _ => return Err(RecordError::MissingRate),
        };
        let rate =
            Amount::from_str(raw).map_err(|_| RecordError::InvalidRate(raw.to_string()))?;
        if rate.is_negative() {
            return Err(RecordError::NegativeRate(rate));
        }
        Ok(rate)
    }

    fn parse_seconds(&self) -> std::result::Result<u64, RecordError> {
        let raw = match &self.seconds {
            Some(seconds) if !seconds.trim().is_empty() => seconds.trim(),
            _ => return Err(RecordError::MissingSeconds),
        };
        let seconds: i64 = raw
            .parse()
            .map_err(|_| RecordError::InvalidSeconds(raw.to_string()))?;
        if seconds < 0 {
            return Err(RecordError::NegativeElapsed(seconds));
        }
        Ok(seconds as u64)
    }
}
