//! Stream lifecycle states and the legal transitions between them.
//!
//! The status machine is deliberately strict: every (state, event) pair is
//! matched exhaustively, so adding a status or an event forces every
//! transition and accrual site to be revisited at compile time.

use std::fmt;
use thiserror::Error;

/// Lifecycle state of a payment stream.
///
/// `Initialized` is the entry state: the stream exists and funds are
/// committed, but accrual has not begun. `Finished` and `Interrupted` are
/// terminal; no event moves a stream out of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamStatus {
    /// Created, funds committed, accrual not yet begun.
    Initialized,

    /// Accruing value at the stream's rate.
    Active,

    /// Accrual suspended; elapsed active time is frozen.
    Paused,

    /// Ran to the end of its funding. Terminal.
    Finished,

    /// Cancelled externally before completion. Terminal.
    Interrupted,
}

impl StreamStatus {
    /// Applies a lifecycle event, returning the new status.
    ///
    /// Illegal pairs return [`InvalidTransition`] and leave the caller's
    /// state untouched (the method takes `self` by value).
    pub fn apply(self, event: StreamEvent) -> Result<StreamStatus, InvalidTransition> {
        use StreamEvent::*;
        use StreamStatus::*;

        let rejected = Err(InvalidTransition { from: self, event });
        match self {
            Initialized => match event {
                Start => Ok(Active),
                Pause | Resume | Complete | Interrupt => rejected,
            },
            Active => match event {
                Pause => Ok(Paused),
                Complete => Ok(Finished),
                Interrupt => Ok(Interrupted),
                Start | Resume => rejected,
            },
            Paused => match event {
                Resume => Ok(Active),
                Interrupt => Ok(Interrupted),
                Start | Pause | Complete => rejected,
            },
            Finished | Interrupted => rejected,
        }
    }

    /// Returns `true` if elapsed active time progresses in this state.
    ///
    /// Accrual is defined to progress only while a stream is active;
    /// everything else freezes the accrued total at its current value.
    pub fn accrues(self) -> bool {
        match self {
            StreamStatus::Active => true,
            StreamStatus::Initialized
            | StreamStatus::Paused
            | StreamStatus::Finished
            | StreamStatus::Interrupted => false,
        }
    }

    /// Returns `true` if no further transitions are possible.
    pub fn is_terminal(self) -> bool {
        match self {
            StreamStatus::Finished | StreamStatus::Interrupted => true,
            StreamStatus::Initialized | StreamStatus::Active | StreamStatus::Paused => false,
        }
    }

    /// Lowercase name, used in logs and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            StreamStatus::Initialized => "initialized",
            StreamStatus::Active => "active",
            StreamStatus::Paused => "paused",
            StreamStatus::Finished => "finished",
            StreamStatus::Interrupted => "interrupted",
        }
    }
}

impl fmt::Display for StreamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lifecycle event applied to an existing stream.
///
/// Creation is not an event on this enum: a stream enters the model already
/// in [`StreamStatus::Initialized`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEvent {
    /// Begin accruing (`Initialized` → `Active`).
    Start,

    /// Suspend accrual (`Active` → `Paused`).
    Pause,

    /// Resume accrual (`Paused` → `Active`).
    Resume,

    /// Elapsed time reached the funded duration (`Active` → `Finished`).
    Complete,

    /// External cancellation or withdrawal stop
    /// (`Active`/`Paused` → `Interrupted`).
    Interrupt,
}

impl StreamEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            StreamEvent::Start => "start",
            StreamEvent::Pause => "pause",
            StreamEvent::Resume => "resume",
            StreamEvent::Complete => "complete",
            StreamEvent::Interrupt => "interrupt",
        }
    }
}

impl fmt::Display for StreamEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a stream pays into or out of the viewed account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// Incoming to the viewed account.
    In,

    /// Outgoing from the viewed account.
    Out,
}

impl Direction {
    /// Parses the wire form (`in` / `out`, any case). Returns `None` for
    /// anything else.
    pub fn parse(s: &str) -> Option<Direction> {
        match s.trim().to_lowercase().as_str() {
            "in" => Some(Direction::In),
            "out" => Some(Direction::Out),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lifecycle event was applied in a state that does not permit it.
///
/// Non-fatal: the stream's state is unchanged and the caller may re-issue a
/// valid event.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cannot apply `{event}` in the {from} state")]
pub struct InvalidTransition {
    /// State the stream was in when the event arrived.
    pub from: StreamStatus,

    /// The rejected event.
    pub event: StreamEvent,
}

#[cfg(test)]
mod tests {
    use super::*;
    use StreamEvent::*;
    use StreamStatus::*;

    #[test]
    fn test_legal_transitions() {
        assert_eq!(Initialized.apply(Start), Ok(Active));
        assert_eq!(Active.apply(Pause), Ok(Paused));
        assert_eq!(Active.apply(Complete), Ok(Finished));
        assert_eq!(Active.apply(Interrupt), Ok(Interrupted));
        assert_eq!(Paused.apply(Resume), Ok(Active));
        assert_eq!(Paused.apply(Interrupt), Ok(Interrupted));
    }

    #[test]
    fn test_pause_resume_round_trip() {
        let status = Active.apply(Pause).unwrap().apply(Resume).unwrap();
        assert_eq!(status, Active);
    }

    #[test]
    fn test_rejected_transitions_report_state_and_event() {
        let err = Initialized.apply(Pause).unwrap_err();
        assert_eq!(err.from, Initialized);
        assert_eq!(err.event, Pause);
        assert_eq!(err.to_string(), "cannot apply `pause` in the initialized state");
    }

    #[test]
    fn test_cannot_restart_or_re_resume_active() {
        assert!(Active.apply(Start).is_err());
        assert!(Active.apply(Resume).is_err());
    }

    #[test]
    fn test_initialized_cannot_skip_start() {
        assert!(Initialized.apply(Resume).is_err());
        assert!(Initialized.apply(Complete).is_err());
        assert!(Initialized.apply(Interrupt).is_err());
    }

    #[test]
    fn test_paused_cannot_complete() {
        assert!(Paused.apply(Complete).is_err());
        assert!(Paused.apply(Pause).is_err());
        assert!(Paused.apply(Start).is_err());
    }

    #[test]
    fn test_terminal_states_reject_everything() {
        for terminal in [Finished, Interrupted] {
            for event in [Start, Pause, Resume, Complete, Interrupt] {
                assert!(terminal.apply(event).is_err(), "{terminal} accepted {event}");
            }
        }
    }

    #[test]
    fn test_only_active_accrues() {
        assert!(Active.accrues());
        assert!(!Initialized.accrues());
        assert!(!Paused.accrues());
        assert!(!Finished.accrues());
        assert!(!Interrupted.accrues());
    }

    #[test]
    fn test_terminal_classification() {
        assert!(Finished.is_terminal());
        assert!(Interrupted.is_terminal());
        assert!(!Initialized.is_terminal());
        assert!(!Active.is_terminal());
        assert!(!Paused.is_terminal());
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!(Direction::parse("in"), Some(Direction::In));
        assert_eq!(Direction::parse("OUT"), Some(Direction::Out));
        assert_eq!(Direction::parse("  In  "), Some(Direction::In));
        assert_eq!(Direction::parse("sideways"), None);
        assert_eq!(Direction::parse(""), None);
    }
}
