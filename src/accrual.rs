//! Accrual arithmetic and display formatting.
//!
//! The accrued value of a stream is a pure function of its per-second rate
//! and its frozen-or-ticking active time; nothing here consults a clock.
//! Display concerns (period projection, the near-zero floor) live here too
//! so every front end renders the same figures.

use crate::amount::Amount;
use crate::error::RecordError;
use crate::stream::Stream;
use rust_decimal::Decimal;

/// Point-in-time accrued value of a stream.
///
/// Multiplies the per-second rate by the seconds the stream has spent
/// active. Status never enters the arithmetic: paused and terminated
/// streams carry a frozen `active_secs`, so their frozen totals fall out of
/// the same product. Rejects streams holding a negative rate.
pub fn accrued(stream: &Stream) -> std::result::Result<Amount, RecordError> {
    if stream.rate_per_sec.is_negative() {
        return Err(RecordError::NegativeRate(stream.rate_per_sec));
    }
    Ok(stream.rate_per_sec * stream.active_secs)
}

/// Time unit a per-second figure is projected onto for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayPeriod {
    /// No projection requested; figures stay on their per-second basis
    #[default]
    Unscaled,
    Second,
    Minute,
    Hour,
    Day,
}

impl DisplayPeriod {
    /// Parses a period label.
    ///
    /// Unrecognized labels (the empty string included) fall back to
    /// `Unscaled` instead of erroring. Callers have always passed an unset
    /// period to mean "leave my numbers alone", and that contract is kept.
    pub fn parse(label: &str) -> DisplayPeriod {
        match label.trim().to_lowercase().as_str() {
            "second" => DisplayPeriod::Second,
            "min" => DisplayPeriod::Minute,
            "hour" => DisplayPeriod::Hour,
            "day" => DisplayPeriod::Day,
            _ => DisplayPeriod::Unscaled,
        }
    }

    /// Seconds in one display period.
    pub fn seconds(self) -> u64 {
        match self {
            DisplayPeriod::Unscaled | DisplayPeriod::Second => 1,
            DisplayPeriod::Minute => 60,
            DisplayPeriod::Hour => 3600,
            DisplayPeriod::Day => 86400,
        }
    }

    /// Label used in output; empty when unscaled.
    pub fn label(self) -> &'static str {
        match self {
            DisplayPeriod::Unscaled => "",
            DisplayPeriod::Second => "second",
            DisplayPeriod::Minute => "min",
            DisplayPeriod::Hour => "hour",
            DisplayPeriod::Day => "day",
        }
    }
}

/// Projects a per-second figure onto the requested display period.
pub fn scale(amount: Amount, period: DisplayPeriod) -> Amount {
    amount * period.seconds()
}

/// Formats an amount for display.
///
/// Figures below 0.001 of the token's natural unit render as the literal
/// `<0.001` rather than a rounded-to-nothing number; everything at or above
/// the floor gets exactly three fractional digits, ties rounded away from
/// zero.
pub fn format_amount(amount: Amount) -> String {
    let floor = Amount::new(Decimal::new(1, 3));
    if amount < floor {
        "<0.001".to_string()
    } else {
        format!("{:.3}", amount.round_dp(3))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::{Direction, StreamEvent};
    use std::str::FromStr;

    fn stream_with(rate: &str, active_secs: u64) -> Stream {
        let mut stream = Stream::new(
            "s1".to_string(),
            "usdt.near".to_string(),
            Direction::In,
            Amount::from_str(rate).unwrap(),
        );
        stream.active_secs = active_secs;
        stream
    }

    #[test]
    fn test_accrued_is_rate_times_active_seconds() {
        let stream = stream_with("0.0001", 3600);
        assert_eq!(accrued(&stream).unwrap(), Amount::from_str("0.36").unwrap());
    }

    #[test]
    fn test_accrued_zero_elapsed_is_zero() {
        let stream = stream_with("5.5", 0);
        assert!(accrued(&stream).unwrap().is_zero());
    }

    #[test]
    fn test_accrued_ignores_status() {
        // A paused stream keeps its frozen elapsed time; the arithmetic is
        // identical.
        let mut stream = stream_with("2", 0);
        stream.apply(StreamEvent::Start).unwrap();
        stream.advance(30);
        stream.apply(StreamEvent::Pause).unwrap();
        assert_eq!(accrued(&stream).unwrap(), Amount::from_str("60").unwrap());

        stream.apply(StreamEvent::Interrupt).unwrap();
        assert_eq!(accrued(&stream).unwrap(), Amount::from_str("60").unwrap());
    }

    #[test]
    fn test_accrued_rejects_negative_rate() {
        let stream = stream_with("-1", 10);
        let err = accrued(&stream).unwrap_err();
        assert_eq!(
            err,
            RecordError::NegativeRate(Amount::from_str("-1").unwrap())
        );
    }

    #[test]
    fn test_period_parse_known_labels() {
        assert_eq!(DisplayPeriod::parse("second"), DisplayPeriod::Second);
        assert_eq!(DisplayPeriod::parse("min"), DisplayPeriod::Minute);
        assert_eq!(DisplayPeriod::parse("hour"), DisplayPeriod::Hour);
        assert_eq!(DisplayPeriod::parse("day"), DisplayPeriod::Day);
        assert_eq!(DisplayPeriod::parse(" HOUR "), DisplayPeriod::Hour);
    }

    #[test]
    fn test_period_parse_falls_back_to_unscaled() {
        assert_eq!(DisplayPeriod::parse(""), DisplayPeriod::Unscaled);
        assert_eq!(DisplayPeriod::parse("fortnight"), DisplayPeriod::Unscaled);
        assert_eq!(DisplayPeriod::parse("minute"), DisplayPeriod::Unscaled);
    }

    #[test]
    fn test_period_seconds() {
        assert_eq!(DisplayPeriod::Unscaled.seconds(), 1);
        assert_eq!(DisplayPeriod::Second.seconds(), 1);
        assert_eq!(DisplayPeriod::Minute.seconds(), 60);
        assert_eq!(DisplayPeriod::Hour.seconds(), 3600);
        assert_eq!(DisplayPeriod::Day.seconds(), 86400);
    }

    #[test]
    fn test_scale_relations() {
        let rate = Amount::from_str("0.0001").unwrap();
        assert_eq!(scale(rate, DisplayPeriod::Unscaled), rate);
        assert_eq!(scale(rate, DisplayPeriod::Second), rate);
        assert_eq!(
            scale(rate, DisplayPeriod::Minute),
            Amount::from_str("0.006").unwrap()
        );
        assert_eq!(
            scale(rate, DisplayPeriod::Hour),
            Amount::from_str("0.36").unwrap()
        );
        assert_eq!(
            scale(rate, DisplayPeriod::Day),
            Amount::from_str("8.64").unwrap()
        );
    }

    #[test]
    fn test_format_below_floor() {
        assert_eq!(format_amount(Amount::from_str("0.0009").unwrap()), "<0.001");
        assert_eq!(format_amount(Amount::from_str("0.00001").unwrap()), "<0.001");
    }

    #[test]
    fn test_format_zero_is_below_floor() {
        assert_eq!(format_amount(Amount::ZERO), "<0.001");
    }

    #[test]
    fn test_format_at_floor() {
        assert_eq!(format_amount(Amount::from_str("0.001").unwrap()), "0.001");
    }

    #[test]
    fn test_format_rounds_to_three_digits() {
        assert_eq!(format_amount(Amount::from_str("0.0012").unwrap()), "0.001");
        assert_eq!(format_amount(Amount::from_str("0.36").unwrap()), "0.360");
        assert_eq!(format_amount(Amount::from_str("123.4").unwrap()), "123.400");
    }

    #[test]
    fn test_format_rounds_ties_away_from_zero() {
        assert_eq!(format_amount(Amount::from_str("4.2005").unwrap()), "4.201");
        assert_eq!(format_amount(Amount::from_str("0.0015").unwrap()), "0.002");
    }

    #[test]
    fn test_scaling_can_lift_a_figure_over_the_floor() {
        let rate = Amount::from_str("0.0001").unwrap();
        assert_eq!(format_amount(scale(rate, DisplayPeriod::Second)), "<0.001");
        assert_eq!(format_amount(scale(rate, DisplayPeriod::Hour)), "0.360");
    }
}
