//! Journal replay engine.
//!
//! Replays stream lifecycle events in chronological order and maintains the
//! working set of streams. The engine uses streaming CSV processing, so
//! journal files much larger than memory are fine.

use crate::accrual::{format_amount, scale, DisplayPeriod};
use crate::aggregate::{aggregate, Aggregation};
use crate::error::{Diagnostic, RecordError, Result};
use crate::registry::TokenRegistry;
use crate::stream::{EventKind, EventRecord, ParsedEvent, Stream};
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use std::collections::HashMap;
use std::io::{Read, Write};

/// The dashboard replay engine.
///
/// Maintains streams keyed by id plus the diagnostics collected along the
/// way. Events are applied in the order they are received (assumed
/// chronological); a bad row is skipped and reported, never fatal.
///
/// # Output Ordering
///
/// Dashboard rows are output sorted by token and direction to ensure
/// deterministic, reproducible output.
pub struct DashboardEngine {
    /// Streams indexed by stream id.
    streams: HashMap<String, Stream>,

    /// Per-row problems encountered during replay.
    diagnostics: Vec<Diagnostic>,
}

impl DashboardEngine {
    /// Creates a new empty engine.
    pub fn new() -> Self {
        DashboardEngine {
            streams: HashMap::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Replays an event journal from a CSV reader in streaming fashion.
    ///
    /// Records are read one at a time to minimize memory usage. Invalid
    /// records are logged at warn level, recorded as diagnostics and
    /// skipped; only reader-level failures abort.
    pub fn process_csv<R: Read>(&mut self, reader: R) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        for (row_idx, result) in csv_reader.deserialize::<EventRecord>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row

            match result {
                Ok(record) => match record.parse() {
                    Ok(event) => self.process_event(event, row_num),
                    Err(error) => {
                        warn!("Row {}: {}, skipping", row_num, error);
                        let stream_id = record.stream.trim();
                        self.diagnostics.push(Diagnostic {
                            row: row_num,
                            stream_id: if stream_id.is_empty() {
                                None
                            } else {
                                Some(stream_id.to_string())
                            },
                            error,
                        });
                    }
                },
                Err(e) => {
                    warn!("Row {}: CSV parse error: {}, skipping", row_num, e);
                }
            }
        }

        Ok(())
    }

    /// Applies a single validated event to the working set.
    fn process_event(&mut self, event: ParsedEvent, row: usize) {
        let ParsedEvent { stream_id, kind } = event;

        match kind {
            EventKind::Create {
                token,
                direction,
                rate_per_sec,
            } => {
                if self.streams.contains_key(&stream_id) {
                    warn!("Row {}: Duplicate stream id {}, ignoring", row, stream_id);
                    self.diagnostics.push(Diagnostic {
                        row,
                        stream_id: Some(stream_id.clone()),
                        error: RecordError::DuplicateStream(stream_id),
                    });
                    return;
                }
                debug!(
                    "Row {}: Created stream {} ({} {} at {}/sec)",
                    row, stream_id, direction, token, rate_per_sec
                );
                self.streams.insert(
                    stream_id.clone(),
                    Stream::new(stream_id, token, direction, rate_per_sec),
                );
            }

            EventKind::Lifecycle(lifecycle) => {
                let stream = match self.streams.get_mut(&stream_id) {
                    Some(stream) => stream,
                    None => {
                        warn!(
                            "Row {}: `{}` references unknown stream {}, ignoring",
                            row, lifecycle, stream_id
                        );
                        self.diagnostics.push(Diagnostic {
                            row,
                            stream_id: Some(stream_id.clone()),
                            error: RecordError::UnknownStream(stream_id),
                        });
                        return;
                    }
                };

                match stream.apply(lifecycle) {
                    Ok(()) => {
                        debug!("Row {}: Stream {} is now {}", row, stream_id, stream.status);
                    }
                    Err(invalid) => {
                        warn!("Row {}: Stream {}: {}, ignoring", row, stream_id, invalid);
                        self.diagnostics.push(Diagnostic {
                            row,
                            stream_id: Some(stream_id),
                            error: invalid.into(),
                        });
                    }
                }
            }

            EventKind::Advance { seconds } => {
                let stream = match self.streams.get_mut(&stream_id) {
                    Some(stream) => stream,
                    None => {
                        warn!(
                            "Row {}: Advance references unknown stream {}, ignoring",
                            row, stream_id
                        );
                        self.diagnostics.push(Diagnostic {
                            row,
                            stream_id: Some(stream_id.clone()),
                            error: RecordError::UnknownStream(stream_id),
                        });
                        return;
                    }
                };

                if stream.advance(seconds) {
                    debug!(
                        "Row {}: Stream {} advanced {}s ({}s active total)",
                        row, stream_id, seconds, stream.active_secs
                    );
                } else {
                    // Time passing over a non-active stream is normal, not
                    // an input problem. The clock stays frozen.
                    debug!(
                        "Row {}: Stream {} is {}, clock frozen",
                        row, stream_id, stream.status
                    );
                }
            }
        }
    }

    /// Streams materialized so far, in unspecified order.
    pub fn streams(&self) -> impl Iterator<Item = &Stream> + '_ {
        self.streams.values()
    }

    /// Problems collected during replay, in row order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Aggregates the current snapshot into per-token account balances.
    pub fn aggregate(&self) -> Aggregation {
        aggregate(self.streams.values())
    }

    /// Writes the dashboard state as CSV.
    ///
    /// One row per (token, direction) group, sorted for deterministic
    /// results. `total` carries the display-formatted accrued sum; `rate`
    /// carries the combined rate of the accruing members projected onto
    /// `period`; `period` echoes the requested label. Token names come from
    /// the registry, with the column left empty for unknown tokens.
    pub fn write_output<W: Write>(
        &self,
        writer: W,
        period: DisplayPeriod,
        registry: &TokenRegistry,
    ) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "token",
            "name",
            "direction",
            "streams",
            "total",
            "rate",
            "period",
        ])?;

        let aggregation = self.aggregate();
        for skipped in &aggregation.skipped {
            warn!(
                "Stream {} excluded from output: {}",
                skipped.id, skipped.error
            );
        }

        for balance in &aggregation.balances {
            let name = registry
                .get(&balance.token)
                .map(|meta| meta.name.clone())
                .unwrap_or_default();
            csv_writer.write_record([
                balance.token.clone(),
                name,
                balance.direction.to_string(),
                balance.stream_count.to_string(),
                format_amount(balance.total_accrued),
                format_amount(scale(balance.rate_per_sec, period)),
                period.label().to_string(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Returns a reference to a stream (for testing).
    #[cfg(test)]
    pub fn get_stream(&self, id: &str) -> Option<&Stream> {
        self.streams.get(id)
    }
}

impl Default for DashboardEngine {
    fn default() -> Self {
        Self::new()
    }
}
