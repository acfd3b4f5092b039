//! Account-level aggregation of stream accruals.

use crate::accrual::accrued;
use crate::amount::Amount;
use crate::error::RecordError;
use crate::status::Direction;
use crate::stream::Stream;
use std::collections::HashMap;

/// Dashboard figures for one (token, direction) group of an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountTokenBalance {
    /// Token account the group is keyed on
    pub token: String,

    /// Whether the group's streams pay into or out of the account
    pub direction: Direction,

    /// Accrued value summed over every member stream, whatever its status.
    /// Value already streamed stays on the dashboard until withdrawn, and
    /// withdrawal tracking lives outside this model.
    pub total_accrued: Amount,

    /// Combined per-second rate of the members currently accruing
    pub rate_per_sec: Amount,

    /// Number of member streams, active or not
    pub stream_count: u32,
}

/// A stream left out of an aggregation, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedStream {
    pub id: String,
    pub error: RecordError,
}

/// Result of one aggregation pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Aggregation {
    /// One entry per (token, direction) group, sorted by token then
    /// direction
    pub balances: Vec<AccountTokenBalance>,

    /// Streams excluded from the sums
    pub skipped: Vec<SkippedStream>,
}

/// Groups streams by (token, direction) and sums their accruals.
///
/// A pure function of the snapshot: aggregating the same streams twice
/// yields identical results, and the output order is fixed so callers can
/// diff runs. Streams with an empty token identifier or a negative rate are
/// excluded and reported; the rest of the batch is unaffected.
pub fn aggregate<'a, I>(streams: I) -> Aggregation
where
    I: IntoIterator<Item = &'a Stream>,
{
    let mut groups: HashMap<(String, Direction), AccountTokenBalance> = HashMap::new();
    let mut skipped = Vec::new();

    for stream in streams {
        // Journal parsing already refuses these, but streams can also be
        // built directly by library callers.
        if stream.token.trim().is_empty() {
            skipped.push(SkippedStream {
                id: stream.id.clone(),
                error: RecordError::MissingToken,
            });
            continue;
        }
        let value = match accrued(stream) {
            Ok(value) => value,
            Err(error) => {
                skipped.push(SkippedStream {
                    id: stream.id.clone(),
                    error,
                });
                continue;
            }
        };

        let entry = groups
            .entry((stream.token.clone(), stream.direction))
            .or_insert_with(|| AccountTokenBalance {
                token: stream.token.clone(),
                direction: stream.direction,
                total_accrued: Amount::ZERO,
                rate_per_sec: Amount::ZERO,
                stream_count: 0,
            });
        entry.total_accrued += value;
        if stream.status.accrues() {
            entry.rate_per_sec += stream.rate_per_sec;
        }
        entry.stream_count += 1;
    }

    let mut balances: Vec<AccountTokenBalance> = groups.into_values().collect();
    balances.sort_by(|a, b| a.token.cmp(&b.token).then(a.direction.cmp(&b.direction)));

    Aggregation { balances, skipped }
}
