//! # Streams Dashboard
//!
//! A dashboard core for continuous token-payment streams: replays stream
//! lifecycle events, computes accrued balances, and aggregates them into
//! per-token account totals.
//!
//! ## Design Principles
//!
//! - **Exact arithmetic**: Token amounts ride on `rust_decimal`
//! - **Strict lifecycle**: Every status transition is matched exhaustively
//! - **Partial-failure tolerance**: A malformed record is skipped and
//!   reported, never allowed to blank the dashboard
//! - **Deterministic output**: Balances sorted by token and direction
//!
//! ## Example
//!
//! ```no_run
//! use streams_dashboard::{DashboardEngine, DisplayPeriod, TokenRegistry};
//! use std::io::Cursor;
//!
//! let csv = "event,stream,token,direction,rate_per_sec,seconds\n\
//!            create,s1,usdt.near,in,0.0001,\n\
//!            start,s1,,,,\n\
//!            advance,s1,,,,3600\n";
//! let mut engine = DashboardEngine::new();
//! engine.process_csv(Cursor::new(csv)).unwrap();
//! engine
//!     .write_output(std::io::stdout(), DisplayPeriod::Hour, &TokenRegistry::new())
//!     .unwrap();
//! ```

pub mod accrual;
pub mod aggregate;
pub mod amount;
pub mod engine;
pub mod error;
pub mod registry;
pub mod status;
pub mod stream;

pub use accrual::{accrued, format_amount, scale, DisplayPeriod};
pub use aggregate::{aggregate, AccountTokenBalance, Aggregation, SkippedStream};
pub use amount::Amount;
pub use engine::DashboardEngine;
pub use error::{Diagnostic, EngineError, RecordError, Result};
pub use registry::{TokenMeta, TokenRegistry};
pub use status::{Direction, InvalidTransition, StreamEvent, StreamStatus};
pub use stream::{EventKind, EventRecord, ParsedEvent, Stream};
