//! Recover validated items from streaming LLM JSON output while it is still
//! arriving.
//!
//! Deltas are appended to a per-request buffer, the whole buffer is repaired
//! and parsed on every delta, array elements are shape-checked, and changes
//! are coalesced before they reach the consumer.

pub mod accumulator;
pub mod cli;
pub mod clock;
#[cfg(feature = "async")]
pub mod driver;
pub mod emission;
mod emit;
pub mod error;
pub mod idea;
pub mod options;
mod parser;
pub mod partial;
pub mod session;
pub mod validate;

pub use accumulator::ChunkAccumulator;
pub use clock::{Clock, ManualClock, SystemClock};
#[cfg(feature = "async")]
pub use clock::TokioClock;
pub use emission::{Debouncer, Emission, EmissionState};
pub use error::{RepairError, RepairErrorKind, StreamError};
pub use idea::{IdeaValidator, StoryIdea, format_numbered};
pub use options::{Options, SessionOptions};
pub use parser::RepairLogEntry;
pub use partial::{ParseMiss, ParseOutcome, parse_partial, parse_partial_outcome};
pub use session::{SessionStatus, SessionUpdate, StreamSession, TransportEvent};
pub use validate::{FieldKind, FieldsValidator, Rejection, Validation, Validator};

use std::io::Write;

/// Repair a potentially invalid or truncated JSON text into valid JSON.
///
/// Handles unclosed containers, trailing commas, unterminated strings,
/// dangling keys, comments, code fences and leading prose. The root must be an
/// array or an object.
pub fn repair_to_string(input: &str, opts: &Options) -> Result<String, RepairError> {
    parser::repair_to_string_impl(input, opts).map(|(s, _)| s)
}

/// Repair and write the result into `writer` as it is produced. On error,
/// part of the output may already have been written.
pub fn repair_to_writer<W: Write>(
    input: &str,
    opts: &Options,
    writer: &mut W,
) -> Result<(), RepairError> {
    parser::repair_to_writer_impl(input, opts, writer)
}

/// Repair and then parse into `serde_json::Value`.
pub fn repair_to_value(input: &str, opts: &Options) -> Result<serde_json::Value, RepairError> {
    let s = repair_to_string(input, opts)?;
    serde_json::from_str(&s).map_err(|e| RepairError::from_serde("parse", e))
}

/// Repair and return both the string result and the repair log.
/// Entries are only collected when `opts.logging` is set.
pub fn repair_to_string_with_log(
    input: &str,
    opts: &Options,
) -> Result<(String, Vec<RepairLogEntry>), RepairError> {
    parser::repair_to_string_impl(input, opts)
}

#[cfg(test)]
mod tests;
