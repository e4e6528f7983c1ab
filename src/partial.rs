//! Best-effort parsing of a buffer that is still being streamed.
//!
//! The whole buffer is repaired and parsed from scratch on every call. A buffer
//! that cannot be repaired yet is the normal state mid-stream and yields no
//! items rather than an error.

use crate::error::RepairError;
use crate::options::Options;
use crate::parser::{pre_trim_wrappers, repair_to_string_impl};
use crate::validate::{Validation, Validator};
use memchr::memchr;
use serde_json::Value;

/// Why a parse pass produced no candidates.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseMiss {
    /// Nothing but whitespace (after fence stripping).
    Empty,
    /// The repair pass gave up on the input.
    RepairFailed(RepairError),
    /// Repaired text was still not valid JSON.
    InvalidJson(String),
    /// The root value was not an array.
    NotAnArray,
}

/// Result of one parse pass, with the bookkeeping needed for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome<T> {
    pub items: Vec<T>,
    /// Array elements that failed the shape check.
    pub rejected: usize,
    pub miss: Option<ParseMiss>,
}

impl<T> ParseOutcome<T> {
    fn missed(miss: ParseMiss) -> Self {
        Self {
            items: Vec::new(),
            rejected: 0,
            miss: Some(miss),
        }
    }
}

/// Parse `buffer` into the validated items it currently holds, in array order.
///
/// Pure in its inputs: the same buffer always yields the same items.
pub fn parse_partial<V: Validator>(buffer: &str, opts: &Options, validator: &V) -> Vec<V::Item> {
    parse_partial_outcome(buffer, opts, validator).items
}

/// Like [`parse_partial`], but also reports rejected candidates and the reason
/// for an empty yield.
pub fn parse_partial_outcome<V: Validator>(
    buffer: &str,
    opts: &Options,
    validator: &V,
) -> ParseOutcome<V::Item> {
    if pre_trim_wrappers(buffer, opts).trim().is_empty() {
        return ParseOutcome::missed(ParseMiss::Empty);
    }

    let repaired = match repair_to_string_impl(buffer, opts) {
        Ok((s, _)) => s,
        Err(e) => {
            tracing::debug!(error = %e, buffer_len = buffer.len(), "repair pass gave up");
            return ParseOutcome::missed(ParseMiss::RepairFailed(e));
        }
    };

    let root: Value = match serde_json::from_str(&repaired) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!(error = %e, "repaired text did not parse");
            return ParseOutcome::missed(ParseMiss::InvalidJson(e.to_string()));
        }
    };

    let Value::Array(candidates) = root else {
        if let Some(rest) = array_after_prose(buffer, opts) {
            tracing::debug!("braces in leading prose, retrying from the next array");
            return parse_partial_outcome(rest, opts, validator);
        }
        return ParseOutcome::missed(ParseMiss::NotAnArray);
    };

    let mut items = Vec::with_capacity(candidates.len());
    let mut rejected = 0usize;
    for (idx, candidate) in candidates.iter().enumerate() {
        match validator.validate(candidate) {
            Validation::Valid(item) => items.push(item),
            Validation::Invalid(why) => {
                tracing::trace!(index = idx, reason = %why, "candidate rejected");
                rejected += 1;
            }
        }
    }
    ParseOutcome {
        items,
        rejected,
        miss: None,
    }
}

/// When prose precedes the root and mentions braces (`Format {title, body}:`),
/// the object picked as root is part of the prose. Returns the text from the
/// first `[` after that brace. A buffer that starts with `{` is an object reply
/// and is left alone.
fn array_after_prose<'b>(buffer: &'b str, opts: &Options) -> Option<&'b str> {
    if !opts.skip_leading_prose {
        return None;
    }
    let body = pre_trim_wrappers(buffer, opts).trim_start();
    if body.starts_with(['[', '{']) {
        return None;
    }
    let brace = memchr(b'{', body.as_bytes())?;
    let bracket = memchr(b'[', &body.as_bytes()[brace..])?;
    Some(&body[brace + bracket..])
}
