// Hand-written recursive descent repairer over &str slices.
//
// Every parse function takes `input: &mut &str` and advances it past what it
// consumed. Containers left open by the end of input are closed, members
// without a value are dropped, and scalars are buffered so a value that turns
// out to be empty never leaves a dangling separator behind.

pub(crate) mod lex;
mod array;
mod number;
mod object;
mod strings;

use crate::emit::{Emitter, JRResult, StringEmitter, WriterEmitter};
use crate::error::{RepairError, RepairErrorKind};
use crate::options::Options;
use lex::{
    closing_fence_pos, fence_open_len, skip_bom, skip_ws_and_comments, take_ident,
    take_unquoted_value,
};
use memchr::memchr2;
use number::parse_number_token;
use strings::{StringRole, emit_json_string_from_lit, parse_string_literal};

pub(crate) use array::parse_array;
pub(crate) use object::parse_object;

/// Containers nested deeper than this are rejected instead of recursing further.
pub(crate) const MAX_DEPTH: usize = 256;

/// One repair action taken while rewriting the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairLogEntry {
    /// Byte offset in the input where the repair applied.
    pub position: usize,
    pub message: &'static str,
    /// Input text around `position`.
    pub context: String,
    /// JSON path of the value being repaired, when path tracking is on.
    pub path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PathElem {
    Index(usize),
    Key(String),
}

pub(crate) struct Logger<'i> {
    origin: &'i str,
    enable: bool,
    track_path: bool,
    window: usize,
    entries: Vec<RepairLogEntry>,
    path: Vec<PathElem>,
}

impl<'i> Logger<'i> {
    pub(crate) fn new(origin: &'i str, enable: bool, track_path: bool, window: usize) -> Self {
        Self {
            origin,
            enable,
            track_path,
            window,
            entries: Vec::new(),
            path: Vec::new(),
        }
    }

    fn from_opts(origin: &'i str, opts: &Options) -> Self {
        Self::new(origin, opts.logging, opts.log_json_path, opts.log_context_window)
    }

    /// Byte offset of `at` within the logged input; 0 for foreign slices.
    pub(crate) fn position(&self, at: &str) -> usize {
        let base = self.origin.as_ptr() as usize;
        let p = at.as_ptr() as usize;
        if p >= base && p <= base + self.origin.len() {
            p - base
        } else {
            0
        }
    }

    pub(crate) fn log(&mut self, at: &str, message: &'static str) {
        if !self.enable {
            return;
        }
        let position = self.position(at);
        let context = self.context_around(position);
        let path = if self.track_path {
            Some(self.format_path())
        } else {
            None
        };
        self.entries.push(RepairLogEntry {
            position,
            message,
            context,
            path,
        });
    }

    fn context_around(&self, position: usize) -> String {
        let s = self.origin;
        let mut start = position.saturating_sub(self.window);
        while start > 0 && !s.is_char_boundary(start) {
            start -= 1;
        }
        let mut end = position.saturating_add(self.window).min(s.len());
        while end < s.len() && !s.is_char_boundary(end) {
            end += 1;
        }
        s[start..end].to_string()
    }

    fn format_path(&self) -> String {
        let mut s = String::from("$");
        for el in &self.path {
            match el {
                PathElem::Index(i) => {
                    s.push('[');
                    s.push_str(&i.to_string());
                    s.push(']');
                }
                PathElem::Key(k) => {
                    s.push_str("[\"");
                    for ch in k.chars() {
                        match ch {
                            '"' => s.push_str("\\\""),
                            '\\' => s.push_str("\\\\"),
                            _ => s.push(ch),
                        }
                    }
                    s.push_str("\"]");
                }
            }
        }
        s
    }

    pub(crate) fn push_key(&mut self, k: &str) {
        if self.track_path {
            self.path.push(PathElem::Key(k.to_string()));
        }
    }

    pub(crate) fn push_index(&mut self, i: usize) {
        if self.track_path {
            self.path.push(PathElem::Index(i));
        }
    }

    pub(crate) fn pop_path(&mut self) {
        if self.track_path {
            self.path.pop();
        }
    }

    pub(crate) fn into_entries(self) -> Vec<RepairLogEntry> {
        self.entries
    }
}

pub(crate) fn repair_to_string_impl(
    input: &str,
    opts: &Options,
) -> Result<(String, Vec<RepairLogEntry>), RepairError> {
    let mut logger = Logger::from_opts(input, opts);
    let mut out = String::with_capacity(input.len() + 8);
    repair_root(input, opts, &mut StringEmitter::new(&mut out), &mut logger)?;
    Ok((out, logger.into_entries()))
}

pub(crate) fn repair_to_writer_impl<W: std::io::Write>(
    input: &str,
    opts: &Options,
    writer: &mut W,
) -> Result<(), RepairError> {
    let mut logger = Logger::from_opts(input, opts);
    let mut emitter = WriterEmitter::with_capacity(writer, 8192);
    repair_root(input, opts, &mut emitter, &mut logger)?;
    emitter.flush_all()
}

/// Strip a BOM and, when enabled, a Markdown code fence. The closing fence is
/// optional since a streamed reply may not have produced it yet.
pub(crate) fn pre_trim_wrappers<'i>(input: &'i str, opts: &Options) -> &'i str {
    let mut s = input;
    skip_bom(&mut s);
    let t = s.trim_start();
    if !opts.fenced_code_blocks {
        return s;
    }
    match t.strip_prefix("```") {
        Some(after) => {
            let body = &after[fence_open_len(after)..];
            match closing_fence_pos(body) {
                Some(end) => &body[..end],
                None => body,
            }
        }
        None => s,
    }
}

fn repair_root<'i, E: Emitter>(
    input: &'i str,
    opts: &Options,
    out: &mut E,
    logger: &mut Logger<'i>,
) -> JRResult<()> {
    let mut s = pre_trim_wrappers(input, opts);
    if s.len() != input.len() {
        logger.log(s, "stripped wrapper");
    }
    skip_ws_and_comments(&mut s, opts);
    if s.is_empty() {
        return Err(RepairError::new(
            RepairErrorKind::UnexpectedEnd,
            logger.position(s),
        ));
    }

    if !s.starts_with(['[', '{']) {
        let first = s.chars().next().unwrap_or('\0');
        if !opts.skip_leading_prose {
            return Err(RepairError::new(
                RepairErrorKind::UnexpectedChar(first),
                logger.position(s),
            ));
        }
        match memchr2(b'[', b'{', s.as_bytes()) {
            Some(pos) => {
                s = &s[pos..];
                logger.log(s, "skipped leading text");
            }
            None => {
                return Err(RepairError::new(
                    RepairErrorKind::NoJsonRoot,
                    logger.position(s),
                ));
            }
        }
    }

    // Already valid: pass through untouched.
    let candidate = s.trim_end();
    if serde_json::from_str::<serde_json::Value>(candidate).is_ok() {
        return out.emit_str(candidate);
    }

    if s.starts_with('[') {
        parse_array(&mut s, opts, out, logger, 1)?;
    } else {
        parse_object(&mut s, opts, out, logger, 1)?;
    }
    skip_ws_and_comments(&mut s, opts);
    if !s.is_empty() {
        logger.log(s, "ignored trailing text");
    }
    Ok(())
}

fn too_deep(at: &str, logger: &Logger) -> RepairError {
    RepairError::new(
        RepairErrorKind::Parse(format!("nesting deeper than {}", MAX_DEPTH)),
        logger.position(at),
    )
}

/// Parse one value and emit `prefix` in front of it, but only if the value
/// produced output. Returns whether it did.
pub(crate) fn parse_value_with_prefix<'i, E: Emitter>(
    input: &mut &'i str,
    opts: &Options,
    out: &mut E,
    logger: &mut Logger<'i>,
    depth: usize,
    prefix: &str,
) -> JRResult<bool> {
    match input.as_bytes().first() {
        Some(b'{') => {
            out.emit_str(prefix)?;
            parse_object(input, opts, out, logger, depth + 1)?;
            Ok(true)
        }
        Some(b'[') => {
            out.emit_str(prefix)?;
            parse_array(input, opts, out, logger, depth + 1)?;
            Ok(true)
        }
        _ => {
            let mut scratch = String::new();
            let produced = parse_scalar(input, opts, &mut StringEmitter::new(&mut scratch), logger)?;
            if produced {
                out.emit_str(prefix)?;
                out.emit_str(&scratch)?;
            }
            Ok(produced)
        }
    }
}

fn parse_scalar<'i, E: Emitter>(
    input: &mut &'i str,
    opts: &Options,
    out: &mut E,
    logger: &mut Logger<'i>,
) -> JRResult<bool> {
    let Some(c) = input.chars().next() else {
        return Ok(false);
    };
    match c {
        ',' | '}' | ']' | ':' => Ok(false),
        '"' | '\'' => {
            let lit = parse_string_literal(input, StringRole::Value, logger)?;
            emit_json_string_from_lit(out, &lit.text)?;
            Ok(true)
        }
        c if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => {
            parse_number_token(input, out, logger)
        }
        _ => parse_symbol_or_unquoted(input, opts, out, logger),
    }
}

const LITERALS: [&str; 3] = ["true", "false", "null"];

fn parse_symbol_or_unquoted<'i, E: Emitter>(
    input: &mut &'i str,
    opts: &Options,
    out: &mut E,
    logger: &mut Logger<'i>,
) -> JRResult<bool> {
    let s = *input;
    let (tok, rest) = take_ident(s);
    if !tok.is_empty() {
        let keyword = match tok {
            "true" | "false" | "null" => Some(tok),
            "True" if opts.allow_python_keywords => Some("true"),
            "False" if opts.allow_python_keywords => Some("false"),
            "None" if opts.allow_python_keywords => Some("null"),
            "NaN" | "Infinity" | "undefined" => Some("null"),
            _ if rest.is_empty() && opts.complete_partial_literals => {
                LITERALS.iter().copied().find(|lit| lit.starts_with(tok))
            }
            _ => None,
        };
        if let Some(k) = keyword {
            if k != tok {
                logger.log(s, "normalized literal");
            }
            *input = rest;
            out.emit_str(k)?;
            return Ok(true);
        }
    }
    let text = take_unquoted_value(input);
    if text.is_empty() {
        return Ok(false);
    }
    logger.log(s, "quoted bare value");
    emit_json_string_from_lit(out, text)?;
    Ok(true)
}
