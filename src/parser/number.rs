use super::Logger;
use super::strings::emit_json_string_from_lit;
use crate::emit::{Emitter, JRResult};

/// Parse a number-like token. Returns `false` when nothing usable was found
/// (a lone `-` cut off by the end of input).
///
/// Truncation tolerance: `1.` becomes `1`, `1e` / `1e-` fall back to the
/// mantissa, `.5` becomes `0.5` and leading zeros are dropped. Tokens that are
/// not numbers at all (`10-20`, `1.2.3`, `12px`) are quoted as strings.
pub fn parse_number_token<E: Emitter>(
    input: &mut &str,
    out: &mut E,
    logger: &mut Logger,
) -> JRResult<bool> {
    let s = *input;
    let mut end = 0usize;
    for (i, ch) in s.char_indices() {
        if ch.is_whitespace() || matches!(ch, ',' | '}' | ']' | ':' | '"' | '\'') {
            break;
        }
        // stop if '/' starts a comment
        if ch == '/' && matches!(s.as_bytes().get(i + 1), Some(b'/') | Some(b'*')) {
            break;
        }
        end = i + ch.len_utf8();
    }
    let seg = &s[..end];
    *input = &s[end..];

    match normalize_number(seg) {
        Some(num) => {
            if num != seg {
                logger.log(s, "normalized number");
            }
            out.emit_str(&num)?;
            Ok(true)
        }
        None if seg.chars().all(|c| matches!(c, '-' | '+' | '.')) => {
            logger.log(s, "dropped incomplete number");
            Ok(false)
        }
        None => {
            logger.log(s, "quoted number-like token");
            emit_json_string_from_lit(out, seg)?;
            Ok(true)
        }
    }
}

/// Rewrite `seg` as a strict JSON number, or `None` if it is not number-shaped.
fn normalize_number(seg: &str) -> Option<String> {
    let b = seg.as_bytes();
    let mut i = 0usize;
    let mut out = String::with_capacity(seg.len() + 1);
    if i < b.len() && (b[i] == b'-' || b[i] == b'+') {
        if b[i] == b'-' {
            out.push('-');
        }
        i += 1;
    }
    let int_start = i;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = seg[int_start..i].trim_start_matches('0');
    out.push_str(if int_digits.is_empty() { "0" } else { int_digits });
    let had_int = i > int_start;

    let mut had_frac = false;
    if i < b.len() && b[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        if i > frac_start {
            out.push('.');
            out.push_str(&seg[frac_start..i]);
            had_frac = true;
        }
    }
    if !had_int && !had_frac {
        return None;
    }

    if i < b.len() && (b[i] == b'e' || b[i] == b'E') {
        let mut j = i + 1;
        let sign_at = j;
        if j < b.len() && (b[j] == b'-' || b[j] == b'+') {
            j += 1;
        }
        let exp_start = j;
        while j < b.len() && b[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            out.push('e');
            out.push_str(&seg[sign_at..j]);
            i = j;
        } else if j == b.len() {
            // incomplete exponent at the end of the token
            i = j;
        } else {
            return None;
        }
    }

    if i != b.len() {
        return None;
    }
    // out of f64 range: serde_json would refuse it
    if out.parse::<f64>().is_ok_and(f64::is_infinite) {
        return None;
    }
    Some(out)
}
