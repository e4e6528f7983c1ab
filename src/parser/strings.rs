use super::Logger;
use crate::emit::{Emitter, JRResult};
use crate::error::{RepairError, RepairErrorKind};

/// A decoded string literal and whether its closing quote was seen.
#[derive(Debug)]
pub(crate) struct Literal {
    pub text: String,
    pub terminated: bool,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum StringRole {
    Key,
    Value,
}

/// Parse a single- or double-quoted literal, decoding escapes.
///
/// A value string, single- or double-quoted, only closes on a quote followed
/// by `,` `}` `]` `:` or the end of input; any other quote is taken as content,
/// so `'Tom's day'` keeps its apostrophe. Keys close on the first matching quote. Input that ends inside
/// the literal yields `terminated == false`; a dangling backslash or partial
/// `\u` escape at the very end is dropped.
pub(crate) fn parse_string_literal(
    input: &mut &str,
    role: StringRole,
    logger: &mut Logger,
) -> JRResult<Literal> {
    let s = *input;
    let quote = match s.chars().next() {
        Some(q @ ('"' | '\'')) => q,
        _ => {
            return Err(RepairError::new(
                RepairErrorKind::UnexpectedChar(s.chars().next().unwrap_or('\0')),
                logger.position(s),
            ));
        }
    };
    let mut text = String::new();
    let mut chars = s.char_indices().skip(1);
    while let Some((i, ch)) = chars.next() {
        if ch == '\\' {
            let Some((_, esc)) = chars.next() else {
                logger.log(s, "dropped dangling backslash");
                break;
            };
            match esc {
                'n' => text.push('\n'),
                't' => text.push('\t'),
                'r' => text.push('\r'),
                'b' => text.push('\u{0008}'),
                'f' => text.push('\u{000C}'),
                'u' => {
                    let rest = &s[i + 2..];
                    match decode_unicode_escape(rest) {
                        Escape::Complete(c, used) => {
                            text.push(c);
                            for _ in 0..used {
                                chars.next();
                            }
                        }
                        Escape::Truncated => {
                            logger.log(&s[i..], "dropped truncated unicode escape");
                            *input = "";
                            return Ok(Literal { text, terminated: false });
                        }
                        Escape::Invalid => {
                            return Err(RepairError::new(
                                RepairErrorKind::InvalidUnicodeEscape,
                                logger.position(&s[i..]),
                            ));
                        }
                    }
                }
                other => text.push(other),
            }
            continue;
        }
        if ch == quote {
            let after = &s[i + ch.len_utf8()..];
            if role == StringRole::Key || closes_value(after) {
                *input = after;
                return Ok(Literal { text, terminated: true });
            }
            logger.log(&s[i..], "kept unescaped quote inside string");
        }
        text.push(ch);
    }
    logger.log(s, "closed unterminated string");
    *input = "";
    Ok(Literal { text, terminated: false })
}

fn closes_value(after: &str) -> bool {
    match after.trim_start_matches([' ', '\t', '\n', '\r']).chars().next() {
        None => true,
        Some(c) => matches!(c, ',' | '}' | ']' | ':'),
    }
}

enum Escape {
    /// Decoded char and the number of source chars consumed after `\u`.
    Complete(char, usize),
    Truncated,
    Invalid,
}

fn hex4(s: &str) -> Option<Result<u32, ()>> {
    let digits = s.get(..4).unwrap_or(s);
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Some(Err(()));
    }
    if digits.len() < 4 {
        return None;
    }
    u32::from_str_radix(digits, 16).ok().map(Ok)
}

fn decode_unicode_escape(rest: &str) -> Escape {
    let hi = match hex4(rest) {
        None => return Escape::Truncated,
        Some(Err(())) => return Escape::Invalid,
        Some(Ok(v)) => v,
    };
    if (0xD800..0xDC00).contains(&hi) {
        let tail = &rest[4..];
        if tail.is_empty() || "\\u".starts_with(tail) {
            return Escape::Truncated;
        }
        if let Some(low_hex) = tail.strip_prefix("\\u") {
            match hex4(low_hex) {
                None => return Escape::Truncated,
                Some(Ok(lo)) if (0xDC00..0xE000).contains(&lo) => {
                    let cp = 0x10000 + ((hi - 0xD800) << 10) + (lo - 0xDC00);
                    return Escape::Complete(char::from_u32(cp).unwrap_or('\u{FFFD}'), 10);
                }
                _ => {}
            }
        }
        return Escape::Complete('\u{FFFD}', 4);
    }
    Escape::Complete(char::from_u32(hi).unwrap_or('\u{FFFD}'), 4)
}

/// Emit `lit` as a JSON string, escaping quotes, backslashes and control characters.
pub fn emit_json_string_from_lit<E: Emitter>(out: &mut E, lit: &str) -> JRResult<()> {
    out.emit_char('"')?;
    let mut start = 0usize;
    for (i, ch) in lit.char_indices() {
        let esc: Option<&str> = match ch {
            '"' => Some("\\\""),
            '\\' => Some("\\\\"),
            '\n' => Some("\\n"),
            '\r' => Some("\\r"),
            '\t' => Some("\\t"),
            '\u{0008}' => Some("\\b"),
            '\u{000C}' => Some("\\f"),
            c if (c as u32) < 0x20 => None,
            _ => continue,
        };
        if i > start {
            out.emit_str(&lit[start..i])?;
        }
        match esc {
            Some(e) => out.emit_str(e)?,
            None => out.emit_str(&format!("\\u{:04x}", ch as u32))?,
        }
        start = i + ch.len_utf8();
    }
    if start < lit.len() {
        out.emit_str(&lit[start..])?;
    }
    out.emit_char('"')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::StringEmitter;

    fn lit(s: &str, role: StringRole) -> (String, bool, String) {
        let mut input = s;
        let mut logger = Logger::new(s, false, false, 0);
        let l = parse_string_literal(&mut input, role, &mut logger).unwrap();
        (l.text, l.terminated, input.to_string())
    }

    #[test]
    fn decodes_escapes_and_stops_at_closing_quote() {
        let (t, done, rest) = lit(r#""a\n\"b\u00e9", 1"#, StringRole::Value);
        assert_eq!(t, "a\n\"bé");
        assert!(done);
        assert_eq!(rest, ", 1");
    }

    #[test]
    fn unterminated_value_is_reported() {
        let (t, done, rest) = lit("\"half a sen", StringRole::Value);
        assert_eq!(t, "half a sen");
        assert!(!done);
        assert_eq!(rest, "");
    }

    #[test]
    fn inner_quote_followed_by_text_is_content() {
        let (t, done, _) = lit("\"他说\"你好\"。\"}", StringRole::Value);
        assert_eq!(t, "他说\"你好\"。");
        assert!(done);
    }

    #[test]
    fn apostrophe_inside_single_quoted_value_is_content() {
        let (t, done, rest) = lit("'Tom's day', 'x'", StringRole::Value);
        assert_eq!(t, "Tom's day");
        assert!(done);
        assert_eq!(rest, ", 'x'");
        // keys still end at the first matching quote
        assert_eq!(lit("'it's'", StringRole::Key).0, "it");
    }

    #[test]
    fn truncated_escapes_are_dropped() {
        assert_eq!(lit("\"ab\\", StringRole::Value).0, "ab");
        assert_eq!(lit("\"ab\\u00", StringRole::Value).0, "ab");
        assert_eq!(lit("\"ab\\ud83d", StringRole::Value).0, "ab");
    }

    #[test]
    fn surrogate_pairs_combine() {
        assert_eq!(lit("\"\\ud83d\\ude00\"", StringRole::Value).0, "😀");
    }

    #[test]
    fn invalid_unicode_escape_fails() {
        let mut input = "\"\\uzzzz\"";
        let mut logger = Logger::new(input, false, false, 0);
        let err = parse_string_literal(&mut input, StringRole::Value, &mut logger).unwrap_err();
        assert_eq!(err.kind, RepairErrorKind::InvalidUnicodeEscape);
    }

    #[test]
    fn emit_escapes_control_characters() {
        let mut out = String::new();
        emit_json_string_from_lit(&mut StringEmitter::new(&mut out), "a\"\n\u{1}").unwrap();
        assert_eq!(out, "\"a\\\"\\n\\u0001\"");
    }
}
