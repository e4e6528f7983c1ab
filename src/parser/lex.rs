use crate::options::Options;
use memchr::{memchr, memchr2, memmem, memrchr};

pub fn skip_bom(input: &mut &str) {
    if let Some(rest) = input.strip_prefix('\u{FEFF}') {
        *input = rest;
    }
}

#[inline]
pub fn skip_ascii_ws(input: &mut &str) {
    let bytes = input.as_bytes();
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b' ' | b'\t' | b'\n' | b'\r' => i += 1,
            _ => break,
        }
    }
    *input = &input[i..];
}

/// Combined whitespace and comment skipper. An unterminated block comment
/// swallows the rest of the input, which is what a truncated stream looks like.
#[inline]
pub fn skip_ws_and_comments(input: &mut &str, opts: &Options) {
    loop {
        let before_len = input.len();
        skip_ascii_ws(input);
        if input.is_empty() {
            break;
        }

        if let Some(rest) = input.strip_prefix("//") {
            *input = match memchr2(b'\n', b'\r', rest.as_bytes()) {
                Some(pos) => &rest[pos + 1..],
                None => "",
            };
            continue;
        }

        if let Some(rest) = input.strip_prefix("/*") {
            let bytes = rest.as_bytes();
            let mut off = 0usize;
            let mut closed = false;
            while let Some(p) = memchr(b'*', &bytes[off..]) {
                let idx = off + p;
                if bytes.get(idx + 1) == Some(&b'/') {
                    *input = &rest[idx + 2..];
                    closed = true;
                    break;
                }
                off = idx + 1;
            }
            if !closed {
                *input = "";
            }
            continue;
        }

        if opts.tolerate_hash_comments && input.as_bytes().first() == Some(&b'#') {
            let rest = &input[1..];
            *input = match memchr2(b'\n', b'\r', rest.as_bytes()) {
                Some(pos) => &rest[pos + 1..],
                None => "",
            };
            continue;
        }

        if before_len == input.len() {
            break;
        }
    }
}

pub fn take_ident(s: &str) -> (&str, &str) {
    let mut end = 0usize;
    for (i, ch) in s.char_indices() {
        let ok = if i == 0 {
            ch.is_ascii_alphabetic() || ch == '_' || ch == '$'
        } else {
            ch.is_ascii_alphanumeric() || ch == '_' || ch == '$'
        };
        if !ok {
            break;
        }
        end = i + ch.len_utf8();
    }
    (&s[..end], &s[end..])
}

/// Take an unquoted object key: everything up to `:`, a structural delimiter,
/// a quote or a line break.
pub fn take_unquoted_key<'i>(input: &mut &'i str) -> &'i str {
    let s = *input;
    let b = s.as_bytes();
    let mut i = 0usize;
    while i < b.len() {
        match b[i] {
            b':' | b',' | b'{' | b'}' | b'[' | b']' | b'"' | b'\'' | b'\n' | b'\r' => break,
            _ => i += 1,
        }
    }
    *input = &s[i..];
    s[..i].trim()
}

/// Take a bare value run up to the next `,`, closer or line break.
pub fn take_unquoted_value<'i>(input: &mut &'i str) -> &'i str {
    let s = *input;
    let b = s.as_bytes();
    let mut i = 0usize;
    while i < b.len() {
        match b[i] {
            b',' | b'}' | b']' | b'\n' | b'\r' => break,
            _ => i += 1,
        }
    }
    *input = &s[i..];
    s[..i].trim_end()
}

/// Number of bytes to consume after an opening ``` marker: extra backticks, an
/// optional language tag, trailing spaces and one line break.
pub fn fence_open_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut i = 0usize;
    while i < bytes.len() && bytes[i] == b'`' {
        i += 1;
    }
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_' || bytes[i] == b'-') {
        i += 1;
    }
    while i < bytes.len() && (bytes[i] == b' ' || bytes[i] == b'\t') {
        i += 1;
    }
    if s[i..].starts_with("\r\n") {
        i += 2;
    } else if i < bytes.len() && (bytes[i] == b'\n' || bytes[i] == b'\r') {
        i += 1;
    }
    i
}

/// Byte offset of the closing ``` in a fence body, if it has arrived yet.
///
/// Only a marker on a line of its own counts: backticks inside a string value
/// (`"run ```ls``` first"`) are content.
pub fn closing_fence_pos(body: &str) -> Option<usize> {
    let bytes = body.as_bytes();
    memmem::find_iter(bytes, b"```").find(|&pos| {
        let line_start = memrchr(b'\n', &bytes[..pos]).map_or(0, |p| p + 1);
        let after = &body[pos + 3..];
        let line_end = memchr(b'\n', after.as_bytes()).unwrap_or(after.len());
        body[line_start..pos].trim().is_empty()
            && after[..line_end].trim_start_matches('`').trim().is_empty()
    })
}
