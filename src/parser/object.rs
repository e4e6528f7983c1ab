use super::lex::{skip_ws_and_comments, take_unquoted_key};
use super::strings::{StringRole, emit_json_string_from_lit, parse_string_literal};
use super::{Logger, MAX_DEPTH, parse_value_with_prefix, too_deep};
use crate::emit::{Emitter, JRResult, StringEmitter};
use crate::options::Options;

pub fn parse_object<'i, E: Emitter>(
    input: &mut &'i str,
    opts: &Options,
    out: &mut E,
    logger: &mut Logger<'i>,
    depth: usize,
) -> JRResult<()> {
    if depth > MAX_DEPTH {
        return Err(too_deep(input, logger));
    }
    // assumes current starts with '{'
    *input = &input[1..];
    out.emit_char('{')?;
    let mut first = true;
    loop {
        let before = input.len();
        skip_ws_and_comments(input, opts);
        let Some(&b) = input.as_bytes().first() else {
            logger.log(input, "closed unterminated object");
            break;
        };
        match b {
            b'}' => {
                *input = &input[1..];
                break;
            }
            b']' => {
                logger.log(input, "closed object at mismatched bracket");
                break;
            }
            b',' => {
                *input = &input[1..];
                continue;
            }
            _ => {}
        }

        let key_at = *input;
        let key = if b == b'"' || b == b'\'' {
            let lit = parse_string_literal(input, StringRole::Key, logger)?;
            if !lit.terminated {
                logger.log(key_at, "dropped dangling key");
                continue;
            }
            Some(lit.text)
        } else {
            let k = take_unquoted_key(input);
            if k.is_empty() { None } else { Some(k.to_string()) }
        };
        let Some(key) = key else {
            if input.len() == before {
                skip_one_char(input, logger);
            }
            continue;
        };

        skip_ws_and_comments(input, opts);
        match input.as_bytes().first() {
            Some(b':') => *input = &input[1..],
            None | Some(b',') | Some(b'}') | Some(b']') => {
                logger.log(key_at, "dropped dangling key");
                continue;
            }
            Some(_) => logger.log(input, "inserted missing colon"),
        }
        skip_ws_and_comments(input, opts);

        let mut prefix = String::with_capacity(key.len() + 4);
        if !first {
            prefix.push(',');
        }
        emit_json_string_from_lit(&mut StringEmitter::new(&mut prefix), &key)?;
        prefix.push(':');

        logger.push_key(&key);
        let produced = parse_value_with_prefix(input, opts, out, logger, depth, &prefix)?;
        logger.pop_path();
        if produced {
            first = false;
        } else {
            logger.log(key_at, "dropped key without value");
        }
        if input.len() == before {
            skip_one_char(input, logger);
        }
    }
    out.emit_char('}')
}

/// Drop one unusable character so the member loop always advances.
pub(super) fn skip_one_char(input: &mut &str, logger: &mut Logger) {
    if let Some(c) = input.chars().next() {
        logger.log(input, "skipped unexpected character");
        *input = &input[c.len_utf8()..];
    }
}

#[cfg(test)]
mod tests {
    use crate::{Options, repair_to_string};
    use serde_json::json;

    fn fix(s: &str) -> serde_json::Value {
        let out = repair_to_string(s, &Options::default()).unwrap();
        serde_json::from_str(&out).unwrap()
    }

    #[test]
    fn unclosed_object_is_closed() {
        assert_eq!(fix("{\"title\":\"T\",\"body\":\"B\""), json!({"title":"T","body":"B"}));
    }

    #[test]
    fn dangling_keys_are_dropped() {
        assert_eq!(fix("{\"title\":\"T\",\"bod"), json!({"title":"T"}));
        assert_eq!(fix("{\"title\":\"T\",\"body\""), json!({"title":"T"}));
        assert_eq!(fix("{\"title\":\"T\",\"body\":"), json!({"title":"T"}));
        assert_eq!(fix("{\"title\":\"T\",\"body\": }"), json!({"title":"T"}));
    }

    #[test]
    fn unquoted_keys_and_missing_colon() {
        assert_eq!(fix("{title: 'T', \"body\" \"B\"}"), json!({"title":"T","body":"B"}));
    }

    #[test]
    fn trailing_commas_are_removed() {
        assert_eq!(fix("{\"a\":1,,}"), json!({"a":1}));
    }

    #[test]
    fn missing_comma_between_members() {
        assert_eq!(fix("{\"a\":1 \"b\":2}"), json!({"a":1,"b":2}));
    }
}
