use super::lex::skip_ws_and_comments;
use super::object::skip_one_char;
use super::{Logger, MAX_DEPTH, parse_value_with_prefix, too_deep};
use crate::emit::{Emitter, JRResult};
use crate::options::Options;

pub fn parse_array<'i, E: Emitter>(
    input: &mut &'i str,
    opts: &Options,
    out: &mut E,
    logger: &mut Logger<'i>,
    depth: usize,
) -> JRResult<()> {
    if depth > MAX_DEPTH {
        return Err(too_deep(input, logger));
    }
    // assumes current starts with '['
    *input = &input[1..];
    out.emit_char('[')?;
    let mut idx = 0usize;
    loop {
        let before = input.len();
        skip_ws_and_comments(input, opts);
        let Some(&b) = input.as_bytes().first() else {
            logger.log(input, "closed unterminated array");
            break;
        };
        match b {
            b']' => {
                *input = &input[1..];
                break;
            }
            b'}' => {
                logger.log(input, "closed array at mismatched brace");
                break;
            }
            b',' | b':' => {
                *input = &input[1..];
                continue;
            }
            _ => {}
        }

        logger.push_index(idx);
        let prefix = if idx == 0 { "" } else { "," };
        let produced = parse_value_with_prefix(input, opts, out, logger, depth, prefix)?;
        logger.pop_path();
        if produced {
            idx += 1;
        }
        if input.len() == before {
            skip_one_char(input, logger);
        }
    }
    out.emit_char(']')
}
