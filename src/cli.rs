use crate::{
    IdeaValidator, Options, SessionOptions, StoryIdea, StreamSession, SystemClock,
    TransportEvent, format_numbered, repair_to_value,
};
use crate::session::SessionUpdate;
use serde::Serialize;
use std::env;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::time::Duration;

fn print_help(program: &str) {
    eprintln!(
        "Usage: {prog} [OPTIONS] [INPUT]\n\
         \n\
         INPUT: optional input file. When omitted, reads from stdin.\n\
         \n\
         Options:\n\
           -o, --output FILE     Write output to FILE (default stdout)\n\
               --indent N        Pretty-print with N spaces (0 = compact, default 2)\n\
               --ensure-ascii    Escape non-ASCII as \\uXXXX\n\
               --ideas           Replay input as a stream and print the validated ideas\n\
               --numbered        With --ideas, print a numbered listing instead of JSON\n\
               --chunk-size N    Delta size in chars for --ideas (default 16)\n\
               --no-fence        Disable fenced code block stripping\n\
           -h, --help            Show this help\n",
        prog = program
    );
}

struct CliMode {
    input: Option<String>,
    output: Option<String>,
    indent: usize,
    ensure_ascii: bool,
    ideas: bool,
    numbered: bool,
    chunk_size: usize,
}

fn usage_error(msg: &str) -> ! {
    eprintln!("{}", msg);
    std::process::exit(2);
}

fn parse_count(v: Option<&String>, flag: &str) -> usize {
    match v.map(|s| s.parse::<usize>()) {
        Some(Ok(n)) => n,
        Some(Err(_)) => usage_error(&format!("Invalid number for {}", flag)),
        None => usage_error(&format!("Missing N for {}", flag)),
    }
}

fn parse_args() -> (Options, CliMode) {
    let mut args: Vec<String> = env::args().collect();
    let program = args
        .first()
        .cloned()
        .unwrap_or_else(|| "ideastream".to_string());
    if !args.is_empty() {
        args.remove(0);
    }

    let mut opts = Options::default();
    let mut mode = CliMode {
        input: None,
        output: None,
        indent: 2,
        ensure_ascii: false,
        ideas: false,
        numbered: false,
        chunk_size: 16,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help(&program);
                std::process::exit(0);
            }
            "-o" | "--output" => {
                i += 1;
                match args.get(i) {
                    Some(f) => mode.output = Some(f.clone()),
                    None => usage_error("Missing FILE for --output"),
                }
            }
            "--indent" => {
                i += 1;
                mode.indent = parse_count(args.get(i), "--indent");
            }
            "--ensure-ascii" => {
                mode.ensure_ascii = true;
            }
            "--ideas" => {
                mode.ideas = true;
            }
            "--numbered" => {
                mode.numbered = true;
            }
            "--chunk-size" => {
                i += 1;
                mode.chunk_size = parse_count(args.get(i), "--chunk-size").max(1);
            }
            "--no-fence" => {
                opts.fenced_code_blocks = false;
            }
            s if s.starts_with('-') && s.len() > 1 => {
                usage_error(&format!("Unknown option: {}", s));
            }
            path => {
                mode.input = Some(path.to_string());
            }
        }
        i += 1;
    }

    if mode.numbered && !mode.ideas {
        usage_error("--numbered requires --ideas");
    }
    (opts, mode)
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (opts, mode) = parse_args();

    let content = match &mode.input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut s = String::new();
            io::stdin().read_to_string(&mut s)?;
            s
        }
    };

    let mut out_writer: Box<dyn Write> = if let Some(ref o) = mode.output {
        Box::new(BufWriter::new(File::create(o)?))
    } else {
        Box::new(BufWriter::new(io::stdout()))
    };

    if mode.ideas {
        let ideas = replay(&content, opts, mode.chunk_size);
        if mode.numbered {
            write_text(&mut out_writer, &format_numbered(&ideas), false)?;
        } else {
            write_text(&mut out_writer, &to_json(&ideas, mode.indent)?, mode.ensure_ascii)?;
        }
    } else {
        let v = repair_to_value(&content, &opts)?;
        write_text(&mut out_writer, &to_json(&v, mode.indent)?, mode.ensure_ascii)?;
    }
    out_writer.flush()?;
    Ok(())
}

/// Feed `content` through a stream session in `chunk` sized deltas, the way a
/// transport would deliver it, and return the final validated ideas.
fn replay(content: &str, opts: Options, chunk: usize) -> Vec<StoryIdea> {
    let session_opts = SessionOptions {
        parse: opts,
        debounce: Duration::ZERO,
    };
    let mut session = StreamSession::new(IdeaValidator, SystemClock, session_opts);
    let chars: Vec<char> = content.chars().collect();
    for piece in chars.chunks(chunk) {
        let delta: String = piece.iter().collect();
        if let Some(SessionUpdate::Items(e)) = session.handle(TransportEvent::TextDelta(delta)) {
            tracing::debug!(count = e.items.len(), "ideas updated");
        }
    }
    match session.handle(TransportEvent::Complete) {
        Some(SessionUpdate::Items(e)) => e.items,
        _ => session.last_emitted().to_vec(),
    }
}

fn to_json<T: Serialize>(value: &T, indent: usize) -> Result<String, serde_json::Error> {
    if indent == 0 {
        return serde_json::to_string(value);
    }
    let pad = vec![b' '; indent];
    let mut buf = Vec::new();
    let fmt = serde_json::ser::PrettyFormatter::with_indent(&pad);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, fmt);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn write_text(w: &mut dyn Write, text: &str, ensure_ascii: bool) -> io::Result<()> {
    if ensure_ascii {
        w.write_all(escape_non_ascii(text).as_bytes())?;
    } else {
        w.write_all(text.as_bytes())?;
    }
    w.write_all(b"\n")
}

/// Replace every non-ASCII char with `\uXXXX`, using surrogate pairs above the
/// BMP. Only valid inside JSON strings, which is the only place serde_json
/// puts non-ASCII text.
pub fn escape_non_ascii(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut units = [0u16; 2];
    for ch in s.chars() {
        if ch.is_ascii() {
            out.push(ch);
            continue;
        }
        for u in ch.encode_utf16(&mut units) {
            out.push_str(&format!("\\u{:04x}", u));
        }
    }
    out
}
