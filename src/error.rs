use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepairErrorKind {
    UnexpectedEnd,
    UnexpectedChar(char),
    /// No `[` or `{` anywhere in the input.
    NoJsonRoot,
    InvalidUnicodeEscape,
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} at position {position}", describe(.kind))]
pub struct RepairError {
    pub kind: RepairErrorKind,
    pub position: usize,
}

fn describe(kind: &RepairErrorKind) -> String {
    match kind {
        RepairErrorKind::UnexpectedEnd => "Unexpected end".to_string(),
        RepairErrorKind::UnexpectedChar(c) => format!("Unexpected character {:?}", c),
        RepairErrorKind::NoJsonRoot => "No JSON array or object found".to_string(),
        RepairErrorKind::InvalidUnicodeEscape => "Invalid unicode escape".to_string(),
        RepairErrorKind::Parse(msg) => msg.clone(),
    }
}

impl RepairError {
    pub fn new(kind: RepairErrorKind, position: usize) -> Self {
        Self { kind, position }
    }

    pub fn from_serde(what: &str, err: serde_json::Error) -> Self {
        let pos = err.column(); // coarse fallback
        Self {
            kind: RepairErrorKind::Parse(format!("serde_json {} error: {}", what, err)),
            position: pos,
        }
    }
}

/// Stream-level failures. These are the only conditions surfaced to a
/// consumer as hard errors; parse misses never are.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    #[error("generation stream failed: {0}")]
    Transport(String),
    #[error("generation stream cancelled")]
    Cancelled,
    #[error("generation stream already finished")]
    AlreadyFinished,
}
