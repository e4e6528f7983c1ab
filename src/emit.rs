use crate::error::{RepairError, RepairErrorKind};
use std::io::Write;

pub type JRResult<T> = Result<T, RepairError>;

/// Sink for repaired JSON text.
pub trait Emitter {
    fn emit_str(&mut self, s: &str) -> JRResult<()>;
    fn emit_char(&mut self, c: char) -> JRResult<()> {
        let mut buf = [0u8; 4];
        let s = c.encode_utf8(&mut buf);
        self.emit_str(s)
    }
}

pub struct StringEmitter<'a> {
    out: &'a mut String,
}

impl<'a> StringEmitter<'a> {
    pub fn new(out: &'a mut String) -> Self {
        Self { out }
    }
}

impl Emitter for StringEmitter<'_> {
    fn emit_str(&mut self, s: &str) -> JRResult<()> {
        self.out.push_str(s);
        Ok(())
    }
}

/// Buffers output and writes it to `w` in chunks of at least `flush_at` bytes.
pub struct WriterEmitter<'a, W: Write> {
    w: &'a mut W,
    buf: Vec<u8>,
    flush_at: usize,
}

impl<'a, W: Write> WriterEmitter<'a, W> {
    pub fn with_capacity(w: &'a mut W, cap: usize) -> Self {
        Self {
            w,
            buf: Vec::with_capacity(cap),
            flush_at: cap.max(1),
        }
    }

    pub fn flush_all(&mut self) -> JRResult<()> {
        if !self.buf.is_empty() {
            self.w.write_all(&self.buf).map_err(io_err)?;
            self.buf.clear();
        }
        self.w.flush().map_err(io_err)
    }
}

fn io_err(e: std::io::Error) -> RepairError {
    RepairError::new(RepairErrorKind::Parse(format!("io write error: {}", e)), 0)
}

impl<W: Write> Emitter for WriterEmitter<'_, W> {
    fn emit_str(&mut self, s: &str) -> JRResult<()> {
        self.buf.extend_from_slice(s.as_bytes());
        if self.buf.len() >= self.flush_at {
            self.w.write_all(&self.buf).map_err(io_err)?;
            self.buf.clear();
        }
        Ok(())
    }
}
