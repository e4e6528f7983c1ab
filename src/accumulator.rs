/// Everything received so far for one generation request.
///
/// Appends go through `String::push_str`, so a long stream of small deltas
/// costs amortized O(1) per delta rather than re-copying the buffer.
#[derive(Debug, Default, Clone)]
pub struct ChunkAccumulator {
    buf: String,
    deltas: usize,
    generation: u64,
}

impl ChunkAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start over for a new request. Bumps [`generation`](Self::generation) so
    /// anything derived from the old buffer can be recognized as stale.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.deltas = 0;
        self.generation += 1;
    }

    pub fn append(&mut self, delta: &str) {
        self.buf.push_str(delta);
        self.deltas += 1;
    }

    pub fn current_buffer(&self) -> &str {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Number of deltas appended since the last reset.
    pub fn deltas(&self) -> usize {
        self.deltas
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
