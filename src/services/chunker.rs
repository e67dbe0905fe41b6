//! Sliding-window text chunking for embedding input.
//!
//! Windows are measured in characters (Unicode scalar values), so a chunk
//! boundary never splits a multi-byte code point.

/// Window size used by the original resume worker.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Characters shared between consecutive windows.
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

/// Validated chunking parameters. `overlap < chunk_size` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkerConfig {
    chunk_size: usize,
    overlap: usize,
}

impl ChunkerConfig {
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self, ChunkError> {
        if chunk_size == 0 {
            return Err(ChunkError::ZeroChunkSize);
        }
        if overlap >= chunk_size {
            return Err(ChunkError::OverlapTooLarge {
                chunk_size,
                overlap,
            });
        }
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Distance between the starts of consecutive chunks.
    pub fn step(&self) -> usize {
        self.chunk_size - self.overlap
    }
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

/// Split `text` into overlapping windows.
///
/// Chunk `k` starts at character `k * step` and holds up to `chunk_size`
/// characters. Windows keep being emitted while their start lies inside the
/// text, so the tail may be covered by more than one short chunk. Text no
/// longer than `chunk_size` yields exactly one chunk; empty text yields none.
pub fn chunk_text<'a>(text: &'a str, config: &ChunkerConfig) -> Vec<&'a str> {
    if text.is_empty() {
        return Vec::new();
    }

    // Byte offset of every character start, plus the end of the text.
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(text.len()))
        .collect();
    let char_count = boundaries.len() - 1;

    if char_count <= config.chunk_size {
        return vec![text];
    }

    let mut chunks = Vec::with_capacity(char_count / config.step() + 1);
    let mut start = 0;
    while start < char_count {
        let end = (start + config.chunk_size).min(char_count);
        chunks.push(&text[boundaries[start]..boundaries[end]]);
        start += config.step();
    }
    chunks
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChunkError {
    #[error("chunk size must be greater than zero")]
    ZeroChunkSize,

    #[error("overlap ({overlap}) must be smaller than chunk size ({chunk_size})")]
    OverlapTooLarge { chunk_size: usize, overlap: usize },
}
