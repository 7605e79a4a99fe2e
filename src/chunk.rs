//! Overlapping fixed-size text windows.
//!
//! Window size and overlap are measured in characters. Windows whose trimmed
//! text is shorter than [`MIN_CHUNK_CHARS`] are dropped.

/// Smallest window size accepted by [`chunk_text`].
pub const MIN_CHUNK_SIZE: usize = 100;

/// Trimmed windows shorter than this are dropped.
pub const MIN_CHUNK_CHARS: usize = 20;

pub const DEFAULT_CHUNK_SIZE: usize = 1200;
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;
pub const DEFAULT_MAX_CHUNKS: usize = 10;

/// Split `text` into at most `max_chunks` overlapping windows.
///
/// `chunk_size` is raised to [`MIN_CHUNK_SIZE`] (zero means
/// [`DEFAULT_CHUNK_SIZE`]) and `overlap` is clamped below the size, so the
/// step between window starts is always at least one character.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize, max_chunks: usize) -> Vec<String> {
    let size = if chunk_size == 0 {
        DEFAULT_CHUNK_SIZE
    } else {
        chunk_size.max(MIN_CHUNK_SIZE)
    };
    window_chunks(text, size, overlap, max_chunks)
}

/// Windowing without the size floor.
fn window_chunks(text: &str, size: usize, overlap: usize, max_chunks: usize) -> Vec<String> {
    if text.is_empty() || size == 0 {
        return Vec::new();
    }

    let overlap = overlap.min(size - 1);
    let step = size - overlap;
    let chars: Vec<char> = text.chars().collect();
    let mut chunks = Vec::new();

    let mut start = 0;
    while start < chars.len() && chunks.len() < max_chunks {
        let end = (start + size).min(chars.len());
        let window: String = chars[start..end].iter().collect();
        let trimmed = window.trim();
        if trimmed.chars().count() >= MIN_CHUNK_CHARS {
            chunks.push(trimmed.to_string());
        }
        start += step;
    }

    chunks
}
