//! `pagefetch chunk` handler.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};

use pagefetch::chunk::chunk_text;

/// Chunk a file (or stdin) and print the chunks as a JSON array.
pub(crate) fn cmd_chunk(
    file: Option<PathBuf>,
    size: usize,
    overlap: usize,
    max_chunks: usize,
) -> Result<()> {
    let text = match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let chunks = chunk_text(&text, size, overlap, max_chunks);
    println!("{}", serde_json::to_string_pretty(&chunks)?);
    Ok(())
}
