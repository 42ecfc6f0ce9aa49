//! Word file reader.
//!
//! A word file is a little-endian `u16` word count followed by that many
//! big-endian `u16` words. Yes, the two halves disagree on byte order. Any
//! bytes after the declared words are ignored.

use crate::error::LoadError;
use log::info;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// read a word file from disk
pub fn load_file(path: &Path) -> Result<Vec<u16>, LoadError> {
    let mut f = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let words = load_words(&mut f).map_err(|source| LoadError::Invalid {
        path: path.to_path_buf(),
        source: Box::new(source),
    })?;
    info!("Read {} words from {}", words.len(), path.display());
    Ok(words)
}

/// read a word file from any byte source
pub fn load_words(reader: &mut impl Read) -> Result<Vec<u16>, LoadError> {
    let mut header = Vec::with_capacity(2);
    reader.by_ref().take(2).read_to_end(&mut header)?;
    if header.len() != 2 {
        return Err(LoadError::MissingHeader {
            actual: header.len(),
        });
    }
    let count = u16::from_le_bytes([header[0], header[1]]) as usize;

    let expected = count * 2;
    let mut payload = Vec::with_capacity(expected);
    reader
        .by_ref()
        .take(expected as u64)
        .read_to_end(&mut payload)?;
    if payload.len() != expected {
        return Err(LoadError::Truncated {
            expected,
            actual: payload.len(),
        });
    }

    Ok(payload
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect())
}

/// load the rom if one was asked for; no path means an empty rom
pub fn load_optional(path: Option<&Path>) -> Result<Vec<u16>, LoadError> {
    match path {
        Some(p) => load_file(p),
        None => Ok(Vec::new()),
    }
}
