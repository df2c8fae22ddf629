//! word2vec model readers (binary and text formats).
//!
//! Both readers stream rows to a visitor so the caller can filter and convert
//! without holding the full f32 model in memory.

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;

use super::error::{VectorIndexError, VectorIndexResult};

/// On-disk model format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorFormat {
    /// `"<count> <dim>\n"` header, then `word<space><dim × f32 LE>` rows.
    Binary,
    /// One `word v1 v2 ...` row per line, optional `"<count> <dim>"` header.
    Text,
}

impl VectorFormat {
    /// `.bin` files are binary, everything else is read as text.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("bin") => Self::Binary,
            _ => Self::Text,
        }
    }
}

/// Reads every row of the model at `path`, calling `visit(key, vector)` per row.
///
/// Returns the model dimension (0 for a model without rows).
pub fn read_vectors<F>(path: &Path, format: VectorFormat, visit: F) -> VectorIndexResult<usize>
where
    F: FnMut(&str, &[f32]) -> VectorIndexResult<()>,
{
    let io_err = |source| VectorIndexError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_err)?;
    // SAFETY: The mapping is read-only and dropped before this function returns.
    // The caller must ensure no concurrent writers modify the model file.
    let mmap = unsafe { Mmap::map(&file) }.map_err(io_err)?;

    match format {
        VectorFormat::Binary => parse_binary(path, &mmap, visit),
        VectorFormat::Text => parse_text(path, &mmap, visit),
    }
}

fn invalid(path: &Path, reason: impl Into<String>) -> VectorIndexError {
    VectorIndexError::InvalidFormat {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

fn parse_header(line: &str) -> Option<(usize, usize)> {
    let mut parts = line.split_whitespace();
    let count = parts.next()?.parse().ok()?;
    let dim = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((count, dim))
}

pub(crate) fn parse_binary<F>(path: &Path, bytes: &[u8], mut visit: F) -> VectorIndexResult<usize>
where
    F: FnMut(&str, &[f32]) -> VectorIndexResult<()>,
{
    let header_end = bytes
        .iter()
        .position(|&b| b == b'\n')
        .ok_or_else(|| invalid(path, "missing header line"))?;
    let header = std::str::from_utf8(&bytes[..header_end])
        .map_err(|_| invalid(path, "header is not UTF-8"))?;
    let (count, dim) =
        parse_header(header).ok_or_else(|| invalid(path, format!("bad header '{header}'")))?;
    if dim == 0 {
        return Err(invalid(path, "dimension must be positive"));
    }

    let row_bytes = dim * 4;
    let mut values = vec![0f32; dim];
    let mut pos = header_end + 1;

    for row in 0..count {
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        let word_end = bytes[pos..]
            .iter()
            .position(|&b| b == b' ')
            .map(|offset| pos + offset)
            .ok_or_else(|| invalid(path, format!("truncated word at row {row}")))?;
        let word = String::from_utf8_lossy(&bytes[pos..word_end]);
        pos = word_end + 1;

        if pos + row_bytes > bytes.len() {
            return Err(invalid(path, format!("truncated vector at row {row}")));
        }
        for (slot, chunk) in values
            .iter_mut()
            .zip(bytes[pos..pos + row_bytes].chunks_exact(4))
        {
            *slot = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        pos += row_bytes;

        visit(&word, &values)?;
    }

    Ok(dim)
}

pub(crate) fn parse_text<F>(path: &Path, bytes: &[u8], mut visit: F) -> VectorIndexResult<usize>
where
    F: FnMut(&str, &[f32]) -> VectorIndexResult<()>,
{
    let text = std::str::from_utf8(bytes).map_err(|_| invalid(path, "model is not UTF-8"))?;

    let mut dim: Option<usize> = None;
    let mut values = Vec::new();
    let mut first = true;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if std::mem::take(&mut first)
            && let Some((_, header_dim)) = parse_header(line)
        {
            dim = Some(header_dim);
            continue;
        }

        let mut parts = line.split_whitespace();
        let Some(word) = parts.next() else {
            continue;
        };

        values.clear();
        for part in parts {
            let value: f32 = part
                .parse()
                .map_err(|_| invalid(path, format!("bad component '{part}' for '{word}'")))?;
            values.push(value);
        }

        let expected = *dim.get_or_insert(values.len());
        if values.len() != expected || expected == 0 {
            return Err(VectorIndexError::InvalidDimension {
                word: word.to_string(),
                expected,
                actual: values.len(),
            });
        }

        visit(word, &values)?;
    }

    Ok(dim.unwrap_or(0))
}
