//! Readers for the original word2vec file formats.
//!
//! Both formats start with a `"<vocab size> <dimension>"` header line. The
//! binary format then stores each record as the word, a space, and
//! `dimension` little-endian `f32`s, optionally followed by a newline. The
//! text format stores one `word v1 v2 ...` record per line. Files ending in
//! `.gz` are decompressed on the fly.

use crate::error::ModelLoadError;
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

/// On-disk layout of a word2vec model file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModelFormat {
    #[default]
    Binary,
    Text,
}

impl ModelFormat {
    pub fn from_binary_flag(binary: bool) -> Self {
        if binary { Self::Binary } else { Self::Text }
    }
}

/// Vocabulary in file order plus the row-major vector matrix.
#[derive(Debug)]
pub(super) struct RawModel {
    pub words: Vec<String>,
    pub vectors: Vec<f32>,
    pub dimension: usize,
}

pub(super) fn open(path: &Path) -> Result<Box<dyn BufRead>, ModelLoadError> {
    let file = File::open(path).map_err(|source| ModelLoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(reader))))
    } else {
        Ok(Box::new(reader))
    }
}

pub(super) fn read<R: BufRead>(reader: R, format: ModelFormat) -> Result<RawModel, ModelLoadError> {
    match format {
        ModelFormat::Binary => read_binary(reader),
        ModelFormat::Text => read_text(reader),
    }
}

fn read_header<R: BufRead>(reader: &mut R) -> Result<(usize, usize), ModelLoadError> {
    let mut line = String::new();
    reader.read_line(&mut line)?;

    let mut fields = line.split_ascii_whitespace();
    let (Some(count), Some(dimension), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(ModelLoadError::Header(format!(
            "expected '<vocab size> <dimension>', got {:?}",
            line.trim_end()
        )));
    };

    let count = count
        .parse::<usize>()
        .map_err(|e| ModelLoadError::Header(format!("vocabulary size {count:?}: {e}")))?;
    let dimension = dimension
        .parse::<usize>()
        .map_err(|e| ModelLoadError::Header(format!("dimension {dimension:?}: {e}")))?;
    if dimension == 0 {
        return Err(ModelLoadError::Header("dimension must be positive".to_string()));
    }

    Ok((count, dimension))
}

fn allocate(count: usize, dimension: usize) -> Result<Vec<f32>, ModelLoadError> {
    let total = count
        .checked_mul(dimension)
        .ok_or_else(|| ModelLoadError::Header(format!("{count}x{dimension} matrix overflows")))?;

    let mut vectors = Vec::new();
    vectors.try_reserve_exact(total).map_err(|e| {
        ModelLoadError::Header(format!("cannot allocate {count}x{dimension} matrix: {e}"))
    })?;
    Ok(vectors)
}

fn record_error(index: usize, reason: impl Into<String>) -> ModelLoadError {
    ModelLoadError::Record {
        index,
        reason: reason.into(),
    }
}

fn read_binary<R: BufRead>(mut reader: R) -> Result<RawModel, ModelLoadError> {
    let (count, dimension) = read_header(&mut reader)?;
    let mut words = Vec::with_capacity(count.min(1 << 20));
    let mut vectors = allocate(count, dimension)?;

    let mut word = Vec::new();
    let mut raw = vec![0u8; dimension * size_of::<f32>()];

    for index in 0..count {
        word.clear();
        reader.read_until(b' ', &mut word)?;
        if word.pop() != Some(b' ') {
            return Err(record_error(index, "unexpected end of file"));
        }

        // the C tool terminates each vector with a newline
        let start = word.iter().position(|b| *b != b'\n').unwrap_or(word.len());
        let text = std::str::from_utf8(&word[start..])
            .map_err(|e| record_error(index, format!("word is not valid UTF-8: {e}")))?;
        if text.is_empty() {
            return Err(record_error(index, "empty word"));
        }

        reader.read_exact(&mut raw).map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => record_error(index, "truncated vector"),
            _ => ModelLoadError::Read(e),
        })?;
        vectors.extend(
            raw.chunks_exact(size_of::<f32>())
                .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]])),
        );
        words.push(text.to_owned());
    }

    Ok(RawModel {
        words,
        vectors,
        dimension,
    })
}

fn read_text<R: BufRead>(mut reader: R) -> Result<RawModel, ModelLoadError> {
    let (count, dimension) = read_header(&mut reader)?;
    let mut words = Vec::with_capacity(count.min(1 << 20));
    let mut vectors = allocate(count, dimension)?;

    let mut line = String::new();
    while words.len() < count {
        let index = words.len();
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(record_error(index, "unexpected end of file"));
        }

        let mut fields = line.split_ascii_whitespace();
        let Some(word) = fields.next() else {
            continue;
        };

        let before = vectors.len();
        for field in fields {
            let component = field
                .parse::<f32>()
                .map_err(|e| record_error(index, format!("component {field:?}: {e}")))?;
            vectors.push(component);
        }
        let found = vectors.len() - before;
        if found != dimension {
            return Err(record_error(
                index,
                format!("expected {dimension} components, got {found}"),
            ));
        }

        words.push(word.to_owned());
    }

    Ok(RawModel {
        words,
        vectors,
        dimension,
    })
}
