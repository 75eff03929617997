use crate::error::{ProcessingError, Result};
use crate::utils::constants::DEFAULT_BUFFER_SIZE;
use csv::{ReaderBuilder, StringRecord, Trim};
use encoding_rs::WINDOWS_1252;
use memmap2::Mmap;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Loads a delimited file into memory as text.
///
/// Input that is not valid UTF-8 is decoded as Windows-1252, which is how
/// the public wildfire extracts encode accented county names.
pub struct CsvSource {
    use_mmap: bool,
}

impl CsvSource {
    pub fn new() -> Self {
        Self { use_mmap: false }
    }

    pub fn with_mmap(use_mmap: bool) -> Self {
        Self { use_mmap }
    }

    /// Read the whole file and decode it
    pub fn load_text(&self, path: &Path) -> Result<String> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();

        // Zero-length files cannot be mapped
        if self.use_mmap && len > 0 {
            let mmap = unsafe { Mmap::map(&file)? };
            Ok(decode(&mmap))
        } else {
            let mut bytes = Vec::with_capacity(len as usize);
            BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file).read_to_end(&mut bytes)?;
            Ok(decode(&bytes))
        }
    }

    /// Build a header-aware CSV reader over decoded text
    pub fn reader<'a>(&self, text: &'a str) -> csv::Reader<&'a [u8]> {
        ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(text.as_bytes())
    }
}

impl Default for CsvSource {
    fn default() -> Self {
        Self::new()
    }
}

fn decode(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.strip_prefix('\u{feff}').unwrap_or(text).to_string(),
        Err(_) => {
            let (text, _, _) = WINDOWS_1252.decode(bytes);
            text.into_owned()
        }
    }
}

/// Header name to column position, resolved once per file
#[derive(Debug, Clone)]
pub struct ColumnIndex {
    source_name: String,
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    pub fn from_headers(source_name: &str, headers: &StringRecord) -> Self {
        let mut positions = HashMap::with_capacity(headers.len());
        for (position, name) in headers.iter().enumerate() {
            // First occurrence wins for duplicated headers
            positions.entry(name.to_string()).or_insert(position);
        }

        Self {
            source_name: source_name.to_string(),
            positions,
        }
    }

    /// Position of a column the computation cannot proceed without
    pub fn require(&self, column: &str) -> Result<usize> {
        self.positions
            .get(column)
            .copied()
            .ok_or_else(|| ProcessingError::MissingColumn {
                source_name: self.source_name.clone(),
                column: column.to_string(),
            })
    }

    pub fn optional(&self, column: &str) -> Option<usize> {
        self.positions.get(column).copied()
    }
}

/// Cell text, with empty and absent cells as `None`
pub fn cell(record: &StringRecord, position: usize) -> Option<String> {
    record
        .get(position)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Like [`cell`] for optional columns
pub fn optional_cell(record: &StringRecord, position: Option<usize>) -> Option<String> {
    position.and_then(|p| cell(record, p))
}
