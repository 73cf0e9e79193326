pub mod csv;

use std::path::Path;

use encoding_rs::Encoding;
use tracing::{info, warn};

use crate::error::LoadError;
use crate::types::{Dataset, DEFAULT_DELIMITER, DEFAULT_ENCODING};

/// How the source table is laid out on disk
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    pub delimiter: u8,
    pub encoding: &'static Encoding,
}

impl LoadOptions {
    pub fn new(delimiter: &str, encoding_label: &str) -> Result<Self, LoadError> {
        Ok(Self {
            delimiter: parse_delimiter(delimiter)?,
            encoding: resolve_encoding(encoding_label)?,
        })
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            encoding: encoding_rs::WINDOWS_1252,
        }
    }
}

/// Load the table at `path`, reporting its shape
pub fn load_dataset(path: &Path, options: LoadOptions) -> Result<Dataset, LoadError> {
    if !path.is_file() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let dataset = csv::CsvReader::new(path, options).read()?;
    info!(
        rows = dataset.row_count(),
        columns = dataset.column_count(),
        encoding = options.encoding.name(),
        "dataset loaded"
    );

    let failures: u64 = dataset.parse_failures().values().sum();
    if failures > 0 {
        warn!(
            failures,
            detail = ?dataset.parse_failures(),
            "values that could not be converted were treated as missing"
        );
    }

    Ok(dataset)
}

fn parse_delimiter(value: &str) -> Result<u8, LoadError> {
    match value {
        "\\t" | "\t" => Ok(b'\t'),
        v if v.len() == 1 => Ok(v.as_bytes()[0]),
        other => Err(LoadError::InvalidDelimiter(other.to_string())),
    }
}

/// WHATWG labels, also accepting hyphenated spellings such as `latin-1`
fn resolve_encoding(label: &str) -> Result<&'static Encoding, LoadError> {
    let label = if label.is_empty() { DEFAULT_ENCODING } else { label };
    Encoding::for_label(label.as_bytes())
        .or_else(|| Encoding::for_label(label.replace('-', "").as_bytes()))
        .ok_or_else(|| LoadError::UnknownEncoding(label.to_string()))
}
