use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{Reader, ReaderBuilder, StringRecord};
use encoding_rs_io::{DecodeReaderBytes, DecodeReaderBytesBuilder};
use tracing::debug;

use crate::error::LoadError;
use crate::parse::{normalize_cell, parse_age_bracket_cell, parse_date_cell};
use crate::types::{Column, ColumnSource, Dataset, Field, Record};

use super::LoadOptions;

/// Delimited text reader that transcodes the source to UTF-8 before parsing
pub struct CsvReader {
    path: PathBuf,
    options: LoadOptions,
}

impl CsvReader {
    pub fn new(path: &Path, options: LoadOptions) -> Self {
        Self {
            path: path.to_path_buf(),
            options,
        }
    }

    fn create_reader(&self) -> Result<Reader<DecodeReaderBytes<File, Vec<u8>>>, LoadError> {
        let file = File::open(&self.path).map_err(|source| LoadError::Unreadable {
            path: self.path.clone(),
            source,
        })?;
        let transcoded = DecodeReaderBytesBuilder::new()
            .encoding(Some(self.options.encoding))
            .build(file);
        let csv_reader = ReaderBuilder::new()
            .delimiter(self.options.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(transcoded);
        Ok(csv_reader)
    }

    pub fn read(&self) -> Result<Dataset, LoadError> {
        let mut reader = self.create_reader()?;

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let columns = map_columns(&headers)?;
        let num_cols = columns.len();
        let extra_count = columns
            .iter()
            .filter(|c| matches!(c.source, ColumnSource::Extra(_)))
            .count();

        let mut records = Vec::new();
        let mut parse_failures: BTreeMap<Field, u64> = BTreeMap::new();

        for result in reader.records() {
            let row = result?;
            let line = row.position().map_or(0, |p| p.line());

            if row.len() > num_cols {
                return Err(LoadError::Malformed(format!(
                    "line {}: expected {} fields, found {}",
                    line,
                    num_cols,
                    row.len()
                )));
            }

            let record = build_record(&row, &columns, extra_count, |field, raw| {
                debug!(
                    line,
                    column = field.column_name(),
                    value = raw,
                    "unparseable value treated as missing"
                );
                *parse_failures.entry(field).or_insert(0) += 1;
            });
            records.push(record);
        }

        let source_name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        Ok(Dataset::new(source_name, columns, records, parse_failures))
    }
}

/// Resolve each header to a typed field or an untyped extra slot.
/// A repeated header name only binds its first occurrence to the field.
fn map_columns(headers: &[String]) -> Result<Vec<Column>, LoadError> {
    let mut columns = Vec::with_capacity(headers.len());
    let mut bound: Vec<Field> = Vec::new();
    let mut extra_idx = 0;

    for header in headers {
        let field = Field::ALL
            .into_iter()
            .find(|f| f.column_name() == header.as_str() && !bound.contains(f));

        let source = match field {
            Some(f) => {
                bound.push(f);
                ColumnSource::Field(f)
            }
            None => {
                extra_idx += 1;
                ColumnSource::Extra(extra_idx - 1)
            }
        };
        columns.push(Column {
            name: header.clone(),
            source,
        });
    }

    if let Some(missing) = Field::ALL.into_iter().find(|f| !bound.contains(f)) {
        return Err(LoadError::MissingColumn(missing.column_name()));
    }

    Ok(columns)
}

fn build_record<F>(
    row: &StringRecord,
    columns: &[Column],
    extra_count: usize,
    mut on_invalid: F,
) -> Record
where
    F: FnMut(Field, &str),
{
    let mut record = Record {
        extra: Vec::with_capacity(extra_count),
        ..Record::default()
    };

    for (col_idx, column) in columns.iter().enumerate() {
        let value = row.get(col_idx).and_then(normalize_cell);

        let field = match column.source {
            ColumnSource::Extra(_) => {
                record.extra.push(value);
                continue;
            }
            ColumnSource::Field(field) => field,
        };

        match field {
            Field::Sex => record.sex = value,
            Field::Education => record.education = value,
            Field::MaritalStatus => record.marital_status = value,
            Field::Region => record.region = value,
            Field::Text => record.text = value,
            Field::AgeBracket => {
                let parsed = parse_age_bracket_cell(value.as_deref());
                if parsed.is_invalid() {
                    on_invalid(field, value.as_deref().unwrap_or_default());
                }
                record.age_bracket = parsed.into_option();
            }
            Field::Date => {
                let parsed = parse_date_cell(value.as_deref());
                if parsed.is_invalid() {
                    on_invalid(field, value.as_deref().unwrap_or_default());
                }
                record.date = parsed.into_option();
            }
        }
    }

    record
}
