use serde::Serialize;

use crate::stats::percentage;
use crate::types::{ColumnSource, Dataset, Record};

/// Missing-value count for one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    /// Column index (0-based)
    pub index: usize,
    pub missing: u64,
    pub percent: f64,
}

/// Columns with at least one null, in source column order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingProfile {
    pub total_rows: u64,
    pub columns: Vec<ColumnProfile>,
}

pub fn profile_missing(dataset: &Dataset) -> MissingProfile {
    let total_rows = dataset.row_count() as u64;

    let columns = dataset
        .columns()
        .iter()
        .enumerate()
        .filter_map(|(index, column)| {
            let missing = dataset
                .records()
                .iter()
                .filter(|r| is_null(r, column.source))
                .count() as u64;
            (missing > 0).then(|| ColumnProfile {
                name: column.name.clone(),
                index,
                missing,
                percent: percentage(missing, total_rows),
            })
        })
        .collect();

    MissingProfile {
        total_rows,
        columns,
    }
}

fn is_null(record: &Record, source: ColumnSource) -> bool {
    match source {
        ColumnSource::Field(field) => record.is_null(field),
        ColumnSource::Extra(idx) => record.extra.get(idx).map_or(true, Option::is_none),
    }
}
