use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};

use crate::types::Dataset;

/// Calendar month key, ordered chronologically
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthBucket {
    pub year: i32,
    pub month: u32,
}

impl MonthBucket {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl fmt::Display for MonthBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthCount {
    pub month: MonthBucket,
    pub count: u64,
}

/// Suggestions per month between the first and last dated month.
/// Interior months without records appear with a zero count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    pub months: Vec<MonthCount>,
    /// Busiest month; the earliest one on ties
    pub peak: Option<MonthCount>,
    pub dated: u64,
    /// Records whose date was missing or could not be parsed
    pub undated: u64,
}

pub fn aggregate_timeline(dataset: &Dataset) -> Timeline {
    let mut counts: BTreeMap<MonthBucket, u64> = BTreeMap::new();
    for date in dataset.records().iter().filter_map(|r| r.date) {
        *counts.entry(MonthBucket::from_date(date)).or_insert(0) += 1;
    }

    let dated: u64 = counts.values().sum();
    let undated = dataset.row_count() as u64 - dated;

    let months = fill_months(&counts);
    let peak = months
        .iter()
        .fold(None::<MonthCount>, |best, &m| match best {
            Some(b) if b.count >= m.count => Some(b),
            _ => Some(m),
        });

    Timeline {
        months,
        peak,
        dated,
        undated,
    }
}

fn fill_months(counts: &BTreeMap<MonthBucket, u64>) -> Vec<MonthCount> {
    let (Some((&first, _)), Some((&last, _))) =
        (counts.first_key_value(), counts.last_key_value())
    else {
        return Vec::new();
    };

    let mut months = Vec::new();
    let mut current = first;
    while current <= last {
        months.push(MonthCount {
            month: current,
            count: counts.get(&current).copied().unwrap_or(0),
        });
        current = current.next();
    }
    months
}
