use serde::Serialize;

use crate::stats::{percentage, FrequencyCounter, FrequencyEntry, FrequencyTable};
use crate::types::{Dataset, Field};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionShare {
    pub region: String,
    pub count: u64,
    /// Share of all records, not just of the listed regions
    pub percent: f64,
}

/// Records per region code, most engaged first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionRanking {
    pub total: u64,
    /// Every region; ties keep first-seen order
    pub regions: FrequencyTable,
    pub highlights: Vec<RegionShare>,
}

impl RegionRanking {
    pub fn top(&self, k: usize) -> &[FrequencyEntry] {
        self.regions.top(k)
    }

    pub fn most_engaged(&self) -> Option<&FrequencyEntry> {
        self.regions.first()
    }
}

/// Count records per region and keep the first `highlight_top` with their shares
pub fn aggregate_regions(dataset: &Dataset, highlight_top: usize) -> RegionRanking {
    let total = dataset.row_count() as u64;
    let regions = dataset
        .records()
        .iter()
        .map(|r| r.category(Field::Region))
        .collect::<FrequencyCounter>()
        .ranked();

    let highlights = regions
        .top(highlight_top)
        .iter()
        .map(|e| RegionShare {
            region: e.label.clone(),
            count: e.count,
            percent: percentage(e.count, total),
        })
        .collect();

    RegionRanking {
        total,
        regions,
        highlights,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Column, ColumnSource, Record, NOT_INFORMED};
    use std::collections::BTreeMap;

    fn dataset(regions: &[Option<&str>]) -> Dataset {
        let columns = Field::ALL
            .into_iter()
            .map(|f| Column {
                name: f.column_name().to_string(),
                source: ColumnSource::Field(f),
            })
            .collect();
        let records = regions
            .iter()
            .map(|r| Record {
                region: r.map(str::to_string),
                ..Record::default()
            })
            .collect();
        Dataset::new("t.csv".to_string(), columns, records, BTreeMap::new())
    }

    #[test]
    fn test_ranked_descending_with_stable_ties() {
        let data = dataset(&[
            Some("MG"),
            Some("SP"),
            Some("RS"),
            Some("SP"),
            None,
            Some("RS"),
            Some("SP"),
        ]);
        let ranking = aggregate_regions(&data, 5);

        assert_eq!(
            ranking.regions.labels(),
            vec!["SP", "RS", "MG", NOT_INFORMED]
        );
        assert_eq!(ranking.regions.counts(), vec![3, 2, 1, 1]);
        assert_eq!(ranking.most_engaged().map(|e| e.label.as_str()), Some("SP"));
    }

    #[test]
    fn test_top_is_a_prefix_of_the_ranking() {
        let codes = [
            "AC", "AL", "AP", "AM", "BA", "CE", "DF", "ES", "GO", "MA", "MT", "MS",
        ];
        let mut regions: Vec<Option<&str>> = codes.iter().map(|c| Some(*c)).collect();
        regions.push(Some("BA"));
        regions.push(Some("MS"));
        let ranking = aggregate_regions(&dataset(&regions), 5);

        let top = ranking.top(10);
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].label, "BA");
        assert_eq!(top[1].label, "MS");
        assert_eq!(top[2].label, "AC");
        assert!(top.windows(2).all(|w| w[0].count >= w[1].count));
        assert_eq!(ranking.regions.total(), 14);
    }

    #[test]
    fn test_highlights_use_share_of_all_records() {
        let data = dataset(&[Some("SP"), Some("SP"), Some("RJ"), None]);
        let ranking = aggregate_regions(&data, 1);

        assert_eq!(ranking.highlights.len(), 1);
        assert_eq!(ranking.highlights[0].region, "SP");
        assert_eq!(ranking.highlights[0].count, 2);
        assert!((ranking.highlights[0].percent - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_dataset() {
        let ranking = aggregate_regions(&dataset(&[]), 5);
        assert!(ranking.regions.is_empty());
        assert!(ranking.highlights.is_empty());
        assert!(ranking.most_engaged().is_none());
    }
}
