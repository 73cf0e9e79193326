use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::aggregate::{
    aggregate_demographics, aggregate_regions, aggregate_timeline, aggregate_words,
    DemographicProfile, RegionRanking, Timeline, WordFrequencies,
};
use crate::profile::{profile_missing, MissingProfile};
use crate::report::{build_summary, Summary};
use crate::types::{AnalysisOptions, Dataset, Field, Result};

pub const REPORT_VERSION: &str = "1.0.0";

/// Where the analysed table came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceInfo {
    pub file_name: String,
    /// SHA-256 of the input bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_hash: Option<String>,
    pub rows: u64,
    pub columns: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub parse_failures: BTreeMap<Field, u64>,
}

/// Every aggregate computed for one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub version: String,
    pub source: SourceInfo,
    pub missing: MissingProfile,
    pub demographics: DemographicProfile,
    pub geography: RegionRanking,
    pub timeline: Timeline,
    pub content: WordFrequencies,
    pub summary: Summary,
    pub options: AnalysisOptions,
}

/// Profile and aggregate a loaded dataset
pub fn analyze(dataset: &Dataset, options: &AnalysisOptions) -> AnalysisReport {
    let missing = profile_missing(dataset);
    debug!(columns = missing.columns.len(), "missing-value profile built");

    let demographics = aggregate_demographics(dataset);
    let geography = aggregate_regions(dataset, options.region_highlight_top);
    let timeline = aggregate_timeline(dataset);
    let content = aggregate_words(dataset);
    info!(
        months = timeline.months.len(),
        regions = geography.regions.len(),
        words = content.words.len(),
        "aggregation complete"
    );

    let summary = build_summary(&demographics, &geography);

    AnalysisReport {
        version: REPORT_VERSION.to_string(),
        source: SourceInfo {
            file_name: dataset.source_name().to_string(),
            file_hash: None,
            rows: dataset.row_count() as u64,
            columns: dataset.columns().iter().map(|c| c.name.clone()).collect(),
            parse_failures: dataset.parse_failures().clone(),
        },
        missing,
        demographics,
        geography,
        timeline,
        content,
        summary,
        options: options.clone(),
    }
}

/// `analyze`, plus the SHA-256 of the source file
pub fn analyze_file(
    path: &Path,
    dataset: &Dataset,
    options: &AnalysisOptions,
) -> Result<AnalysisReport> {
    let mut report = analyze(dataset, options);
    report.source.file_hash = Some(compute_file_hash(path)?);
    Ok(report)
}

/// Compute SHA-256 hash of a file (streaming to handle large files)
fn compute_file_hash(path: &Path) -> Result<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readers::{load_dataset, LoadOptions};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample_file() -> NamedTempFile {
        let content = "SEXO;FAIXA ETÁRIA;INSTRUCAO;ESTADO CIVIL;UF;DATA;SUGESTAO.TEXTO\n\
                       MASCULINO;30 A 39 ANOS;SUPERIOR;CASADO;SP;02/04/1986;reforma agrária já\n\
                       FEMININO;30 A 39 ANOS;SUPERIOR;SOLTEIRO;SP;20/06/1986;mais escolas públicas\n\
                       NA;NA;NA;NA;RJ;data errada;NA\n";
        let (bytes, _, _) = encoding_rs::WINDOWS_1252.encode(content);
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        file.write_all(&bytes).unwrap();
        file
    }

    #[test]
    fn test_compute_file_hash() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "test content").unwrap();

        let hash = compute_file_hash(file.path()).unwrap();
        assert_eq!(hash.len(), 64);
    }

    #[test]
    fn test_analyze_file_end_to_end() {
        let file = sample_file();
        let dataset = load_dataset(file.path(), LoadOptions::default()).unwrap();
        let report = analyze_file(file.path(), &dataset, &AnalysisOptions::default()).unwrap();

        assert_eq!(report.source.rows, 3);
        assert_eq!(report.source.columns.len(), 7);
        assert!(report.source.file_hash.is_some());
        assert_eq!(report.source.parse_failures.get(&Field::Date), Some(&1));

        assert_eq!(report.summary.total, 3);
        assert_eq!(report.summary.most_engaged_region.as_deref(), Some("SP"));
        assert_eq!(
            report.summary.predominant_age_bracket.as_deref(),
            Some("30 A 39 ANOS")
        );

        let months: Vec<String> = report
            .timeline
            .months
            .iter()
            .map(|m| m.month.to_string())
            .collect();
        assert_eq!(months, vec!["1986-04", "1986-05", "1986-06"]);
        assert_eq!(report.timeline.undated, 1);

        let data_missing = report.missing.columns.iter().find(|c| c.name == "DATA").unwrap();
        assert_eq!(data_missing.missing, 1);
    }

    #[test]
    fn test_analyze_is_repeatable() {
        let file = sample_file();
        let dataset = load_dataset(file.path(), LoadOptions::default()).unwrap();
        let options = AnalysisOptions::default();
        assert_eq!(analyze(&dataset, &options), analyze(&dataset, &options));
    }

    #[test]
    fn test_report_serializes() {
        let file = sample_file();
        let dataset = load_dataset(file.path(), LoadOptions::default()).unwrap();
        let report = analyze(&dataset, &AnalysisOptions::default());
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["source"]["rows"], 3);
        assert_eq!(json["demographics"]["age_brackets"].as_array().unwrap().len(), 8);
        assert_eq!(json["timeline"]["peak"]["month"], "1986-04");
        assert_eq!(json["source"]["parse_failures"]["date"], 1);
    }
}
