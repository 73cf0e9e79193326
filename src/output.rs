use std::io::Write;
use std::path::Path;

use crate::pipeline::AnalysisReport;
use crate::types::Result;

/// Write the analysis report to a JSON file
pub fn write_json_file(report: &AnalysisReport, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}

pub fn to_json_string(report: &AnalysisReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Write the analysis report to stdout
pub fn write_json_stdout(report: &AnalysisReport) -> Result<()> {
    let json = to_json_string(report)?;
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", json)?;
    Ok(())
}
