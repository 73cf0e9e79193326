mod aggregate;
mod charts;
mod cli;
mod error;
mod output;
mod parse;
mod pipeline;
mod profile;
mod readers;
mod report;
mod stats;
mod types;

use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use cli::Cli;
use error::{Error, LoadError};
use readers::LoadOptions;
use report::ConsoleReport;
use tracing::{error, info};
use types::{AnalysisOptions, Dataset, Result};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        // already reported on the console
        Err(Error::Load(_)) => ExitCode::FAILURE,
        Err(e) => {
            error!(error = %e, "analysis failed");
            eprintln!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initialize the tracing subscriber; logs go to stderr so stdout stays the report.
fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let json_to_stdout = cli.json.as_deref() == Some(Path::new("-"));
    // keep stdout clean for the JSON document
    let mut out: Box<dyn Write> = if json_to_stdout {
        Box::new(io::stderr().lock())
    } else {
        Box::new(io::stdout().lock())
    };

    report::write_banner(&mut out)?;

    let dataset = match load(cli) {
        Ok(dataset) => dataset,
        Err(err) => {
            error!(input = %cli.input.display(), error = %err, "could not load dataset");
            report::write_load_failure(&mut out, &err)?;
            out.flush()?;
            return Err(err.into());
        }
    };

    let options = AnalysisOptions::default();
    let analysis = pipeline::analyze_file(&cli.input, &dataset, &options)?;

    let produced = if cli.no_charts {
        Vec::new()
    } else {
        std::fs::create_dir_all(&cli.out_dir)?;
        let config = charts::ChartConfig::default();
        charts::render_all(&report::chart_series(&analysis), &config, &cli.out_dir)
    };

    ConsoleReport {
        dataset: &dataset,
        report: &analysis,
        charts: &produced,
    }
    .write_to(&mut out)?;
    out.flush()?;
    drop(out);

    match &cli.json {
        Some(_) if json_to_stdout => output::write_json_stdout(&analysis)?,
        Some(path) => {
            output::write_json_file(&analysis, path)?;
            info!(path = %path.display(), "report written");
        }
        None => {}
    }

    Ok(())
}

fn load(cli: &Cli) -> std::result::Result<Dataset, LoadError> {
    let options = LoadOptions::new(&cli.delimiter, &cli.encoding)?;
    readers::load_dataset(&cli.input, options)
}
