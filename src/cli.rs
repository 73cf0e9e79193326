use clap::Parser;
use std::path::PathBuf;

use crate::types::{DEFAULT_ENCODING, DEFAULT_INPUT};

/// Exploratory analysis of suggestions sent to the 1986 Constituent Assembly
#[derive(Parser, Debug)]
#[command(name = "constituinte-analysis")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input table path
    #[arg(short, long, default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Field delimiter (a single character, or \t)
    #[arg(short, long, default_value = ";")]
    pub delimiter: String,

    /// Text encoding of the input file
    #[arg(short, long, default_value = DEFAULT_ENCODING)]
    pub encoding: String,

    /// Directory the PNG charts are written to
    #[arg(short, long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Also write the structured report as JSON ("-" for stdout)
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Skip chart rendering
    #[arg(long, default_value_t = false)]
    pub no_charts: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}
