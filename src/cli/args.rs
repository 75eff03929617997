use crate::utils::constants::{
    DEFAULT_FIRES_FILE, DEFAULT_OUTPUT_FILE, DEFAULT_POLLUTION_FILE, DEFAULT_ROW_GROUP_SIZE,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fire-pollution")]
#[command(about = "Correlate wildfires with nearby air quality readings")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Join fire and pollution tables and write the result as Parquet
    Run {
        #[arg(long, default_value = DEFAULT_FIRES_FILE, help = "Fire incidents CSV")]
        fires: PathBuf,

        #[arg(long, default_value = DEFAULT_POLLUTION_FILE, help = "Pollution measurements CSV")]
        pollution: PathBuf,

        #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
        output: PathBuf,

        #[arg(long, help = "TOML file overriding the analysis constants")]
        config: Option<PathBuf>,

        #[arg(short, long, default_value = "snappy")]
        compression: String,

        #[arg(long, default_value_t = DEFAULT_ROW_GROUP_SIZE)]
        row_group_size: usize,

        #[arg(long, default_value_t = num_cpus::get())]
        max_workers: usize,

        #[arg(long, help = "Write the run report as JSON to this path")]
        report_json: Option<PathBuf>,

        #[arg(long, default_value = "false", help = "Disable the progress spinner")]
        quiet: bool,
    },

    /// Display information about a Parquet output file
    Info {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long, default_value = "10")]
        sample: usize,
    },
}
