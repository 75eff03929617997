use crate::cli::args::{Cli, Commands};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::processors::{CorrelationPipeline, ExecutionContext, PipelineReport};
use crate::readers::ConcurrentReader;
use crate::utils::progress::ProgressReporter;
use crate::writers::ParquetWriter;
use std::io::Write;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber; `RUST_LOG` takes precedence over `--verbose`
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A subscriber may already be installed by an embedding process
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run {
            fires,
            pollution,
            output,
            config,
            compression,
            row_group_size,
            max_workers,
            report_json,
            quiet,
        } => {
            let config = PipelineConfig::load(config.as_deref())?;
            // Reject a bad codec before any input is read
            let writer = ParquetWriter::new()
                .with_compression(&compression)?
                .with_row_group_size(row_group_size);

            println!("Correlating wildfires with pollution readings...");
            println!("Fire data: {}", fires.display());
            println!("Pollution data: {}", pollution.display());
            println!("Output file: {}", output.display());
            println!("Workers: {}", max_workers);

            let progress = ProgressReporter::new_spinner("Loading input tables...", quiet);

            let inputs = ConcurrentReader::new()
                .read_inputs(&fires, &pollution)
                .await?;

            let pipeline = CorrelationPipeline::new(&config);
            let (records, report) = {
                let context = ExecutionContext::new(max_workers)?;
                context.install(|| pipeline.run(inputs, Some(&progress)))
            };

            // The report lands first so a failure after publishing cannot fail the run
            if let Some(report_path) = &report_json {
                write_report(&report, report_path)?;
            }

            progress.stage("Writing Parquet output...");
            writer.write_records(&records, &output)?;
            progress.finish_with_message(&format!("Wrote {} rows", records.len()));

            println!("\n{}", report.summary());
            if let Some(report_path) = &report_json {
                println!("Run report: {}", report_path.display());
            }

            match writer.get_file_info(&output) {
                Ok(file_info) => println!("\n{}", file_info.summary()),
                Err(e) => tracing::warn!(error = %e, "Could not read back output metadata"),
            }

            println!("Processing complete!");
        }

        Commands::Info { file, sample } => {
            println!("Analyzing Parquet file: {}", file.display());

            let writer = ParquetWriter::new();
            let file_info = writer.get_file_info(&file)?;

            println!("\n{}", file_info.summary());
            println!("Columns: {}", file_info.column_names.join(", "));

            if sample > 0 {
                println!("\nSample Records (showing up to {} records):", sample);
                match writer.read_records(&file, Some(sample)) {
                    Ok(records) => {
                        for (i, record) in records.iter().enumerate() {
                            println!(
                                "{}. fire {} ({}) started {} | reading {} at ({:.4}, {:.4}) | {:.2} mi, {:+} days | CO={} SO2={}",
                                i + 1,
                                record.fire.fire_id,
                                record.fire.fire_state,
                                display_or_dash(record.fire.start_date),
                                display_or_dash(record.pollution.date_local),
                                record.pollution.latitude,
                                record.pollution.longitude,
                                record.distance_miles.unwrap_or(f64::NAN),
                                record.date_diff_fire_pollution.unwrap_or_default(),
                                display_or_dash(record.pollution.aqi.co),
                                display_or_dash(record.pollution.aqi.so2),
                            );
                        }
                    }
                    Err(e) => println!("Error reading sample data: {}", e),
                }
            }
        }
    }

    Ok(())
}

fn display_or_dash<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// Write the run report as JSON, replacing `path` only once it is complete
fn write_report(report: &PipelineReport, path: &Path) -> Result<()> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(directory)?;

    let mut staging = tempfile::Builder::new()
        .prefix(".fire-pollution-report-")
        .suffix(".json.partial")
        .tempfile_in(directory)?;
    serde_json::to_writer_pretty(staging.as_file_mut(), report)?;
    staging.as_file_mut().flush()?;
    staging.persist(path)?;

    Ok(())
}
