use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use sales_kpi::{CsvSource, ParquetSink, Pipeline, PipelineConfig};

#[derive(Debug, Parser)]
#[command(
    name = "sales-kpi",
    disable_help_subcommand = true,
    about = "Batch sales KPI pipeline",
    long_about = "Normalize and validate a sales export, derive the KPI catalog, \
                  and publish each result as a parquet table plus scalar reports."
)]
struct Cli {
    #[arg(
        long,
        value_name = "PATH",
        help = "CSV export file or directory of CSV part files"
    )]
    input: PathBuf,
    #[arg(
        long,
        value_name = "DIR",
        default_value = "output",
        help = "Directory receiving one parquet file per result name"
    )]
    output: PathBuf,
    #[arg(
        long = "report-json",
        value_name = "PATH",
        help = "Also write the scalar report as pretty JSON"
    )]
    report_json: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let source = CsvSource::new("sales_csv", &cli.input);
    let sink = ParquetSink::new(&cli.output)?;

    let report = Pipeline::new(PipelineConfig::default()).run(&source, &sink)?;

    if let Some(path) = &cli.report_json {
        report.write_json_to(path)?;
        info!(path = %path.display(), "wrote scalar report json");
    }

    println!("{report}");
    Ok(())
}
