use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing_subscriber::{fmt::time::ChronoLocal, EnvFilter};

/// Builds a per-order spreadsheet report from a sales data CSV file.
///
/// The report is written to `Orders_<date>/sales_csv.xlsx`, beside the sales
/// data file. Set `RUST_LOG` (for example `RUST_LOG=debug`) for progress logs.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Full path of the sales data CSV file
    sales_data_path: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let path = order_report::generate(&args.sales_data_path, Local::now().date_naive())
        .with_context(|| format!("processing {}", args.sales_data_path.display()))?;
    println!("{}", path.display());
    Ok(())
}
