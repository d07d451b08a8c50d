#![doc = include_str!("../README.md")]
use chrono::NaiveDate;
use tracing::info;

use std::path::{Path, PathBuf};

pub use self::{
    error::{Error, Result},
    record::{ItemNumber, SalesLog, SalesRecord},
    report::{Cell, OrderReportRow, Report},
    schema::{Column, OutputColumn, Schema},
    usd::Usd,
};

mod error;
mod record;
mod report;
mod schema;
mod usd;

pub mod output;
pub mod xlsx;

/// Builds the order report for the sales data CSV file at `input`, and writes
/// it to `Orders_<date>/sales_csv.xlsx` beside the input file.
///
/// The whole report is built before anything is written, so invalid sales
/// data leaves the filesystem untouched. An existing `Orders_<date>` directory
/// is reused, and an existing report file in it is replaced.
///
/// Returns the path of the written file.
///
/// # Errors
///
/// Returns errors if:
/// * The sales data cannot be read, or is invalid (see [`SalesLog::from_reader`])
/// * The output directory cannot be created
/// * The report file is open in another application ([`Error::FileLocked`])
/// * The report file cannot be written
pub fn generate(input: impl AsRef<Path>, date: NaiveDate) -> Result<PathBuf> {
    let input = input.as_ref();
    let report = Report::read_csv(input)?;
    let contents = xlsx::render(&report)?;

    let dir = output::orders_dir(input, date);
    output::create_orders_dir(&dir)?;
    let path = dir.join(output::REPORT_FILE_NAME);
    output::write_report(&path, &contents)?;
    info!(
        path = %path.display(),
        orders = report.rows().len(),
        grand_total = %report.grand_total(),
        "wrote order report"
    );
    Ok(path)
}
