//! Where the report is written, and writing it.

use chrono::NaiveDate;
use tracing::{debug, warn};

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::error::{Error, Result};

pub const REPORT_FILE_NAME: &str = "sales_csv.xlsx";

/// Returns the `Orders_<date>` directory beside the sales data file `input`.
#[must_use]
pub fn orders_dir(input: &Path, date: NaiveDate) -> PathBuf {
    let parent = match input.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    parent.join(format!("Orders_{}", date.format("%Y-%m-%d")))
}

/// Creates the directory `dir`. An existing directory is reused.
///
/// # Errors
///
/// Returns [`Error::OutputDir`] if the directory does not exist and cannot be
/// created.
pub fn create_orders_dir(dir: &Path) -> Result<()> {
    match fs::create_dir(dir) {
        Ok(()) => {
            debug!(dir = %dir.display(), "created orders directory");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            warn!(dir = %dir.display(), "orders directory already exists, reusing it");
            Ok(())
        }
        Err(source) => Err(Error::OutputDir {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

/// Writes `contents` to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`Error::FileLocked`] if another application holds the file open,
/// or [`Error::Io`] for any other write failure.
pub fn write_report(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents).map_err(|source| write_error(path, source))?;
    debug!(path = %path.display(), bytes = contents.len(), "wrote report");
    Ok(())
}

fn write_error(path: &Path, source: io::Error) -> Error {
    if is_locked(&source) {
        Error::FileLocked(path.to_path_buf())
    } else {
        Error::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

fn is_locked(e: &io::Error) -> bool {
    // ERROR_SHARING_VIOLATION and ERROR_LOCK_VIOLATION
    let sharing_violation = cfg!(windows) && matches!(e.raw_os_error(), Some(32 | 33));
    sharing_violation || e.kind() == io::ErrorKind::PermissionDenied
}
