use std::{io, path::PathBuf};

/// Errors returned while building or writing an order report.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot read sales data from {}", path.display())]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("sales data is missing required column {0:?}")]
    MissingColumn(String),

    #[error("sales data already has a {0:?} column")]
    ReservedColumn(String),

    #[error("line {line}: invalid {column} value {value:?}: {reason}")]
    InvalidValue {
        line: u64,
        column: String,
        value: String,
        reason: String,
    },

    #[error("{0} is too large")]
    AmountOutOfRange(String),

    #[error("malformed sales data")]
    Csv(#[from] csv::Error),

    #[error("cannot create output directory {}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is open in another application; close it and try again", .0.display())]
    FileLocked(PathBuf),

    #[error("cannot write {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot build spreadsheet")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

impl Error {
    /// Reports whether the error is caused by the content of the sales data,
    /// rather than by the filesystem.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::MissingColumn(_)
                | Self::ReservedColumn(_)
                | Self::InvalidValue { .. }
                | Self::AmountOutOfRange(_)
                | Self::Csv(_)
        )
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
