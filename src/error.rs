use std::path::PathBuf;

use thiserror::Error;

/// Exit code for a run that succeeded.
pub const EXIT_OK: u8 = 0;
/// Exit code for unexpected failures (write errors and the like).
pub const EXIT_FAILURE: u8 = 1;
/// Exit code for rejected options and unusable input documents.
pub const EXIT_USAGE: u8 = 2;
/// Exit code when there was nothing readable to work on.
pub const EXIT_NO_INPUT: u8 = 3;

/// Failure cases surfaced by the merge, report and chart pipelines.
///
/// Per-record problems never show up here: they are counted in the
/// pipeline outcomes instead.
#[derive(Debug, Error)]
pub enum DiagError {
    /// None of the requested input documents could be found or read.
    #[error("no usable input: {0}")]
    NoUsableInput(String),

    /// A document was read but is not valid JSON.
    #[error("invalid JSON in {}: {source}", .path.display())]
    MalformedDocument {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A caller-supplied parameter was rejected before processing.
    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// The input is above the size ceiling and was not parsed.
    #[error("input file too large: {} is {size} bytes (limit: {limit} bytes)", .path.display())]
    OversizedInput { path: PathBuf, size: u64, limit: u64 },

    /// A CSV table lacks columns the chart tallies need.
    #[error("missing columns in CSV: {0:?}")]
    MissingColumns(Vec<String>),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl DiagError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DiagError::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit code for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            DiagError::NoUsableInput(_) => EXIT_NO_INPUT,
            DiagError::MalformedDocument { .. }
            | DiagError::InvalidOption(_)
            | DiagError::OversizedInput { .. }
            | DiagError::MissingColumns(_) => EXIT_USAGE,
            DiagError::Io { .. } | DiagError::Json(_) => EXIT_FAILURE,
        }
    }
}

/// Exit code for an error bubbled up through `anyhow`.
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<DiagError>())
        .map(DiagError::exit_code)
        .unwrap_or(EXIT_FAILURE)
}
