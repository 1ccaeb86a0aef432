//! Error types for crop job planning and execution.

use thiserror::Error;

/// Errors that stop a crop job.
///
/// Every variant is detected eagerly and aborts the job at the point of
/// failure. None of them is retried automatically; the user corrects the
/// input and starts the job again.
#[derive(Debug, Error)]
pub enum CropError {
    /// A user-entered field could not be parsed.
    #[error("Invalid {field}: could not parse {token:?}")]
    Parse {
        /// Which input the token came from (e.g. "page range").
        field: &'static str,
        /// The offending token, as entered.
        token: String,
    },

    /// A resolved page has no crop rectangle.
    #[error("No crop selection for page {0}")]
    MissingSelection(u32),

    /// The cropping backend could not read the source or write the output.
    #[error("Could not write cropped document: {0}")]
    BackendIo(#[source] std::io::Error),

    /// Any other failure while building or writing the output.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl CropError {
    pub(crate) fn parse(field: &'static str, token: impl Into<String>) -> Self {
        CropError::Parse {
            field,
            token: token.into(),
        }
    }
}

/// Errors reported by a [`CropBackend`](crate::job::CropBackend).
#[derive(Debug, Error)]
pub enum BackendError {
    /// Reading the source or writing the destination failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The backend failed for a reason other than I/O.
    #[error("{0}")]
    Other(String),
}

impl From<BackendError> for CropError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Io(e) => CropError::BackendIo(e),
            BackendError::Other(msg) => CropError::Unexpected(msg),
        }
    }
}
