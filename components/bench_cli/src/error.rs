//! Error types for the CLI

use std::fmt;

/// CLI-specific errors
#[derive(Debug)]
pub enum CliError {
    /// Distribution cache failure
    DistError(dist_cache::DistError),

    /// Measurement failure
    MeasureError(measure::MeasureError),

    /// Unknown suite name on the command line
    UnknownSuite(String),

    /// A distribution identity missing from the catalog
    UnknownDistribution(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::DistError(e) => write!(f, "Distribution error: {}", e),
            CliError::MeasureError(e) => write!(f, "Measurement error: {}", e),
            CliError::UnknownSuite(s) => write!(
                f,
                "Unknown suite '{}' - supported: RenderComponentThroughput, TTI",
                s
            ),
            CliError::UnknownDistribution(id) => {
                write!(f, "Distribution '{}' is not in the catalog", id)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::DistError(e) => Some(e),
            CliError::MeasureError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<dist_cache::DistError> for CliError {
    fn from(err: dist_cache::DistError) -> Self {
        CliError::DistError(err)
    }
}

impl From<measure::MeasureError> for CliError {
    fn from(err: measure::MeasureError) -> Self {
        CliError::MeasureError(err)
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
