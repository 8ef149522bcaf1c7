//! CLI error types.

use std::fmt;

use cloud_api::ApiError;
use cloud_dashboard::DashboardError;

/// CLI-specific errors.
#[derive(Debug)]
pub enum CliError {
    /// A call to the cloud API failed.
    Api(ApiError),
    /// The dashboard could not start or lost the terminal.
    Dashboard(DashboardError),
    /// Invalid configuration.
    Config(String),
    /// A requested resource does not exist.
    NotFound(String),
    /// Output formatting error.
    Format(String),
    /// IO error.
    Io(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "API error: {e}"),
            Self::Dashboard(e) => write!(f, "dashboard error: {e}"),
            Self::Config(msg) => write!(f, "configuration error: {msg}"),
            Self::NotFound(what) => write!(f, "not found: {what}"),
            Self::Format(msg) => write!(f, "format error: {msg}"),
            Self::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            Self::Dashboard(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        Self::Api(err)
    }
}

impl From<DashboardError> for CliError {
    fn from(err: DashboardError) -> Self {
        Self::Dashboard(err)
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
