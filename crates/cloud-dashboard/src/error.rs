//! Error types for the dashboard.
//!
//! Only startup and terminal failures are errors here. API failures during a
//! render are captured as [`cloud_api::ApiError`] and shown in the status line.

use thiserror::Error;

/// Result type alias for dashboard operations.
pub type DashboardResult<T> = Result<T, DashboardError>;

/// Errors that stop the dashboard.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Raw mode or the alternate screen could not be entered.
    #[error("failed to initialize terminal: {0}")]
    TerminalInitFailed(#[source] std::io::Error),

    /// Drawing to or reading from the terminal failed.
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    /// Invalid startup configuration.
    #[error("configuration error: {0}")]
    Config(String),
}
