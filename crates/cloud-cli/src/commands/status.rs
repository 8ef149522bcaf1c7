//! Health and version commands.

use std::io::Write;
use std::time::Duration;

use cloud_api::{with_deadline, ApiError, CloudApi};
use tracing::warn;

use crate::error::CliError;
use crate::output::{HealthOutput, OutputFormat, VersionOutput};

/// Executor of `health` and `version`.
pub struct StatusCommand<'a> {
    api: &'a dyn CloudApi,
    timeout: Duration,
}

impl<'a> StatusCommand<'a> {
    /// Create a new status command.
    #[must_use]
    pub fn new(api: &'a dyn CloudApi, timeout: Duration) -> Self {
        Self { api, timeout }
    }

    /// Print the API health.
    ///
    /// An unhealthy API that still answers with a report is printed, not
    /// treated as a failure.
    ///
    /// # Errors
    ///
    /// Returns an error if the API cannot be reached.
    pub async fn health<W: Write>(&self, writer: &mut W, format: &OutputFormat) -> Result<(), CliError> {
        let report = match with_deadline("health", self.timeout, self.api.health()).await {
            Ok(report) | Err(ApiError::Unhealthy(report)) => report,
            Err(err) => return Err(err.into()),
        };
        format.write(writer, &HealthOutput { report })
    }

    /// Print client and API versions.
    ///
    /// The client version is printed even if the API is unreachable.
    ///
    /// # Errors
    ///
    /// Returns an error if writing the output fails.
    pub async fn version<W: Write>(&self, writer: &mut W, format: &OutputFormat) -> Result<(), CliError> {
        let server = match with_deadline("version", self.timeout, self.api.version()).await {
            Ok(info) => Some(info),
            Err(err) => {
                warn!(error = %err, "failed to fetch API version");
                None
            }
        };
        let output = VersionOutput {
            client: env!("CARGO_PKG_VERSION").to_string(),
            server,
        };
        format.write(writer, &output)
    }
}
