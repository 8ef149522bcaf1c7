//! Cluster command implementation.

use std::io::Write;
use std::time::Duration;

use cloud_api::{with_deadline, CloudApi};
use tracing::debug;

use crate::cli::ClusterCommands;
use crate::error::CliError;
use crate::output::{ClusterList, OutputFormat};

/// Cluster command executor.
pub struct ClusterCommand<'a> {
    api: &'a dyn CloudApi,
    timeout: Duration,
}

impl<'a> ClusterCommand<'a> {
    /// Create a new cluster command.
    #[must_use]
    pub fn new(api: &'a dyn CloudApi, timeout: Duration) -> Self {
        Self { api, timeout }
    }

    /// Execute a cluster subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call or output fails.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &ClusterCommands,
    ) -> Result<(), CliError> {
        match command {
            ClusterCommands::List(args) => {
                let filter = args.filter();
                debug!(?filter, "listing clusters");
                let clusters =
                    with_deadline("find_clusters", self.timeout, self.api.find_clusters(&filter))
                        .await?;
                format.write(writer, &ClusterList { clusters })?;
            }
        }
        Ok(())
    }
}
