//! Volume command implementation.
//!
//! Provides subcommands for:
//! - Listing volumes, optionally only those without connected hosts
//! - Describing a single volume
//! - Showing storage cluster information (provider administrators only)

use std::io::Write;
use std::time::Duration;

use cloud_api::{with_deadline, ApiError, CloudApi};
use tracing::debug;

use crate::cli::{VolumeCommands, VolumeListArgs};
use crate::error::CliError;
use crate::output::{OutputFormat, StorageClusterList, VolumeDetail, VolumeList};

/// Volume command executor.
pub struct VolumeCommand<'a> {
    api: &'a dyn CloudApi,
    timeout: Duration,
}

impl<'a> VolumeCommand<'a> {
    /// Create a new volume command.
    #[must_use]
    pub fn new(api: &'a dyn CloudApi, timeout: Duration) -> Self {
        Self { api, timeout }
    }

    /// Execute a volume subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call or output fails, or if the described
    /// volume does not exist.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &VolumeCommands,
    ) -> Result<(), CliError> {
        match command {
            VolumeCommands::List(args) => {
                let list = self.list(args).await?;
                format.write(writer, &list)?;
            }
            VolumeCommands::Describe { id } => {
                let detail = self.describe(id).await?;
                format.write(writer, &detail)?;
            }
            VolumeCommands::Clusterinfo { partition } => {
                let clusters = with_deadline(
                    "storage_cluster_info",
                    self.timeout,
                    self.api.storage_cluster_info(partition.as_deref()),
                )
                .await?;
                format.write(writer, &StorageClusterList { clusters })?;
            }
        }
        Ok(())
    }

    /// List volumes matching the filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list(&self, args: &VolumeListArgs) -> Result<VolumeList, CliError> {
        let filter = args.filter();
        debug!(?filter, only_unbound = args.only_unbound, "listing volumes");
        let mut volumes =
            with_deadline("find_volumes", self.timeout, self.api.find_volumes(&filter)).await?;
        if args.only_unbound {
            volumes.retain(|v| v.connected_hosts.is_empty());
        }
        Ok(VolumeList { volumes })
    }

    /// Fetch a single volume.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::NotFound`] if the API does not know the volume.
    pub async fn describe(&self, id: &str) -> Result<VolumeDetail, CliError> {
        if id.is_empty() {
            return Err(CliError::Config("volume ID cannot be empty".into()));
        }
        match with_deadline("get_volume", self.timeout, self.api.get_volume(id)).await {
            Ok(volume) => Ok(VolumeDetail { volume }),
            Err(ApiError::Status { status: 404, .. }) => {
                Err(CliError::NotFound(format!("volume {id}")))
            }
            Err(err) => Err(err.into()),
        }
    }
}
