//! Dashboard command implementation.

use std::sync::Arc;

use cloud_api::CloudApi;
use tracing::info;

use crate::cli::DashboardArgs;
use crate::error::CliError;

/// Starts the live dashboard.
pub struct DashboardCommand {
    api: Arc<dyn CloudApi>,
}

impl DashboardCommand {
    /// Create a new dashboard command.
    #[must_use]
    pub fn new(api: Arc<dyn CloudApi>) -> Self {
        Self { api }
    }

    /// Run the dashboard until the user quits.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown theme or tab, or if the terminal
    /// cannot be used.
    pub async fn execute(&self, args: &DashboardArgs) -> Result<(), CliError> {
        let config = args.to_config();
        info!(
            theme = %config.theme,
            tenant = ?config.filter.tenant,
            partition = ?config.filter.partition,
            "starting dashboard"
        );
        cloud_dashboard::run(Arc::clone(&self.api), config).await?;
        Ok(())
    }
}
