//! Dashboard configuration.

use std::time::Duration;

use cloud_api::{ClusterFilter, VolumeFilter};

use crate::error::{DashboardError, DashboardResult};

/// Default interval between two refreshes.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(3);

/// Default deadline of every API call made during a render.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Default color theme name.
pub const DEFAULT_THEME: &str = "default";

/// Tenant/partition/purpose scoping applied to every fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterContext {
    /// Only show resources of this tenant.
    pub tenant: Option<String>,
    /// Only show resources in this partition.
    pub partition: Option<String>,
    /// Only show clusters with this purpose.
    pub purpose: Option<String>,
}

impl FilterContext {
    /// Create a filter, treating empty strings as unset.
    #[must_use]
    pub fn new(tenant: Option<String>, partition: Option<String>, purpose: Option<String>) -> Self {
        Self {
            tenant: non_empty(tenant),
            partition: non_empty(partition),
            purpose: non_empty(purpose),
        }
    }

    /// Cluster query for this filter.
    #[must_use]
    pub fn cluster_filter(&self) -> ClusterFilter {
        ClusterFilter {
            tenant: self.tenant.clone(),
            partition_id: self.partition.clone(),
            purpose: self.purpose.clone(),
        }
    }

    /// Volume query for this filter. Volumes have no purpose.
    #[must_use]
    pub fn volume_filter(&self) -> VolumeFilter {
        VolumeFilter {
            tenant_id: self.tenant.clone(),
            partition_id: self.partition.clone(),
            ..VolumeFilter::default()
        }
    }

    /// Lines shown in the filter header.
    #[must_use]
    pub fn header_lines(&self) -> [String; 3] {
        let show = |v: &Option<String>| v.clone().unwrap_or_default();
        [
            format!("Tenant={}", show(&self.tenant)),
            format!("Partition={}", show(&self.partition)),
            format!("Purpose={}", show(&self.purpose)),
        ]
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Configuration for the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Resource filter.
    pub filter: FilterContext,
    /// Color theme name, `default` or `dark`.
    pub theme: String,
    /// Name of the tab shown at startup (case-insensitive). First tab if unset.
    pub initial_tab: Option<String>,
    /// Interval between refreshes.
    pub refresh_interval: Duration,
    /// Deadline of each API call.
    pub request_timeout: Duration,
    /// Version of the client shown in the status header.
    pub client_version: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            filter: FilterContext::default(),
            theme: DEFAULT_THEME.to_string(),
            initial_tab: None,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            client_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl DashboardConfig {
    /// Create a configuration with the given filter.
    #[must_use]
    pub fn new(filter: FilterContext) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    /// Set the color theme.
    #[must_use]
    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = theme.into();
        self
    }

    /// Set the initial tab.
    #[must_use]
    pub fn with_initial_tab(mut self, tab: impl Into<String>) -> Self {
        self.initial_tab = Some(tab.into());
        self
    }

    /// Set the refresh interval.
    #[must_use]
    pub const fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Set the per-call deadline.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the client version shown in the header.
    #[must_use]
    pub fn with_client_version(mut self, version: impl Into<String>) -> Self {
        self.client_version = version.into();
        self
    }

    /// Reject durations the event loop cannot work with.
    pub fn validate(&self) -> DashboardResult<()> {
        if self.refresh_interval.is_zero() {
            return Err(DashboardError::Config(
                "refresh interval must be greater than zero".into(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(DashboardError::Config(
                "request timeout must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
