//! Command-line argument parsing with clap.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use cloud_api::{ClusterFilter, VolumeFilter};
use cloud_dashboard::config::DEFAULT_THEME;
use cloud_dashboard::{DashboardConfig, FilterContext, THEMES};

/// cloudctl - manage clusters and volumes of the cloud API.
#[derive(Parser, Debug, Clone)]
#[command(name = "cloudctl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// URL of the cloud API.
    #[arg(
        short = 'u',
        long,
        env = "CLOUDCTL_URL",
        default_value = "http://localhost:8080/cloud"
    )]
    pub api_url: String,

    /// Bearer token for the cloud API.
    #[arg(short = 't', long, env = "CLOUDCTL_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    pub format: Format,

    /// Deadline of each API call made by list and describe commands.
    #[arg(long, env = "CLOUDCTL_TIMEOUT", default_value = "30s", value_parser = humantime::parse_duration)]
    pub timeout: Duration,

    /// Write logs to this file instead of stderr.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Live terminal dashboard of cluster and storage health.
    Dashboard(DashboardArgs),

    /// Cluster commands.
    Cluster {
        /// Cluster subcommand to execute.
        #[command(subcommand)]
        command: ClusterCommands,
    },

    /// Volume commands.
    Volume {
        /// Volume subcommand to execute.
        #[command(subcommand)]
        command: VolumeCommands,
    },

    /// Show the health of the cloud API.
    Health,

    /// Show client and API versions.
    Version,
}

fn theme_help() -> String {
    let themes: Vec<String> = THEMES
        .iter()
        .map(|(name, description)| format!("  {name}: {description}"))
        .collect();
    format!("Color theme of the dashboard. Available themes:\n{}", themes.join("\n"))
}

/// Arguments of the dashboard command.
#[derive(Args, Debug, Clone)]
pub struct DashboardArgs {
    /// Show only resources in this partition.
    #[arg(long)]
    pub partition: Option<String>,

    /// Show only resources of this tenant.
    #[arg(long)]
    pub tenant: Option<String>,

    /// Show only clusters with this purpose.
    #[arg(long)]
    pub purpose: Option<String>,

    /// Color theme of the dashboard.
    #[arg(long, default_value = DEFAULT_THEME, long_help = theme_help())]
    pub color_theme: String,

    /// Tab shown at startup, by name (e.g. clusters, volumes).
    #[arg(long)]
    pub initial_tab: Option<String>,

    /// Interval between refreshes, e.g. 3s or 1m.
    #[arg(long, default_value = "3s", value_parser = humantime::parse_duration)]
    pub refresh_interval: Duration,
}

impl DashboardArgs {
    /// Dashboard configuration for these arguments.
    #[must_use]
    pub fn to_config(&self) -> DashboardConfig {
        let filter = FilterContext::new(
            self.tenant.clone(),
            self.partition.clone(),
            self.purpose.clone(),
        );
        let config = DashboardConfig::new(filter)
            .with_theme(self.color_theme.clone())
            .with_refresh_interval(self.refresh_interval)
            .with_client_version(env!("CARGO_PKG_VERSION"));
        match &self.initial_tab {
            Some(tab) => config.with_initial_tab(tab.clone()),
            None => config,
        }
    }
}

/// Cluster subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ClusterCommands {
    /// List clusters.
    List(ClusterListArgs),
}

/// Filters of `cluster list`.
#[derive(Args, Debug, Clone, Default)]
pub struct ClusterListArgs {
    /// Partition of the clusters.
    #[arg(long)]
    pub partition: Option<String>,

    /// Tenant of the clusters.
    #[arg(long)]
    pub tenant: Option<String>,

    /// Purpose of the clusters.
    #[arg(long)]
    pub purpose: Option<String>,
}

impl ClusterListArgs {
    /// API query for these filters.
    #[must_use]
    pub fn filter(&self) -> ClusterFilter {
        ClusterFilter {
            tenant: self.tenant.clone(),
            partition_id: self.partition.clone(),
            purpose: self.purpose.clone(),
        }
    }
}

/// Volume subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum VolumeCommands {
    /// List volumes.
    List(VolumeListArgs),

    /// Show a single volume.
    Describe {
        /// Volume ID.
        id: String,
    },

    /// Show storage cluster information. Provider administrators only.
    Clusterinfo {
        /// Partition of the storage clusters.
        #[arg(long)]
        partition: Option<String>,
    },
}

/// Filters of `volume list`.
#[derive(Args, Debug, Clone, Default)]
pub struct VolumeListArgs {
    /// Exact volume ID.
    #[arg(long)]
    pub volume_id: Option<String>,

    /// Project of the volumes.
    #[arg(long)]
    pub project: Option<String>,

    /// Partition of the volumes.
    #[arg(long)]
    pub partition: Option<String>,

    /// Tenant of the volumes.
    #[arg(long)]
    pub tenant: Option<String>,

    /// Only show volumes not attached to any host.
    #[arg(long)]
    pub only_unbound: bool,
}

impl VolumeListArgs {
    /// API query for these filters.
    #[must_use]
    pub fn filter(&self) -> VolumeFilter {
        VolumeFilter {
            volume_id: self.volume_id.clone(),
            project_id: self.project.clone(),
            partition_id: self.partition.clone(),
            tenant_id: self.tenant.clone(),
        }
    }
}
