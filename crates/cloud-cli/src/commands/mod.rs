//! CLI command implementations.
//!
//! Each submodule implements a specific CLI command:
//! - [`dashboard`] - Live terminal dashboard
//! - [`cluster`] - Cluster listing
//! - [`volume`] - Volume listing, details and storage cluster info
//! - [`status`] - API health and versions

pub mod cluster;
pub mod dashboard;
pub mod status;
pub mod volume;

#[cfg(test)]
pub(crate) mod fake;

pub use cluster::ClusterCommand;
pub use dashboard::DashboardCommand;
pub use status::StatusCommand;
pub use volume::VolumeCommand;
