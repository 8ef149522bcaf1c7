//! # cloud-cli
//!
//! `cloudctl`, the command-line client of the cloud API.
//!
//! Provides commands for:
//! - Live dashboard of cluster and volume health
//! - Cluster listing
//! - Volume listing, details and storage cluster info
//! - API health and versions
//!
//! # Architecture
//!
//! Every command is written against the [`cloud_api::CloudApi`] trait. The
//! binary wires in [`cloud_api::HttpCloudApi`]; tests use in-memory fakes.
//!
//! ```text
//! ┌───────────┐    CloudApi     ┌──────────────┐    HTTP/JSON    ┌───────────┐
//! │ cloud-cli │────────────────►│ HttpCloudApi │◄───────────────►│ cloud-api │
//! └───────────┘                 └──────────────┘                 └───────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use cli::{Cli, ClusterCommands, Commands, DashboardArgs, Format, VolumeCommands};
pub use error::CliError;
pub use output::OutputFormat;
