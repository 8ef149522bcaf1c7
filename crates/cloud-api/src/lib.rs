//! # cloud-api
//!
//! Client for the cloud-management API consumed by `cloudctl`.
//!
//! The crate exposes:
//! - resource models for clusters, volumes and storage clusters ([`models`])
//! - the [`CloudApi`] trait, the seam the dashboard and commands are written against
//! - [`HttpCloudApi`], the `reqwest` implementation of that trait
//! - [`with_deadline`], which bounds any API call by a caller-supplied timeout
//!
//! ```text
//! ┌──────────┐   CloudApi    ┌──────────────┐    HTTP/JSON    ┌───────────┐
//! │ commands │──────────────►│ HttpCloudApi │◄───────────────►│ cloud-api │
//! └──────────┘               └──────────────┘                 └───────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod error;
pub mod models;

pub use client::{with_deadline, CloudApi, HttpCloudApi};
pub use error::{ApiError, ApiResult};
pub use models::{
    ClusterCondition, ClusterFilter, ClusterLastError, ClusterRecord, ClusterStatus, HealthReport,
    HealthStatus, LastOperation, StorageClusterHealth, StorageClusterRecord,
    StorageClusterStatistics, StorageServer, VersionInfo, VolumeFilter, VolumeRecord,
    VolumeStatistics,
};
