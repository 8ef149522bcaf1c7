//! Request and response models of the cloud API.
//!
//! Almost every field is optional: the API omits fields freely and callers
//! must classify incomplete records instead of rejecting them.

use serde::{Deserialize, Serialize};

// ============================================================================
// Clusters
// ============================================================================

/// Query for `POST /v1/cluster/find`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterFilter {
    /// Tenant the clusters belong to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,
    /// Partition the clusters run in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition_id: Option<String>,
    /// Cluster purpose (production, evaluation, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}

/// A cluster as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterRecord {
    /// Cluster ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Cluster name.
    #[serde(default)]
    pub name: Option<String>,
    /// Owning tenant.
    #[serde(default)]
    pub tenant: Option<String>,
    /// Partition.
    #[serde(default)]
    pub partition_id: Option<String>,
    /// Purpose.
    #[serde(default)]
    pub purpose: Option<String>,
    /// Reconciliation status.
    #[serde(default)]
    pub status: Option<ClusterStatus>,
}

/// Reconciliation status of a cluster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterStatus {
    /// Most recent operation.
    #[serde(default)]
    pub last_operation: Option<LastOperation>,
    /// Health conditions.
    #[serde(default)]
    pub conditions: Vec<ClusterCondition>,
    /// Errors of the most recent operation.
    #[serde(default)]
    pub last_errors: Vec<ClusterLastError>,
}

/// The most recent operation on a cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastOperation {
    /// `Succeeded`, `Processing`, `Error`, `Failed`, ...
    #[serde(default)]
    pub state: Option<String>,
    /// Operation type (`Create`, `Reconcile`, ...).
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Human readable description.
    #[serde(default)]
    pub description: Option<String>,
    /// Completion in percent.
    #[serde(default)]
    pub progress: Option<i32>,
}

/// A single health condition of a cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterCondition {
    /// Condition type, e.g. `APIServerAvailable`.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// `True`, `False`, `Progressing` or `Unknown`.
    #[serde(default)]
    pub status: Option<String>,
    /// Detail message.
    #[serde(default)]
    pub message: Option<String>,
    /// RFC 3339 time of the last status update.
    #[serde(default)]
    pub last_update_time: Option<String>,
}

/// An error reported by the last cluster operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterLastError {
    /// Error description.
    #[serde(default)]
    pub description: Option<String>,
    /// RFC 3339 time the error was recorded.
    #[serde(default)]
    pub last_update_time: Option<String>,
}

// ============================================================================
// Volumes
// ============================================================================

/// Query for `POST /v1/volume/find`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeFilter {
    /// Exact volume ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_id: Option<String>,
    /// Project the volume belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Partition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition_id: Option<String>,
    /// Tenant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

/// A persistent volume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VolumeRecord {
    /// Volume ID.
    #[serde(default)]
    pub volume_id: Option<String>,
    /// Volume name.
    #[serde(default)]
    pub volume_name: Option<String>,
    /// Partition.
    #[serde(default)]
    pub partition_id: Option<String>,
    /// Project.
    #[serde(default)]
    pub project_id: Option<String>,
    /// Tenant.
    #[serde(default)]
    pub tenant_id: Option<String>,
    /// Provisioned size in bytes.
    #[serde(default)]
    pub size: Option<i64>,
    /// `Available`, `Failed`, `Unknown`, ...
    #[serde(default)]
    pub state: Option<String>,
    /// `FullyProtected`, `Degraded`, `ReadOnly`, `NotAvailable`, `Unknown`.
    #[serde(default)]
    pub protection_state: Option<String>,
    /// Usage statistics.
    #[serde(default)]
    pub statistics: Option<VolumeStatistics>,
    /// Hosts the volume is attached to.
    #[serde(default)]
    pub connected_hosts: Vec<String>,
}

/// Usage statistics of a volume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeStatistics {
    /// Physically used bytes after compression.
    #[serde(default)]
    pub physical_used_storage: Option<i64>,
    /// Logically used bytes.
    #[serde(default)]
    pub logical_used_storage: Option<i64>,
}

// ============================================================================
// Storage clusters
// ============================================================================

/// A storage cluster backing the volumes of a partition.
///
/// Only provider administrators may read these.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageClusterRecord {
    /// Cluster UUID.
    #[serde(default)]
    pub uuid: Option<String>,
    /// Partition.
    #[serde(default)]
    pub partition: Option<String>,
    /// Overall health.
    #[serde(default)]
    pub health: Option<StorageClusterHealth>,
    /// Storage servers.
    #[serde(default)]
    pub servers: Vec<StorageServer>,
    /// Capacity statistics.
    #[serde(default)]
    pub statistics: Option<StorageClusterStatistics>,
}

/// Health of a storage cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageClusterHealth {
    /// `OK`, `Warning`, `Error` or `None`.
    #[serde(default)]
    pub state: Option<String>,
}

/// A server of a storage cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageServer {
    /// Server name.
    #[serde(default)]
    pub name: Option<String>,
    /// `Enabled`, `Disabled`, `Failed`, ...
    #[serde(default)]
    pub state: Option<String>,
}

/// Capacity statistics of a storage cluster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageClusterStatistics {
    /// Free physical bytes.
    #[serde(default)]
    pub free_physical_storage: Option<i64>,
    /// Used physical bytes.
    #[serde(default)]
    pub physical_used_storage: Option<i64>,
    /// Logical to physical ratio.
    #[serde(default)]
    pub compression_ratio: Option<f64>,
}

// ============================================================================
// Version and health
// ============================================================================

/// Answer of `GET /v1/version`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    /// Semantic version of the API server.
    pub version: String,
    /// Source revision.
    #[serde(default)]
    pub revision: Option<String>,
    /// Git commit.
    #[serde(default)]
    pub git_sha1: Option<String>,
    /// Build date.
    #[serde(default)]
    pub build_date: Option<String>,
}

/// Answer of `GET /v1/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    /// Aggregated health.
    pub status: HealthStatus,
    /// Detail, usually set when not healthy.
    #[serde(default)]
    pub message: String,
}

/// Aggregated API health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HealthStatus {
    /// Every service is fine.
    Healthy,
    /// Some services are slow or retrying.
    Degraded,
    /// Some services are down.
    #[serde(rename = "partial-unhealthy")]
    PartiallyUnhealthy,
    /// The API is not usable.
    Unhealthy,
    /// A status this client does not know.
    #[serde(other)]
    Unknown,
}

impl HealthStatus {
    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
            Self::PartiallyUnhealthy => "partial-unhealthy",
            Self::Unhealthy => "unhealthy",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
