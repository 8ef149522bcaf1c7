//! Fake API client for command tests.

use async_trait::async_trait;
use cloud_api::{
    ApiError, ApiResult, CloudApi, ClusterFilter, ClusterRecord, HealthReport, HealthStatus,
    StorageClusterRecord, VersionInfo, VolumeFilter, VolumeRecord,
};
use parking_lot::Mutex;

/// Canned answers per operation plus the last filters seen.
pub struct FakeApi {
    pub clusters: Vec<ClusterRecord>,
    pub volumes: Vec<VolumeRecord>,
    pub storage: ApiResult<Vec<StorageClusterRecord>>,
    pub version: ApiResult<VersionInfo>,
    pub health: ApiResult<HealthReport>,
    pub cluster_filter: Mutex<Option<ClusterFilter>>,
    pub volume_filter: Mutex<Option<VolumeFilter>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            clusters: Vec::new(),
            volumes: Vec::new(),
            storage: Ok(Vec::new()),
            version: Ok(VersionInfo {
                version: "v1.2.3".into(),
                ..VersionInfo::default()
            }),
            health: Ok(HealthReport {
                status: HealthStatus::Healthy,
                message: String::new(),
            }),
            cluster_filter: Mutex::new(None),
            volume_filter: Mutex::new(None),
        }
    }
}

#[async_trait]
impl CloudApi for FakeApi {
    async fn find_clusters(&self, filter: &ClusterFilter) -> ApiResult<Vec<ClusterRecord>> {
        *self.cluster_filter.lock() = Some(filter.clone());
        Ok(self.clusters.clone())
    }

    async fn find_volumes(&self, filter: &VolumeFilter) -> ApiResult<Vec<VolumeRecord>> {
        *self.volume_filter.lock() = Some(filter.clone());
        Ok(self.volumes.clone())
    }

    async fn get_volume(&self, id: &str) -> ApiResult<VolumeRecord> {
        self.volumes
            .iter()
            .find(|v| v.volume_id.as_deref() == Some(id))
            .cloned()
            .ok_or_else(|| ApiError::Status {
                status: 404,
                message: "not found".into(),
            })
    }

    async fn storage_cluster_info(
        &self,
        _partition: Option<&str>,
    ) -> ApiResult<Vec<StorageClusterRecord>> {
        self.storage.clone()
    }

    async fn version(&self) -> ApiResult<VersionInfo> {
        self.version.clone()
    }

    async fn health(&self) -> ApiResult<HealthReport> {
        self.health.clone()
    }
}
