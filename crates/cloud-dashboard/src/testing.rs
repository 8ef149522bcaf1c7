//! In-memory [`CloudApi`] for pane and controller tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cloud_api::{
    ApiError, ApiResult, CloudApi, ClusterFilter, ClusterRecord, HealthReport, HealthStatus,
    StorageClusterRecord, VersionInfo, VolumeFilter, VolumeRecord,
};
use parking_lot::Mutex;

use crate::config::{FilterContext, DEFAULT_REQUEST_TIMEOUT};
use crate::pane::PaneContext;
use crate::theme::Theme;

/// Canned answers, a call counter and the last queries seen.
pub struct FakeCloudApi {
    clusters: Mutex<ApiResult<Vec<ClusterRecord>>>,
    volumes: Mutex<ApiResult<Vec<VolumeRecord>>>,
    storage: Mutex<ApiResult<Vec<StorageClusterRecord>>>,
    version: Mutex<ApiResult<VersionInfo>>,
    health: Mutex<ApiResult<HealthReport>>,
    delay: Mutex<Option<Duration>>,
    calls: AtomicUsize,
    last_cluster_filter: Mutex<Option<ClusterFilter>>,
    last_volume_filter: Mutex<Option<VolumeFilter>>,
    last_storage_partition: Mutex<Option<String>>,
}

impl FakeCloudApi {
    pub fn new() -> Self {
        Self {
            clusters: Mutex::new(Ok(Vec::new())),
            volumes: Mutex::new(Ok(Vec::new())),
            storage: Mutex::new(Ok(Vec::new())),
            version: Mutex::new(Ok(VersionInfo {
                version: "v1.2.3".into(),
                ..VersionInfo::default()
            })),
            health: Mutex::new(Ok(HealthReport {
                status: HealthStatus::Healthy,
                message: String::new(),
            })),
            delay: Mutex::new(None),
            calls: AtomicUsize::new(0),
            last_cluster_filter: Mutex::new(None),
            last_volume_filter: Mutex::new(None),
            last_storage_partition: Mutex::new(None),
        }
    }

    pub fn with_clusters(self, clusters: Vec<ClusterRecord>) -> Self {
        self.set_clusters(Ok(clusters));
        self
    }

    pub fn with_volumes(self, volumes: Vec<VolumeRecord>) -> Self {
        self.set_volumes(Ok(volumes));
        self
    }

    pub fn with_storage(self, storage: Vec<StorageClusterRecord>) -> Self {
        self.set_storage(Ok(storage));
        self
    }

    pub fn set_clusters(&self, result: ApiResult<Vec<ClusterRecord>>) {
        *self.clusters.lock() = result;
    }

    pub fn set_volumes(&self, result: ApiResult<Vec<VolumeRecord>>) {
        *self.volumes.lock() = result;
    }

    pub fn set_storage(&self, result: ApiResult<Vec<StorageClusterRecord>>) {
        *self.storage.lock() = result;
    }

    pub fn set_version(&self, result: ApiResult<VersionInfo>) {
        *self.version.lock() = result;
    }

    pub fn set_health(&self, result: ApiResult<HealthReport>) {
        *self.health.lock() = result;
    }

    /// Delay every answer, e.g. to run into the request deadline.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    /// Number of API calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_cluster_filter(&self) -> Option<ClusterFilter> {
        self.last_cluster_filter.lock().clone()
    }

    pub fn last_volume_filter(&self) -> Option<VolumeFilter> {
        self.last_volume_filter.lock().clone()
    }

    pub fn last_storage_partition(&self) -> Option<String> {
        self.last_storage_partition.lock().clone()
    }

    async fn answer<T: Clone>(&self, slot: &Mutex<ApiResult<T>>) -> ApiResult<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        slot.lock().clone()
    }
}

#[async_trait]
impl CloudApi for FakeCloudApi {
    async fn find_clusters(&self, filter: &ClusterFilter) -> ApiResult<Vec<ClusterRecord>> {
        *self.last_cluster_filter.lock() = Some(filter.clone());
        self.answer(&self.clusters).await
    }

    async fn find_volumes(&self, filter: &VolumeFilter) -> ApiResult<Vec<VolumeRecord>> {
        *self.last_volume_filter.lock() = Some(filter.clone());
        self.answer(&self.volumes).await
    }

    async fn get_volume(&self, id: &str) -> ApiResult<VolumeRecord> {
        let volumes = self.answer(&self.volumes).await?;
        volumes
            .into_iter()
            .find(|v| v.volume_id.as_deref() == Some(id))
            .ok_or_else(|| ApiError::Status {
                status: 404,
                message: format!("volume {id} not found"),
            })
    }

    async fn storage_cluster_info(
        &self,
        partition: Option<&str>,
    ) -> ApiResult<Vec<StorageClusterRecord>> {
        *self.last_storage_partition.lock() = partition.map(String::from);
        self.answer(&self.storage).await
    }

    async fn version(&self) -> ApiResult<VersionInfo> {
        self.answer(&self.version).await
    }

    async fn health(&self) -> ApiResult<HealthReport> {
        self.answer(&self.health).await
    }
}

/// Pane context for tenant `t1` in partition `fra-1`.
pub fn context(api: Arc<FakeCloudApi>) -> PaneContext {
    PaneContext {
        api,
        filter: FilterContext::new(Some("t1".into()), Some("fra-1".into()), None),
        theme: Theme::default(),
        request_timeout: DEFAULT_REQUEST_TIMEOUT,
    }
}
