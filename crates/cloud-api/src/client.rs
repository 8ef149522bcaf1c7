//! The [`CloudApi`] trait and its HTTP implementation.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use cloud_api::{with_deadline, CloudApi, HttpCloudApi};
//!
//! # async fn example() -> Result<(), cloud_api::ApiError> {
//! let api = HttpCloudApi::new("https://cloud.example.com/cloud", None)?;
//! let info = with_deadline("version", Duration::from_secs(5), api.version()).await?;
//! println!("API version: {}", info.version);
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::{ApiError, ApiResult};
use crate::models::{
    ClusterFilter, ClusterRecord, HealthReport, StorageClusterRecord, VersionInfo, VolumeFilter,
    VolumeRecord,
};

/// Connect timeout of the underlying HTTP client.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Operations of the cloud API used by `cloudctl`.
///
/// Implementations do not enforce deadlines themselves; callers wrap calls
/// in [`with_deadline`].
#[async_trait]
pub trait CloudApi: Send + Sync {
    /// Find clusters matching the filter.
    async fn find_clusters(&self, filter: &ClusterFilter) -> ApiResult<Vec<ClusterRecord>>;

    /// Find volumes matching the filter.
    async fn find_volumes(&self, filter: &VolumeFilter) -> ApiResult<Vec<VolumeRecord>>;

    /// Fetch a single volume.
    async fn get_volume(&self, id: &str) -> ApiResult<VolumeRecord>;

    /// Storage cluster information, optionally limited to a partition.
    ///
    /// Non-administrators receive [`ApiError::Forbidden`].
    async fn storage_cluster_info(
        &self,
        partition: Option<&str>,
    ) -> ApiResult<Vec<StorageClusterRecord>>;

    /// Version of the API server.
    async fn version(&self) -> ApiResult<VersionInfo>;

    /// Health of the API server.
    ///
    /// A failing health check that still carries a report is returned as
    /// [`ApiError::Unhealthy`].
    async fn health(&self) -> ApiResult<HealthReport>;
}

/// Run `call` and fail with [`ApiError::Timeout`] if it exceeds `deadline`.
pub async fn with_deadline<T, F>(op: &'static str, deadline: Duration, call: F) -> ApiResult<T>
where
    F: Future<Output = ApiResult<T>>,
{
    match tokio::time::timeout(deadline, call).await {
        Ok(result) => result,
        Err(_) => {
            debug!(op, ?deadline, "API call exceeded deadline");
            Err(ApiError::Timeout(op))
        }
    }
}

/// HTTP client for the cloud API.
#[derive(Clone)]
pub struct HttpCloudApi {
    client: reqwest::Client,
    base: Url,
    token: Option<String>,
}

impl std::fmt::Debug for HttpCloudApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCloudApi")
            .field("base", &self.base.as_str())
            .field("authenticated", &self.token.is_some())
            .finish_non_exhaustive()
    }
}

impl HttpCloudApi {
    /// Create a client for the API at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] unless the URL has the form
    /// `scheme://host[:port]/basepath` with an http(s) scheme.
    pub fn new(base_url: &str, token: Option<String>) -> ApiResult<Self> {
        let mut base = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;

        if !matches!(base.scheme(), "http" | "https") || base.host_str().is_none() {
            return Err(ApiError::InvalidUrl(format!(
                "{base_url}, must be in the form scheme://host[:port]/basepath"
            )));
        }

        // Url::join replaces the last segment unless the path ends with '/'.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("cloudctl/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base,
            token: token.filter(|t| !t.is_empty()),
        })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn request(&self, method: Method, path: &str) -> ApiResult<RequestBuilder> {
        let url = self
            .base
            .join(path)
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        trace!(%method, %url, "Building request");

        let builder = self.client.request(method, url);
        Ok(match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = request.send().await?;
        let response = check_status(response).await?;
        Ok(response.json::<T>().await?)
    }
}

/// Map non-success answers to errors.
async fn check_status(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        status.canonical_reason().unwrap_or("unknown").to_string()
    } else {
        body
    };

    if status == StatusCode::FORBIDDEN {
        return Err(ApiError::Forbidden(message));
    }
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl CloudApi for HttpCloudApi {
    async fn find_clusters(&self, filter: &ClusterFilter) -> ApiResult<Vec<ClusterRecord>> {
        let request = self
            .request(Method::POST, "v1/cluster/find")?
            .query(&[("returnmachines", "false")])
            .json(filter);
        self.send(request).await
    }

    async fn find_volumes(&self, filter: &VolumeFilter) -> ApiResult<Vec<VolumeRecord>> {
        let request = self.request(Method::POST, "v1/volume/find")?.json(filter);
        self.send(request).await
    }

    async fn get_volume(&self, id: &str) -> ApiResult<VolumeRecord> {
        let mut url = self
            .base
            .join("v1/volume/")
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .push(id);

        let mut request = self.client.get(url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        self.send(request).await
    }

    async fn storage_cluster_info(
        &self,
        partition: Option<&str>,
    ) -> ApiResult<Vec<StorageClusterRecord>> {
        let mut request = self.request(Method::GET, "v1/volume/clusterinfo")?;
        if let Some(partition) = partition {
            request = request.query(&[("partitionid", partition)]);
        }
        self.send(request).await
    }

    async fn version(&self) -> ApiResult<VersionInfo> {
        let request = self.request(Method::GET, "v1/version")?;
        self.send(request).await
    }

    async fn health(&self) -> ApiResult<HealthReport> {
        let response = self.request(Method::GET, "v1/health")?.send().await?;

        if response.status() == StatusCode::INTERNAL_SERVER_ERROR {
            let body = response.text().await?;
            return match serde_json::from_str::<HealthReport>(&body) {
                Ok(report) => Err(ApiError::Unhealthy(report)),
                Err(_) => Err(ApiError::Status {
                    status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                    message: body,
                }),
            };
        }

        let response = check_status(response).await?;
        Ok(response.json::<HealthReport>().await?)
    }
}
