//! Volume and storage pane.
//!
//! Volume state and protection state are visible to every user. Storage
//! cluster health, server state and capacity are only returned to provider
//! administrators; for everyone else that section stays empty.

use async_trait::async_trait;
use cloud_api::{ApiResult, StorageClusterRecord, VolumeRecord};
use parking_lot::Mutex;
use ratatui::{
    layout::Rect,
    style::Color,
    widgets::{Paragraph, Wrap},
    Frame,
};
use tracing::{debug, warn};

use crate::classify::{keep_nonzero, percent, Bucket, Histogram};
use crate::lock::RenderLock;
use crate::pane::{Pane, PaneContext};
use crate::ui::{bar_chart, fit, gauge, humanize_size};

const SUMMARY_HEIGHT: u16 = 3;
const GAUGE_HEIGHT: u16 = 3;

/// Operational state of a volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeState {
    /// Usable.
    Available,
    /// Broken.
    Failed,
    /// Reported as unknown by the storage backend.
    Unknown,
    /// Anything else, including a missing state.
    Other,
}

impl Bucket for VolumeState {
    const ALL: &'static [Self] = &[Self::Available, Self::Failed, Self::Unknown, Self::Other];

    fn index(self) -> usize {
        self as usize
    }

    fn label(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Failed => "Failed",
            Self::Unknown => "Unknown",
            Self::Other => "Other",
        }
    }

    fn color(self) -> Color {
        match self {
            Self::Available => Color::Green,
            Self::Failed | Self::Unknown => Color::Red,
            Self::Other => Color::Yellow,
        }
    }

    fn classify(state: Option<&str>) -> Self {
        match state {
            Some("Available") => Self::Available,
            Some("Failed") => Self::Failed,
            Some("Unknown") => Self::Unknown,
            _ => Self::Other,
        }
    }
}

/// Replication state of a volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtectionState {
    /// All replicas healthy.
    FullyProtected,
    /// Some replicas missing.
    Degraded,
    /// Writes are refused.
    ReadOnly,
    /// No replica reachable.
    NotAvailable,
    /// Anything else, including a missing state.
    Unknown,
}

impl Bucket for ProtectionState {
    const ALL: &'static [Self] = &[
        Self::FullyProtected,
        Self::Degraded,
        Self::ReadOnly,
        Self::NotAvailable,
        Self::Unknown,
    ];

    fn index(self) -> usize {
        self as usize
    }

    fn label(self) -> &'static str {
        match self {
            Self::FullyProtected => "Protected",
            Self::Degraded => "Degraded",
            Self::ReadOnly => "Read-Only",
            Self::NotAvailable => "N/A",
            Self::Unknown => "Unknown",
        }
    }

    fn color(self) -> Color {
        match self {
            Self::FullyProtected => Color::Green,
            Self::Degraded => Color::Yellow,
            Self::ReadOnly | Self::NotAvailable | Self::Unknown => Color::Red,
        }
    }

    fn classify(state: Option<&str>) -> Self {
        match state {
            Some("FullyProtected") => Self::FullyProtected,
            Some("Degraded") => Self::Degraded,
            Some("ReadOnly") => Self::ReadOnly,
            Some("NotAvailable") => Self::NotAvailable,
            _ => Self::Unknown,
        }
    }
}

/// Health of a storage cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageHealth {
    /// `OK`
    Ok,
    /// `Warning`
    Warning,
    /// `Error`
    Error,
    /// `None`, missing or unrecognized.
    Other,
}

impl Bucket for StorageHealth {
    const ALL: &'static [Self] = &[Self::Ok, Self::Warning, Self::Error, Self::Other];

    fn index(self) -> usize {
        self as usize
    }

    fn label(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warning => "Warning",
            Self::Error => "Error",
            Self::Other => "Other",
        }
    }

    fn color(self) -> Color {
        match self {
            Self::Ok => Color::Green,
            Self::Warning => Color::Yellow,
            Self::Error | Self::Other => Color::Red,
        }
    }

    fn classify(state: Option<&str>) -> Self {
        match state {
            Some("OK") => Self::Ok,
            Some("Warning") => Self::Warning,
            Some("Error") => Self::Error,
            _ => Self::Other,
        }
    }
}

/// State of a storage server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Serving.
    Enabled,
    /// Taken out of service.
    Disabled,
    /// Broken.
    Failed,
    /// Missing or unrecognized.
    Other,
}

impl Bucket for ServerState {
    const ALL: &'static [Self] = &[Self::Enabled, Self::Disabled, Self::Failed, Self::Other];

    fn index(self) -> usize {
        self as usize
    }

    fn label(self) -> &'static str {
        match self {
            Self::Enabled => "Enabled",
            Self::Disabled => "Disabled",
            Self::Failed => "Failed",
            Self::Other => "Other",
        }
    }

    fn color(self) -> Color {
        match self {
            Self::Enabled => Color::Green,
            Self::Disabled | Self::Other => Color::Yellow,
            Self::Failed => Color::Red,
        }
    }

    fn classify(state: Option<&str>) -> Self {
        match state {
            Some("Enabled") => Self::Enabled,
            Some("Disabled") => Self::Disabled,
            Some("Failed") => Self::Failed,
            _ => Self::Other,
        }
    }
}

/// Volume records reduced to chart data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolumeSummary {
    /// Operational states.
    pub state: Histogram<VolumeState>,
    /// Protection states.
    pub protection: Histogram<ProtectionState>,
    /// Sum of physically used bytes over all volumes reporting it.
    pub used_physical: i64,
}

impl VolumeSummary {
    /// Reduce volume records.
    ///
    /// A volume missing either state counts as `Other` and protection
    /// `Unknown`.
    #[must_use]
    pub fn from_records(volumes: &[VolumeRecord]) -> Self {
        let mut summary = Self::default();

        for volume in volumes {
            let (Some(state), Some(protection)) =
                (volume.state.as_deref(), volume.protection_state.as_deref())
            else {
                summary.state.add(VolumeState::Other);
                summary.protection.add(ProtectionState::Unknown);
                continue;
            };

            summary.state.add(VolumeState::classify(Some(state)));
            summary.protection.add(ProtectionState::classify(Some(protection)));

            if let Some(used) = volume
                .statistics
                .as_ref()
                .and_then(|s| s.physical_used_storage)
            {
                summary.used_physical = summary.used_physical.saturating_add(used);
            }
        }

        summary
    }

    /// Text of the volume info box.
    #[must_use]
    pub fn used_text(&self) -> String {
        format!(
            "Summed up physical size of volumes: {}",
            humanize_size(self.used_physical)
        )
    }
}

/// Storage cluster records reduced to chart and gauge data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StorageSummary {
    /// Cluster health.
    pub health: Histogram<StorageHealth>,
    /// Server states over all clusters.
    pub servers: Histogram<ServerState>,
    /// Free physical bytes of clusters with complete statistics.
    pub free_physical: i64,
    /// Used physical bytes of clusters with complete statistics.
    pub used_physical: i64,
    /// Sum of compression ratios of clusters with complete statistics.
    pub compression_sum: f64,
    /// Number of clusters with complete statistics.
    pub measured: u64,
}

impl StorageSummary {
    /// Reduce storage cluster records.
    #[must_use]
    pub fn from_records(clusters: &[StorageClusterRecord]) -> Self {
        let mut summary = Self::default();

        for cluster in clusters {
            let health = cluster.health.as_ref().and_then(|h| h.state.as_deref());
            summary.health.add(StorageHealth::classify(health));

            for server in &cluster.servers {
                summary.servers.add(ServerState::classify(server.state.as_deref()));
            }

            let Some(stats) = &cluster.statistics else {
                continue;
            };
            let (Some(free), Some(used), Some(ratio)) = (
                stats.free_physical_storage,
                stats.physical_used_storage,
                stats.compression_ratio,
            ) else {
                continue;
            };
            summary.free_physical = summary.free_physical.saturating_add(free);
            summary.used_physical = summary.used_physical.saturating_add(used);
            summary.compression_sum += ratio;
            summary.measured += 1;
        }

        summary
    }

    /// Free share of the physical capacity.
    #[must_use]
    pub fn free_percent(&self) -> Option<u16> {
        let free = self.free_physical.max(0) as u64;
        let total = free.saturating_add(self.used_physical.max(0) as u64);
        percent(free, total)
    }

    /// Mean compression ratio in percent. May exceed 100.
    #[must_use]
    pub fn compression_percent(&self) -> Option<u16> {
        if self.measured == 0 {
            return None;
        }
        let mean = self.compression_sum / self.measured as f64;
        Some((mean * 100.0).round().clamp(0.0, f64::from(u16::MAX)) as u16)
    }
}

/// Gauge color for the free space share.
#[must_use]
pub fn free_space_color(percent: u16) -> Color {
    match percent {
        0..10 => Color::Red,
        10..30 => Color::Yellow,
        _ => Color::Green,
    }
}

/// What the storage section currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
enum StorageSection {
    /// Never loaded, or cleared by a failed fetch.
    #[default]
    NotLoaded,
    /// The user may not read storage clusters.
    Restricted,
    /// Last storage data.
    Loaded(StorageView),
}

#[derive(Debug, Clone, Default, PartialEq)]
struct StorageView {
    health: Option<Histogram<StorageHealth>>,
    servers: Option<Histogram<ServerState>>,
    free: Option<u16>,
    compression: Option<u16>,
}

#[derive(Debug, Clone, Copy, Default)]
struct VolumeLayout {
    state: Rect,
    protection: Rect,
    summary: Rect,
    free: Rect,
    compression: Rect,
    health: Rect,
    servers: Rect,
}

impl VolumeLayout {
    fn compute(area: Rect) -> Self {
        let column = area.width.div_ceil(2);
        let row = area.height.div_ceil(2);
        let right_x = area.x.saturating_add(column);
        let right_width = area.width - column;

        let summary_y = area.y.saturating_add(row);
        let gauges_y = summary_y.saturating_add(SUMMARY_HEIGHT);
        let charts_y = gauges_y.saturating_add(GAUGE_HEIGHT);
        let charts_height = area.bottom().saturating_sub(charts_y);

        let place = |rect: Rect| fit(rect, area);
        Self {
            state: place(Rect::new(area.x, area.y, column, row)),
            protection: place(Rect::new(right_x, area.y, right_width, row)),
            summary: place(Rect::new(area.x, summary_y, area.width, SUMMARY_HEIGHT)),
            free: place(Rect::new(area.x, gauges_y, column, GAUGE_HEIGHT)),
            compression: place(Rect::new(right_x, gauges_y, right_width, GAUGE_HEIGHT)),
            health: place(Rect::new(area.x, charts_y, column, charts_height)),
            servers: place(Rect::new(right_x, charts_y, right_width, charts_height)),
        }
    }
}

#[derive(Debug, Default)]
struct VolumeView {
    layout: VolumeLayout,
    state: Option<Histogram<VolumeState>>,
    protection: Option<Histogram<ProtectionState>>,
    used_text: String,
    storage: StorageSection,
}

/// Volume health, for operators also storage cluster health.
#[derive(Debug)]
pub struct VolumePane {
    ctx: PaneContext,
    lock: RenderLock,
    view: Mutex<VolumeView>,
}

impl VolumePane {
    /// Create the pane.
    #[must_use]
    pub fn new(ctx: PaneContext) -> Self {
        Self {
            ctx,
            lock: RenderLock::new(),
            view: Mutex::new(VolumeView::default()),
        }
    }

    fn apply_volumes(&self, summary: VolumeSummary) {
        let mut view = self.view.lock();
        view.used_text = summary.used_text();
        view.state = keep_nonzero(summary.state, view.state.take());
        view.protection = keep_nonzero(summary.protection, view.protection.take());
    }

    fn apply_storage(&self, summary: &StorageSummary) {
        let mut view = self.view.lock();
        let previous = match std::mem::take(&mut view.storage) {
            StorageSection::Loaded(previous) => previous,
            _ => StorageView::default(),
        };
        view.storage = StorageSection::Loaded(StorageView {
            health: keep_nonzero(summary.health.clone(), previous.health),
            servers: keep_nonzero(summary.servers.clone(), previous.servers),
            free: summary.free_percent(),
            compression: summary.compression_percent(),
        });
    }

    fn set_storage(&self, section: StorageSection) {
        self.view.lock().storage = section;
    }
}

#[async_trait]
impl Pane for VolumePane {
    fn name(&self) -> &'static str {
        "Volumes"
    }

    fn description(&self) -> &'static str {
        "Volume health, for operators also cluster health"
    }

    fn resize(&self, area: Rect) {
        self.view.lock().layout = VolumeLayout::compute(area);
    }

    async fn render(&self) -> ApiResult<()> {
        let Some(_guard) = self.lock.try_acquire() else {
            debug!("volume render already in flight, skipping");
            return Ok(());
        };

        let filter = self.ctx.filter.volume_filter();
        let volumes = self
            .ctx
            .call("find_volumes", self.ctx.api.find_volumes(&filter))
            .await?;

        let partition = self.ctx.filter.partition.as_deref();
        let storage = self
            .ctx
            .call(
                "storage_cluster_info",
                self.ctx.api.storage_cluster_info(partition),
            )
            .await;

        let summary = VolumeSummary::from_records(&volumes);
        debug!(volumes = volumes.len(), used = summary.used_physical, "volume pane refreshed");
        self.apply_volumes(summary);

        match storage {
            Ok(clusters) if clusters.is_empty() => Ok(()),
            Ok(clusters) => {
                let summary = StorageSummary::from_records(&clusters);
                debug!(clusters = clusters.len(), measured = summary.measured, "storage info refreshed");
                self.apply_storage(&summary);
                Ok(())
            }
            Err(err) if err.is_forbidden() => {
                debug!("storage cluster info restricted to administrators");
                self.set_storage(StorageSection::Restricted);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "failed to fetch storage cluster info");
                self.set_storage(StorageSection::NotLoaded);
                Err(err)
            }
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let view = self.view.lock();
        let layout = view.layout;
        let theme = &self.ctx.theme;

        frame.render_widget(
            bar_chart("Volume State", view.state.as_ref(), theme),
            layout.state,
        );
        frame.render_widget(
            bar_chart("Volume Protection State", view.protection.as_ref(), theme),
            layout.protection,
        );
        frame.render_widget(
            Paragraph::new(view.used_text.as_str())
                .style(theme.text)
                .block(theme.block("Volume Infos"))
                .wrap(Wrap { trim: true }),
            layout.summary,
        );

        let empty = StorageView::default();
        let storage = match &view.storage {
            StorageSection::Loaded(storage) => storage,
            StorageSection::NotLoaded | StorageSection::Restricted => &empty,
        };
        let free_color = storage.free.map_or(theme.gauge_bar, free_space_color);
        frame.render_widget(
            gauge("Free Physical Space", storage.free, free_color, theme),
            layout.free,
        );
        frame.render_widget(
            gauge("Compression Ratio", storage.compression, theme.gauge_bar, theme),
            layout.compression,
        );
        frame.render_widget(
            bar_chart("Cluster State", storage.health.as_ref(), theme),
            layout.health,
        );
        frame.render_widget(
            bar_chart("Server State", storage.servers.as_ref(), theme),
            layout.servers,
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use cloud_api::{
        ApiError, StorageClusterHealth, StorageClusterStatistics, StorageServer, VolumeStatistics,
    };
    use proptest::prelude::*;
    use ratatui::{backend::TestBackend, Terminal};
    use test_case::test_case;

    use super::*;
    use crate::testing::{context, FakeCloudApi};

    fn volume(state: Option<&str>, protection: Option<&str>, used: Option<i64>) -> VolumeRecord {
        VolumeRecord {
            state: state.map(String::from),
            protection_state: protection.map(String::from),
            statistics: used.map(|u| VolumeStatistics {
                physical_used_storage: Some(u),
                logical_used_storage: None,
            }),
            ..VolumeRecord::default()
        }
    }

    fn storage(health: Option<&str>, servers: &[Option<&str>], stats: Option<(i64, i64, f64)>) -> StorageClusterRecord {
        StorageClusterRecord {
            health: Some(StorageClusterHealth {
                state: health.map(String::from),
            }),
            servers: servers
                .iter()
                .map(|s| StorageServer {
                    name: Some("srv".into()),
                    state: s.map(String::from),
                })
                .collect(),
            statistics: stats.map(|(free, used, ratio)| StorageClusterStatistics {
                free_physical_storage: Some(free),
                physical_used_storage: Some(used),
                compression_ratio: Some(ratio),
            }),
            ..StorageClusterRecord::default()
        }
    }

    fn pane(api: &Arc<FakeCloudApi>) -> VolumePane {
        let pane = VolumePane::new(context(api.clone()));
        pane.resize(Rect::new(0, 0, 100, 40));
        pane
    }

    #[test_case(Some("Available"), VolumeState::Available ; "available")]
    #[test_case(Some("Failed"), VolumeState::Failed ; "failed")]
    #[test_case(Some("Unknown"), VolumeState::Unknown ; "unknown")]
    #[test_case(Some("Migrating"), VolumeState::Other ; "other")]
    #[test_case(None, VolumeState::Other ; "missing")]
    fn classify_volume_state(state: Option<&str>, expected: VolumeState) {
        assert_eq!(VolumeState::classify(state), expected);
    }

    #[test_case(Some("FullyProtected"), ProtectionState::FullyProtected ; "protected")]
    #[test_case(Some("Degraded"), ProtectionState::Degraded ; "degraded")]
    #[test_case(Some("ReadOnly"), ProtectionState::ReadOnly ; "read only")]
    #[test_case(Some("NotAvailable"), ProtectionState::NotAvailable ; "not available")]
    #[test_case(Some("Rebuilding"), ProtectionState::Unknown ; "unrecognized")]
    fn classify_protection(state: Option<&str>, expected: ProtectionState) {
        assert_eq!(ProtectionState::classify(state), expected);
    }

    #[test_case(Some("OK"), StorageHealth::Ok ; "ok")]
    #[test_case(Some("Warning"), StorageHealth::Warning ; "warning")]
    #[test_case(Some("Error"), StorageHealth::Error ; "error")]
    #[test_case(Some("None"), StorageHealth::Other ; "none")]
    #[test_case(None, StorageHealth::Other ; "missing")]
    fn classify_storage_health(state: Option<&str>, expected: StorageHealth) {
        assert_eq!(StorageHealth::classify(state), expected);
    }

    #[test_case(Some("Enabled"), ServerState::Enabled ; "enabled")]
    #[test_case(Some("Disabled"), ServerState::Disabled ; "disabled")]
    #[test_case(Some("Failed"), ServerState::Failed ; "failed")]
    #[test_case(None, ServerState::Other ; "missing")]
    fn classify_server_state(state: Option<&str>, expected: ServerState) {
        assert_eq!(ServerState::classify(state), expected);
    }

    #[test_case(0, Color::Red ; "empty")]
    #[test_case(9, Color::Red ; "nine")]
    #[test_case(10, Color::Yellow ; "ten")]
    #[test_case(29, Color::Yellow ; "twenty nine")]
    #[test_case(30, Color::Green ; "thirty")]
    fn free_space_thresholds(percent: u16, expected: Color) {
        assert_eq!(free_space_color(percent), expected);
    }

    #[test]
    fn volume_missing_a_state_is_other_and_unknown() {
        let summary = VolumeSummary::from_records(&[
            volume(Some("Available"), None, Some(100)),
            volume(None, Some("FullyProtected"), None),
            volume(Some("Available"), Some("Degraded"), Some(1024)),
        ]);
        assert_eq!(summary.state.count(VolumeState::Other), 2);
        assert_eq!(summary.state.count(VolumeState::Available), 1);
        assert_eq!(summary.protection.count(ProtectionState::Unknown), 2);
        assert_eq!(summary.protection.count(ProtectionState::Degraded), 1);
        assert_eq!(summary.used_physical, 1024);
        assert_eq!(summary.used_text(), "Summed up physical size of volumes: 1.0 KiB");
    }

    #[test]
    fn storage_summary_skips_incomplete_statistics() {
        let mut partial = storage(Some("Warning"), &[None], Some((50, 50, 9.0)));
        if let Some(stats) = partial.statistics.as_mut() {
            stats.compression_ratio = None;
        }
        let summary = StorageSummary::from_records(&[
            storage(Some("OK"), &[Some("Enabled"), Some("Failed")], Some((25, 75, 1.5))),
            partial,
            StorageClusterRecord::default(),
        ]);

        assert_eq!(summary.health.count(StorageHealth::Ok), 1);
        assert_eq!(summary.health.count(StorageHealth::Warning), 1);
        assert_eq!(summary.health.count(StorageHealth::Other), 1);
        assert_eq!(summary.servers.count(ServerState::Enabled), 1);
        assert_eq!(summary.servers.count(ServerState::Failed), 1);
        assert_eq!(summary.servers.count(ServerState::Other), 1);
        assert_eq!(summary.measured, 1);
        assert_eq!(summary.free_percent(), Some(25));
        assert_eq!(summary.compression_percent(), Some(150));
    }

    #[test]
    fn free_space_of_petabyte_scale_partition() {
        const PIB: i64 = 1 << 50;
        let summary = StorageSummary::from_records(&[
            storage(Some("OK"), &[], Some((300 * PIB, 100 * PIB, 1.0))),
            storage(Some("OK"), &[], Some((i64::MAX, i64::MAX, 1.0))),
        ]);
        assert_eq!(summary.free_physical, i64::MAX);
        assert_eq!(summary.free_percent(), Some(50));

        let summary =
            StorageSummary::from_records(&[storage(Some("OK"), &[], Some((300 * PIB, 100 * PIB, 1.0)))]);
        assert_eq!(summary.free_percent(), Some(75));
    }

    #[test]
    fn storage_gauges_skipped_without_statistics() {
        let summary = StorageSummary::from_records(&[storage(Some("OK"), &[], None)]);
        assert_eq!(summary.free_percent(), None);
        assert_eq!(summary.compression_percent(), None);
    }

    #[tokio::test]
    async fn forbidden_storage_is_partial_success() {
        let api = Arc::new(FakeCloudApi::new().with_volumes(vec![volume(
            Some("Available"),
            Some("FullyProtected"),
            Some(10),
        )]));
        api.set_storage(Err(ApiError::Forbidden("admins only".into())));
        let pane = pane(&api);

        pane.render().await.expect("forbidden is not an error");

        let view = pane.view.lock();
        assert_eq!(
            view.state.as_ref().map(|h| h.count(VolumeState::Available)),
            Some(1)
        );
        assert_eq!(view.storage, StorageSection::Restricted);
    }

    #[tokio::test]
    async fn storage_failure_is_surfaced_and_section_cleared() {
        let api = Arc::new(
            FakeCloudApi::new()
                .with_volumes(vec![volume(Some("Failed"), Some("Degraded"), None)])
                .with_storage(vec![storage(Some("OK"), &[Some("Enabled")], Some((1, 1, 1.0)))]),
        );
        let pane = pane(&api);
        pane.render().await.expect("render");
        assert!(matches!(pane.view.lock().storage, StorageSection::Loaded(_)));

        api.set_storage(Err(ApiError::Status {
            status: 502,
            message: "bad gateway".into(),
        }));
        let err = pane.render().await.expect_err("storage failure");

        assert!(matches!(err, ApiError::Status { status: 502, .. }));
        let view = pane.view.lock();
        assert_eq!(view.storage, StorageSection::NotLoaded);
        assert_eq!(
            view.state.as_ref().map(|h| h.count(VolumeState::Failed)),
            Some(1)
        );
        drop(view);
        assert!(!pane.lock.is_busy());
    }

    #[tokio::test]
    async fn storage_filter_uses_partition() {
        let api = Arc::new(FakeCloudApi::new());
        let pane = pane(&api);
        pane.render().await.expect("render");

        let filter = api.last_volume_filter().expect("volumes fetched");
        assert_eq!(filter.tenant_id.as_deref(), Some("t1"));
        assert_eq!(filter.partition_id.as_deref(), Some("fra-1"));
        assert_eq!(api.last_storage_partition().as_deref(), Some("fra-1"));
    }

    #[tokio::test]
    async fn empty_volume_list_keeps_charts() {
        let api = Arc::new(FakeCloudApi::new().with_volumes(vec![volume(
            Some("Available"),
            Some("FullyProtected"),
            Some(2048),
        )]));
        let pane = pane(&api);
        pane.render().await.expect("render");

        api.set_volumes(Ok(Vec::new()));
        pane.render().await.expect("render");

        let view = pane.view.lock();
        assert_eq!(
            view.protection.as_ref().map(|h| h.count(ProtectionState::FullyProtected)),
            Some(1)
        );
        assert_eq!(view.used_text, "Summed up physical size of volumes: 0 B");
    }

    #[tokio::test]
    async fn render_is_noop_while_locked() {
        let api = Arc::new(FakeCloudApi::new());
        let pane = pane(&api);

        let held = pane.lock.try_acquire().expect("free");
        pane.render().await.expect("skipped");
        drop(held);

        assert_eq!(api.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn volume_timeout_keeps_charts() {
        let api = Arc::new(FakeCloudApi::new().with_volumes(vec![volume(
            Some("Available"),
            Some("FullyProtected"),
            None,
        )]));
        let pane = pane(&api);
        pane.render().await.expect("render");

        api.set_delay(Duration::from_secs(6));
        let err = pane.render().await.expect_err("deadline exceeded");

        assert!(matches!(err, ApiError::Timeout("find_volumes")));
        assert_eq!(
            pane.view.lock().state.as_ref().map(|h| h.count(VolumeState::Available)),
            Some(1)
        );
    }

    #[test]
    fn layout_is_relative_to_area() {
        let layout = VolumeLayout::compute(Rect::new(0, 5, 101, 35));
        assert_eq!(layout.state, Rect::new(0, 5, 51, 18));
        assert_eq!(layout.protection, Rect::new(51, 5, 50, 18));
        assert_eq!(layout.summary, Rect::new(0, 23, 101, 3));
        assert_eq!(layout.free, Rect::new(0, 26, 51, 3));
        assert_eq!(layout.compression, Rect::new(51, 26, 50, 3));
        assert_eq!(layout.health, Rect::new(0, 29, 51, 11));
        assert_eq!(layout.servers, Rect::new(51, 29, 50, 11));
    }

    #[tokio::test]
    async fn draw_shows_summary_and_ratio_label() {
        let api = Arc::new(
            FakeCloudApi::new()
                .with_volumes(vec![volume(Some("Available"), Some("FullyProtected"), Some(1536))])
                .with_storage(vec![storage(Some("OK"), &[Some("Enabled")], Some((30, 70, 2.0)))]),
        );
        let pane = pane(&api);
        pane.render().await.expect("render");

        let mut terminal = Terminal::new(TestBackend::new(100, 40)).expect("terminal");
        terminal.draw(|frame| pane.draw(frame)).expect("draw");

        let rendered: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(rendered.contains("Summed up physical size of volumes: 1.5 KiB"));
        assert!(rendered.contains("200%"));
        assert!(rendered.contains("30%"));
    }

    proptest! {
        #[test]
        fn volume_buckets_sum_to_record_count(
            records in proptest::collection::vec(
                (
                    proptest::option::of(prop_oneof![Just("Available"), Just("Failed"), Just("bogus")]),
                    proptest::option::of(prop_oneof![Just("FullyProtected"), Just("ReadOnly"), Just("")]),
                ),
                0..48,
            )
        ) {
            let volumes: Vec<_> = records
                .iter()
                .map(|(state, protection)| volume(*state, *protection, None))
                .collect();
            let summary = VolumeSummary::from_records(&volumes);
            prop_assert_eq!(summary.state.total(), volumes.len() as u64);
            prop_assert_eq!(summary.protection.total(), volumes.len() as u64);
        }
    }
}
