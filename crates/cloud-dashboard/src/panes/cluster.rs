//! Cluster health pane.
//!
//! Shows the state of the last cluster operation as a bar chart, the share of
//! clusters passing each health condition as gauges, and two tables: failing
//! conditions and errors of the last operation.

use async_trait::async_trait;
use cloud_api::{ApiResult, ClusterRecord};
use parking_lot::Mutex;
use ratatui::{
    layout::Rect,
    style::Color,
    widgets::TableState,
    Frame,
};
use tracing::debug;

use crate::classify::{keep_nonzero, percent, sort_newest_first, Bucket, Histogram, Problem};
use crate::lock::RenderLock;
use crate::pane::{Pane, PaneContext};
use crate::ui::{bar_chart, fit, gauge, problem_table};

const CHART_WIDTH: u16 = 48;
const CHART_HEIGHT: u16 = 12;
const GAUGE_OFFSET: u16 = 50;
const GAUGE_HEIGHT: u16 = 3;

/// State of a cluster's last operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterOperation {
    /// Operation finished.
    Succeeded,
    /// Operation running.
    Processing,
    /// Anything else, including a missing state.
    Unhealthy,
}

impl Bucket for ClusterOperation {
    const ALL: &'static [Self] = &[Self::Succeeded, Self::Processing, Self::Unhealthy];

    fn index(self) -> usize {
        self as usize
    }

    fn label(self) -> &'static str {
        match self {
            Self::Succeeded => "Succeeded",
            Self::Processing => "Progressing",
            Self::Unhealthy => "Unhealthy",
        }
    }

    fn color(self) -> Color {
        match self {
            Self::Succeeded => Color::Green,
            Self::Processing => Color::Yellow,
            Self::Unhealthy => Color::Red,
        }
    }

    fn classify(state: Option<&str>) -> Self {
        match state {
            Some("Succeeded") => Self::Succeeded,
            Some("Processing") => Self::Processing,
            _ => Self::Unhealthy,
        }
    }
}

/// Health conditions tracked by the gauges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthCondition {
    /// `APIServerAvailable`
    Api,
    /// `ControlPlaneHealthy`
    ControlPlane,
    /// `EveryNodeReady`
    Nodes,
    /// `SystemComponentsHealthy`
    System,
}

impl HealthCondition {
    /// All conditions in gauge order.
    pub const ALL: [Self; 4] = [Self::Api, Self::ControlPlane, Self::Nodes, Self::System];

    /// Map an API condition type.
    #[must_use]
    pub fn from_type(kind: &str) -> Option<Self> {
        match kind {
            "APIServerAvailable" => Some(Self::Api),
            "ControlPlaneHealthy" => Some(Self::ControlPlane),
            "EveryNodeReady" => Some(Self::Nodes),
            "SystemComponentsHealthy" => Some(Self::System),
            _ => None,
        }
    }

    /// Gauge title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Api => "API",
            Self::ControlPlane => "Control",
            Self::Nodes => "Nodes",
            Self::System => "System",
        }
    }
}

/// A condition status that does not indicate a problem.
fn condition_ok(status: &str) -> bool {
    matches!(status, "True" | "Progressing")
}

/// Cluster records reduced to chart, gauge and table data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterSummary {
    /// Last operation states.
    pub operation: Histogram<ClusterOperation>,
    /// Clusters passing each [`HealthCondition`], in [`HealthCondition::ALL`] order.
    pub healthy: [u64; 4],
    /// Failing conditions, newest first.
    pub problems: Vec<Problem>,
    /// Last operation errors, newest first.
    pub last_errors: Vec<Problem>,
    /// Number of records reduced.
    pub total: u64,
}

impl ClusterSummary {
    /// Reduce cluster records.
    ///
    /// A cluster without a last-operation state counts as unhealthy and its
    /// conditions and errors are not inspected.
    #[must_use]
    pub fn from_records(clusters: &[ClusterRecord]) -> Self {
        let mut summary = Self {
            total: clusters.len() as u64,
            ..Self::default()
        };

        for cluster in clusters {
            let Some(status) = &cluster.status else {
                summary.operation.add(ClusterOperation::Unhealthy);
                continue;
            };
            let state = status
                .last_operation
                .as_ref()
                .and_then(|op| op.state.as_deref())
                .filter(|s| !s.is_empty());
            let Some(state) = state else {
                summary.operation.add(ClusterOperation::Unhealthy);
                continue;
            };
            summary.operation.add(ClusterOperation::classify(Some(state)));

            let name = cluster.name.as_deref();
            for condition in &status.conditions {
                let (Some(kind), Some(condition_status)) =
                    (condition.kind.as_deref(), condition.status.as_deref())
                else {
                    continue;
                };

                if !condition_ok(condition_status) {
                    let message = condition.message.as_ref().map(|m| format!("({kind}) {m}"));
                    summary.problems.extend(Problem::from_parts(
                        name,
                        message,
                        condition.last_update_time.as_deref(),
                    ));
                    continue;
                }

                if let Some(tracked) = HealthCondition::from_type(kind) {
                    summary.healthy[tracked as usize] += 1;
                }
            }

            for error in &status.last_errors {
                summary.last_errors.extend(Problem::from_parts(
                    name,
                    error.description.clone(),
                    error.last_update_time.as_deref(),
                ));
            }
        }

        sort_newest_first(&mut summary.problems);
        sort_newest_first(&mut summary.last_errors);
        summary
    }

    /// Share of clusters passing `condition`, `None` without clusters.
    #[must_use]
    pub fn healthy_percent(&self, condition: HealthCondition) -> Option<u16> {
        percent(self.healthy[condition as usize], self.total)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct ClusterLayout {
    area: Rect,
    chart: Rect,
    gauges: [Rect; 4],
    problems: Rect,
    last_errors: Rect,
}

impl ClusterLayout {
    fn compute(area: Rect) -> Self {
        let chart = Rect::new(area.x, area.y, CHART_WIDTH, CHART_HEIGHT);

        let gauge_x = area.x.saturating_add(GAUGE_OFFSET);
        let gauge_width = area.width.saturating_sub(GAUGE_OFFSET);
        let gauges = [0, 1, 2, 3].map(|i| {
            Rect::new(gauge_x, area.y + i * GAUGE_HEIGHT, gauge_width, GAUGE_HEIGHT)
        });

        let tables_y = area.y.saturating_add(CHART_HEIGHT);
        let tables_height = area.height.saturating_sub(CHART_HEIGHT);
        let first = tables_height.div_ceil(2);
        let problems = Rect::new(area.x, tables_y, area.width, first);
        let last_errors = Rect::new(
            area.x,
            tables_y.saturating_add(first),
            area.width,
            tables_height - first,
        );

        Self {
            area,
            chart: fit(chart, area),
            gauges: gauges.map(|g| fit(g, area)),
            problems: fit(problems, area),
            last_errors: fit(last_errors, area),
        }
    }
}

/// Widget data kept between renders.
#[derive(Debug, Default)]
struct ClusterView {
    layout: ClusterLayout,
    operation: Option<Histogram<ClusterOperation>>,
    gauges: [Option<u16>; 4],
    problems: Vec<Problem>,
    last_errors: Vec<Problem>,
    scroll: usize,
}

/// Cluster health and issues.
#[derive(Debug)]
pub struct ClusterPane {
    ctx: PaneContext,
    lock: RenderLock,
    view: Mutex<ClusterView>,
}

impl ClusterPane {
    /// Create the pane.
    #[must_use]
    pub fn new(ctx: PaneContext) -> Self {
        Self {
            ctx,
            lock: RenderLock::new(),
            view: Mutex::new(ClusterView::default()),
        }
    }

    fn apply(&self, summary: ClusterSummary) {
        let mut view = self.view.lock();

        view.operation = keep_nonzero(summary.operation.clone(), view.operation.take());
        view.gauges = HealthCondition::ALL.map(|c| summary.healthy_percent(c));
        view.problems = summary.problems;
        view.last_errors = summary.last_errors;

        let longest = view.problems.len().max(view.last_errors.len());
        view.scroll = view.scroll.min(longest.saturating_sub(1));
    }
}

#[async_trait]
impl Pane for ClusterPane {
    fn name(&self) -> &'static str {
        "Clusters"
    }

    fn description(&self) -> &'static str {
        "Cluster health and issues"
    }

    fn resize(&self, area: Rect) {
        self.view.lock().layout = ClusterLayout::compute(area);
    }

    async fn render(&self) -> ApiResult<()> {
        let Some(_guard) = self.lock.try_acquire() else {
            debug!("cluster render already in flight, skipping");
            return Ok(());
        };

        let filter = self.ctx.filter.cluster_filter();
        let clusters = self
            .ctx
            .call("find_clusters", self.ctx.api.find_clusters(&filter))
            .await?;

        if clusters.is_empty() {
            debug!("no clusters match the filter");
            return Ok(());
        }

        let summary = ClusterSummary::from_records(&clusters);
        debug!(
            clusters = summary.total,
            problems = summary.problems.len(),
            last_errors = summary.last_errors.len(),
            "cluster pane refreshed"
        );
        self.apply(summary);
        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        let view = self.view.lock();
        let layout = view.layout;
        let theme = &self.ctx.theme;

        frame.render_widget(
            bar_chart("Cluster Operation", view.operation.as_ref(), theme),
            layout.chart,
        );

        for (i, condition) in HealthCondition::ALL.iter().enumerate() {
            frame.render_widget(
                gauge(condition.title(), view.gauges[i], Color::Green, theme),
                layout.gauges[i],
            );
        }

        let mut state = TableState::default().with_offset(view.scroll);
        frame.render_stateful_widget(
            problem_table("Cluster Problems", &view.problems, theme),
            layout.problems,
            &mut state,
        );
        let mut state = TableState::default().with_offset(view.scroll);
        frame.render_stateful_widget(
            problem_table("Last Errors", &view.last_errors, theme),
            layout.last_errors,
            &mut state,
        );
    }

    fn scroll(&self, delta: isize) {
        let mut view = self.view.lock();
        let longest = view.problems.len().max(view.last_errors.len());
        view.scroll = view
            .scroll
            .saturating_add_signed(delta)
            .min(longest.saturating_sub(1));
    }
}
