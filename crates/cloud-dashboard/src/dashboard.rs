//! The dashboard controller: header, tab strip and the active pane.

use std::sync::Arc;

use chrono::{DateTime, Local};
use cloud_api::{with_deadline, ApiError, ApiResult, CloudApi, HealthReport, HealthStatus};
use parking_lot::Mutex;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Tabs},
    Frame,
};
use tracing::{debug, warn};

use crate::config::DashboardConfig;
use crate::error::DashboardResult;
use crate::lock::RenderLock;
use crate::pane::{Pane, PaneContext, TabSet};
use crate::panes::default_panes;
use crate::theme::Theme;

const HEADER_HEIGHT: u16 = 5;
const FILTER_WIDTH: u16 = 25;
const HELP_LINE: &str = "Switch between tabs with number keys. Press q to quit.";

/// Screen areas of the controller's widgets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardLayout {
    /// Versions, health and last update.
    pub status: Rect,
    /// Active filters.
    pub filters: Rect,
    /// Area handed to the panes.
    pub body: Rect,
    /// Tab strip on the last row.
    pub tabs: Rect,
}

impl DashboardLayout {
    /// Split `area` into header, body and tab strip.
    #[must_use]
    pub fn compute(area: Rect) -> Self {
        let header = HEADER_HEIGHT.min(area.height);
        let filter_width = FILTER_WIDTH.min(area.width);
        let tabs_height = u16::from(area.height > header);

        Self {
            status: Rect::new(area.x, area.y, area.width - filter_width, header),
            filters: Rect::new(area.right() - filter_width, area.y, filter_width, header),
            body: Rect::new(
                area.x,
                area.y + header,
                area.width,
                area.height - header - tabs_height,
            ),
            tabs: Rect::new(area.x, area.bottom() - tabs_height, area.width, tabs_height),
        }
    }
}

/// Result of one [`Dashboard::render`] call.
#[derive(Debug)]
pub enum RenderOutcome {
    /// Another render was in flight; nothing was done.
    Busy,
    /// Header and active pane refreshed.
    Completed,
    /// The refresh stopped at this error. It is shown in the status line.
    Failed(ApiError),
}

/// What the status header shows.
#[derive(Debug, Clone, Default)]
struct StatusState {
    api_version: Option<String>,
    health: Option<HealthReport>,
    last_error: Option<String>,
    last_update: Option<DateTime<Local>>,
}

/// Owns the panes and drives a refresh of header and active pane.
pub struct Dashboard {
    api: Arc<dyn CloudApi>,
    config: DashboardConfig,
    theme: Theme,
    tabs: TabSet,
    lock: RenderLock,
    layout: DashboardLayout,
    status: Mutex<StatusState>,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("config", &self.config)
            .field("tabs", &self.tabs)
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

impl Dashboard {
    /// Build the dashboard and its panes.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Config`](crate::DashboardError::Config) for an
    /// invalid interval, an unknown theme or an unknown initial tab.
    pub fn new(api: Arc<dyn CloudApi>, config: DashboardConfig) -> DashboardResult<Self> {
        config.validate()?;
        let theme = Theme::by_name(&config.theme)?;

        let ctx = PaneContext {
            api: Arc::clone(&api),
            filter: config.filter.clone(),
            theme,
            request_timeout: config.request_timeout,
        };
        let mut tabs = TabSet::new(default_panes(&ctx))?;

        if let Some(name) = &config.initial_tab {
            let index = tabs.find_index_by_name(name)?;
            tabs.select(index);
        }

        Ok(Self {
            api,
            config,
            theme,
            tabs,
            lock: RenderLock::new(),
            layout: DashboardLayout::default(),
            status: Mutex::new(StatusState::default()),
        })
    }

    /// The configuration the dashboard was built with.
    #[must_use]
    pub const fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Current layout.
    #[must_use]
    pub const fn layout(&self) -> DashboardLayout {
        self.layout
    }

    /// Number of tabs.
    #[must_use]
    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    /// The active pane.
    #[must_use]
    pub fn active_pane(&self) -> &dyn Pane {
        self.tabs.active()
    }

    /// Recompute the layout for a terminal of size `area`.
    pub fn resize(&mut self, area: Rect) {
        self.layout = DashboardLayout::compute(area);
        for pane in self.tabs.iter() {
            pane.resize(self.layout.body);
        }
    }

    /// Activate tab `index`. Returns false if there is no such tab.
    pub fn select_tab(&mut self, index: usize) -> bool {
        self.tabs.select(index)
    }

    /// Activate the next tab.
    pub fn next_tab(&mut self) {
        self.tabs.next();
    }

    /// Activate the previous tab.
    pub fn previous_tab(&mut self) {
        self.tabs.previous();
    }

    /// Scroll the tables of the active pane.
    pub fn scroll(&self, delta: isize) {
        self.tabs.active().scroll(delta);
    }

    /// Refresh the header and the active pane.
    ///
    /// Returns [`RenderOutcome::Busy`] at once if a render is in flight.
    /// The status line is updated on every other path.
    pub async fn render(&self) -> RenderOutcome {
        let Some(_guard) = self.lock.try_acquire() else {
            debug!("dashboard render already in flight, skipping");
            return RenderOutcome::Busy;
        };

        let mut status = StatusState::default();
        let result = self.refresh(&mut status).await;

        status.last_error = result.as_ref().err().map(ToString::to_string);
        status.last_update = Some(Local::now());
        *self.status.lock() = status;

        match result {
            Ok(()) => RenderOutcome::Completed,
            Err(err) => {
                warn!(error = %err, tab = self.tabs.active().name(), "dashboard refresh failed");
                RenderOutcome::Failed(err)
            }
        }
    }

    async fn refresh(&self, status: &mut StatusState) -> ApiResult<()> {
        let deadline = self.config.request_timeout;

        let version = with_deadline("version", deadline, self.api.version()).await?;
        status.api_version = Some(version.version);

        let health = match with_deadline("health", deadline, self.api.health()).await {
            Ok(report) | Err(ApiError::Unhealthy(report)) => report,
            Err(err) => return Err(err),
        };
        status.health = Some(health);

        self.tabs.active().render().await
    }

    /// Paint header, tab strip and the active pane.
    pub fn draw(&self, frame: &mut Frame) {
        let layout = self.layout;

        frame.render_widget(
            Paragraph::new(self.status_lines())
                .style(self.theme.text)
                .block(self.theme.block("Cloud Dashboard")),
            layout.status,
        );

        let filters: Vec<Line> = self
            .config
            .filter
            .header_lines()
            .into_iter()
            .map(Line::from)
            .collect();
        frame.render_widget(
            Paragraph::new(filters)
                .style(self.theme.text)
                .block(self.theme.block("Filters")),
            layout.filters,
        );

        let titles: Vec<String> = self
            .tabs
            .names()
            .iter()
            .enumerate()
            .map(|(i, name)| format!("({}) {name}", i + 1))
            .collect();
        frame.render_widget(
            Tabs::new(titles)
                .select(self.tabs.active_index())
                .style(self.theme.tab_inactive)
                .highlight_style(self.theme.tab_active),
            layout.tabs,
        );

        self.tabs.active().draw(frame);
    }

    fn status_lines(&self) -> Vec<Line<'static>> {
        let status = self.status.lock();

        let version = status.api_version.as_deref().unwrap_or("unknown");
        let version_line = Line::from(vec![
            Span::raw(format!("cloud-api {version} (API Health: ")),
            health_span(status.health.as_ref()),
            Span::raw(format!("), cloudctl {}", self.config.client_version)),
        ]);

        let updated = status
            .last_update
            .map_or_else(|| "-".to_string(), |t| t.format("%H:%M:%S").to_string());
        let mut fetch_line = vec![Span::raw(format!("Last Update: {updated}"))];
        if let Some(err) = &status.last_error {
            fetch_line.push(Span::raw(", "));
            fetch_line.push(Span::styled(
                format!("Update Error: {err}"),
                Style::default().fg(Color::Red),
            ));
        }

        vec![version_line, Line::from(fetch_line), Line::from(HELP_LINE)]
    }
}

/// Health status colored by severity.
fn health_span(report: Option<&HealthReport>) -> Span<'static> {
    let Some(report) = report else {
        return Span::raw("unknown");
    };
    let color = match report.status {
        HealthStatus::Healthy => Color::Green,
        HealthStatus::Degraded | HealthStatus::PartiallyUnhealthy => Color::Yellow,
        HealthStatus::Unhealthy => Color::Red,
        HealthStatus::Unknown => return Span::raw(report.status.as_str()),
    };

    let text = if report.status == HealthStatus::Unhealthy && !report.message.is_empty() {
        format!("{} ({})", report.status, report.message)
    } else {
        report.status.to_string()
    };
    Span::styled(text, Style::default().fg(color))
}
