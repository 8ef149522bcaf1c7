//! The pane contract and the ordered set of tabs.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cloud_api::{with_deadline, ApiResult, CloudApi};
use ratatui::layout::Rect;
use ratatui::Frame;

use crate::config::FilterContext;
use crate::error::{DashboardError, DashboardResult};
use crate::theme::Theme;

/// A self-rendering region of the dashboard tied to one data domain.
///
/// `render` fetches and reduces data into the pane's snapshot; `draw` paints
/// the snapshot. Panes guard `render` with their own
/// [`RenderLock`](crate::lock::RenderLock).
#[async_trait]
pub trait Pane: Send + Sync {
    /// Tab name.
    fn name(&self) -> &'static str;

    /// One-line description of what the pane shows.
    fn description(&self) -> &'static str;

    /// Lay the pane's widgets out inside `area`.
    fn resize(&self, area: Rect);

    /// Fetch fresh data and update the snapshot.
    ///
    /// Returns `Ok(())` without doing anything if a render is in flight.
    async fn render(&self) -> ApiResult<()>;

    /// Paint the last snapshot.
    fn draw(&self, frame: &mut Frame);

    /// Scroll the pane's tables by `delta` rows.
    fn scroll(&self, _delta: isize) {}
}

/// Everything a pane needs to fetch and style its data.
#[derive(Clone)]
pub struct PaneContext {
    /// API client.
    pub api: Arc<dyn CloudApi>,
    /// Resource filter.
    pub filter: FilterContext,
    /// Widget styles.
    pub theme: Theme,
    /// Deadline of each API call.
    pub request_timeout: Duration,
}

impl std::fmt::Debug for PaneContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaneContext")
            .field("filter", &self.filter)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

impl PaneContext {
    /// Run an API call under the configured deadline.
    pub async fn call<T, F>(&self, op: &'static str, call: F) -> ApiResult<T>
    where
        F: std::future::Future<Output = ApiResult<T>> + Send,
    {
        with_deadline(op, self.request_timeout, call).await
    }
}

/// Ordered panes with the index of the active one.
pub struct TabSet {
    panes: Vec<Box<dyn Pane>>,
    active: usize,
}

impl std::fmt::Debug for TabSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabSet")
            .field("names", &self.names())
            .field("active", &self.active)
            .finish()
    }
}

impl TabSet {
    /// Create a tab set. The first pane is active.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Config`] if `panes` is empty.
    pub fn new(panes: Vec<Box<dyn Pane>>) -> DashboardResult<Self> {
        if panes.is_empty() {
            return Err(DashboardError::Config("dashboard needs at least one tab".into()));
        }
        Ok(Self { panes, active: 0 })
    }

    /// Number of tabs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.panes.len()
    }

    /// Always false; a tab set has at least one pane.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.panes.is_empty()
    }

    /// Index of the active tab.
    #[must_use]
    pub const fn active_index(&self) -> usize {
        self.active
    }

    /// The active pane.
    #[must_use]
    pub fn active(&self) -> &dyn Pane {
        self.panes[self.active].as_ref()
    }

    /// All panes in tab order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Pane> {
        self.panes.iter().map(|p| &**p)
    }

    /// Tab names in order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.iter().map(|p| p.name()).collect()
    }

    /// Activate tab `index`. Returns false for an out-of-range index.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.panes.len() {
            return false;
        }
        self.active = index;
        true
    }

    /// Activate the next tab, wrapping around.
    pub fn next(&mut self) {
        self.active = (self.active + 1) % self.panes.len();
    }

    /// Activate the previous tab, wrapping around.
    pub fn previous(&mut self) {
        self.active = self.active.checked_sub(1).unwrap_or(self.panes.len() - 1);
    }

    /// Index of the tab called `name`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Config`] naming the available tabs.
    pub fn find_index_by_name(&self, name: &str) -> DashboardResult<usize> {
        self.iter()
            .position(|p| p.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                let available: Vec<String> = self
                    .iter()
                    .map(|p| format!("{} ({})", p.name().to_lowercase(), p.description()))
                    .collect();
                DashboardError::Config(format!(
                    "tab with name {name:?} not found, available: {}",
                    available.join(", ")
                ))
            })
    }
}
