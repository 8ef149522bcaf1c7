//! # cloud-dashboard
//!
//! Live terminal dashboard for `cloudctl`.
//!
//! The dashboard shows a status header (API version and health), the active
//! filters, a tab strip and one pane per data domain:
//!
//! - **Clusters**: last operation states, health condition gauges, failing
//!   conditions and last errors
//! - **Volumes**: volume and protection states, used space and, for
//!   administrators, storage cluster health and capacity
//!
//! Every refresh is guarded by a [`RenderLock`]: a refresh requested while
//! another one runs is dropped. Every API call is bounded by the configured
//! request timeout.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cloud_api::HttpCloudApi;
//! use cloud_dashboard::{run, DashboardConfig, FilterContext};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let api = Arc::new(HttpCloudApi::new("https://cloud.example.com/cloud", None)?);
//! let config = DashboardConfig::new(FilterContext::new(Some("acme".into()), None, None));
//! run(api, config).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod app;
pub mod classify;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod events;
pub mod lock;
pub mod pane;
pub mod panes;
pub mod terminal;
pub mod theme;
pub mod ui;

#[cfg(test)]
mod testing;

pub use app::run;
pub use config::{DashboardConfig, FilterContext, DEFAULT_REFRESH_INTERVAL, DEFAULT_REQUEST_TIMEOUT};
pub use dashboard::{Dashboard, DashboardLayout, RenderOutcome};
pub use error::{DashboardError, DashboardResult};
pub use lock::RenderLock;
pub use pane::{Pane, PaneContext, TabSet};
pub use theme::{Theme, THEMES};
