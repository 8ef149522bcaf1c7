//! Dashboard panes.

mod cluster;
mod volume;

pub use cluster::{ClusterOperation, ClusterPane, ClusterSummary, HealthCondition};
pub use volume::{
    free_space_color, ProtectionState, ServerState, StorageHealth, StorageSummary, VolumePane,
    VolumeState, VolumeSummary,
};

use crate::pane::{Pane, PaneContext};

/// The panes of the dashboard in tab order.
pub fn default_panes(ctx: &PaneContext) -> Vec<Box<dyn Pane>> {
    vec![
        Box::new(ClusterPane::new(ctx.clone())) as Box<dyn Pane>,
        Box::new(VolumePane::new(ctx.clone())) as Box<dyn Pane>,
    ]
}
