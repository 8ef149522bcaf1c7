//! The dashboard event loop.

use std::sync::Arc;

use cloud_api::CloudApi;
use ratatui::layout::Rect;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::config::DashboardConfig;
use crate::dashboard::{Dashboard, RenderOutcome};
use crate::error::DashboardResult;
use crate::events::{action_for_key, Action, AppEvent, EventHandler};
use crate::terminal::TerminalSession;

/// What the loop does after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Nothing changed.
    Idle,
    /// Repaint without fetching.
    Redraw,
    /// Fetch and repaint.
    Refresh,
    /// Clear the screen, fetch and repaint.
    Reset,
    /// Leave the loop.
    Quit,
}

/// Run the dashboard until the user quits.
///
/// The configuration is checked before the terminal is touched, so a bad
/// theme or tab name is reported on a normal screen.
pub async fn run(api: Arc<dyn CloudApi>, config: DashboardConfig) -> DashboardResult<()> {
    let mut dashboard = Dashboard::new(api, config)?;
    let refresh_interval = dashboard.config().refresh_interval;

    let mut session = TerminalSession::enter()?;
    let mut events = EventHandler::new();

    dashboard.resize(session.area()?);
    log_outcome(dashboard.render().await);
    session.draw(&dashboard)?;

    let mut ticker = interval(refresh_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // the first tick completes immediately and the initial render is done
    ticker.tick().await;

    info!(interval = ?refresh_interval, tab = dashboard.active_pane().name(), "dashboard started");

    loop {
        let step = tokio::select! {
            event = events.next() => match event {
                Some(event) => handle_event(&mut dashboard, event),
                None => Step::Quit,
            },
            _ = ticker.tick() => Step::Refresh,
        };

        match step {
            Step::Quit => break,
            Step::Idle => continue,
            Step::Redraw => {}
            Step::Refresh => log_outcome(dashboard.render().await),
            Step::Reset => {
                session.clear()?;
                log_outcome(dashboard.render().await);
            }
        }
        session.draw(&dashboard)?;
    }

    info!("dashboard stopped");
    Ok(())
}

fn handle_event(dashboard: &mut Dashboard, event: AppEvent) -> Step {
    match event {
        AppEvent::Resize(width, height) => {
            dashboard.resize(Rect::new(0, 0, width, height));
            Step::Reset
        }
        AppEvent::Key(key) => match action_for_key(key, dashboard.tab_count()) {
            Some(action) => apply_action(dashboard, action),
            None => Step::Idle,
        },
    }
}

fn apply_action(dashboard: &mut Dashboard, action: Action) -> Step {
    match action {
        Action::Quit => Step::Quit,
        Action::SelectTab(index) => {
            if dashboard.select_tab(index) {
                Step::Reset
            } else {
                Step::Idle
            }
        }
        Action::NextTab => {
            dashboard.next_tab();
            Step::Reset
        }
        Action::PreviousTab => {
            dashboard.previous_tab();
            Step::Reset
        }
        Action::Scroll(delta) => {
            dashboard.scroll(delta);
            Step::Redraw
        }
    }
}

fn log_outcome(outcome: RenderOutcome) {
    match outcome {
        RenderOutcome::Busy => debug!("render skipped, previous one still running"),
        RenderOutcome::Completed => debug!("render completed"),
        // already logged by the controller and shown in the status line
        RenderOutcome::Failed(_) => {}
    }
}
