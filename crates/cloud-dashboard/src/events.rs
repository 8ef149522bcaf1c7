//! Terminal event handling for the dashboard.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;
use tracing::debug;

/// How long the reader blocks in `poll` before checking for shutdown.
const POLL_TIMEOUT: Duration = Duration::from_millis(250);

/// Terminal events forwarded to the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Key press
    Key(KeyEvent),
    /// Terminal resize to columns and rows
    Resize(u16, u16),
}

/// What a key press asks the dashboard to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Leave the dashboard.
    Quit,
    /// Activate the tab at this index.
    SelectTab(usize),
    /// Activate the next tab.
    NextTab,
    /// Activate the previous tab.
    PreviousTab,
    /// Scroll the active pane's tables.
    Scroll(isize),
}

/// Reads terminal events on a blocking thread and forwards them.
///
/// The reader stops once the handler is dropped.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    /// Start reading terminal events.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::task::spawn_blocking(move || {
            while !tx.is_closed() {
                match event::poll(POLL_TIMEOUT) {
                    Ok(true) => {}
                    Ok(false) => continue,
                    Err(err) => {
                        debug!(error = %err, "terminal poll failed, stopping event reader");
                        break;
                    }
                }

                let forwarded = match event::read() {
                    Ok(Event::Key(key)) => AppEvent::Key(key),
                    Ok(Event::Resize(w, h)) => AppEvent::Resize(w, h),
                    Ok(_) => continue,
                    Err(err) => {
                        debug!(error = %err, "terminal read failed, stopping event reader");
                        break;
                    }
                };
                if tx.send(forwarded).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }

    /// Next terminal event, `None` once the reader has stopped.
    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHandler").finish_non_exhaustive()
    }
}

/// Map a key press to an action. Digits select tabs `1..=tab_count`.
pub fn action_for_key(key: KeyEvent, tab_count: usize) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    match key.code {
        KeyCode::Char('q' | 'Q') => Some(Action::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            (index < tab_count).then_some(Action::SelectTab(index))
        }
        KeyCode::Tab | KeyCode::Right => Some(Action::NextTab),
        KeyCode::BackTab | KeyCode::Left => Some(Action::PreviousTab),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::Scroll(-1)),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::Scroll(1)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test_case(KeyCode::Char('q'), Some(Action::Quit) ; "q quits")]
    #[test_case(KeyCode::Char('Q'), Some(Action::Quit) ; "shift q quits")]
    #[test_case(KeyCode::Char('1'), Some(Action::SelectTab(0)) ; "first tab")]
    #[test_case(KeyCode::Char('2'), Some(Action::SelectTab(1)) ; "second tab")]
    #[test_case(KeyCode::Char('3'), None ; "no third tab")]
    #[test_case(KeyCode::Char('0'), None ; "zero")]
    #[test_case(KeyCode::Tab, Some(Action::NextTab) ; "tab")]
    #[test_case(KeyCode::Right, Some(Action::NextTab) ; "right")]
    #[test_case(KeyCode::BackTab, Some(Action::PreviousTab) ; "backtab")]
    #[test_case(KeyCode::Left, Some(Action::PreviousTab) ; "left")]
    #[test_case(KeyCode::Char('j'), Some(Action::Scroll(1)) ; "j")]
    #[test_case(KeyCode::Up, Some(Action::Scroll(-1)) ; "up")]
    #[test_case(KeyCode::Char('x'), None ; "unbound")]
    fn key_actions(code: KeyCode, expected: Option<Action>) {
        assert_eq!(action_for_key(key(code), 2), expected);
    }

    #[test]
    fn ctrl_c_quits() {
        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(action_for_key(event, 2), Some(Action::Quit));
        assert_eq!(action_for_key(key(KeyCode::Char('c')), 2), None);
    }

    #[test]
    fn key_release_is_ignored() {
        let mut event = key(KeyCode::Char('q'));
        event.kind = KeyEventKind::Release;
        assert_eq!(action_for_key(event, 2), None);
    }
}
