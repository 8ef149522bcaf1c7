//! Color themes.
//!
//! A [`Theme`] is built once at startup and handed to every pane.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders};

use crate::error::{DashboardError, DashboardResult};

/// Theme names with a short description each.
pub const THEMES: [(&str, &str); 2] = [
    ("default", "with bright fonts, optimized for dark terminal backgrounds"),
    ("dark", "with dark fonts, optimized for bright terminal backgrounds"),
];

/// Styles used by all dashboard widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Plain text in paragraphs and tables.
    pub text: Style,
    /// Widget borders.
    pub border: Style,
    /// Widget titles.
    pub title: Style,
    /// Bar chart labels.
    pub bar_label: Style,
    /// Numbers printed on bars.
    pub bar_value: Color,
    /// Gauge fill when the gauge has no state color.
    pub gauge_bar: Color,
    /// Gauge label.
    pub gauge_label: Style,
    /// Selected tab.
    pub tab_active: Style,
    /// Other tabs.
    pub tab_inactive: Style,
}

impl Theme {
    /// Look a theme up by name.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Config`] for an unknown name.
    pub fn by_name(name: &str) -> DashboardResult<Self> {
        match name {
            "default" => Ok(Self::bright()),
            "dark" => Ok(Self::dark()),
            other => Err(DashboardError::Config(format!("unknown theme: {other}"))),
        }
    }

    fn bright() -> Self {
        let text = Style::default().fg(Color::White);
        Self {
            text,
            border: text,
            title: text.add_modifier(Modifier::BOLD),
            bar_label: text,
            bar_value: Color::Black,
            gauge_bar: Color::White,
            gauge_label: text,
            tab_active: Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            tab_inactive: text,
        }
    }

    fn dark() -> Self {
        let text = Style::default().fg(Color::Black);
        Self {
            text,
            border: text,
            title: text.add_modifier(Modifier::BOLD),
            bar_label: text,
            bar_value: Color::Black,
            gauge_bar: Color::Black,
            gauge_label: text,
            tab_active: Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            tab_inactive: text,
        }
    }

    /// A bordered block with the theme's title and border styles.
    #[must_use]
    pub fn block<'a>(&self, title: &'a str) -> Block<'a> {
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_style(self.title)
            .border_style(self.border)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::bright()
    }
}
