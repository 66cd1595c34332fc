//! # NavBar Component
//!
//! Top bar with the brand, one tab per route, and the status message.
//!
//! ## Design Decisions
//!
//! ### Stateless Component
//!
//! NavBar is purely presentational. It receives the active route and the
//! status line as props and keeps nothing between frames.
//!
//! ### Fixed Tab Geometry
//!
//! Tabs always start at column 0 of the frame, so mouse hit testing can be
//! answered from the static layout alone (`NavBar::tab_at`) without storing
//! anything during render.

use crate::core::navigation::Route;
use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

const BRAND: &str = " ◆ Waypoint ";
const TABS: [(Route, &str); 2] = [(Route::Home, " Home F1 "), (Route::Settings, " Settings F2 ")];
const SHORTCUT_HINT: &str = " Ctrl+K Search ";

/// Top bar component showing the brand, route tabs and status.
pub struct NavBar<'a> {
    /// Route whose tab is highlighted
    pub route: Route,
    /// Status line (e.g., "Press Ctrl+K to search")
    pub status_message: &'a str,
}

impl<'a> NavBar<'a> {
    pub fn new(route: Route, status_message: &'a str) -> Self {
        Self {
            route,
            status_message,
        }
    }

    /// Which tab, if any, sits under column `col` of the bar.
    pub fn tab_at(col: u16) -> Option<Route> {
        tab_columns()
            .into_iter()
            .find(|(_, start, width)| col >= *start && col < start + width)
            .map(|(route, _, _)| route)
    }
}

/// `(route, first column, width)` for each tab.
fn tab_columns() -> Vec<(Route, u16, u16)> {
    let mut col = BRAND.width() as u16 + 1;
    TABS.iter()
        .map(|(route, label)| {
            let width = label.width() as u16;
            let start = col;
            col += width + 1;
            (*route, start, width)
        })
        .collect()
}

impl Component for NavBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(
                BRAND,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
        ];
        for (route, label) in TABS {
            let style = if route == self.route {
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(Color::Gray)
            };
            spans.push(Span::styled(label, style));
            spans.push(Span::raw(" "));
        }
        let left = Line::from(spans);

        let right = Line::from(vec![
            Span::styled(self.status_message, Style::default().fg(Color::DarkGray)),
            Span::raw("  "),
            Span::styled(
                SHORTCUT_HINT,
                Style::default().fg(Color::Black).bg(Color::DarkGray),
            ),
        ]);

        let [left_area, right_area] =
            Layout::horizontal([Constraint::Length(left.width() as u16), Constraint::Min(0)])
                .areas(area);

        frame.render_widget(Paragraph::new(left), left_area);
        frame.render_widget(Paragraph::new(right).alignment(Alignment::Right), right_area);
    }
}
