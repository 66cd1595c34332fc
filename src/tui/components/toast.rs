//! # Toast Component
//!
//! Transient notice pinned to the bottom-left corner. Expiry is handled by
//! the core on `Tick`; this only draws whatever toast is current.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::core::invite::{Toast, ToastKind};
use crate::tui::component::Component;

pub struct ToastView<'a> {
    pub toast: &'a Toast,
}

impl<'a> ToastView<'a> {
    pub fn new(toast: &'a Toast) -> Self {
        Self { toast }
    }

    /// Where the toast lands inside `area`.
    pub fn placement(&self, area: Rect) -> Rect {
        // icon, padding and borders around the message
        let width = (self.toast.message.width() as u16 + 6).min(area.width);
        let height = 3.min(area.height);
        Rect::new(
            area.x + 1.min(area.width - width),
            area.bottom() - height,
            width,
            height,
        )
    }
}

impl Component for ToastView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let rect = self.placement(area);
        let (icon, color) = match self.toast.kind {
            ToastKind::Success => ("✓", Color::Green),
            ToastKind::Error => ("✗", Color::Red),
        };

        let line = Line::from(vec![
            Span::styled(icon, Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::raw(" "),
            Span::styled(self.toast.message.as_str(), Style::default().fg(Color::White)),
        ]);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .padding(Padding::horizontal(1));

        frame.render_widget(Clear, rect);
        frame.render_widget(Paragraph::new(line).block(block), rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::time::{Duration, Instant};

    fn toast(kind: ToastKind, message: &str) -> Toast {
        Toast::new(message, kind, Instant::now(), Duration::from_secs(3))
    }

    #[test]
    fn test_toast_renders_message_bottom_left() {
        let backend = TestBackend::new(60, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        let toast = toast(ToastKind::Success, "Invite sent to a@b.co!");
        let mut view = ToastView::new(&toast);

        terminal.draw(|f| view.render(f, f.area())).unwrap();

        let buffer = terminal.backend().buffer();
        let bottom_rows: String = (7..10)
            .flat_map(|y| (0..60).map(move |x| (x, y)))
            .map(|(x, y)| buffer[(x, y)].symbol().to_string())
            .collect();
        assert!(bottom_rows.contains("Invite sent to a@b.co!"));
        assert!(bottom_rows.contains('✓'));
        assert_eq!(buffer[(1, 7)].fg, Color::Green);
    }

    #[test]
    fn test_error_toast_is_red() {
        let backend = TestBackend::new(60, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        let toast = toast(ToastKind::Error, "Please enter a valid email address");
        let mut view = ToastView::new(&toast);

        terminal.draw(|f| view.render(f, f.area())).unwrap();

        assert_eq!(terminal.backend().buffer()[(1, 7)].fg, Color::Red);
    }

    #[test]
    fn test_placement_fits_narrow_area() {
        let toast = toast(ToastKind::Error, "Please enter a valid email address");
        let view = ToastView::new(&toast);
        let rect = view.placement(Rect::new(0, 0, 20, 2));
        assert_eq!(rect.width, 20);
        assert_eq!(rect.x, 0);
        assert_eq!(rect.height, 2);
    }
}
