//! # Home Page Component
//!
//! Static dashboard: greeting, stat cards, recent activity and quick actions.
//! All content comes from `catalog`; nothing on this page is interactive.

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Padding, Paragraph};

use crate::core::catalog::{QUICK_ACTIONS, RECENT_ACTIVITY, STATS, StatCard};
use crate::tui::component::Component;

const CARD_HEIGHT: u16 = 5;

#[derive(Default)]
pub struct HomePage;

impl HomePage {
    pub fn new() -> Self {
        Self
    }
}

impl Component for HomePage {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [header_area, cards_area, lower_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(CARD_HEIGHT),
            Constraint::Min(0),
        ])
        .areas(area.inner(ratatui::layout::Margin::new(1, 0)));

        let header = Paragraph::new(vec![
            Line::from(Span::styled(
                "Welcome back",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Here's what's happening with your projects today.",
                Style::default().fg(Color::DarkGray),
            )),
        ]);
        frame.render_widget(header, header_area);

        let card_areas = Layout::horizontal(STATS.iter().map(|_| Constraint::Fill(1)))
            .spacing(1)
            .split(cards_area);
        for (card, card_area) in STATS.iter().zip(card_areas.iter()) {
            render_stat_card(frame, *card_area, card);
        }

        let [activity_area, actions_area] =
            Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                .spacing(1)
                .flex(Flex::Start)
                .areas(lower_area);

        let activity: Vec<Line> = RECENT_ACTIVITY
            .iter()
            .flat_map(|entry| {
                [
                    Line::from(vec![
                        Span::styled("● ", Style::default().fg(Color::Cyan)),
                        Span::styled(entry.action, Style::default().add_modifier(Modifier::BOLD)),
                        Span::styled(
                            format!("  {}", entry.time),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ]),
                    Line::from(Span::styled(
                        format!("  {}", entry.project),
                        Style::default().fg(Color::Gray),
                    )),
                ]
            })
            .collect();
        frame.render_widget(
            Paragraph::new(activity).block(section_block(" Recent Activity ")),
            activity_area,
        );

        let actions: Vec<Line> = QUICK_ACTIONS
            .iter()
            .flat_map(|action| {
                [
                    Line::from(Span::styled(
                        action.title,
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        action.description,
                        Style::default().fg(Color::DarkGray),
                    )),
                ]
            })
            .collect();
        frame.render_widget(
            Paragraph::new(actions).block(section_block(" Quick Actions ")),
            actions_area,
        );
    }
}

fn section_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(title)
        .padding(Padding::horizontal(1))
}

fn render_stat_card(frame: &mut Frame, area: Rect, card: &StatCard) {
    let lines = vec![
        Line::from(Span::styled(card.label, Style::default().fg(Color::Gray))),
        Line::from(vec![
            Span::styled(
                card.value,
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {}", card.delta), Style::default().fg(Color::Green)),
        ]),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .padding(Padding::horizontal(1));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_home_renders_dashboard_content() {
        let backend = TestBackend::new(120, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut home = HomePage::new();

        terminal.draw(|f| home.render(f, f.area())).unwrap();

        let text = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();

        assert!(text.contains("Welcome back"));
        assert!(text.contains("Active Projects"));
        assert!(text.contains("$45.2k"));
        assert!(text.contains("Recent Activity"));
        assert!(text.contains("New deployment"));
        assert!(text.contains("Quick Actions"));
        assert!(text.contains("Invite Team"));
    }

    #[test]
    fn test_home_survives_tiny_terminal() {
        let backend = TestBackend::new(10, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut home = HomePage::new();
        terminal.draw(|f| home.render(f, f.area())).unwrap();
    }
}
