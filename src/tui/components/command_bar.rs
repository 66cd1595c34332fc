//! # Command Bar Overlay
//!
//! Centered search overlay opened with Ctrl+K. Lists recent and trending
//! searches filtered by the query, and offers the assistant when nothing
//! matches. While an assistant search runs it shows a spinner and the
//! current stage, then dims out before closing.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `CommandBarState` lives in `TuiState` (selection, hit-test rect)
//! - `CommandBarOverlay` is created each frame with borrowed state
//!
//! The phase machine itself lives in `core::command_bar`; this file only
//! renders it and turns keys into high-level events.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph};

use crate::core::command_bar::{CommandBar, Phase};
use crate::tui::event::TuiEvent;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const PLACEHOLDER: &str = "Search for settings, features, or commands...";

/// A selectable row in the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    Recent(&'static str),
    Trending(&'static str),
    /// "Ask AI" for the current query.
    Assistant,
}

/// Selectable rows for the bar's current query, in display order.
pub fn entries(bar: &CommandBar) -> Vec<Entry> {
    if bar.assistant_offered() {
        return vec![Entry::Assistant];
    }
    let matches = bar.matches();
    matches
        .recent
        .into_iter()
        .map(Entry::Recent)
        .chain(matches.trending.into_iter().map(Entry::Trending))
        .collect()
}

/// Events emitted by the command bar overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandBarEvent {
    Dismiss,
    Input(char),
    Paste(String),
    Backspace,
    Clear,
    Ask,
    Pick(String),
}

/// Persistent state for the command bar overlay.
#[derive(Default)]
pub struct CommandBarState {
    pub selected: usize,
    pub list_state: ListState,
    /// Overlay rectangle from the last render; clicks outside it dismiss
    pub overlay_area: Rect,
}

impl CommandBarState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous selection; called whenever the bar opens.
    pub fn reset(&mut self) {
        self.selected = 0;
    }

    fn move_selection(&mut self, delta: isize, count: usize) {
        if count == 0 {
            return;
        }
        self.selected = self.selected.saturating_add_signed(delta).min(count - 1);
    }

    /// Handle a key event, returning a CommandBarEvent if the overlay should act.
    pub fn handle_event(&mut self, event: &TuiEvent, bar: &CommandBar) -> Option<CommandBarEvent> {
        if let TuiEvent::MouseClick(col, row) = event {
            let outside = !self.overlay_area.contains(Position { x: *col, y: *row });
            return outside.then_some(CommandBarEvent::Dismiss);
        }
        if matches!(event, TuiEvent::Escape) {
            return Some(CommandBarEvent::Dismiss);
        }
        // Once a search starts only dismissal is accepted
        if bar.phase() != Phase::Open {
            return None;
        }

        let rows = entries(bar);
        match event {
            TuiEvent::InputChar(c) => {
                self.selected = 0;
                Some(CommandBarEvent::Input(*c))
            }
            TuiEvent::Paste(text) => {
                self.selected = 0;
                Some(CommandBarEvent::Paste(text.clone()))
            }
            TuiEvent::Backspace => {
                self.selected = 0;
                Some(CommandBarEvent::Backspace)
            }
            TuiEvent::ClearLine => {
                self.selected = 0;
                Some(CommandBarEvent::Clear)
            }
            TuiEvent::CursorUp | TuiEvent::BackTab => {
                self.move_selection(-1, rows.len());
                None
            }
            TuiEvent::CursorDown | TuiEvent::Tab => {
                self.move_selection(1, rows.len());
                None
            }
            TuiEvent::Submit => match rows.get(self.selected) {
                Some(Entry::Assistant) => Some(CommandBarEvent::Ask),
                Some(Entry::Recent(label)) | Some(Entry::Trending(label)) => {
                    Some(CommandBarEvent::Pick(label.to_string()))
                }
                None => None,
            },
            _ => None,
        }
    }
}

/// Transient render wrapper for the command bar overlay.
pub struct CommandBarOverlay<'a> {
    state: &'a mut CommandBarState,
    bar: &'a CommandBar,
    spinner_frame: usize,
}

impl<'a> CommandBarOverlay<'a> {
    pub fn new(state: &'a mut CommandBarState, bar: &'a CommandBar, spinner_frame: usize) -> Self {
        Self {
            state,
            bar,
            spinner_frame,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(60, 60, area);
        self.state.overlay_area = overlay;

        // Clear underlying content
        frame.render_widget(Clear, overlay);

        let phase = self.bar.phase();
        let help_text = match phase {
            Phase::Open => " ↑↓ Navigate  Enter Select  Esc Close ",
            _ => " Esc Cancel ",
        };
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Search ")
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(help_text).centered())
            .padding(Padding::horizontal(1));
        if phase == Phase::FadingOut {
            block = block.style(Style::default().add_modifier(Modifier::DIM));
        }

        let inner = block.inner(overlay);
        frame.render_widget(block, overlay);

        match phase {
            Phase::Searching(stage) => self.render_progress(frame, inner, stage.label()),
            Phase::FadingOut => self.render_progress(frame, inner, "opening..."),
            Phase::Open | Phase::Closed => self.render_results(frame, inner),
        }
    }

    fn render_progress(&self, frame: &mut Frame, area: Rect, label: &str) {
        let spinner = SPINNER[self.spinner_frame % SPINNER.len()];
        let lines = vec![
            Line::from(vec![
                Span::styled(spinner, Style::default().fg(Color::Cyan)),
                Span::raw(" "),
                Span::styled(label.to_string(), Style::default().fg(Color::White)),
            ]),
            Line::from(Span::styled(
                format!("\"{}\"", self.bar.query()),
                Style::default().fg(Color::DarkGray),
            )),
        ];
        let [_, middle, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(lines.len() as u16),
            Constraint::Fill(1),
        ])
        .areas(area);
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), middle);
    }

    fn render_results(&mut self, frame: &mut Frame, area: Rect) {
        let [input_area, rule_area, list_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(area);

        let query = self.bar.query();
        let input = if query.is_empty() {
            Line::from(vec![
                Span::styled("> ", Style::default().fg(Color::Cyan)),
                Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray)),
            ])
        } else {
            Line::from(vec![
                Span::styled("> ", Style::default().fg(Color::Cyan)),
                Span::raw(query.to_string()),
                Span::styled("▏", Style::default().fg(Color::Cyan)),
            ])
        };
        frame.render_widget(Paragraph::new(input), input_area);
        frame.render_widget(
            Paragraph::new("─".repeat(rule_area.width as usize))
                .style(Style::default().fg(Color::DarkGray)),
            rule_area,
        );

        let rows = entries(self.bar);
        if rows.is_empty() {
            self.state.list_state.select(None);
            return;
        }
        self.state.selected = self.state.selected.min(rows.len() - 1);

        let mut items: Vec<ListItem> = Vec::new();
        let mut selected_row = 0;
        let mut heading: Option<&str> = None;
        for (i, entry) in rows.iter().enumerate() {
            let (group, text) = match entry {
                Entry::Recent(label) => ("RECENT HISTORY", format!("↺ {label}")),
                Entry::Trending(label) => ("TRENDING SEARCHES", format!("↗ {label}")),
                Entry::Assistant => ("AI ASSISTANT", format!("✦ Ask AI: \"{query}\"")),
            };
            if heading != Some(group) {
                if heading.is_some() {
                    items.push(ListItem::new(Line::default()));
                }
                items.push(ListItem::new(Line::from(Span::styled(
                    group,
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD),
                ))));
                heading = Some(group);
            }

            let style = if i == self.state.selected {
                selected_row = items.len();
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(Color::Gray)
            };
            items.push(ListItem::new(Line::from(Span::styled(text, style))));
        }

        if matches!(rows[0], Entry::Assistant) {
            items.push(ListItem::new(Line::from(Span::styled(
                "Nothing matched. The assistant can find it for you.",
                Style::default().fg(Color::DarkGray),
            ))));
        }

        self.state.list_state.select(Some(selected_row));
        frame.render_stateful_widget(List::new(items), list_area, &mut self.state.list_state);
    }
}

/// Compute a centered rect using percentage of the outer rect.
fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::command_bar::StageTimings;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::time::{Duration, Instant};

    fn open_bar(query: &str) -> CommandBar {
        let mut bar = CommandBar::new(StageTimings::default());
        bar.open();
        bar.push_str(query);
        bar
    }

    fn render_text(state: &mut CommandBarState, bar: &CommandBar) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| CommandBarOverlay::new(state, bar, 0).render(f, f.area()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_entries_follow_filter() {
        let bar = open_bar("github");
        assert_eq!(entries(&bar), vec![Entry::Trending("GitHub Integration")]);

        let bar = open_bar("");
        assert_eq!(entries(&bar).len(), bar.matches().len());

        let bar = open_bar("zzz-nonexistent");
        assert_eq!(entries(&bar), vec![Entry::Assistant]);
    }

    #[test]
    fn test_submit_on_assistant_asks() {
        let bar = open_bar("zzz-nonexistent");
        let mut state = CommandBarState::new();
        assert_eq!(
            state.handle_event(&TuiEvent::Submit, &bar),
            Some(CommandBarEvent::Ask)
        );
    }

    #[test]
    fn test_selection_moves_and_picks() {
        let bar = open_bar("settings");
        let mut state = CommandBarState::new();
        let rows = entries(&bar);

        state.handle_event(&TuiEvent::CursorDown, &bar);
        state.handle_event(&TuiEvent::CursorDown, &bar);
        let expected = match rows[2] {
            Entry::Recent(label) | Entry::Trending(label) => label.to_string(),
            Entry::Assistant => unreachable!(),
        };
        assert_eq!(
            state.handle_event(&TuiEvent::Submit, &bar),
            Some(CommandBarEvent::Pick(expected))
        );

        // Selection saturates at both ends
        for _ in 0..20 {
            state.handle_event(&TuiEvent::CursorDown, &bar);
        }
        assert_eq!(state.selected, rows.len() - 1);
        for _ in 0..20 {
            state.handle_event(&TuiEvent::CursorUp, &bar);
        }
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn test_typing_resets_selection() {
        let bar = open_bar("");
        let mut state = CommandBarState::new();
        state.handle_event(&TuiEvent::CursorDown, &bar);
        assert_eq!(state.selected, 1);

        assert_eq!(
            state.handle_event(&TuiEvent::InputChar('a'), &bar),
            Some(CommandBarEvent::Input('a'))
        );
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn test_only_dismiss_accepted_while_searching() {
        let mut bar = open_bar("zzz-nonexistent");
        bar.ask_assistant(Instant::now()).unwrap();
        let mut state = CommandBarState::new();

        assert_eq!(state.handle_event(&TuiEvent::InputChar('x'), &bar), None);
        assert_eq!(state.handle_event(&TuiEvent::Submit, &bar), None);
        assert_eq!(
            state.handle_event(&TuiEvent::Escape, &bar),
            Some(CommandBarEvent::Dismiss)
        );
    }

    #[test]
    fn test_click_outside_dismisses() {
        let bar = open_bar("");
        let mut state = CommandBarState::new();
        render_text(&mut state, &bar);

        let inside = state.overlay_area;
        assert_eq!(
            state.handle_event(&TuiEvent::MouseClick(inside.x + 1, inside.y + 1), &bar),
            None
        );
        assert_eq!(
            state.handle_event(&TuiEvent::MouseClick(0, 0), &bar),
            Some(CommandBarEvent::Dismiss)
        );
    }

    #[test]
    fn test_render_lists_candidates() {
        let bar = open_bar("");
        let mut state = CommandBarState::new();
        let text = render_text(&mut state, &bar);

        assert!(text.contains("Search for settings"));
        assert!(text.contains("RECENT HISTORY"));
        assert!(text.contains("Privacy settings"));
        assert!(text.contains("TRENDING SEARCHES"));
        assert!(text.contains("GitHub Integration"));
    }

    #[test]
    fn test_render_assistant_offer() {
        let bar = open_bar("zzz-nonexistent");
        let mut state = CommandBarState::new();
        let text = render_text(&mut state, &bar);

        assert!(text.contains("AI ASSISTANT"));
        assert!(text.contains("Ask AI: \"zzz-nonexistent\""));
        assert!(!text.contains("RECENT HISTORY"));
    }

    #[test]
    fn test_render_search_stages() {
        let mut bar = open_bar("zzz-nonexistent");
        let start = Instant::now();
        bar.ask_assistant(start).unwrap();
        let mut state = CommandBarState::new();

        let text = render_text(&mut state, &bar);
        assert!(text.contains("thinking..."));
        assert!(text.contains("Esc Cancel"));

        bar.tick(start + Duration::from_millis(1500));
        let text = render_text(&mut state, &bar);
        assert!(text.contains("starting a flow for you"));
    }
}
