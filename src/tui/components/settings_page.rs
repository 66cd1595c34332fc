//! # SettingsPage Component
//!
//! Sidebar of section links beside a scrollable form holding every section.
//!
//! ## Architecture
//!
//! `SettingsPage` is a transient component (created each frame) that wraps
//! `&'a mut SettingsPageState` (persistent scroll state) and the core
//! `SettingsState` (props).
//!
//! Every field renders as exactly one row, so the section layout is fixed
//! and computed once. The core decides which section is active from the
//! numbers this component reports through `take_scroll_sample`.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Padding, Paragraph};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};
use unicode_width::UnicodeWidthStr;

use crate::core::action::Action;
use crate::core::catalog::{FieldKind, FieldSpec, SECTIONS, SectionId};
use crate::core::settings::{FieldValue, SettingsState};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

const SIDEBAR_WIDTH: u16 = 22;
/// Border rows, subtitle and the blank line under it.
const SECTION_CHROME: u16 = 4;
const SECTION_GAP: u16 = 1;
/// Rows above the first field of a section.
const FIELD_OFFSET: u16 = 3;

/// Row positions of every section and field on the scroll canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionLayout {
    /// Top row of each section, in document order.
    pub tops: Vec<u16>,
    /// Row of each field, indexed like `SettingsState`'s flat field list.
    pub field_rows: Vec<u16>,
    pub total_height: u16,
}

impl Default for SectionLayout {
    fn default() -> Self {
        Self::compute()
    }
}

impl SectionLayout {
    pub fn compute() -> Self {
        let mut tops = Vec::with_capacity(SECTIONS.len());
        let mut field_rows = Vec::new();
        let mut y = 0u16;
        for section in SECTIONS {
            tops.push(y);
            field_rows.extend((0..section.fields.len() as u16).map(|j| y + FIELD_OFFSET + j));
            y += section_height(section.fields.len()) + SECTION_GAP;
        }
        Self {
            tops,
            field_rows,
            total_height: y.saturating_sub(SECTION_GAP),
        }
    }
}

fn section_height(field_count: usize) -> u16 {
    field_count as u16 + SECTION_CHROME
}

/// Scroll and hit-test state for the settings page.
/// Must be persisted in the parent TuiState.
pub struct SettingsPageState {
    pub scroll_state: ScrollViewState,
    pub layout: SectionLayout,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// Bring the focused field into view on the next render
    pub follow_focus: bool,
    /// Sidebar rectangle from the last render, for mouse hit testing
    pub sidebar_area: Rect,
    pending_anchor: Option<SectionId>,
    last_sampled_offset: Option<u16>,
}

impl Default for SettingsPageState {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsPageState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: SectionLayout::compute(),
            viewport_height: 0,
            follow_focus: false,
            sidebar_area: Rect::default(),
            pending_anchor: None,
            last_sampled_offset: None,
        }
    }

    /// Scroll `section` to the top of the viewport on the next render.
    pub fn scroll_to_section(&mut self, section: SectionId) {
        self.pending_anchor = Some(section);
        self.follow_focus = false;
    }

    fn max_offset(&self) -> u16 {
        self.layout.total_height.saturating_sub(self.viewport_height)
    }

    fn set_offset(&mut self, y: u16) {
        self.scroll_state.set_offset(Position {
            x: 0,
            y: y.min(self.max_offset()),
        });
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let current = self.scroll_state.offset().y;
        if current > self.max_offset() {
            self.set_offset(current);
        }
    }

    fn apply_pending_anchor(&mut self) {
        let Some(section) = self.pending_anchor.take() else {
            return;
        };
        let top = self.layout.tops[section.index()];
        self.set_offset(top);
        // The jump already chose the active section; a sample taken at the
        // clamped offset could disagree near the bottom of the page.
        self.last_sampled_offset = Some(self.scroll_state.offset().y);
    }

    fn scroll_field_into_view(&mut self, field_index: usize) {
        let Some(&row) = self.layout.field_rows.get(field_index) else {
            return;
        };
        let offset = self.scroll_state.offset().y;
        if row < offset {
            // Keep the section header visible when scrolling back up
            self.set_offset(row.saturating_sub(FIELD_OFFSET));
        } else if row >= offset + self.viewport_height {
            self.set_offset(row + 1 - self.viewport_height);
        }
    }

    /// `ScrollSampled` for the core when the offset moved since the last
    /// sample.
    pub fn take_scroll_sample(&mut self) -> Option<Action> {
        let offset = self.scroll_state.offset().y;
        if self.last_sampled_offset == Some(offset) {
            return None;
        }
        self.last_sampled_offset = Some(offset);
        Some(Action::ScrollSampled {
            section_tops: self.layout.tops.clone(),
            offset,
        })
    }

    /// Section link under the given screen cell, if any.
    pub fn section_at(&self, col: u16, row: u16) -> Option<SectionId> {
        let inner = self.sidebar_area.inner(ratatui::layout::Margin::new(1, 1));
        if !inner.contains(Position { x: col, y: row }) {
            return None;
        }
        SectionId::from_index((row - inner.y) as usize)
    }
}

impl EventHandler for SettingsPageState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => self.scroll_state.scroll_up(),
            TuiEvent::ScrollDown => self.scroll_state.scroll_down(),
            TuiEvent::ScrollPageUp => self.scroll_state.scroll_page_up(),
            TuiEvent::ScrollPageDown => self.scroll_state.scroll_page_down(),
            _ => return None,
        }
        self.follow_focus = false;
        self.clamp_scroll();
        None
    }
}

/// Transient render wrapper for the settings page.
pub struct SettingsPage<'a> {
    state: &'a mut SettingsPageState,
    settings: &'a SettingsState,
}

impl<'a> SettingsPage<'a> {
    pub fn new(state: &'a mut SettingsPageState, settings: &'a SettingsState) -> Self {
        Self { state, settings }
    }

    fn render_sidebar(&mut self, frame: &mut Frame, area: Rect) {
        self.state.sidebar_area = area;
        let active = self.settings.active_section;

        let items: Vec<ListItem> = SectionId::ALL
            .iter()
            .map(|id| {
                let style = if *id == active {
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else {
                    Style::default().fg(Color::Gray)
                };
                ListItem::new(Line::from(Span::styled(format!(" {} ", id.label()), style)))
            })
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Settings ");
        frame.render_widget(List::new(items).block(block), area);
    }

    fn render_form(&mut self, frame: &mut Frame, area: Rect) {
        self.state.viewport_height = area.height;
        self.state.apply_pending_anchor();
        if self.state.follow_focus {
            self.state.scroll_field_into_view(self.settings.focused_index());
            self.state.follow_focus = false;
        }
        self.state.clamp_scroll();

        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area
        let mut scroll_view = ScrollView::new(Size::new(content_width, self.state.layout.total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let focused = self.settings.focused_index();
        let mut field_index = 0;
        for (section, top) in SECTIONS.iter().zip(&self.state.layout.tops) {
            let is_active = section.id == self.settings.active_section;
            let mut lines = vec![
                Line::from(Span::styled(section.subtitle, Style::default().fg(Color::DarkGray))),
                Line::default(),
            ];
            for spec in section.fields {
                let value = self.settings.value_at(field_index).unwrap_or(&FieldValue::Static);
                lines.push(field_line(spec, value, field_index == focused));
                field_index += 1;
            }

            let border_style = if is_active {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(Span::styled(
                    format!(" {} ", section.title),
                    Style::default().add_modifier(Modifier::BOLD),
                ))
                .padding(Padding::horizontal(1));

            let rect = Rect::new(0, *top, content_width, section_height(section.fields.len()));
            scroll_view.render_widget(Paragraph::new(lines).block(block), rect);
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

impl Component for SettingsPage<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [sidebar_area, form_area] =
            Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
                .spacing(1)
                .areas(area);

        self.render_sidebar(frame, sidebar_area);
        self.render_form(frame, form_area);
    }
}

fn masked(text: &str) -> String {
    "•".repeat(text.width())
}

fn field_line(spec: &FieldSpec, value: &FieldValue, focused: bool) -> Line<'static> {
    let marker = if focused { "› " } else { "  " };
    let label_style = if focused {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let mut spans = vec![Span::styled(marker, Style::default().fg(Color::Cyan))];

    match (spec.kind, value) {
        (FieldKind::Text { placeholder, masked: hide }, FieldValue::Text(text)) => {
            spans.push(Span::styled(format!("{}: ", spec.label), label_style));
            if text.is_empty() {
                spans.push(Span::styled(
                    placeholder,
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
                ));
            } else if hide {
                spans.push(Span::raw(masked(text)));
            } else {
                spans.push(Span::raw(text.clone()));
            }
            if focused {
                spans.push(Span::styled("▏", Style::default().fg(Color::Cyan)));
            }
        }
        (FieldKind::Toggle { .. }, FieldValue::Toggle(on)) => {
            let (mark, mark_style) = if *on {
                ("[x] ", Style::default().fg(Color::Green))
            } else {
                ("[ ] ", Style::default().fg(Color::DarkGray))
            };
            spans.push(Span::styled(mark, mark_style));
            spans.push(Span::styled(spec.label, label_style));
        }
        (FieldKind::Select { options }, FieldValue::Choice(choice)) => {
            spans.push(Span::styled(format!("{}: ", spec.label), label_style));
            let option = options.get(*choice).copied().unwrap_or_default();
            spans.push(Span::styled(
                format!("‹ {option} ›"),
                Style::default().fg(Color::Yellow),
            ));
        }
        (FieldKind::Info { value, masked: hide }, _) => {
            spans.push(Span::styled(format!("{}: ", spec.label), label_style));
            let shown = if hide { masked(value) } else { value.to_string() };
            spans.push(Span::styled(shown, Style::default().fg(Color::DarkGray)));
        }
        (FieldKind::Button { danger }, _) => {
            let mut style = if danger {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::White)
            };
            if focused {
                style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
            }
            spans.push(Span::styled(format!("[ {} ]", spec.label), style));
        }
        (kind, value) => {
            log::warn!("Field {} has value {:?} for kind {:?}", spec.key, value, kind);
        }
    }

    if let Some(hint) = spec.hint {
        spans.push(Span::styled(
            format!("  {hint}"),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}
