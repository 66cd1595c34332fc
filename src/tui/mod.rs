//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard and mouse events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//!
//! - **Animating** (assistant search in progress): draws every ~80ms so the
//!   spinner moves.
//! - **Idle**: sleeps up to 500ms, only redraws on events or terminal resize.
//!
//! Either way the poll never sleeps past the command bar's next deadline or a
//! toast's expiry, so timed transitions land on time without busy polling.
//!
//! ## Event Routing
//!
//! Ctrl+C and Ctrl+K are global. While the command bar is visible it receives
//! every other event. Otherwise events go to the current page.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info};
use std::io::stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::core::action::{Action, Effect, update};
use crate::core::catalog::FieldKind;
use crate::core::command_bar::Phase;
use crate::core::config::ResolvedConfig;
use crate::core::navigation::{Location, Route, parse_location};
use crate::core::state::App;
use crate::integrations::{
    FlowLauncher, IdentityReporter, Profile, STARTUP_IDENTITY, spawn_flow_start,
};
use crate::tui::component::EventHandler;
use crate::tui::components::nav_bar::NavBar;
use crate::tui::components::{CommandBarEvent, CommandBarState, SettingsPageState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const ANIMATION_INTERVAL: Duration = Duration::from_millis(80);
const IDLE_INTERVAL: Duration = Duration::from_millis(500);

/// Outside services the shell hands work to.
#[derive(Clone)]
pub struct Collaborators {
    pub flow: Arc<dyn FlowLauncher>,
    pub identity: Arc<dyn IdentityReporter>,
}

/// TUI-specific presentation state (not part of core business logic)
#[derive(Default)]
pub struct TuiState {
    // Persistent component states
    pub settings_page: SettingsPageState,
    pub command_bar: CommandBarState,
}

impl TuiState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pull one-shot requests from the core into component state.
    fn sync(&mut self, app: &mut App) {
        if let Some(anchor) = app.pending_anchor.take() {
            self.settings_page.scroll_to_section(anchor);
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // The protocol is harmlessly ignored by terminals that don't support it
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste
        );
    }
}

/// Carry out an effect returned by `update`. Returns true when the app should exit.
fn apply_effect(effect: Effect, collaborators: &Collaborators) -> bool {
    match effect {
        Effect::None => false,
        Effect::Quit => true,
        Effect::StartFlow(token) => {
            spawn_flow_start(collaborators.flow.clone(), token);
            false
        }
    }
}

/// How long the loop may sleep before something needs attention.
fn poll_timeout(app: &App, now: Instant) -> Duration {
    let base = if animating(app) {
        ANIMATION_INTERVAL
    } else {
        IDLE_INTERVAL
    };
    [
        app.command_bar.next_deadline(),
        app.toast.as_ref().map(|t| t.expires_at),
    ]
    .into_iter()
    .flatten()
    .map(|due| due.saturating_duration_since(now))
    .fold(base, Duration::min)
}

fn animating(app: &App) -> bool {
    matches!(
        app.command_bar.phase(),
        Phase::Searching(_) | Phase::FadingOut
    )
}

/// Translate one TUI event into core actions.
fn route_event(app: &mut App, tui: &mut TuiState, event: TuiEvent, now: Instant) -> Effect {
    match event {
        TuiEvent::ForceQuit => return update(app, Action::Quit),
        TuiEvent::Resize => return Effect::None,
        TuiEvent::OpenCommandBar => {
            if !app.command_bar.is_open() {
                tui.command_bar.reset();
            }
            return update(app, Action::OpenCommandBar);
        }
        _ => {}
    }

    // When the command bar is visible, route all remaining events to it
    if app.command_bar.is_open() {
        let Some(bar_event) = tui.command_bar.handle_event(&event, &app.command_bar) else {
            return Effect::None;
        };
        let action = match bar_event {
            CommandBarEvent::Dismiss => Action::CloseCommandBar,
            CommandBarEvent::Input(c) => Action::QueryInput(c),
            CommandBarEvent::Paste(text) => Action::QueryPaste(text),
            CommandBarEvent::Backspace => Action::QueryBackspace,
            CommandBarEvent::Clear => Action::QueryClear,
            CommandBarEvent::Ask => Action::AskAssistant(now),
            CommandBarEvent::Pick(label) => {
                let effect = update(app, Action::PickCandidate(label));
                update(app, Action::CloseCommandBar);
                return effect;
            }
        };
        return update(app, action);
    }

    match event {
        TuiEvent::GoHome => {
            return update(
                app,
                Action::Navigate(Location {
                    route: Route::Home,
                    anchor: None,
                }),
            );
        }
        TuiEvent::GoSettings => {
            return update(
                app,
                Action::Navigate(Location {
                    route: Route::Settings,
                    anchor: None,
                }),
            );
        }
        TuiEvent::MouseClick(col, row) => {
            if row < ui::NAV_HEIGHT {
                return match NavBar::tab_at(col) {
                    Some(route) => update(app, Action::Navigate(Location { route, anchor: None })),
                    None => Effect::None,
                };
            }
            if app.route == Route::Settings
                && let Some(section) = tui.settings_page.section_at(col, row)
            {
                return update(app, Action::JumpToSection(section));
            }
            return Effect::None;
        }
        _ => {}
    }

    match app.route {
        Route::Home => match event {
            TuiEvent::InputChar('q') => update(app, Action::Quit),
            _ => Effect::None,
        },
        Route::Settings => route_settings_event(app, tui, event, now),
    }
}

fn route_settings_event(app: &mut App, tui: &mut TuiState, event: TuiEvent, now: Instant) -> Effect {
    let action = match event {
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown => {
            tui.settings_page.handle_event(&event);
            return Effect::None;
        }
        TuiEvent::NextSection => Action::JumpToSection(app.settings.active_section.next()),
        TuiEvent::PrevSection => Action::JumpToSection(app.settings.active_section.prev()),
        TuiEvent::CursorDown | TuiEvent::Tab => {
            tui.settings_page.follow_focus = true;
            Action::FocusNextField
        }
        TuiEvent::CursorUp | TuiEvent::BackTab => {
            tui.settings_page.follow_focus = true;
            Action::FocusPrevField
        }
        TuiEvent::CursorLeft => Action::CycleField { forward: false },
        TuiEvent::CursorRight => Action::CycleField { forward: true },
        TuiEvent::InputChar(' ') => match app.settings.focused_spec().kind {
            FieldKind::Toggle { .. } => Action::ToggleField,
            FieldKind::Button { .. } => Action::ActivateField(now),
            _ => Action::FieldInput(' '),
        },
        TuiEvent::InputChar(c) => Action::FieldInput(c),
        TuiEvent::Paste(text) => Action::FieldPaste(text),
        TuiEvent::Backspace => Action::FieldBackspace,
        TuiEvent::Submit => {
            tui.settings_page.follow_focus = true;
            Action::ActivateField(now)
        }
        _ => return Effect::None,
    };
    update(app, action)
}

pub fn run(config: ResolvedConfig, collaborators: Collaborators) -> std::io::Result<()> {
    let mut app = App::from_config(&config);
    let mut tui = TuiState::new();

    // Identify once per process; the reporter runs in the background
    let profile = Profile::from(&config.identity);
    STARTUP_IDENTITY.report(
        collaborators.identity.clone(),
        config.identity.user_id.clone(),
        profile,
    );

    update(&mut app, Action::Navigate(parse_location(&config.location)));

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Animation timer
    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        let phase_before = app.command_bar.phase();
        let had_toast = app.toast.is_some();
        let effect = update(&mut app, Action::Tick(Instant::now()));
        if apply_effect(effect, &collaborators) {
            break;
        }
        if app.command_bar.phase() != phase_before || app.toast.is_some() != had_toast {
            needs_redraw = true;
        }

        if animating(&app) {
            needs_redraw = true;
        }

        // Only draw when something changed
        if needs_redraw {
            tui.sync(&mut app);
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;

            // Section highlighting follows the scroll position the frame settled on
            if app.route == Route::Settings
                && let Some(sample) = tui.settings_page.take_scroll_sample()
            {
                let before = app.settings.active_section;
                update(&mut app, sample);
                if app.settings.active_section != before {
                    debug!("Active section now {:?}", app.settings.active_section);
                    needs_redraw = true;
                }
            }
        }

        let first_event = poll_event_timeout(poll_timeout(&app, Instant::now()));

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let effect = route_event(&mut app, &mut tui, event, Instant::now());
            if apply_effect(effect, &collaborators) {
                should_quit = true;
            }
        }

        if should_quit {
            break;
        }
    }

    info!("Waypoint exiting");
    ratatui::restore();
    Ok(())
}
