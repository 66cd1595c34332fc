//! # Actions
//!
//! Everything that can happen in Waypoint becomes an `Action`.
//! User presses Ctrl+K? That's `Action::OpenCommandBar`.
//! A frame passes? That's `Action::Tick(now)`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns an `Effect` describing any I/O the caller must do.
//! No side effects here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! Time is always passed in, never read, so every timed behaviour can be
//! driven by a synthetic clock in tests.

use std::time::Instant;

use log::{debug, info};

use crate::core::catalog::{INVITE_EMAIL_KEY, SEND_INVITE_KEY, SectionId};
use crate::core::invite::{Toast, ToastKind, check_invite};
use crate::core::navigation::{Location, Route, active_section};
use crate::core::settings::Activation;
use crate::core::state::App;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Navigate(Location),
    JumpToSection(SectionId),
    /// Latest settings-page layout and scroll offset.
    ScrollSampled { section_tops: Vec<u16>, offset: u16 },

    OpenCommandBar,
    CloseCommandBar,
    QueryInput(char),
    QueryPaste(String),
    QueryBackspace,
    QueryClear,
    AskAssistant(Instant),
    PickCandidate(String),

    FocusNextField,
    FocusPrevField,
    FieldInput(char),
    FieldPaste(String),
    FieldBackspace,
    ToggleField,
    CycleField { forward: bool },
    ActivateField(Instant),

    Tick(Instant),
    Quit,
}

/// I/O requested by `update`, carried out by the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Quit,
    /// Hand the token to the flow launcher.
    StartFlow(String),
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Navigate(location) => {
            if app.route != location.route {
                info!("Route {} -> {}", app.route, location.route);
            }
            app.route = location.route;
            if location.route == Route::Settings
                && let Some(anchor) = location.anchor
            {
                jump_to(app, anchor);
            }
            Effect::None
        }
        Action::JumpToSection(section) => {
            app.route = Route::Settings;
            jump_to(app, section);
            Effect::None
        }
        Action::ScrollSampled { section_tops, offset } => {
            app.settings.active_section = active_section(&section_tops, offset, app.section_probe);
            Effect::None
        }

        Action::OpenCommandBar => {
            app.command_bar.open();
            Effect::None
        }
        Action::CloseCommandBar => {
            app.command_bar.close();
            Effect::None
        }
        Action::QueryInput(c) => {
            app.command_bar.push_char(c);
            Effect::None
        }
        Action::QueryPaste(text) => {
            app.command_bar.push_str(&text);
            Effect::None
        }
        Action::QueryBackspace => {
            app.command_bar.backspace();
            Effect::None
        }
        Action::QueryClear => {
            app.command_bar.clear_query();
            Effect::None
        }
        Action::AskAssistant(now) => {
            if let Err(e) = app.command_bar.ask_assistant(now) {
                debug!("Assistant search refused: {e}");
            }
            Effect::None
        }
        Action::PickCandidate(label) => {
            app.status_message = format!("Selected \"{label}\"");
            Effect::None
        }

        Action::FocusNextField => {
            app.settings.focus_next();
            Effect::None
        }
        Action::FocusPrevField => {
            app.settings.focus_prev();
            Effect::None
        }
        Action::FieldInput(c) => {
            app.settings.input_char(c);
            Effect::None
        }
        Action::FieldPaste(text) => {
            app.settings.input_str(&text);
            Effect::None
        }
        Action::FieldBackspace => {
            app.settings.backspace();
            Effect::None
        }
        Action::ToggleField => {
            if let Some(on) = app.settings.toggle() {
                let label = app.settings.focused_spec().label;
                app.status_message = format!("{label}: {}", if on { "on" } else { "off" });
            }
            Effect::None
        }
        Action::CycleField { forward } => {
            if let Some(choice) = app.settings.cycle(forward) {
                let label = app.settings.focused_spec().label;
                app.status_message = format!("{label}: {choice}");
            }
            Effect::None
        }
        Action::ActivateField(now) => {
            match app.settings.activate() {
                Some(Activation::Button { key: SEND_INVITE_KEY, .. })
                | Some(Activation::Submit { key: INVITE_EMAIL_KEY }) => send_invite(app, now),
                Some(Activation::Button { label, .. }) => {
                    app.status_message = format!("{label} is not available yet");
                }
                Some(Activation::Submit { .. }) => app.settings.focus_next(),
                None => {}
            }
            Effect::None
        }

        Action::Tick(now) => {
            if app.toast.as_ref().is_some_and(|t| t.is_expired(now)) {
                app.toast = None;
            }

            let Some(completion) = app.command_bar.tick(now) else {
                return Effect::None;
            };
            match app.flow_token.clone() {
                Some(token) => {
                    info!("Assistant search for {:?} completed, starting flow", completion.query);
                    app.status_message = String::from("Starting a guided flow");
                    Effect::StartFlow(token)
                }
                None => {
                    debug!("Assistant search completed but no flow token is configured");
                    Effect::None
                }
            }
        }
        Action::Quit => Effect::Quit,
    }
}

fn jump_to(app: &mut App, section: SectionId) {
    app.settings.jump_to_section(section);
    app.pending_anchor = Some(section);
}

fn send_invite(app: &mut App, now: Instant) {
    let email = app.settings.text(INVITE_EMAIL_KEY).unwrap_or_default().to_string();
    let toast = match check_invite(&email) {
        Ok(message) => {
            info!("Invite accepted for {email}");
            app.settings.set_text(INVITE_EMAIL_KEY, "");
            Toast::new(message, ToastKind::Success, now, app.toast_duration)
        }
        Err(e) => {
            debug!("Invite rejected for {email:?}: {e}");
            Toast::new(e.to_string(), ToastKind::Error, now, app.toast_duration)
        }
    };
    app.toast = Some(toast);
}
