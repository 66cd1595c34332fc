use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiEvent {
    // Global shortcuts
    ForceQuit,      // Ctrl+C
    OpenCommandBar, // Ctrl+K
    Escape,
    GoHome,      // F1
    GoSettings,  // F2
    NextSection, // Ctrl+Down
    PrevSection, // Ctrl+Up

    // Editing and navigation, interpreted by whoever has focus
    Submit,
    InputChar(char),
    Paste(String), // Bracketed paste
    Backspace,
    ClearLine, // Ctrl+U
    CursorUp,
    CursorDown,
    CursorLeft,
    CursorRight,
    Tab,
    BackTab,

    ScrollUp,
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,
    MouseClick(u16, u16),
    Resize,
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(Duration::ZERO)
}

/// Poll for an event, blocking up to `timeout`.
pub fn poll_event_timeout(timeout: Duration) -> Option<TuiEvent> {
    match event::poll(timeout) {
        Ok(true) => {}
        Ok(false) => return None,
        Err(e) => {
            log::warn!("Event poll failed: {e}");
            return None;
        }
    }
    match event::read() {
        Ok(ev) => translate(ev),
        Err(e) => {
            log::warn!("Event read failed: {e}");
            None
        }
    }
}

/// Map a crossterm event onto a `TuiEvent`. Unhandled input maps to `None`.
pub fn translate(ev: Event) -> Option<TuiEvent> {
    match ev {
        Event::Key(key_event) => translate_key(key_event),
        Event::Mouse(mouse_event) => match mouse_event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                Some(TuiEvent::MouseClick(mouse_event.column, mouse_event.row))
            }
            MouseEventKind::ScrollUp => Some(TuiEvent::ScrollUp),
            MouseEventKind::ScrollDown => Some(TuiEvent::ScrollDown),
            _ => None,
        },
        Event::Paste(data) => Some(TuiEvent::Paste(data)),
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    }
}

fn translate_key(key_event: KeyEvent) -> Option<TuiEvent> {
    // Keyboard enhancement reports releases too; only act on presses and repeats
    if key_event.kind == KeyEventKind::Release {
        return None;
    }
    log::trace!("Key event: {:?} with modifiers {:?}", key_event.code, key_event.modifiers);

    let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
    let cmd = ctrl || key_event.modifiers.contains(KeyModifiers::SUPER);
    match key_event.code {
        KeyCode::Char('c') if ctrl => Some(TuiEvent::ForceQuit),
        KeyCode::Char('k') | KeyCode::Char('K') if cmd => Some(TuiEvent::OpenCommandBar),
        KeyCode::Char('u') if ctrl => Some(TuiEvent::ClearLine),
        KeyCode::Up if ctrl => Some(TuiEvent::PrevSection),
        KeyCode::Down if ctrl => Some(TuiEvent::NextSection),
        KeyCode::Char(_) if ctrl => None,
        KeyCode::Char(c) => Some(TuiEvent::InputChar(c)),
        KeyCode::Esc => Some(TuiEvent::Escape),
        KeyCode::Enter => Some(TuiEvent::Submit),
        KeyCode::Backspace => Some(TuiEvent::Backspace),
        KeyCode::Up => Some(TuiEvent::CursorUp),
        KeyCode::Down => Some(TuiEvent::CursorDown),
        KeyCode::Left => Some(TuiEvent::CursorLeft),
        KeyCode::Right => Some(TuiEvent::CursorRight),
        KeyCode::Tab => Some(TuiEvent::Tab),
        KeyCode::BackTab => Some(TuiEvent::BackTab),
        KeyCode::PageUp => Some(TuiEvent::ScrollPageUp),
        KeyCode::PageDown => Some(TuiEvent::ScrollPageDown),
        KeyCode::F(1) => Some(TuiEvent::GoHome),
        KeyCode::F(2) => Some(TuiEvent::GoSettings),
        _ => None,
    }
}
