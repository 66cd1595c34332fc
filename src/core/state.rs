//! # Application State
//!
//! Core view state for Waypoint. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── route: Route                  // which page is mounted
//! ├── command_bar: CommandBar       // modal search + timed assistant flow
//! ├── settings: SettingsState       // field values, focus, active section
//! ├── pending_anchor: Option        // section to scroll into view next frame
//! ├── toast: Option<Toast>          // transient notice
//! ├── status_message: String        // nav bar text
//! ├── flow_token: Option<String>    // guided flow to start after a search
//! ├── toast_duration: Duration
//! └── section_probe: u16            // rows below viewport top for section tracking
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::time::Duration;

use crate::core::catalog::SectionId;
use crate::core::command_bar::{CommandBar, StageTimings};
use crate::core::config::ResolvedConfig;
use crate::core::invite::{DEFAULT_TOAST_DURATION, Toast};
use crate::core::navigation::{DEFAULT_SECTION_PROBE, Route};
use crate::core::settings::SettingsState;

pub struct App {
    pub route: Route,
    pub command_bar: CommandBar,
    pub settings: SettingsState,
    /// Set by anchor navigation; the settings page consumes it on its next layout.
    pub pending_anchor: Option<SectionId>,
    pub toast: Option<Toast>,
    pub status_message: String,
    pub flow_token: Option<String>,
    pub toast_duration: Duration,
    pub section_probe: u16,
}

impl Default for App {
    fn default() -> Self {
        Self::new(StageTimings::default(), None)
    }
}

impl App {
    pub fn new(timings: StageTimings, flow_token: Option<String>) -> Self {
        Self {
            route: Route::Home,
            command_bar: CommandBar::new(timings),
            settings: SettingsState::new(),
            pending_anchor: None,
            toast: None,
            status_message: String::from("Press Ctrl+K to search"),
            flow_token,
            toast_duration: DEFAULT_TOAST_DURATION,
            section_probe: DEFAULT_SECTION_PROBE,
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        let mut app = Self::new(config.timings, config.flow_token.clone());
        app.toast_duration = config.toast_duration;
        app.section_probe = config.section_probe;
        app
    }
}
