//! # Navigation
//!
//! Route selection and settings-section tracking.
//!
//! A location is a path plus optional fragment, e.g. `/settings#team`.
//! `/settings` selects the settings page; every other path is home.
//! The fragment names a section to scroll to and highlight.

use std::fmt;

use crate::core::catalog::SectionId;

/// Default probe offset, in rows, below the top of the viewport.
pub const DEFAULT_SECTION_PROBE: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Home,
    Settings,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Settings => "/settings",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Settings => "Settings",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// A parsed location: which page, and which section anchor (if any).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    pub route: Route,
    pub anchor: Option<SectionId>,
}

/// Parse `path[#fragment]`. Unknown fragments are dropped.
pub fn parse_location(location: &str) -> Location {
    let (path, fragment) = match location.split_once('#') {
        Some((path, fragment)) => (path, Some(fragment)),
        None => (location, None),
    };

    let route = if path.trim_end_matches('/') == "/settings" {
        Route::Settings
    } else {
        Route::Home
    };

    let anchor = fragment
        .filter(|f| !f.is_empty())
        .and_then(SectionId::from_anchor);

    Location { route, anchor }
}

/// The section currently in focus for a given scroll sample.
///
/// Walks `section_tops` (document order) and picks the last one whose top is
/// at or above `scroll + probe`. Falls back to the first section.
pub fn active_section(section_tops: &[u16], scroll: u16, probe: u16) -> SectionId {
    let line = scroll.saturating_add(probe);
    section_tops
        .iter()
        .rposition(|&top| top <= line)
        .and_then(SectionId::from_index)
        .unwrap_or(SectionId::Profile)
}
