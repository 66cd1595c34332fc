use crate::core::navigation::Route;
use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{
    CommandBarOverlay, HomePage, NavBar, SettingsPage, ToastView,
};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

/// Height of the nav bar row.
pub const NAV_HEIGHT: u16 = 1;

/// Draw one frame: nav bar, the current page, then overlays on top.
pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    let [nav_area, body_area] =
        Layout::vertical([Constraint::Length(NAV_HEIGHT), Constraint::Min(0)]).areas(frame.area());

    NavBar::new(app.route, &app.status_message).render(frame, nav_area);

    match app.route {
        Route::Home => HomePage::new().render(frame, body_area),
        Route::Settings => {
            SettingsPage::new(&mut tui.settings_page, &app.settings).render(frame, body_area)
        }
    }

    if let Some(toast) = &app.toast {
        ToastView::new(toast).render(frame, body_area);
    }

    if app.command_bar.is_open() {
        CommandBarOverlay::new(&mut tui.command_bar, &app.command_bar, spinner_frame)
            .render(frame, frame.area());
    }
}
