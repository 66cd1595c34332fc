//! # TUI Components
//!
//! This module contains all UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! Components in this directory follow two patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Simple display components that receive all data as parameters:
//! - `NavBar`: Top bar with route tabs and status
//! - `HomePage`: Dashboard content
//! - `ToastView`: Bottom-left notice
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components whose persistent state lives in `TuiState` and that are
//! wrapped by a transient renderer each frame:
//! - `SettingsPage`: Sidebar plus scrollable form
//! - `CommandBarOverlay`: Ctrl+K search overlay
//!
//! ## Co-location of Concerns
//!
//! Each component file contains its state types, event types, rendering
//! logic, event handling and tests.
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs            (this file)
//! ├── nav_bar.rs        (Top bar)
//! ├── home.rs           (Dashboard)
//! ├── settings_page.rs  (Settings form)
//! ├── command_bar.rs    (Search overlay)
//! └── toast.rs          (Notices)
//! ```

pub mod command_bar;
pub mod home;
pub mod nav_bar;
pub mod settings_page;
pub mod toast;

pub use command_bar::{CommandBarEvent, CommandBarOverlay, CommandBarState};
pub use home::HomePage;
pub use nav_bar::NavBar;
pub use settings_page::{SettingsPage, SettingsPageState};
pub use toast::ToastView;
