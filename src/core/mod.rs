//! # Core Application Logic
//!
//! This module contains Waypoint's view state and behaviour.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!                 ┌──────────────┴──────────────┐
//!                 ▼                             ▼
//!          ┌────────────┐               ┌──────────────┐
//!          │    TUI     │               │ Integrations │
//!          │  Adapter   │               │ (flow, ident)│
//!          │ (ratatui)  │               │              │
//!          └────────────┘               └──────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all view state in one place
//! - [`action`]: The `Action` enum and `update()` reducer
//! - [`command_bar`]: Search overlay state machine and candidate filter
//! - [`navigation`]: Routes, anchors, scroll-driven section tracking
//! - [`settings`]: Settings form values and focus
//! - [`invite`]: Invite validation and toasts
//! - [`catalog`]: Static content
//! - [`config`]: Layered configuration

pub mod action;
pub mod catalog;
pub mod command_bar;
pub mod config;
pub mod invite;
pub mod navigation;
pub mod settings;
pub mod state;
