//! # Team Invites & Toasts
//!
//! The invite form's only logic is local validation. The outcome is shown as
//! a toast that dismisses itself after a fixed duration; nothing is sent.

use std::fmt;
use std::time::{Duration, Instant};

use once_cell::sync::Lazy;
use regex::Regex;

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(3000);

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InviteError {
    Empty,
    Malformed,
}

impl fmt::Display for InviteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InviteError::Empty => write!(f, "Please enter an email address"),
            InviteError::Malformed => write!(f, "Please enter a valid email address"),
        }
    }
}

impl std::error::Error for InviteError {}

/// Check an invite address. Returns the confirmation text on success.
pub fn check_invite(email: &str) -> Result<String, InviteError> {
    if email.is_empty() {
        return Err(InviteError::Empty);
    }
    if !validate_email(email) {
        return Err(InviteError::Malformed);
    }
    Ok(format!("Invite sent to {email}!"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// A short-lived notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub expires_at: Instant,
}

impl Toast {
    pub fn new(message: impl Into<String>, kind: ToastKind, now: Instant, duration: Duration) -> Self {
        Self {
            message: message.into(),
            kind,
            expires_at: now + duration,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}
