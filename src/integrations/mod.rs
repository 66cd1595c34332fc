pub mod flow;
pub mod identity;

use std::fmt;

pub use flow::{FlowLauncher, LogFlowLauncher, spawn_flow_start};
pub use identity::{IdentityGate, IdentityReporter, LogIdentityReporter, Profile, STARTUP_IDENTITY};

/// Errors a collaborator may report. The shell only logs them.
#[derive(Debug)]
pub enum IntegrationError {
    /// Collaborator misconfigured (missing token).
    Config(String),
    /// The collaborator rejected the call.
    Rejected(String),
}

impl fmt::Display for IntegrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrationError::Config(msg) => write!(f, "config error: {msg}"),
            IntegrationError::Rejected(msg) => write!(f, "rejected: {msg}"),
        }
    }
}

impl std::error::Error for IntegrationError {}
