//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::core::command_bar::StageTimings;
use crate::core::config::{ResolvedConfig, ResolvedIdentity};
use crate::integrations::{FlowLauncher, IdentityReporter, IntegrationError, Profile};

/// A launcher that remembers every token it was asked to start.
#[derive(Default)]
pub struct RecordingFlowLauncher {
    started: Mutex<Vec<String>>,
}

impl RecordingFlowLauncher {
    pub fn started(&self) -> Vec<String> {
        self.started.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl FlowLauncher for RecordingFlowLauncher {
    fn name(&self) -> &str {
        "recording"
    }

    async fn start_flow(&self, token: &str) -> Result<(), IntegrationError> {
        if let Ok(mut started) = self.started.lock() {
            started.push(token.to_string());
        }
        Ok(())
    }
}

/// A reporter that remembers every identify call.
#[derive(Default)]
pub struct RecordingReporter {
    calls: Mutex<Vec<(String, Profile)>>,
}

impl RecordingReporter {
    pub fn calls(&self) -> Vec<(String, Profile)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl IdentityReporter for RecordingReporter {
    async fn identify(&self, user_id: &str, profile: &Profile) -> Result<(), IntegrationError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((user_id.to_string(), profile.clone()));
        }
        Ok(())
    }
}

/// A resolved config with a flow token and default timings.
pub fn test_config() -> ResolvedConfig {
    ResolvedConfig {
        location: "/".to_string(),
        timings: StageTimings::default(),
        section_probe: 3,
        toast_duration: Duration::from_millis(3000),
        flow_token: Some("flow-test".to_string()),
        identity: ResolvedIdentity {
            analytics_token: None,
            user_id: "test-user".to_string(),
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
        },
    }
}

/// Creates a test App from `test_config()`.
pub fn test_app() -> crate::core::state::App {
    crate::core::state::App::from_config(&test_config())
}
