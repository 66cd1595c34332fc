use std::sync::{Arc, Once};

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Serialize;
use tokio::task::JoinHandle;

use super::IntegrationError;
use crate::core::config::ResolvedIdentity;

/// Profile attributes sent alongside the user id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub name: String,
    pub email: String,
}

impl From<&ResolvedIdentity> for Profile {
    fn from(identity: &ResolvedIdentity) -> Self {
        Self {
            name: identity.name.clone(),
            email: identity.email.clone(),
        }
    }
}

/// Analytics side channel told who is using the shell. No return contract.
#[async_trait]
pub trait IdentityReporter: Send + Sync {
    async fn identify(&self, user_id: &str, profile: &Profile) -> Result<(), IntegrationError>;
}

/// Reporter that writes the identify payload to the log.
pub struct LogIdentityReporter {
    analytics_token: Option<String>,
}

impl LogIdentityReporter {
    pub fn new(analytics_token: Option<String>) -> Self {
        Self { analytics_token }
    }
}

#[async_trait]
impl IdentityReporter for LogIdentityReporter {
    async fn identify(&self, user_id: &str, profile: &Profile) -> Result<(), IntegrationError> {
        let payload = serde_json::json!({
            "user_id": user_id,
            "profile": profile,
        });
        match &self.analytics_token {
            Some(_) => info!("Identify: {payload}"),
            None => debug!("Identify (no analytics token): {payload}"),
        }
        Ok(())
    }
}

/// Runs identity reporting at most once per gate.
pub struct IdentityGate {
    once: Once,
}

impl Default for IdentityGate {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityGate {
    pub const fn new() -> Self {
        Self { once: Once::new() }
    }

    pub fn has_reported(&self) -> bool {
        self.once.is_completed()
    }

    /// Spawn the identify call the first time this is invoked; later calls
    /// return `None` and do nothing.
    pub fn report(
        &self,
        reporter: Arc<dyn IdentityReporter>,
        user_id: String,
        profile: Profile,
    ) -> Option<JoinHandle<()>> {
        let mut handle = None;
        self.once.call_once(|| {
            info!("Reporting identity for user {user_id}");
            handle = Some(tokio::spawn(async move {
                if let Err(e) = reporter.identify(&user_id, &profile).await {
                    warn!("Identity reporting failed: {e}");
                }
            }));
        });
        handle
    }
}

/// Process-wide gate used by the shell at startup.
pub static STARTUP_IDENTITY: IdentityGate = IdentityGate::new();
