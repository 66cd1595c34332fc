use std::sync::Arc;

use async_trait::async_trait;
use log::{info, warn};
use tokio::task::JoinHandle;

use super::IntegrationError;

/// External guidance engine that runs a walkthrough named by an opaque token.
#[async_trait]
pub trait FlowLauncher: Send + Sync {
    fn name(&self) -> &str;

    async fn start_flow(&self, token: &str) -> Result<(), IntegrationError>;
}

/// Launcher that records the request in the log and nothing else.
pub struct LogFlowLauncher;

#[async_trait]
impl FlowLauncher for LogFlowLauncher {
    fn name(&self) -> &str {
        "log"
    }

    async fn start_flow(&self, token: &str) -> Result<(), IntegrationError> {
        if token.is_empty() {
            return Err(IntegrationError::Config("empty flow token".to_string()));
        }
        info!("Flow start requested: {token}");
        Ok(())
    }
}

/// Fire-and-forget: start the flow on a background task and log the outcome.
pub fn spawn_flow_start(launcher: Arc<dyn FlowLauncher>, token: String) -> JoinHandle<()> {
    info!("Spawning flow start via '{}'", launcher.name());
    tokio::spawn(async move {
        if let Err(e) = launcher.start_flow(&token).await {
            warn!("Flow launcher '{}' failed: {}", launcher.name(), e);
        }
    })
}
