//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.waypoint/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::command_bar::StageTimings;
use crate::core::invite::DEFAULT_TOAST_DURATION;
use crate::core::navigation::DEFAULT_SECTION_PROBE;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct WaypointConfig {
    #[serde(default)]
    pub command_bar: CommandBarConfig,
    #[serde(default)]
    pub settings_page: SettingsPageConfig,
    #[serde(default)]
    pub toast: ToastConfig,
    #[serde(default)]
    pub flow: FlowConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CommandBarConfig {
    pub thinking_ms: Option<u64>,
    pub redirecting_ms: Option<u64>,
    pub fade_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SettingsPageConfig {
    pub section_probe_rows: Option<u16>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ToastConfig {
    pub duration_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct FlowConfig {
    pub token: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct IdentityConfig {
    pub analytics_token: Option<String>,
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_USER_ID: &str = "1234567890";
pub const DEFAULT_USER_NAME: &str = "Jimmy Carter";
pub const DEFAULT_USER_EMAIL: &str = "jimmy.carter@imanage.com";
pub const DEFAULT_LOCATION: &str = "/";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

/// Who the identity reporter announces at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub analytics_token: Option<String>,
    pub user_id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub location: String,
    pub timings: StageTimings,
    pub section_probe: u16,
    pub toast_duration: Duration,
    pub flow_token: Option<String>,
    pub identity: ResolvedIdentity,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.waypoint/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".waypoint").join("config.toml"))
}

/// Load config from `~/.waypoint/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `WaypointConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<WaypointConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(WaypointConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<WaypointConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(WaypointConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: WaypointConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

const DEFAULT_CONFIG_CONTENT: &str = r#"# Waypoint Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [command_bar]
# thinking_ms = 1500                 # must be >= redirecting_ms and >= 500
# redirecting_ms = 800               # must be >= fade_ms and >= 500
# fade_ms = 300

# [settings_page]
# section_probe_rows = 3             # rows below the top that count as "in view"

# [toast]
# duration_ms = 3000

# [flow]
# token = "flow_..."                 # Or set WAYPOINT_FLOW_TOKEN env var

# [identity]
# analytics_token = "ct_..."         # Or set WAYPOINT_ANALYTICS_TOKEN env var
# user_id = "1234567890"
# name = "Jimmy Carter"
# email = "jimmy.carter@imanage.com"
"#;

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, DEFAULT_CONFIG_CONTENT) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Values supplied on the command line (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub location: Option<String>,
    pub flow_token: Option<String>,
}

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &WaypointConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// `resolve` with an injectable environment lookup.
pub fn resolve_with_env(
    config: &WaypointConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Location: CLI → env → default
    let location = cli
        .location
        .clone()
        .or_else(|| env("WAYPOINT_LOCATION"))
        .unwrap_or_else(|| DEFAULT_LOCATION.to_string());

    // Flow token: CLI → env → config. Empty strings count as unset.
    let flow_token = cli
        .flow_token
        .clone()
        .or_else(|| env("WAYPOINT_FLOW_TOKEN"))
        .or_else(|| config.flow.token.clone())
        .filter(|t| !t.trim().is_empty());

    let analytics_token = env("WAYPOINT_ANALYTICS_TOKEN")
        .or_else(|| config.identity.analytics_token.clone())
        .filter(|t| !t.trim().is_empty());

    let identity = ResolvedIdentity {
        analytics_token,
        user_id: config
            .identity
            .user_id
            .clone()
            .unwrap_or_else(|| DEFAULT_USER_ID.to_string()),
        name: config
            .identity
            .name
            .clone()
            .unwrap_or_else(|| DEFAULT_USER_NAME.to_string()),
        email: config
            .identity
            .email
            .clone()
            .unwrap_or_else(|| DEFAULT_USER_EMAIL.to_string()),
    };

    ResolvedConfig {
        location,
        timings: resolve_timings(&config.command_bar),
        section_probe: config
            .settings_page
            .section_probe_rows
            .unwrap_or(DEFAULT_SECTION_PROBE),
        toast_duration: config
            .toast
            .duration_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_TOAST_DURATION),
        flow_token,
        identity,
    }
}

/// Stage timings: configured values win if they keep the stages ordered,
/// otherwise all three fall back to defaults.
fn resolve_timings(config: &CommandBarConfig) -> StageTimings {
    let defaults = StageTimings::default();
    let thinking = config.thinking_ms.map(Duration::from_millis).unwrap_or(defaults.thinking);
    let redirecting = config
        .redirecting_ms
        .map(Duration::from_millis)
        .unwrap_or(defaults.redirecting);
    let fade = config.fade_ms.map(Duration::from_millis).unwrap_or(defaults.fade);

    match StageTimings::new(thinking, redirecting, fade) {
        Ok(timings) => timings,
        Err(e) => {
            warn!("Ignoring [command_bar] timings: {e}");
            defaults
        }
    }
}
