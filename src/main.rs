use std::fs::File;
use std::sync::Arc;

use clap::Parser;
use simplelog::{ConfigBuilder, WriteLogger};
use waypoint::LogLevel;
use waypoint::core::config::{self, CliOverrides, WaypointConfig};
use waypoint::integrations::{LogFlowLauncher, LogIdentityReporter};
use waypoint::tui::{self, Collaborators};

#[derive(Parser)]
#[command(name = "waypoint", about = "Terminal dashboard shell with a command bar")]
struct Args {
    /// Initial location, e.g. "/settings#team"
    #[arg(short, long)]
    location: Option<String>,

    /// Guided flow started after an assistant search
    #[arg(long)]
    flow_token: Option<String>,

    /// Log verbosity written to waypoint.log
    #[arg(long, default_value_t, value_enum)]
    log_level: LogLevel,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to waypoint.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("waypoint.log") {
        let _ = WriteLogger::init(args.log_level.filter(), log_config, log_file);
    }

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            log::warn!("{e}; falling back to defaults");
            WaypointConfig::default()
        }
    };
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            location: args.location,
            flow_token: args.flow_token,
        },
    );

    log::info!(
        "Waypoint starting at {} (flow token {})",
        resolved.location,
        if resolved.flow_token.is_some() { "set" } else { "unset" }
    );

    let collaborators = Collaborators {
        flow: Arc::new(LogFlowLauncher),
        identity: Arc::new(LogIdentityReporter::new(
            resolved.identity.analytics_token.clone(),
        )),
    };

    tui::run(resolved, collaborators)
}
