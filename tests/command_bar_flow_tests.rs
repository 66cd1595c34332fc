use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use waypoint::core::action::{Action, Effect, update};
use waypoint::core::catalog::{INVITE_EMAIL_KEY, SEND_INVITE_KEY, SectionId};
use waypoint::core::command_bar::{Phase, SearchStage};
use waypoint::core::config::{CliOverrides, WaypointConfig, resolve_with_env};
use waypoint::core::invite::ToastKind;
use waypoint::core::navigation::{Route, parse_location};
use waypoint::core::state::App;
use waypoint::integrations::{
    FlowLauncher, IdentityGate, IdentityReporter, IntegrationError, Profile, spawn_flow_start,
};

// ============================================================================
// Helper Functions
// ============================================================================

#[derive(Default)]
struct RecordingLauncher {
    started: Mutex<Vec<String>>,
}

#[async_trait]
impl FlowLauncher for RecordingLauncher {
    fn name(&self) -> &str {
        "recording"
    }

    async fn start_flow(&self, token: &str) -> Result<(), IntegrationError> {
        self.started.lock().unwrap().push(token.to_string());
        Ok(())
    }
}

#[derive(Default)]
struct CountingReporter {
    calls: Mutex<Vec<String>>,
}

#[async_trait]
impl IdentityReporter for CountingReporter {
    async fn identify(&self, user_id: &str, _profile: &Profile) -> Result<(), IntegrationError> {
        self.calls.lock().unwrap().push(user_id.to_string());
        Ok(())
    }
}

/// Resolve an app from TOML text and a fake environment.
fn app_from(toml_text: &str, env: &[(&str, &str)]) -> (App, String) {
    let config: WaypointConfig = toml::from_str(toml_text).unwrap();
    let resolved = resolve_with_env(&config, &CliOverrides::default(), |key| {
        env.iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
    });
    (App::from_config(&resolved), resolved.location)
}

/// Open the bar, type `query`, and ask the assistant at `start`.
fn ask(app: &mut App, query: &str, start: Instant) {
    update(app, Action::OpenCommandBar);
    update(app, Action::QueryPaste(query.to_string()));
    update(app, Action::AskAssistant(start));
}

/// Tick at every `step` until `end`, collecting non-empty effects.
fn run_clock(app: &mut App, start: Instant, end: Duration, step: Duration) -> Vec<(Duration, Effect)> {
    let mut effects = Vec::new();
    let mut t = Duration::ZERO;
    while t <= end {
        let effect = update(app, Action::Tick(start + t));
        if effect != Effect::None {
            effects.push((t, effect));
        }
        t += step;
    }
    effects
}

// ============================================================================
// Assistant flow
// ============================================================================

#[tokio::test]
async fn test_assistant_search_starts_configured_flow_once() {
    let (mut app, _) = app_from("[flow]\ntoken = \"onboarding-42\"\n", &[]);
    let start = Instant::now();
    ask(&mut app, "zzz-nonexistent", start);

    let effects = run_clock(&mut app, start, Duration::from_secs(5), Duration::from_millis(50));
    assert_eq!(
        effects,
        vec![(
            Duration::from_millis(2600),
            Effect::StartFlow("onboarding-42".to_string())
        )]
    );
    assert_eq!(app.command_bar.phase(), Phase::Closed);

    let launcher = Arc::new(RecordingLauncher::default());
    let Effect::StartFlow(token) = effects[0].1.clone() else {
        unreachable!()
    };
    spawn_flow_start(launcher.clone(), token).await.unwrap();
    assert_eq!(*launcher.started.lock().unwrap(), vec!["onboarding-42".to_string()]);
}

#[test]
fn test_stages_follow_configured_timings() {
    let (mut app, _) = app_from(
        "[command_bar]\nthinking_ms = 1000\nredirecting_ms = 600\nfade_ms = 200\n",
        &[("WAYPOINT_FLOW_TOKEN", "env-token")],
    );
    let start = Instant::now();
    ask(&mut app, "zzz-nonexistent", start);

    let at = |ms| start + Duration::from_millis(ms);
    update(&mut app, Action::Tick(at(999)));
    assert_eq!(app.command_bar.phase(), Phase::Searching(SearchStage::Thinking));
    update(&mut app, Action::Tick(at(1000)));
    assert_eq!(app.command_bar.phase(), Phase::Searching(SearchStage::Redirecting));
    update(&mut app, Action::Tick(at(1600)));
    assert_eq!(app.command_bar.phase(), Phase::FadingOut);
    assert_eq!(
        update(&mut app, Action::Tick(at(1800))),
        Effect::StartFlow("env-token".to_string())
    );
}

#[test]
fn test_late_tick_replays_whole_sequence() {
    let (mut app, _) = app_from("[flow]\ntoken = \"t\"\n", &[]);
    let start = Instant::now();
    ask(&mut app, "zzz-nonexistent", start);

    // A stalled frame lands long after every deadline
    let late = start + Duration::from_secs(30);
    assert_eq!(update(&mut app, Action::Tick(late)), Effect::StartFlow("t".to_string()));
    assert_eq!(app.command_bar.phase(), Phase::Closed);
    assert_eq!(app.command_bar.next_deadline(), None);
    assert_eq!(update(&mut app, Action::Tick(late)), Effect::None);
}

#[test]
fn test_closing_mid_search_never_starts_flow() {
    let (mut app, _) = app_from("[flow]\ntoken = \"t\"\n", &[]);
    let start = Instant::now();

    for close_at in [0u64, 1499, 1500, 2299, 2300, 2599] {
        ask(&mut app, "zzz-nonexistent", start);
        update(&mut app, Action::Tick(start + Duration::from_millis(close_at)));
        update(&mut app, Action::CloseCommandBar);
        assert_eq!(app.command_bar.phase(), Phase::Closed);

        let effects = run_clock(&mut app, start, Duration::from_secs(5), Duration::from_millis(100));
        assert!(effects.is_empty(), "flow started after close at {close_at}ms");
    }
}

#[test]
fn test_without_token_search_completes_silently() {
    let (mut app, _) = app_from("", &[("WAYPOINT_FLOW_TOKEN", "   ")]);
    assert_eq!(app.flow_token, None);

    let start = Instant::now();
    ask(&mut app, "zzz-nonexistent", start);
    let effects = run_clock(&mut app, start, Duration::from_secs(5), Duration::from_millis(100));

    assert!(effects.is_empty());
    assert_eq!(app.command_bar.phase(), Phase::Closed);
}

#[test]
fn test_matching_query_cannot_ask_assistant() {
    let (mut app, _) = app_from("[flow]\ntoken = \"t\"\n", &[]);
    update(&mut app, Action::OpenCommandBar);
    update(&mut app, Action::QueryPaste("github".to_string()));
    update(&mut app, Action::AskAssistant(Instant::now()));

    assert_eq!(app.command_bar.phase(), Phase::Open);
    assert!(!app.command_bar.assistant_offered());
}

// ============================================================================
// Navigation and settings
// ============================================================================

#[test]
fn test_location_from_environment_opens_section() {
    let (mut app, location) = app_from("", &[("WAYPOINT_LOCATION", "/settings#billing")]);
    update(&mut app, Action::Navigate(parse_location(&location)));

    assert_eq!(app.route, Route::Settings);
    assert_eq!(app.settings.active_section, SectionId::Billing);
    assert_eq!(app.pending_anchor, Some(SectionId::Billing));
}

#[test]
fn test_invite_round_trip_with_toast_expiry() {
    let (mut app, _) = app_from("[toast]\nduration_ms = 1000\n", &[]);
    let now = Instant::now();
    update(&mut app, Action::Navigate(parse_location("/settings#team")));
    while app.settings.focused_spec().key != INVITE_EMAIL_KEY {
        update(&mut app, Action::FocusNextField);
    }

    update(&mut app, Action::FieldPaste("not-an-email".to_string()));
    update(&mut app, Action::ActivateField(now));
    let toast = app.toast.clone().unwrap();
    assert_eq!(toast.kind, ToastKind::Error);
    assert_eq!(toast.message, "Please enter a valid email address");
    assert_eq!(app.settings.text(INVITE_EMAIL_KEY), Some("not-an-email"));

    app.settings.set_text(INVITE_EMAIL_KEY, "");
    update(&mut app, Action::FieldPaste("friend@example.org".to_string()));
    while app.settings.focused_spec().key != SEND_INVITE_KEY {
        update(&mut app, Action::FocusNextField);
    }
    update(&mut app, Action::ActivateField(now));
    let toast = app.toast.clone().unwrap();
    assert_eq!(toast.kind, ToastKind::Success);
    assert_eq!(toast.message, "Invite sent to friend@example.org!");

    update(&mut app, Action::Tick(now + Duration::from_millis(999)));
    assert!(app.toast.is_some());
    update(&mut app, Action::Tick(now + Duration::from_millis(1000)));
    assert!(app.toast.is_none());
}

// ============================================================================
// Identity
// ============================================================================

#[test]
fn test_identity_gate_reports_once() {
    let gate = IdentityGate::new();
    let reporter = Arc::new(CountingReporter::default());
    let profile = Profile {
        name: "Test User".to_string(),
        email: "test@example.com".to_string(),
    };

    tokio_test::block_on(async {
        let first = gate.report(reporter.clone(), "user-1".to_string(), profile.clone());
        let second = gate.report(reporter.clone(), "user-1".to_string(), profile.clone());
        assert!(second.is_none());
        first.unwrap().await.unwrap();
    });

    assert!(gate.has_reported());
    assert_eq!(*reporter.calls.lock().unwrap(), vec!["user-1".to_string()]);
}
