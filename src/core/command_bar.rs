//! # Command Bar
//!
//! The modal search overlay's behaviour, independent of any terminal code.
//!
//! ```text
//!            open()                ask_assistant()
//!  Closed ───────────▶ Open ─────────────────────▶ Searching(Thinking)
//!    ▲                  │                                   │ thinking
//!    │ close()          │ close()                           ▼
//!    ├──────────────────┘                        Searching(Redirecting)
//!    │                                                      │ redirecting
//!    │                fade (yields Completion)              ▼
//!    └──────────────────────────────────────────────── FadingOut
//! ```
//!
//! Timed transitions are driven by `tick(now)`. The bar owns exactly one
//! pending deadline; `close()` drops it, so a transition can never fire on a
//! bar that has already been dismissed. Only the timed `FadingOut → Closed`
//! step produces a [`Completion`].

use std::fmt;
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::core::catalog::{RECENT_HISTORY, TRENDING_SEARCHES};

pub const DEFAULT_THINKING: Duration = Duration::from_millis(1500);
pub const DEFAULT_REDIRECTING: Duration = Duration::from_millis(800);
pub const DEFAULT_FADE: Duration = Duration::from_millis(300);

/// Shortest time a search stage may stay on screen.
pub const MIN_STAGE_DISPLAY: Duration = Duration::from_millis(500);

// ============================================================================
// Timings
// ============================================================================

/// How long each automatic stage is held before moving on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageTimings {
    pub thinking: Duration,
    pub redirecting: Duration,
    pub fade: Duration,
}

impl Default for StageTimings {
    fn default() -> Self {
        Self {
            thinking: DEFAULT_THINKING,
            redirecting: DEFAULT_REDIRECTING,
            fade: DEFAULT_FADE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimingError {
    /// A search stage would flash by faster than `MIN_STAGE_DISPLAY`.
    StageTooShort { stage: &'static str, duration: Duration },
    /// Stages must shrink: thinking >= redirecting >= fade.
    OutOfOrder,
}

impl fmt::Display for TimingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimingError::StageTooShort { stage, duration } => write!(
                f,
                "{stage} stage of {}ms is shorter than the {}ms minimum",
                duration.as_millis(),
                MIN_STAGE_DISPLAY.as_millis()
            ),
            TimingError::OutOfOrder => {
                write!(f, "stage timings must satisfy thinking >= redirecting >= fade")
            }
        }
    }
}

impl std::error::Error for TimingError {}

impl StageTimings {
    pub fn new(thinking: Duration, redirecting: Duration, fade: Duration) -> Result<Self, TimingError> {
        if thinking < MIN_STAGE_DISPLAY {
            return Err(TimingError::StageTooShort { stage: "thinking", duration: thinking });
        }
        if redirecting < MIN_STAGE_DISPLAY {
            return Err(TimingError::StageTooShort { stage: "redirecting", duration: redirecting });
        }
        if thinking < redirecting || redirecting < fade {
            return Err(TimingError::OutOfOrder);
        }
        Ok(Self { thinking, redirecting, fade })
    }

    /// Total time from asking the assistant to the bar closing itself.
    pub fn total(&self) -> Duration {
        self.thinking + self.redirecting + self.fade
    }
}

// ============================================================================
// Phases
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStage {
    Thinking,
    Redirecting,
}

impl SearchStage {
    pub fn label(self) -> &'static str {
        match self {
            SearchStage::Thinking => "thinking...",
            SearchStage::Redirecting => "starting a flow for you",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Closed,
    Open,
    Searching(SearchStage),
    FadingOut,
}

impl Phase {
    pub fn is_visible(self) -> bool {
        !matches!(self, Phase::Closed)
    }
}

/// Automatic transitions: how long `phase` is held and what follows it.
fn scheduled_successor(phase: Phase, timings: &StageTimings) -> Option<(Duration, Phase)> {
    match phase {
        Phase::Searching(SearchStage::Thinking) => Some((
            timings.thinking,
            Phase::Searching(SearchStage::Redirecting),
        )),
        Phase::Searching(SearchStage::Redirecting) => Some((timings.redirecting, Phase::FadingOut)),
        Phase::FadingOut => Some((timings.fade, Phase::Closed)),
        Phase::Closed | Phase::Open => None,
    }
}

// ============================================================================
// Filtering
// ============================================================================

/// Candidates that survived filtering, per list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matches<'a> {
    pub recent: Vec<&'a str>,
    pub trending: Vec<&'a str>,
}

impl Matches<'_> {
    pub fn has_results(&self) -> bool {
        !self.recent.is_empty() || !self.trending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.recent.len() + self.trending.len()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_results()
    }
}

/// Case-insensitive substring match over both candidate lists.
/// An empty query keeps every candidate.
pub fn filter_candidates<'a>(query: &str, recent: &[&'a str], trending: &[&'a str]) -> Matches<'a> {
    if query.is_empty() {
        return Matches {
            recent: recent.to_vec(),
            trending: trending.to_vec(),
        };
    }

    let needle = query.to_lowercase();
    let keep = |items: &[&'a str]| -> Vec<&'a str> {
        items
            .iter()
            .copied()
            .filter(|item| item.to_lowercase().contains(&needle))
            .collect()
    };

    Matches {
        recent: keep(recent),
        trending: keep(trending),
    }
}

// ============================================================================
// Command bar
// ============================================================================

/// Why `ask_assistant` refused to start a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AskError {
    /// The bar is closed, already searching, or fading out.
    NotOpen,
    EmptyQuery,
    /// Static candidates matched, so the assistant option is not offered.
    HasMatches,
}

impl fmt::Display for AskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AskError::NotOpen => write!(f, "command bar is not accepting queries"),
            AskError::EmptyQuery => write!(f, "query is empty"),
            AskError::HasMatches => write!(f, "query matches existing candidates"),
        }
    }
}

impl std::error::Error for AskError {}

/// A search sequence that ran to its natural end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub query: String,
}

pub struct CommandBar {
    phase: Phase,
    query: String,
    deadline: Option<Instant>,
    timings: StageTimings,
    recent: &'static [&'static str],
    trending: &'static [&'static str],
}

impl Default for CommandBar {
    fn default() -> Self {
        Self::new(StageTimings::default())
    }
}

impl CommandBar {
    pub fn new(timings: StageTimings) -> Self {
        Self::with_candidates(timings, RECENT_HISTORY, TRENDING_SEARCHES)
    }

    pub fn with_candidates(
        timings: StageTimings,
        recent: &'static [&'static str],
        trending: &'static [&'static str],
    ) -> Self {
        Self {
            phase: Phase::Closed,
            query: String::new(),
            deadline: None,
            timings,
            recent,
            trending,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn timings(&self) -> StageTimings {
        self.timings
    }

    pub fn is_open(&self) -> bool {
        self.phase.is_visible()
    }

    /// When the next timed transition is due, if one is pending.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn matches(&self) -> Matches<'static> {
        filter_candidates(&self.query, self.recent, self.trending)
    }

    /// The assistant option is shown only for a non-empty query nothing matched.
    pub fn assistant_offered(&self) -> bool {
        !self.query.is_empty() && !self.matches().has_results()
    }

    /// Show the bar with an empty query. No-op while already visible.
    pub fn open(&mut self) {
        if self.phase.is_visible() {
            debug!("Command bar already open ({:?})", self.phase);
            return;
        }
        self.query.clear();
        self.deadline = None;
        self.enter(Phase::Open);
    }

    /// Dismiss immediately from any phase, cancelling the pending transition.
    pub fn close(&mut self) {
        if self.phase == Phase::Closed {
            return;
        }
        if self.deadline.take().is_some() {
            info!("Command bar closed during {:?}, pending transition cancelled", self.phase);
        }
        self.query.clear();
        self.enter(Phase::Closed);
    }

    pub fn push_char(&mut self, c: char) {
        if self.phase == Phase::Open {
            self.query.push(c);
        }
    }

    pub fn push_str(&mut self, text: &str) {
        if self.phase == Phase::Open {
            self.query.extend(text.chars().filter(|c| !c.is_control()));
        }
    }

    pub fn backspace(&mut self) {
        if self.phase == Phase::Open {
            self.query.pop();
        }
    }

    pub fn clear_query(&mut self) {
        if self.phase == Phase::Open {
            self.query.clear();
        }
    }

    /// Start the simulated assistant search for the current query.
    pub fn ask_assistant(&mut self, now: Instant) -> Result<(), AskError> {
        if self.phase != Phase::Open {
            return Err(AskError::NotOpen);
        }
        if self.query.is_empty() {
            return Err(AskError::EmptyQuery);
        }
        if self.matches().has_results() {
            return Err(AskError::HasMatches);
        }

        info!("Assistant search started for {:?}", self.query);
        let next = Phase::Searching(SearchStage::Thinking);
        self.enter(next);
        self.deadline = scheduled_successor(next, &self.timings).map(|(hold, _)| now + hold);
        Ok(())
    }

    /// Fire every transition due at or before `now`.
    ///
    /// Deadlines chain from the previous deadline rather than from `now`, so a
    /// late tick replays the same sequence it would have taken on time.
    pub fn tick(&mut self, now: Instant) -> Option<Completion> {
        let mut completion = None;

        loop {
            let due = match self.deadline {
                Some(due) if due <= now => due,
                _ => break,
            };
            let Some((_, next)) = scheduled_successor(self.phase, &self.timings) else {
                self.deadline = None;
                break;
            };

            if next == Phase::Closed {
                completion = Some(Completion {
                    query: std::mem::take(&mut self.query),
                });
            }
            self.enter(next);
            self.deadline = scheduled_successor(next, &self.timings).map(|(hold, _)| due + hold);
        }

        completion
    }

    fn enter(&mut self, phase: Phase) {
        debug!("Command bar: {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }
}
