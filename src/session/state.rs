//! Session state machine and countdown helpers.
//!
//! ```text
//! greeting recorded ──▶ Running
//!   Running ──remaining <= 0──────────▶ TimeExpired
//!   Running ──"exit" / "quit" / "stop"─▶ UserExited
//!   Running ──Ctrl-C / input closed───▶ Interrupted
//!   Running ──empty utterance─────────▶ Running   (no turn)
//!   Running ──utterance + agent reply─▶ Running
//! ```
//!
//! Every terminal state takes the same wrap-up path (save transcript, grade).

use std::time::Duration;

use chrono::{DateTime, Local};

use crate::llm::InterviewType;
use crate::transcript::Turn;

/// Words that end the interview when typed or spoken on their own.
pub const EXIT_KEYWORDS: [&str; 3] = ["exit", "quit", "stop"];

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Taking turns.
    #[default]
    Running,
    /// The countdown reached zero.
    TimeExpired,
    /// The candidate typed or said an exit keyword.
    UserExited,
    /// Ctrl-C, or the input stream closed.
    Interrupted,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionState::Running)
    }

    /// Short label used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            SessionState::Running => "running",
            SessionState::TimeExpired => "time-expired",
            SessionState::UserExited => "user-exited",
            SessionState::Interrupted => "interrupted",
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One interview: what was asked for and what was said.  Owned by the loop
/// and only ever appended to.
#[derive(Debug, Clone)]
pub struct Session {
    pub interview_type: InterviewType,
    pub duration_limit: Duration,
    pub turns: Vec<Turn>,
    pub started_at: DateTime<Local>,
}

impl Session {
    pub fn new(interview_type: InterviewType, duration_limit: Duration) -> Self {
        Self {
            interview_type,
            duration_limit,
            turns: Vec::new(),
            started_at: Local::now(),
        }
    }

    pub fn record(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Number of turns the candidate has taken.
    pub fn user_turns(&self) -> usize {
        self.turns
            .iter()
            .filter(|t| t.role == crate::transcript::Role::User)
            .count()
    }
}

// ---------------------------------------------------------------------------
// Urgency
// ---------------------------------------------------------------------------

/// Display tier for the remaining-time indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    /// Five minutes or more left.
    Normal,
    /// Between two and five minutes left.
    Warning,
    /// Under two minutes left.
    Critical,
}

impl Urgency {
    pub fn for_remaining(remaining: Duration) -> Self {
        const WARNING_BELOW: Duration = Duration::from_secs(5 * 60);
        const CRITICAL_BELOW: Duration = Duration::from_secs(2 * 60);

        if remaining < CRITICAL_BELOW {
            Urgency::Critical
        } else if remaining < WARNING_BELOW {
            Urgency::Warning
        } else {
            Urgency::Normal
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `MM:SS`, minutes uncapped.
pub fn format_clock(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// True when `utterance` is one of [`EXIT_KEYWORDS`], ignoring case,
/// surrounding whitespace and trailing sentence punctuation.
pub fn is_exit_command(utterance: &str) -> bool {
    let word = utterance
        .trim()
        .trim_end_matches(['.', '!', '?'])
        .trim_end();
    EXIT_KEYWORDS
        .iter()
        .any(|keyword| word.eq_ignore_ascii_case(keyword))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
