//! Interview session: state machine, countdown and turn loop.
//!
//! ```text
//! Running ──(remaining == 0)──────▶ TimeExpired
//!    │ ────(exit / quit / stop)───▶ UserExited
//!    └─────(Ctrl-C, input closed)─▶ Interrupted
//!
//! any terminal state ──▶ finish_session: save transcript, grade
//! ```

pub mod clock;
pub mod input;
pub mod interrupt;
pub mod runner;
pub mod state;

pub use clock::{Clock, SystemClock};
pub use input::{TextInput, UserInput, VoiceInput};
pub use interrupt::{Interrupt, Press};
pub use runner::{finish_session, minutes, SessionLoop, SessionSummary};
pub use state::{format_clock, is_exit_command, Session, SessionState, Urgency, EXIT_KEYWORDS};

#[cfg(test)]
pub use clock::ManualClock;
