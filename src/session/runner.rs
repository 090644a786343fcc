//! The interview loop and its wrap-up.
//!
//! [`SessionLoop::run`] takes turns until a terminal [`SessionState`];
//! [`finish_session`] then saves the transcript and grades it, whatever the
//! state was.
//!
//! Input and playback are raced against the [`Interrupt`] flag and abandoned
//! on Ctrl-C.  The interviewer's LLM call is not: it completes, its reply is
//! recorded, and only then is the flag checked.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::console::Console;
use crate::llm::{Grader, Interviewer};
use crate::speech::SpeechGateway;
use crate::transcript::{format_as_text, TranscriptStore, Turn};

use super::clock::Clock;
use super::input::UserInput;
use super::interrupt::Interrupt;
use super::state::{is_exit_command, Session, SessionState};

// ---------------------------------------------------------------------------
// SessionLoop
// ---------------------------------------------------------------------------

pub struct SessionLoop {
    interviewer: Interviewer,
    input: Box<dyn UserInput>,
    speech: Option<Arc<dyn SpeechGateway>>,
    clock: Box<dyn Clock>,
    interrupt: Interrupt,
    console: Console,
}

impl SessionLoop {
    /// `speech` is `None` in text mode; replies are then only printed.
    pub fn new(
        interviewer: Interviewer,
        input: Box<dyn UserInput>,
        speech: Option<Arc<dyn SpeechGateway>>,
        clock: Box<dyn Clock>,
        interrupt: Interrupt,
        console: Console,
    ) -> Self {
        Self {
            interviewer,
            input,
            speech,
            clock,
            interrupt,
            console,
        }
    }

    pub fn interviewer(&self) -> &Interviewer {
        &self.interviewer
    }

    /// Greet, then alternate turns until time runs out, the candidate says
    /// an exit word, or the session is interrupted.  Every turn is appended
    /// to `session`.
    pub async fn run(&mut self, session: &mut Session, greeting: &str) -> SessionState {
        self.interviewer.open(greeting);
        session.record(Turn::agent(greeting));
        self.console.agent(greeting);
        if !self.say(greeting).await {
            return self.stop(SessionState::Interrupted);
        }

        // The countdown starts once the greeting has been delivered.
        let started = self.clock.elapsed();
        let mut iterations = 0usize;

        loop {
            if self.interrupt.is_triggered() {
                return self.stop(SessionState::Interrupted);
            }

            let elapsed = self.clock.elapsed().saturating_sub(started);
            let remaining = session.duration_limit.saturating_sub(elapsed);
            if remaining.is_zero() {
                log::info!("session: time expired after {iterations} iteration(s)");
                return self.stop(SessionState::TimeExpired);
            }
            self.console.time_remaining(remaining);
            iterations += 1;

            let utterance = tokio::select! {
                biased;
                _ = self.interrupt.triggered() => None,
                next = self.input.next_utterance() => next,
            };
            let Some(utterance) = utterance else {
                return self.stop(SessionState::Interrupted);
            };

            let utterance = utterance.trim();
            if utterance.is_empty() {
                continue;
            }

            session.record(Turn::user(utterance));
            if is_exit_command(utterance) {
                return self.stop(SessionState::UserExited);
            }

            let reply = self.interviewer.get_response(utterance).await;
            session.record(Turn::agent(&reply));
            self.console.agent(&reply);

            if self.interrupt.is_triggered() || !self.say(&reply).await {
                return self.stop(SessionState::Interrupted);
            }
        }
    }

    /// Speak `text` if a gateway is attached.  Returns `false` when playback
    /// was abandoned because of an interrupt.
    async fn say(&self, text: &str) -> bool {
        let Some(speech) = &self.speech else {
            return !self.interrupt.is_triggered();
        };
        tokio::select! {
            biased;
            _ = self.interrupt.triggered() => false,
            _ = speech.speak(text) => true,
        }
    }

    fn stop(&self, state: SessionState) -> SessionState {
        debug_assert!(state.is_terminal());
        log::info!("session: {}", state.label());
        match state {
            SessionState::TimeExpired => self.console.error("\nTime is up!"),
            SessionState::Interrupted => self.console.notice("\nInterview stopped."),
            SessionState::UserExited => self.console.notice("Ending the interview."),
            SessionState::Running => {}
        }
        state
    }
}

// ---------------------------------------------------------------------------
// Wrap-up
// ---------------------------------------------------------------------------

/// What a finished session produced.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub state: SessionState,
    pub turns: usize,
    /// `None` when the transcript could not be written.
    pub transcript_path: Option<PathBuf>,
    /// Rendered report, or the inline grading error.
    pub report: String,
}

/// Save the transcript, then grade it.  A save failure is reported and does
/// not skip grading.
pub async fn finish_session(
    state: SessionState,
    session: &Session,
    store: &TranscriptStore,
    grader: &Grader,
    console: &Console,
) -> SessionSummary {
    console.headline("\nInterview Complete.");
    log::info!(
        "session: finished {} with {} candidate turn(s)",
        state.label(),
        session.user_turns()
    );

    let transcript_path = match store.save(&session.turns, session.interview_type) {
        Ok(path) => Some(path),
        Err(e) => {
            log::error!("session: {e}");
            console.error(&format!("Failed to save transcript: {e}"));
            None
        }
    };

    let text = format_as_text(&session.turns);
    let report = grader.grade(&text, session.interview_type).await;
    console.panel("Interview Feedback", &report);
    if let Some(path) = &transcript_path {
        console.info(&format!("Transcript saved to: {}", path.display()));
    }

    SessionSummary {
        state,
        turns: session.turns.len(),
        transcript_path,
        report,
    }
}

/// Whole-minute duration from the CLI.
pub fn minutes(mins: u32) -> Duration {
    Duration::from_secs(u64::from(mins) * 60)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tempfile::tempdir;

    use super::*;
    use crate::llm::{
        ChatClient, ChatMessage, InterviewType, LlmError, MockChatClient, RubricSection,
        FALLBACK_REPLY,
    };
    use crate::session::clock::ManualClock;
    use crate::transcript::Role;

    const GREETING: &str = "Hello! Are you ready?";
    const TURN_TIME: Duration = Duration::from_secs(20);

    enum Step {
        Say(&'static str),
        Silence,
        Interrupt,
        Close,
    }

    /// Scripted candidate.  Every step costs `TURN_TIME` on the shared clock.
    struct ScriptedInput {
        steps: VecDeque<Step>,
        clock: ManualClock,
        interrupt: Interrupt,
        calls: Arc<Mutex<usize>>,
    }

    #[async_trait]
    impl UserInput for ScriptedInput {
        async fn next_utterance(&mut self) -> Option<String> {
            *self.calls.lock().unwrap() += 1;
            self.clock.advance(TURN_TIME);
            match self.steps.pop_front().unwrap_or(Step::Silence) {
                Step::Say(text) => Some(text.to_string()),
                Step::Silence => Some(String::new()),
                Step::Close => None,
                Step::Interrupt => {
                    self.interrupt.trigger();
                    std::future::pending::<()>().await;
                    None
                }
            }
        }
    }

    #[derive(Default)]
    struct RecordingGateway {
        spoken: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SpeechGateway for RecordingGateway {
        async fn speak(&self, text: &str) {
            self.spoken.lock().unwrap().push(text.to_string());
        }
        async fn listen(&self) -> String {
            String::new()
        }
    }

    struct Harness {
        session_loop: SessionLoop,
        session: Session,
        calls: Arc<Mutex<usize>>,
        llm: Arc<MockChatClient>,
        console: Console,
    }

    fn harness(steps: Vec<Step>, mins: u32, llm: MockChatClient) -> Harness {
        harness_with(steps, mins, Arc::new(llm), None)
    }

    fn harness_with(
        steps: Vec<Step>,
        mins: u32,
        llm: Arc<MockChatClient>,
        speech: Option<Arc<dyn SpeechGateway>>,
    ) -> Harness {
        let (console, _) = Console::captured();
        let clock = ManualClock::default();
        let interrupt = Interrupt::new();
        let calls = Arc::new(Mutex::new(0));
        let input = ScriptedInput {
            steps: steps.into(),
            clock: clock.clone(),
            interrupt: interrupt.clone(),
            calls: Arc::clone(&calls),
        };
        let interviewer = Interviewer::new(llm.clone(), InterviewType::Engineering, console.clone());
        Harness {
            session_loop: SessionLoop::new(
                interviewer,
                Box::new(input),
                speech,
                Box::new(clock),
                interrupt,
                console.clone(),
            ),
            session: Session::new(InterviewType::Engineering, minutes(mins)),
            calls,
            llm,
            console,
        }
    }

    impl Harness {
        async fn run(&mut self) -> SessionState {
            self.session_loop.run(&mut self.session, GREETING).await
        }

        fn roles(&self) -> Vec<Role> {
            self.session.turns.iter().map(|t| t.role).collect()
        }
    }

    #[tokio::test]
    async fn zero_duration_expires_immediately() {
        let mut h = harness(vec![Step::Say("never read")], 0, MockChatClient::replying("x"));
        assert_eq!(h.run().await, SessionState::TimeExpired);
        assert_eq!(h.session.turns, vec![Turn::agent(GREETING)]);
        assert_eq!(*h.calls.lock().unwrap(), 0);
        assert_eq!(h.llm.calls(), 0);
    }

    #[tokio::test]
    async fn quit_as_first_input_exits_without_agent_reply() {
        let mut h = harness(vec![Step::Say("quit")], 20, MockChatClient::replying("x"));
        assert_eq!(h.run().await, SessionState::UserExited);
        assert_eq!(h.session.turns, vec![Turn::agent(GREETING), Turn::user("quit")]);
        assert_eq!(h.llm.calls(), 0);
    }

    #[tokio::test]
    async fn three_exchanges_then_time_expires() {
        let steps = vec![Step::Say("one"), Step::Say("two"), Step::Say("three")];
        let mut h = harness(steps, 1, MockChatClient::replying("Next question?"));

        assert_eq!(h.run().await, SessionState::TimeExpired);
        assert_eq!(h.session.turns.len(), 7);
        assert_eq!(
            h.roles(),
            vec![
                Role::Agent,
                Role::User,
                Role::Agent,
                Role::User,
                Role::Agent,
                Role::User,
                Role::Agent
            ]
        );
        assert_eq!(h.llm.calls(), 3);
    }

    #[tokio::test]
    async fn silence_never_records_or_calls_the_agent() {
        // 1 minute at 20 s per empty listen: ceil(60 / 20) = 3 iterations.
        let mut h = harness(Vec::new(), 1, MockChatClient::replying("x"));
        assert_eq!(h.run().await, SessionState::TimeExpired);
        assert_eq!(h.session.turns.len(), 1);
        assert_eq!(h.llm.calls(), 0);
        assert_eq!(*h.calls.lock().unwrap(), 3);
    }

    #[tokio::test]
    async fn llm_failure_uses_fallback_and_continues() {
        let llm = MockChatClient::with_script(
            "Recovered.",
            vec![Err(LlmError::Request("connection reset".into()))],
        );
        let steps = vec![Step::Say("one"), Step::Say("two"), Step::Say("exit")];
        let mut h = harness(steps, 20, llm);

        assert_eq!(h.run().await, SessionState::UserExited);
        assert_eq!(h.session.turns[2], Turn::agent(FALLBACK_REPLY));
        assert_eq!(h.session.turns[4], Turn::agent("Recovered."));
    }

    #[tokio::test]
    async fn interrupt_while_waiting_for_input() {
        let steps = vec![Step::Say("one"), Step::Interrupt];
        let mut h = harness(steps, 20, MockChatClient::replying("Go on."));

        assert_eq!(h.run().await, SessionState::Interrupted);
        assert_eq!(h.session.turns.len(), 3);
    }

    #[tokio::test]
    async fn closed_input_counts_as_interrupted() {
        let mut h = harness(vec![Step::Close], 20, MockChatClient::replying("x"));
        assert_eq!(h.run().await, SessionState::Interrupted);
        assert_eq!(h.session.turns.len(), 1);
    }

    /// Raises the interrupt while "in flight", then replies normally.
    struct InterruptingClient {
        interrupt: Interrupt,
    }

    #[async_trait]
    impl ChatClient for InterruptingClient {
        async fn complete(&self, _messages: &[ChatMessage]) -> Result<String, LlmError> {
            self.interrupt.trigger();
            Ok("Reply that still counts.".into())
        }
    }

    #[tokio::test]
    async fn in_flight_reply_is_recorded_before_interrupt() {
        let (console, _) = Console::captured();
        let clock = ManualClock::default();
        let interrupt = Interrupt::new();
        let input = ScriptedInput {
            steps: vec![Step::Say("answer")].into(),
            clock: clock.clone(),
            interrupt: interrupt.clone(),
            calls: Default::default(),
        };
        let client = Arc::new(InterruptingClient {
            interrupt: interrupt.clone(),
        });
        let interviewer = Interviewer::new(client, InterviewType::Behavioral, console.clone());
        let mut session_loop = SessionLoop::new(
            interviewer,
            Box::new(input),
            None,
            Box::new(clock),
            interrupt,
            console,
        );
        let mut session = Session::new(InterviewType::Behavioral, minutes(20));

        assert_eq!(
            session_loop.run(&mut session, GREETING).await,
            SessionState::Interrupted
        );
        assert_eq!(
            session.turns.last(),
            Some(&Turn::agent("Reply that still counts."))
        );
    }

    #[tokio::test]
    async fn voice_mode_speaks_greeting_and_replies() {
        let gateway = Arc::new(RecordingGateway::default());
        let steps = vec![Step::Say("Ready."), Step::Say("stop")];
        let mut h = harness_with(
            steps,
            20,
            Arc::new(MockChatClient::replying("First question.")),
            Some(gateway.clone()),
        );

        assert_eq!(h.run().await, SessionState::UserExited);
        assert_eq!(
            gateway.spoken.lock().unwrap().as_slice(),
            &[GREETING.to_string(), "First question.".to_string()]
        );
    }

    /// Plays `clean_plays` utterances normally, then raises the interrupt
    /// mid-playback and never finishes.
    struct StallingGateway {
        interrupt: Interrupt,
        clean_plays: Mutex<usize>,
    }

    #[async_trait]
    impl SpeechGateway for StallingGateway {
        async fn speak(&self, _text: &str) {
            {
                let mut left = self.clean_plays.lock().unwrap();
                if *left > 0 {
                    *left -= 1;
                    return;
                }
            }
            self.interrupt.trigger();
            std::future::pending::<()>().await;
        }
        async fn listen(&self) -> String {
            String::new()
        }
    }

    fn stalling_harness(steps: Vec<Step>, clean_plays: usize) -> Harness {
        let mut h = harness(steps, 20, MockChatClient::replying("Reply."));
        let gateway: Arc<dyn SpeechGateway> = Arc::new(StallingGateway {
            interrupt: h.session_loop.interrupt.clone(),
            clean_plays: Mutex::new(clean_plays),
        });
        h.session_loop.speech = Some(gateway);
        h
    }

    #[tokio::test]
    async fn interrupt_during_greeting_playback() {
        let mut h = stalling_harness(vec![Step::Say("never read")], 0);
        assert_eq!(h.run().await, SessionState::Interrupted);
        assert_eq!(h.session.turns, vec![Turn::agent(GREETING)]);
        assert_eq!(*h.calls.lock().unwrap(), 0);
        assert_eq!(h.llm.calls(), 0);
    }

    #[tokio::test]
    async fn interrupt_during_reply_playback_keeps_the_reply() {
        let mut h = stalling_harness(vec![Step::Say("answer"), Step::Say("unused")], 1);
        assert_eq!(h.run().await, SessionState::Interrupted);
        assert_eq!(
            h.session.turns,
            vec![Turn::agent(GREETING), Turn::user("answer"), Turn::agent("Reply.")]
        );
        assert_eq!(*h.calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn interviewer_history_tracks_turns() {
        let steps = vec![Step::Say("one"), Step::Say("quit")];
        let mut h = harness(steps, 20, MockChatClient::replying("Reply."));
        h.run().await;
        // system + greeting + user + assistant; the exit word never reaches the LLM.
        assert_eq!(h.session_loop.interviewer().get_history().len(), 4);
    }

    // ---- wrap-up -----------------------------------------------------------

    const RUBRIC_REPLY: &str = "\
1. **Strengths**: Clear structure.
2. **Areas for Improvement**: Go deeper on trade-offs.
3. **Role Fit**: Strong.
4. **Communication**: Concise.
5. **Score**: 7/10";

    #[tokio::test]
    async fn wrap_up_saves_and_grades_once() {
        let steps = vec![Step::Say("one"), Step::Say("two"), Step::Say("three")];
        let mut h = harness(steps, 1, MockChatClient::replying("Next?"));
        let state = h.run().await;

        let tmp = tempdir().unwrap();
        let store = TranscriptStore::new(tmp.path().join("transcripts"));
        let grading = Arc::new(MockChatClient::replying(RUBRIC_REPLY));
        let grader = Grader::new(grading.clone(), h.console.clone());

        let summary = finish_session(state, &h.session, &store, &grader, &h.console).await;

        assert_eq!(summary.state, SessionState::TimeExpired);
        assert_eq!(summary.turns, 7);
        assert_eq!(grading.calls(), 1);
        for section in RubricSection::ALL {
            assert!(summary.report.contains(section.heading()), "missing {section}");
        }
        let path = summary.transcript_path.unwrap();
        let record = TranscriptStore::load(&path).unwrap();
        assert_eq!(record.transcript, h.session.turns);
        assert_eq!(record.interview_type, "Engineering");
    }

    #[tokio::test]
    async fn wrap_up_grades_even_after_interrupt() {
        let mut h = harness(vec![Step::Interrupt], 20, MockChatClient::replying("x"));
        let state = h.run().await;
        assert_eq!(state, SessionState::Interrupted);

        let tmp = tempdir().unwrap();
        let store = TranscriptStore::new(tmp.path());
        let grading = Arc::new(MockChatClient::replying(RUBRIC_REPLY));
        let grader = Grader::new(grading.clone(), h.console.clone());

        let summary = finish_session(state, &h.session, &store, &grader, &h.console).await;
        assert_eq!(grading.calls(), 1);
        assert!(summary.transcript_path.is_some());
        // The grader saw the greeting.
        assert!(grading.requests()[0][0].content.contains(GREETING));
    }

    #[tokio::test]
    async fn save_failure_does_not_skip_grading() {
        let session = Session::new(InterviewType::Strategy, minutes(0));
        let tmp = tempdir().unwrap();
        // A file where the directory should be.
        let blocker = tmp.path().join("transcripts");
        std::fs::write(&blocker, "not a directory").unwrap();
        let store = TranscriptStore::new(&blocker);

        let (console, out) = Console::captured();
        let grading = Arc::new(MockChatClient::replying(RUBRIC_REPLY));
        let grader = Grader::new(grading.clone(), console.clone());

        let summary =
            finish_session(SessionState::TimeExpired, &session, &store, &grader, &console).await;
        assert!(summary.transcript_path.is_none());
        assert_eq!(grading.calls(), 1);
        assert!(out.text().contains("Failed to save transcript"));
    }

    #[tokio::test]
    async fn grading_failure_becomes_the_report() {
        let session = Session::new(InterviewType::Strategy, minutes(0));
        let tmp = tempdir().unwrap();
        let store = TranscriptStore::new(tmp.path());
        let (console, _) = Console::captured();
        let grading = Arc::new(MockChatClient::with_script("x", vec![Err(LlmError::Timeout)]));
        let grader = Grader::new(grading, console.clone());

        let summary =
            finish_session(SessionState::UserExited, &session, &store, &grader, &console).await;
        assert!(summary.report.starts_with("Error generating grade:"));
        assert!(summary.transcript_path.is_some());
    }

    #[test]
    fn minutes_converts() {
        assert_eq!(minutes(2), Duration::from_secs(120));
    }
}
