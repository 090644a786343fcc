//! The conversational agent: one persona-configured chat session.
//!
//! History layout sent on every request:
//!
//! ```text
//! [system: persona + rules] [assistant: greeting] [user] [assistant] ...
//! ```
//!
//! A failed request leaves the history exactly as it was before the call,
//! so the next request does not carry an unanswered user message.

use std::sync::Arc;

use crate::console::Console;
use crate::llm::client::{ChatClient, ChatMessage, LlmError};
use crate::llm::persona::InterviewType;

/// Spoken in place of a reply when the LLM cannot be reached.
pub const FALLBACK_REPLY: &str =
    "I'm having trouble connecting to my brain right now. Can you repeat that?";

pub struct Interviewer {
    client: Arc<dyn ChatClient>,
    interview_type: InterviewType,
    history: Vec<ChatMessage>,
    console: Console,
}

impl Interviewer {
    /// Seed a session with the hidden persona instruction for
    /// `interview_type`.
    pub fn new(client: Arc<dyn ChatClient>, interview_type: InterviewType, console: Console) -> Self {
        Self {
            client,
            interview_type,
            history: vec![ChatMessage::system(interview_type.system_prompt())],
            console,
        }
    }

    pub fn interview_type(&self) -> InterviewType {
        self.interview_type
    }

    /// Record the opening line as the interviewer's first message.
    pub fn open(&mut self, greeting: &str) {
        self.history.push(ChatMessage::assistant(greeting));
    }

    /// Send `user_text` and return the reply, or the transport error.
    pub async fn try_respond(&mut self, user_text: &str) -> Result<String, LlmError> {
        self.history.push(ChatMessage::user(user_text));
        match self.client.complete(&self.history).await {
            Ok(reply) => {
                self.history.push(ChatMessage::assistant(reply.clone()));
                Ok(reply)
            }
            Err(e) => {
                self.history.pop();
                Err(e)
            }
        }
    }

    /// Like [`try_respond`](Self::try_respond) but never fails: errors are
    /// printed and [`FALLBACK_REPLY`] is returned.
    pub async fn get_response(&mut self, user_text: &str) -> String {
        match self.try_respond(user_text).await {
            Ok(reply) => reply,
            Err(e) => {
                log::warn!("interviewer: LLM call failed: {e}");
                self.console
                    .error(&format!("Error communicating with AI: {e}"));
                FALLBACK_REPLY.to_string()
            }
        }
    }

    /// Every message so far, including the hidden persona instruction.
    pub fn get_history(&self) -> &[ChatMessage] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::{ChatRole, MockChatClient};

    fn interviewer(mock: Arc<MockChatClient>) -> (Interviewer, crate::console::CapturedOutput) {
        let (console, out) = Console::captured();
        (
            Interviewer::new(mock, InterviewType::Engineering, console),
            out,
        )
    }

    #[test]
    fn construction_seeds_hidden_persona() {
        let mock = Arc::new(MockChatClient::replying("ok"));
        let (iv, _) = interviewer(mock.clone());

        let history = iv.get_history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].role, ChatRole::System);
        assert!(history[0].content.contains("Senior Staff Engineer"));
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn response_extends_history_in_order() {
        let mock = Arc::new(MockChatClient::replying("What is a hash map?"));
        let (mut iv, _) = interviewer(mock.clone());
        iv.open("Hello!");

        let reply = iv.get_response("Ready.").await;
        assert_eq!(reply, "What is a hash map?");

        let roles: Vec<ChatRole> = iv.get_history().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                ChatRole::System,
                ChatRole::Assistant,
                ChatRole::User,
                ChatRole::Assistant
            ]
        );

        // The request carried persona, greeting and the new user message.
        let sent = &mock.requests()[0];
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[2], ChatMessage::user("Ready."));
    }

    #[tokio::test]
    async fn failure_returns_fallback_and_reports() {
        let mock = Arc::new(MockChatClient::with_script(
            "later",
            vec![Err(LlmError::Request("connection refused".into()))],
        ));
        let (mut iv, out) = interviewer(mock);
        iv.open("Hello!");

        let reply = iv.get_response("Ready.").await;
        assert_eq!(reply, FALLBACK_REPLY);
        assert!(out.text().contains("connection refused"));
        // History rolled back to before the failed call.
        assert_eq!(iv.get_history().len(), 2);
    }

    #[tokio::test]
    async fn recovers_after_a_failure() {
        let mock = Arc::new(MockChatClient::with_script(
            "Second try worked.",
            vec![Err(LlmError::Timeout)],
        ));
        let (mut iv, _) = interviewer(mock);

        assert_eq!(iv.get_response("one").await, FALLBACK_REPLY);
        assert_eq!(iv.get_response("two").await, "Second try worked.");
        assert_eq!(iv.get_history().last().unwrap().content, "Second try worked.");
    }

    #[tokio::test]
    async fn try_respond_surfaces_the_error() {
        let mock = Arc::new(MockChatClient::with_script(
            "x",
            vec![Err(LlmError::EmptyResponse)],
        ));
        let (mut iv, _) = interviewer(mock);
        assert!(matches!(
            iv.try_respond("hi").await,
            Err(LlmError::EmptyResponse)
        ));
    }
}
