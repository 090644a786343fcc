//! Where the candidate's next utterance comes from.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::console::Console;
use crate::speech::SpeechGateway;

/// Source of candidate utterances.
#[async_trait]
pub trait UserInput: Send {
    /// The next utterance, possibly empty.  `None` means the source is
    /// closed and no more input will ever arrive.
    async fn next_utterance(&mut self) -> Option<String>;
}

// ---------------------------------------------------------------------------
// TextInput
// ---------------------------------------------------------------------------

/// Typed answers, one per line, after a `You:` prompt.
pub struct TextInput<R> {
    lines: Lines<R>,
    console: Console,
}

impl TextInput<BufReader<Stdin>> {
    pub fn stdin(console: Console) -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), console)
    }
}

impl<R: AsyncBufRead + Unpin + Send> TextInput<R> {
    pub fn new(reader: R, console: Console) -> Self {
        Self {
            lines: reader.lines(),
            console,
        }
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> UserInput for TextInput<R> {
    async fn next_utterance(&mut self) -> Option<String> {
        self.console.prompt("You:");
        match self.lines.next_line().await {
            Ok(Some(line)) => Some(line),
            Ok(None) => {
                log::info!("input: end of input");
                None
            }
            Err(e) => {
                log::warn!("input: read failed: {e}");
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// VoiceInput
// ---------------------------------------------------------------------------

/// Spoken answers through the speech gateway.  Never closes.
pub struct VoiceInput {
    gateway: Arc<dyn SpeechGateway>,
}

impl VoiceInput {
    pub fn new(gateway: Arc<dyn SpeechGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl UserInput for VoiceInput {
    async fn next_utterance(&mut self) -> Option<String> {
        Some(self.gateway.listen().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn text_input_yields_lines_then_closes() {
        let (console, out) = Console::captured();
        let mut input = TextInput::new(&b"Ready.\n\nquit\n"[..], console);

        assert_eq!(input.next_utterance().await.as_deref(), Some("Ready."));
        assert_eq!(input.next_utterance().await.as_deref(), Some(""));
        assert_eq!(input.next_utterance().await.as_deref(), Some("quit"));
        assert_eq!(input.next_utterance().await, None);
        assert_eq!(out.text().matches("You:").count(), 4);
    }

    #[tokio::test]
    async fn text_input_handles_missing_final_newline() {
        let mut input = TextInput::new(&b"last answer"[..], Console::captured().0);
        assert_eq!(input.next_utterance().await.as_deref(), Some("last answer"));
        assert_eq!(input.next_utterance().await, None);
    }

    struct Echo;

    #[async_trait]
    impl SpeechGateway for Echo {
        async fn speak(&self, _text: &str) {}
        async fn listen(&self) -> String {
            "heard".into()
        }
    }

    #[tokio::test]
    async fn voice_input_forwards_listen() {
        let mut input = VoiceInput::new(Arc::new(Echo));
        assert_eq!(input.next_utterance().await.as_deref(), Some("heard"));
    }
}
