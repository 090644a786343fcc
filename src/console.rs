//! Terminal output shared by every component.
//!
//! [`Console`] is constructed once in `main` and handed to each component
//! that talks to the user.  It is cheap to clone (one `Arc`).  Colour is
//! applied with `crossterm` styling and switched off automatically when
//! stdout is not a terminal.

use std::io::{IsTerminal, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossterm::style::{Attribute, Color, Stylize};

use crate::session::Urgency;

const RULE_WIDTH: usize = 60;

type Sink = Arc<Mutex<Box<dyn Write + Send>>>;

/// Styled line-oriented output.
#[derive(Clone)]
pub struct Console {
    out: Sink,
    color: bool,
}

impl Console {
    /// Console writing to stdout; colour on when stdout is a TTY.
    pub fn stdout() -> Self {
        let color = std::io::stdout().is_terminal();
        Self::new(Box::new(std::io::stdout()), color)
    }

    /// Console writing to an arbitrary sink.
    pub fn new(out: Box<dyn Write + Send>, color: bool) -> Self {
        Self {
            out: Arc::new(Mutex::new(out)),
            color,
        }
    }

    // -----------------------------------------------------------------------
    // Conversation lines
    // -----------------------------------------------------------------------

    /// An interviewer utterance: `AI: …`.
    pub fn agent(&self, text: &str) {
        let label = self.paint("AI:", Color::Blue, true);
        self.line(&format!("{label} {text}"));
    }

    /// What the recognizer heard.
    pub fn heard(&self, text: &str) {
        self.line(&self.paint(&format!("You said: {text}"), Color::Cyan, false));
    }

    /// Inline prompt for typed input; no trailing newline.
    pub fn prompt(&self, label: &str) {
        let styled = self.paint(label, Color::Yellow, true);
        self.write_raw(&format!("{styled} "));
    }

    /// Rule line with the time left, coloured by urgency.
    pub fn time_remaining(&self, remaining: Duration) {
        let color = match Urgency::for_remaining(remaining) {
            Urgency::Normal => Color::Green,
            Urgency::Warning => Color::Yellow,
            Urgency::Critical => Color::Red,
        };
        let title = format!(" Time Remaining: {} ", crate::session::format_clock(remaining));
        let rule = format!("{title:─^width$}", width = RULE_WIDTH);
        self.line(&self.paint(&rule, color, false));
    }

    // -----------------------------------------------------------------------
    // Status lines
    // -----------------------------------------------------------------------

    pub fn info(&self, text: &str) {
        self.line(text);
    }

    /// Bold headline.
    pub fn headline(&self, text: &str) {
        self.line(&self.paint(text, Color::Magenta, true));
    }

    pub fn success(&self, text: &str) {
        self.line(&self.paint(text, Color::Green, false));
    }

    pub fn notice(&self, text: &str) {
        self.line(&self.paint(text, Color::Yellow, false));
    }

    pub fn error(&self, text: &str) {
        self.line(&self.paint(text, Color::Red, false));
    }

    /// De-emphasised progress text ("Processing...").
    pub fn dim(&self, text: &str) {
        self.line(&self.paint(text, Color::DarkGrey, false));
    }

    /// A titled box around `body`.
    pub fn panel(&self, title: &str, body: &str) {
        let top = format!("{:─^width$}", format!(" {title} "), width = RULE_WIDTH);
        self.line(&self.paint(&top, Color::Cyan, true));
        for line in body.lines() {
            self.line(line);
        }
        self.line(&self.paint(&"─".repeat(RULE_WIDTH), Color::Cyan, false));
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn paint(&self, text: &str, color: Color, bold: bool) -> String {
        if !self.color {
            return text.to_string();
        }
        let styled = text.with(color);
        if bold {
            styled.attribute(Attribute::Bold).to_string()
        } else {
            styled.to_string()
        }
    }

    fn line(&self, text: &str) {
        self.write_raw(&format!("{text}\n"));
    }

    fn write_raw(&self, text: &str) {
        // A writer that panicked mid-line is still usable for plain text.
        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(e) = out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
            log::warn!("console: write failed: {e}");
        }
    }
}

// ---------------------------------------------------------------------------
// Test capture
// ---------------------------------------------------------------------------

/// Shared in-memory sink used by tests to inspect console output.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct CapturedOutput(Arc<Mutex<Vec<u8>>>);

#[cfg(test)]
impl CapturedOutput {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

#[cfg(test)]
impl Write for CapturedOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
impl Console {
    /// Uncoloured console plus a handle to everything it prints.
    pub fn captured() -> (Self, CapturedOutput) {
        let capture = CapturedOutput::default();
        (Self::new(Box::new(capture.clone()), false), capture)
    }
}
