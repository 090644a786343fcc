//! Plain-text transcript rendering, fed to the grader.
//!
//! Each turn starts a line with its role tag (`USER: ` / `AGENT: `).  Lines
//! that follow without a tag continue the previous turn.  A continuation
//! line that would itself look like a tag, or that starts with `\`, gets a
//! `\` prefix, so any content survives [`parse_text`] unchanged.

use thiserror::Error;

use super::turn::{Role, Turn};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TranscriptParseError {
    /// Text appeared before the first role tag.
    #[error("line {line}: expected `USER:` or `AGENT:` before any content")]
    MissingRole { line: usize },
}

const ESCAPE: char = '\\';

/// Render `turns` as `ROLE: content` blocks, one per turn, in order.
pub fn format_as_text(turns: &[Turn]) -> String {
    let mut text = String::new();
    for turn in turns {
        text.push_str(turn.role.tag());
        text.push_str(": ");
        for (i, line) in turn.content.split('\n').enumerate() {
            if i > 0 {
                text.push('\n');
                if line.starts_with(ESCAPE) || split_tag(line).is_some() {
                    text.push(ESCAPE);
                }
            }
            text.push_str(line);
        }
        text.push('\n');
    }
    text
}

/// Inverse of [`format_as_text`].
pub fn parse_text(text: &str) -> Result<Vec<Turn>, TranscriptParseError> {
    let mut turns: Vec<Turn> = Vec::new();

    // Split on `\n` only: a `\r` inside content is kept.
    let body = text.strip_suffix('\n').unwrap_or(text);
    for (idx, line) in body.split('\n').enumerate() {
        if let Some((role, content)) = split_tag(line) {
            turns.push(Turn {
                role,
                content: content.to_string(),
            });
            continue;
        }
        match turns.last_mut() {
            Some(turn) => {
                turn.content.push('\n');
                turn.content.push_str(line.strip_prefix(ESCAPE).unwrap_or(line));
            }
            None if line.trim().is_empty() => {}
            None => return Err(TranscriptParseError::MissingRole { line: idx + 1 }),
        }
    }

    for turn in &mut turns {
        turn.content.truncate(turn.content.trim_end().len());
    }
    Ok(turns)
}

fn split_tag(line: &str) -> Option<(Role, &str)> {
    [Role::User, Role::Agent].into_iter().find_map(|role| {
        let rest = line.strip_prefix(role.tag())?.strip_prefix(':')?;
        Some((role, rest.strip_prefix(' ').unwrap_or(rest)))
    })
}
