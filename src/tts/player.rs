//! Local playback through an external command-line player.

use std::io::Write;

use async_trait::async_trait;

use super::TtsError;

/// Encoded audio → speakers.  Playback completes before `play` returns.
#[async_trait]
pub trait AudioSink: Send + Sync {
    async fn play(&self, mp3: &[u8]) -> Result<(), TtsError>;
}

/// Writes the audio to a temp file and runs `program args… <file>`.
///
/// The child is killed if the `play` future is dropped, so an interrupted
/// session does not leave audio running.
#[derive(Debug, Clone)]
pub struct CommandPlayer {
    program: String,
    args: Vec<String>,
}

impl CommandPlayer {
    /// `command[0]` is the program, the rest are its leading arguments.
    pub fn from_command(command: &[String]) -> Result<Self, TtsError> {
        let (program, args) = command.split_first().ok_or(TtsError::NoPlayer)?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait]
impl AudioSink for CommandPlayer {
    async fn play(&self, mp3: &[u8]) -> Result<(), TtsError> {
        let mut file = tempfile::Builder::new()
            .prefix("mock-interview-")
            .suffix(".mp3")
            .tempfile()?;
        file.write_all(mp3)?;
        file.flush()?;

        let status = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .arg(file.path())
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|source| TtsError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(TtsError::Player {
                program: self.program.clone(),
                code: status.code(),
            });
        }
        Ok(())
    }
}
