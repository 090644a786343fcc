//! Write-once JSON transcript files.
//!
//! Layout: `<dir>/<category-slug>_<YYYYMMDD_HHMMSS>.json`
//!
//! ```json
//! {
//!   "timestamp": "20261019_143005",
//!   "type": "System Design",
//!   "transcript": [{ "role": "agent", "content": "Hello! ..." }]
//! }
//! ```

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::turn::Turn;
use crate::llm::InterviewType;

/// Timestamp format shared by file names and the `timestamp` field.
pub const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Highest numeric suffix tried before giving up on a free file name.
const MAX_SUFFIX: u32 = 100;

#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("transcript I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid transcript JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no free transcript file name for {stem} in {dir}")]
    NameExhausted { dir: PathBuf, stem: String },
}

/// On-disk snapshot of a finished session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptRecord {
    pub timestamp: String,
    #[serde(rename = "type")]
    pub interview_type: String,
    pub transcript: Vec<Turn>,
}

/// Saves and loads [`TranscriptRecord`]s under one directory.
#[derive(Debug, Clone)]
pub struct TranscriptStore {
    dir: PathBuf,
}

impl TranscriptStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save `turns` stamped with the current local time.
    pub fn save(
        &self,
        turns: &[Turn],
        interview_type: InterviewType,
    ) -> Result<PathBuf, TranscriptError> {
        self.save_at(turns, interview_type, Local::now())
    }

    /// Save `turns` stamped with `at`.
    ///
    /// The file is created with `create_new`; if another session already
    /// claimed the name within the same second, `_2`, `_3`, … is appended.
    pub fn save_at(
        &self,
        turns: &[Turn],
        interview_type: InterviewType,
        at: DateTime<Local>,
    ) -> Result<PathBuf, TranscriptError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| TranscriptError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let timestamp = at.format(STAMP_FORMAT).to_string();
        let record = TranscriptRecord {
            timestamp: timestamp.clone(),
            interview_type: interview_type.label().to_string(),
            transcript: turns.to_vec(),
        };
        let stem = format!("{}_{timestamp}", interview_type.slug());
        let body = serde_json::to_vec_pretty(&record).map_err(|source| TranscriptError::Json {
            path: self.dir.join(format!("{stem}.json")),
            source,
        })?;

        for attempt in 1..=MAX_SUFFIX {
            let name = if attempt == 1 {
                format!("{stem}.json")
            } else {
                format!("{stem}_{attempt}.json")
            };
            let path = self.dir.join(name);

            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(source) => return Err(TranscriptError::Io { path, source }),
            };
            file.write_all(&body)
                .and_then(|()| file.write_all(b"\n"))
                .map_err(|source| TranscriptError::Io {
                    path: path.clone(),
                    source,
                })?;

            log::info!("transcript: saved {} turns to {}", turns.len(), path.display());
            return Ok(path);
        }

        Err(TranscriptError::NameExhausted {
            dir: self.dir.clone(),
            stem,
        })
    }

    /// Read a previously saved record.
    pub fn load(path: &Path) -> Result<TranscriptRecord, TranscriptError> {
        let bytes = std::fs::read(path).map_err(|source| TranscriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| TranscriptError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}
