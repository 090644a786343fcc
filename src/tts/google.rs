//! Google Translate TTS client.
//!
//! One GET per chunk:
//!
//! ```text
//! GET {endpoint}?ie=UTF-8&q=<chunk>&tl=<lang>&total=<n>&idx=<i>&textlen=<len>&client=tw-ob
//! ```
//!
//! Each response is an MP3 stream; the streams are concatenated in order,
//! which MP3 decoders play back as one file.

use async_trait::async_trait;

use super::chunk::split_for_tts;
use super::TtsError;
use crate::config::TtsConfig;

/// Browser-like agent; the endpoint refuses some default client strings.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Text → encoded audio.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// MP3 bytes for `text`.  `text` is non-empty.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, TtsError>;
}

pub struct GoogleTts {
    client: reqwest::Client,
    endpoint: String,
    language: String,
    max_chunk_chars: usize,
}

impl GoogleTts {
    pub fn from_config(config: &TtsConfig) -> Result<Self, TtsError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TtsError::Request(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            language: config.language.clone(),
            max_chunk_chars: config.max_chunk_chars,
        })
    }

    async fn fetch_chunk(&self, chunk: &str, idx: usize, total: usize) -> Result<Vec<u8>, TtsError> {
        let idx = idx.to_string();
        let total = total.to_string();
        let textlen = chunk.chars().count().to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("ie", "UTF-8"),
                ("q", chunk),
                ("tl", self.language.as_str()),
                ("total", total.as_str()),
                ("idx", idx.as_str()),
                ("textlen", textlen.as_str()),
                ("client", "tw-ob"),
            ])
            .send()
            .await
            .map_err(|e| TtsError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TtsError::Status(status.as_u16()));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| TtsError::Request(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTts {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, TtsError> {
        let chunks = split_for_tts(text, self.max_chunk_chars);
        log::debug!("tts: {} chars in {} chunk(s)", text.len(), chunks.len());

        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            audio.extend(self.fetch_chunk(chunk, idx, chunks.len()).await?);
        }
        if audio.is_empty() {
            return Err(TtsError::EmptyAudio);
        }
        Ok(audio)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
