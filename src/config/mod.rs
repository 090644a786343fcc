//! Configuration module.
//!
//! Provides [`AppConfig`] with one sub-config per subsystem, [`AppPaths`] for
//! platform directories, and TOML persistence via `AppConfig::load_from` /
//! `AppConfig::save_to`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{
    AppConfig, AudioConfig, GradingConfig, LlmConfig, SessionConfig, SttConfig, TtsConfig,
};
