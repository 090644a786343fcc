//! Command-line surface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "mock-interview",
    version,
    about = "Voice mock interviews with an LLM interviewer and post-session grading"
)]
pub struct Cli {
    /// Path to settings.toml (defaults to the platform config directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run an interview session
    Start {
        /// Interview type, e.g. "Engineering" or "system-design"; prompted when omitted
        #[arg(short = 't', long)]
        interview_type: Option<String>,
        /// Session length in minutes; prompted when omitted
        #[arg(short, long)]
        duration: Option<u32>,
        /// Type answers instead of speaking them; replies are printed only
        #[arg(long)]
        text_only: bool,
    },
    /// Grade a saved transcript file
    Grade {
        /// Transcript JSON written by a previous session
        path: PathBuf,
    },
}
