//! Application entry point — AI mock interview.
//!
//! # Startup sequence
//!
//! 1. Initialise logging and load `.env`.
//! 2. Parse the command line and load [`AppConfig`].
//! 3. Check the API credential (exit 2 when missing).
//! 4. Ask for any missing interview options.
//! 5. Create a current-thread [`tokio`] runtime; blocking work (Whisper,
//!    microphone) goes to its blocking pool.
//! 6. Connect the interview (exit 1 on failure), run it, save and grade.

use std::process::ExitCode;

use clap::Parser;
use mock_interview::{
    app::{api_key, chat_clients, config_path, grade_saved, Interview, SessionPlan, StartupError},
    cli::{Cli, Command},
    config::{AppConfig, AppPaths},
    console::Console,
    session::Interrupt,
};

fn main() -> ExitCode {
    // 1. Logging; RUST_LOG overrides.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    if let Err(e) = dotenvy::dotenv() {
        log::debug!("main: no .env loaded ({e})");
    }

    let cli = Cli::parse();
    let console = Console::stdout();

    match run(cli, &console) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("main: {e}");
            console.error(&format!("Error: {e}"));
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn run(cli: Cli, console: &Console) -> Result<(), StartupError> {
    // 2. Configuration
    let paths = AppPaths::new();
    let config = AppConfig::load_from(&config_path(cli.config, &paths))
        .map_err(StartupError::Config)?;

    // 3. Credential, before any session state exists.
    let key = api_key(&config.llm)?;

    // 5. Runtime
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let result = match cli.command {
        Command::Grade { path } => {
            let (_, grading) = chat_clients(&config, &key)?;
            rt.block_on(grade_saved(&path, grading, console)).map(|_| ())
        }
        Command::Start {
            interview_type,
            duration,
            text_only,
        } => {
            // 4. Prompts
            let plan = SessionPlan::resolve(
                interview_type.as_deref(),
                duration,
                text_only,
                config.session.default_duration_mins,
                &mut std::io::stdin().lock(),
                console,
            )?;
            console.panel("AI Mock Interview", &plan.banner());

            // 6. Session
            rt.block_on(async {
                let interrupt = Interrupt::new();
                interrupt.watch_ctrl_c();
                let interview =
                    Interview::connect(&config, &paths, &key, plan, interrupt, console.clone())
                        .await?;
                let summary = interview.run().await;
                log::info!(
                    "main: session ended ({}), {} turns",
                    summary.state.label(),
                    summary.turns
                );
                Ok::<_, StartupError>(())
            })
        }
    };

    // A pending stdin read must not hold up exit.
    rt.shutdown_background();
    result
}
