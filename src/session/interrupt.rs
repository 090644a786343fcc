//! Interruption flag raised by Ctrl-C.  A second Ctrl-C ends the process.
//!
//! The session loop polls [`Interrupt::is_triggered`] between steps and
//! races [`Interrupt::triggered`] against input and playback.  LLM calls are
//! never raced: they finish before the flag is looked at.

use std::sync::Arc;

use tokio::sync::watch;

/// Cloneable handle; every clone observes the same flag.
#[derive(Debug, Clone)]
pub struct Interrupt {
    tx: Arc<watch::Sender<bool>>,
}

impl Interrupt {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Raise the flag.  Idempotent.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once the flag is raised (immediately if it already is).
    pub async fn triggered(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|raised| *raised).await;
    }

    /// Raise the flag, reporting whether it was already raised.
    pub fn press(&self) -> Press {
        if self.tx.send_replace(true) {
            Press::Repeated
        } else {
            Press::First
        }
    }

    /// Raise the flag on the first Ctrl-C; exit with status 130 on the
    /// second.
    pub fn watch_ctrl_c(&self) {
        let interrupt = self.clone();
        tokio::spawn(async move {
            loop {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    log::warn!("interrupt: cannot listen for Ctrl-C: {e}");
                    return;
                }
                match interrupt.press() {
                    Press::First => log::info!("interrupt: Ctrl-C received"),
                    Press::Repeated => {
                        log::warn!("interrupt: second Ctrl-C, exiting");
                        std::process::exit(130);
                    }
                }
            }
        });
    }
}

/// Whether a Ctrl-C was the first one seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Press {
    First,
    Repeated,
}

impl Default for Interrupt {
    fn default() -> Self {
        Self::new()
    }
}
