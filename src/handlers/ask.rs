//! Typed command flow: generate, confirm, execute, log.

use anyhow::{bail, Result};

use crate::api::ApiClient;
use crate::bus::{self, SessionEvent};
use crate::config::Config;
use crate::handlers::drive;
use crate::views::SessionView;

pub async fn run(cfg: &Config, command: &str, assume_yes: bool) -> Result<()> {
    if command.trim().is_empty() {
        bail!("Please enter a command.");
    }

    let api = ApiClient::from_config(cfg)?;
    let mut view = SessionView::load(cfg)?;

    let (tx, rx) = bus::channel();
    let _ = tx.send(SessionEvent::Transcribed(command.to_string()));
    let outcome = drive(&api, cfg, &mut view, rx, Some(tx), assume_yes).await;

    // Sections updated before a failure stay rendered, nothing else changes.
    view.save()?;
    outcome
}
