//! Spoken command flow: record, transcribe, then the shared chain.

use anyhow::{Context, Result};

use crate::api::ApiClient;
use crate::audio::Recorder;
use crate::bus::{self, SessionEvent};
use crate::config::Config;
use crate::handlers::drive;
use crate::printer;
use crate::views::SessionView;

pub async fn run(cfg: &Config, assume_yes: bool) -> Result<()> {
    let api = ApiClient::from_config(cfg)?;
    let mut view = SessionView::load(cfg)?;

    let mut recorder = Recorder::from_config(cfg);
    printer::info("Recording... press Enter to stop.");
    recorder.start()?;
    wait_for_enter().await?;
    let audio = recorder.stop().await?;

    printer::info("Transcribing...");
    let text = api.transcribe(audio).await?;
    printer::success(&format!("You said: {}", text));

    // The transcription enters the pipeline exactly as typed input would.
    let (tx, rx) = bus::channel();
    let _ = tx.send(SessionEvent::Transcribed(text));
    let outcome = drive(&api, cfg, &mut view, rx, Some(tx), assume_yes).await;

    view.save()?;
    outcome
}

async fn wait_for_enter() -> Result<()> {
    tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        std::io::stdin().read_line(&mut line).map(|_| ())
    })
    .await
    .context("stdin task failed")??;
    Ok(())
}
