//! Action handlers and the generate → execute → log chain.

use std::io::{self, Write};

use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use is_terminal::IsTerminal;

use crate::api::ApiClient;
use crate::bus::{EventReceiver, EventSender, SessionEvent};
use crate::config::Config;
use crate::printer::{self, MarkdownPrinter};
use crate::views::SessionView;

pub mod ask;
pub mod describe;
pub mod exec;
pub mod history;
pub mod upload;
pub mod voice;

/// Consume session events until the channel closes. A `Transcribed` command
/// runs the full chain and, on success, emits `Executed` through `tx`;
/// `Executed` is logged to the server-side history. Each step starts only
/// after the prior step's success response.
pub(crate) async fn drive(
    api: &ApiClient,
    cfg: &Config,
    view: &mut SessionView,
    mut rx: EventReceiver,
    mut tx: Option<EventSender>,
    assume_yes: bool,
) -> Result<()> {
    while let Some(event) = rx.recv().await {
        match event {
            SessionEvent::Transcribed(command) => {
                let outcome = run_chain(api, cfg, view, &command, assume_yes).await?;
                // Dropping the sender closes the channel once drained.
                let sender = tx.take();
                if let (Some(sender), Some((command, code))) = (sender, outcome) {
                    let _ = sender.send(SessionEvent::Executed { command, code });
                }
            }
            SessionEvent::Executed { command, code } => {
                tx.take();
                api.add_history(&command, &code).await?;
                let entries = api.get_history().await?;
                view.history_mut().set(entries);
                printer::success("Added to history.");
            }
        }
    }
    Ok(())
}

/// Generate code for a command, confirm, execute, and render the result.
/// Returns the command/code pair on a completed execution, `None` when the
/// user aborted before executing.
async fn run_chain(
    api: &ApiClient,
    cfg: &Config,
    view: &mut SessionView,
    command: &str,
    assume_yes: bool,
) -> Result<Option<(String, String)>> {
    let command = command.trim();
    if command.is_empty() {
        bail!("Please enter a command.");
    }
    view.set_command(command);

    let generated = api.generate_code(command).await?;
    if let Some(msg) = &generated.message {
        printer::info(msg);
    }
    MarkdownPrinter::default().print(&format!("```python\n{}\n```", generated.code));
    if let Some(audio) = &generated.audio {
        if let Err(e) = play_reply(cfg, audio) {
            printer::error(&format!("Could not play reply audio: {:#}", e));
        }
    }
    view.set_code(&generated.code);

    if !confirm_execution(cfg, assume_yes)? {
        return Ok(None);
    }

    let execution = api.execute_code(&generated.code).await?;
    view.set_result(execution.result.clone());
    if let Some(metadata) = &execution.metadata {
        view.metadata_mut().update(metadata);
    }
    MarkdownPrinter::default().print(&printer::result_preview(&execution.result));

    Ok(Some((command.to_string(), generated.code)))
}

/// Interactive gate before running generated code. Auto-executes with --yes
/// or AUTO_EXECUTE; without a TTY the code is only shown.
fn confirm_execution(cfg: &Config, assume_yes: bool) -> Result<bool> {
    if assume_yes || cfg.get_bool("AUTO_EXECUTE") {
        return Ok(true);
    }
    if !io::stdin().is_terminal() {
        printer::info("No terminal; code not executed (pass --yes to execute).");
        return Ok(false);
    }
    print!("[E]xecute, [A]bort: ");
    io::stdout().flush().ok();
    let mut choice = String::new();
    io::stdin().read_line(&mut choice)?;
    Ok(matches!(choice.trim().to_lowercase().as_str(), "e" | "y"))
}

/// y/N confirmation for irreversible operations.
pub(crate) fn confirm_destructive(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    if !io::stdin().is_terminal() {
        bail!("refusing without confirmation; pass --yes");
    }
    print!("{} [y/N] ", prompt);
    io::stdout().flush().ok();
    let mut choice = String::new();
    io::stdin().read_line(&mut choice)?;
    Ok(choice.trim().eq_ignore_ascii_case("y"))
}

/// Decode and play the backend's spoken reply through PLAY_COMMAND, if set.
fn play_reply(cfg: &Config, b64: &str) -> Result<()> {
    let Some(player) = cfg.get("PLAY_COMMAND") else {
        return Ok(());
    };
    let bytes = STANDARD
        .decode(b64.trim())
        .context("invalid reply audio payload")?;
    let mut file = tempfile::Builder::new().suffix(".mp3").tempfile()?;
    file.write_all(&bytes)?;
    let path = file.into_temp_path();

    let status = if cfg!(windows) {
        std::process::Command::new("cmd.exe")
            .args(["/c", &format!("{} {}", player, path.display())])
            .status()
    } else {
        let shell = std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".into());
        std::process::Command::new(shell)
            .arg("-c")
            .arg(format!("{} {}", player, path.display()))
            .status()
    }
    .context("could not start audio player")?;
    if !status.success() {
        bail!("audio player exited with {}", status);
    }
    Ok(())
}
