//! Microphone capture via the configured recorder command.
//!
//! The recorder is an exclusive resource: one session at a time, released
//! deterministically on stop, including when stopping fails.

use anyhow::{anyhow, bail, Context, Result};
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Recording,
    /// Stopped with captured audio available.
    Stopped,
}

#[derive(Debug)]
pub struct Recorder {
    command: String,
    state: RecorderState,
    child: Option<Child>,
    reader: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
}

impl Recorder {
    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.record_command())
    }

    pub fn new(command: String) -> Self {
        Self { command, state: RecorderState::Idle, child: None, reader: None }
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    /// Spawn the capture command and start buffering its stdout in memory.
    /// On spawn failure the recorder stays Idle with no partial audio.
    pub fn start(&mut self) -> Result<()> {
        if self.state == RecorderState::Recording {
            bail!("a recording session is already open");
        }

        let mut cmd = if cfg!(windows) {
            let mut c = Command::new("cmd.exe");
            c.args(["/c", &self.command]);
            c
        } else {
            let shell = std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".into());
            let mut c = Command::new(shell);
            c.arg("-c").arg(&self.command);
            c
        };
        let mut child = cmd
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("could not start audio capture: {}", self.command))?;

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow!("audio capture process has no stdout"))?;
        let reader = tokio::spawn(async move {
            let mut buf = Vec::new();
            stdout.read_to_end(&mut buf).await.map(|_| buf)
        });

        self.child = Some(child);
        self.reader = Some(reader);
        self.state = RecorderState::Recording;
        Ok(())
    }

    /// Stop the capture, release the device, and yield the buffered audio.
    pub async fn stop(&mut self) -> Result<Vec<u8>> {
        let mut child = self
            .child
            .take()
            .ok_or_else(|| anyhow!("no recording in progress"))?;
        let reader = self
            .reader
            .take()
            .ok_or_else(|| anyhow!("no recording in progress"))?;
        // Device is released from here on, whatever happens below.
        self.state = RecorderState::Idle;

        let _ = child.start_kill();
        let _ = child.wait().await;

        let bytes = reader
            .await
            .context("audio capture task failed")?
            .context("could not read captured audio")?;
        if bytes.is_empty() {
            bail!("no audio captured; check RECORD_COMMAND and the microphone");
        }
        self.state = RecorderState::Stopped;
        Ok(bytes)
    }
}
