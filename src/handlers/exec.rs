//! Direct execution of user-supplied code, bypassing generation.

use anyhow::{bail, Result};

use crate::api::ApiClient;
use crate::bus::{self, SessionEvent};
use crate::config::Config;
use crate::handlers::drive;
use crate::printer::{self, MarkdownPrinter};
use crate::views::SessionView;

pub async fn run(
    cfg: &Config,
    code: Option<String>,
    file: Option<String>,
    assume_yes: bool,
) -> Result<()> {
    let code = match (code, file) {
        (Some(c), _) => c,
        (None, Some(path)) => tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| anyhow::anyhow!("could not read {}: {}", path, e))?,
        (None, None) => bail!("No code to execute. Pass code or --file."),
    };
    if code.trim().is_empty() {
        bail!("No code to execute.");
    }

    let api = ApiClient::from_config(cfg)?;
    let mut view = SessionView::load(cfg)?;

    let execution = api.execute_code(&code).await?;
    view.set_code(&code);
    view.set_result(execution.result.clone());
    if let Some(metadata) = &execution.metadata {
        view.metadata_mut().update(metadata);
    }
    MarkdownPrinter::default().print(&printer::result_preview(&execution.result));

    // Log under the last session command, or the code itself when there is
    // none, then let the history side of the bus record it.
    let command = view
        .command()
        .map(str::to_string)
        .unwrap_or_else(|| fallback_command(&code));
    let (tx, rx) = bus::channel();
    let _ = tx.send(SessionEvent::Executed { command, code });
    drop(tx);
    let outcome = drive(&api, cfg, &mut view, rx, None, assume_yes).await;

    view.save()?;
    outcome
}

/// History label for code that arrived without a generating command: the
/// first non-empty line of the code.
fn fallback_command(code: &str) -> String {
    code.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("manual execution")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_skips_leading_blank_lines() {
        assert_eq!(fallback_command("\n\n  df.sum()\nprint(x)"), "df.sum()");
    }

    #[test]
    fn fallback_uses_first_line_of_plain_code() {
        assert_eq!(fallback_command("df.head()"), "df.head()");
    }

    #[test]
    fn blank_code_falls_back_to_placeholder() {
        assert_eq!(fallback_command("\n   \n"), "manual execution");
    }
}
