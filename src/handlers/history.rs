//! History listing and the confirmed bulk delete.

use anyhow::Result;

use crate::api::ApiClient;
use crate::config::Config;
use crate::handlers::confirm_destructive;
use crate::printer::{self, MarkdownPrinter};
use crate::views::SessionView;

pub async fn show(cfg: &Config) -> Result<()> {
    let api = ApiClient::from_config(cfg)?;
    let mut view = SessionView::load(cfg)?;

    // Always a fresh fetch, never cached.
    let entries = api.get_history().await?;
    if entries.is_empty() {
        printer::info("History is empty.");
    } else {
        let mut md = String::new();
        for (i, entry) in entries.iter().enumerate().rev() {
            md.push_str(&format!(
                "### Command {}\n\n{}\n\n```python\n{}\n```\n\n",
                i + 1,
                entry.command,
                entry.code
            ));
        }
        MarkdownPrinter::default().print(&md);
    }

    view.history_mut().set(entries);
    view.save()?;
    Ok(())
}

pub async fn clear(cfg: &Config, assume_yes: bool) -> Result<()> {
    let confirmed = confirm_destructive(
        "Delete all history? This action cannot be undone.",
        assume_yes,
    )?;
    if !confirmed {
        printer::info("Aborted.");
        return Ok(());
    }

    let api = ApiClient::from_config(cfg)?;
    let mut view = SessionView::load(cfg)?;
    api.delete_history().await?;
    view.history_mut().set(Vec::new());
    view.save()?;
    printer::success("History deleted successfully.");
    Ok(())
}
