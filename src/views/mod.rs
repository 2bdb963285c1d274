//! Session report: the write-only render target of the client.
//!
//! Every section is a pure function of the view-model state; the HTML on
//! disk is never read back. State persists across invocations next to the
//! report so a later `describe` or `history show` keeps its context.

use std::{
    fs,
    io::Write as _,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::types::ExecutionResult;
use crate::config::Config;
use crate::render;

pub mod history;
pub mod metadata;

use history::HistoryView;
use metadata::MetadataView;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct SessionState {
    metadata: MetadataView,
    command: Option<String>,
    code: Option<String>,
    result: Option<ExecutionResult>,
    history: HistoryView,
}

#[derive(Debug)]
pub struct SessionView {
    state: SessionState,
    state_path: PathBuf,
    report_path: PathBuf,
}

impl SessionView {
    pub fn load(cfg: &Config) -> Result<Self> {
        Self::at(cfg.report_path())
    }

    pub fn at(report_path: PathBuf) -> Result<Self> {
        let state_path = report_path.with_extension("session.json");
        let state = if state_path.exists() {
            let text = fs::read_to_string(&state_path)
                .with_context(|| format!("could not read {}", state_path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("corrupt session state in {}", state_path.display()))?
        } else {
            SessionState::default()
        };
        Ok(Self { state, state_path, report_path })
    }

    pub fn metadata(&self) -> &MetadataView {
        &self.state.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut MetadataView {
        &mut self.state.metadata
    }

    pub fn history(&self) -> &HistoryView {
        &self.state.history
    }

    pub fn history_mut(&mut self) -> &mut HistoryView {
        &mut self.state.history
    }

    pub fn command(&self) -> Option<&str> {
        self.state.command.as_deref()
    }

    pub fn set_command(&mut self, command: &str) {
        self.state.command = Some(command.to_string());
    }

    pub fn set_code(&mut self, code: &str) {
        self.state.code = Some(code.to_string());
    }

    pub fn set_result(&mut self, result: ExecutionResult) {
        self.state.result = Some(result);
    }

    /// Compose the full report document. Sections without content are
    /// omitted rather than rendered empty.
    pub fn to_html(&self) -> String {
        let mut sections = String::new();
        sections.push_str(&section("Dataset", &self.state.metadata.fragment()));

        let mut command_body = String::new();
        if let Some(command) = &self.state.command {
            command_body.push_str(&format!("<p class=\"command\">{}</p>", command));
        }
        if let Some(code) = &self.state.code {
            command_body.push_str(&format!("<pre><code>{}</code></pre>", code));
        }
        sections.push_str(&section("Command", &command_body));

        let result_body = self
            .state
            .result
            .as_ref()
            .map(render::render)
            .unwrap_or_default();
        sections.push_str(&section("Result", &result_body));

        sections.push_str(&section("History", &self.state.history.fragment()));

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>voxdata session</title>
<style>
body {{ font-family: sans-serif; max-width: 960px; margin: 2rem auto; color: #1d1d1f; }}
section {{ margin-bottom: 2rem; }}
table {{ border-collapse: collapse; }}
th, td {{ border: 1px solid #d2d2d7; padding: 0.3rem 0.6rem; text-align: left; }}
pre {{ background: #f5f5f7; padding: 0.75rem; overflow-x: auto; }}
.text-danger {{ color: #ff3b30; }}
.history-item {{ border-top: 1px solid #d2d2d7; padding-top: 0.5rem; }}
</style>
</head>
<body>
<h1>voxdata session</h1>
{sections}</body>
</html>
"#,
            sections = sections
        )
    }

    /// Persist the view-model state and rewrite the report atomically.
    pub fn save(&self) -> Result<()> {
        let state = serde_json::to_string(&self.state)?;
        write_atomic(&self.state_path, &state)?;
        write_atomic(&self.report_path, &self.to_html())
    }
}

fn section(title: &str, body: &str) -> String {
    if body.is_empty() {
        return String::new();
    }
    format!("<section><h2>{}</h2>\n{}</section>\n", title, body)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("could not create temp file in {}", dir.display()))?;
    tmp.write_all(contents.as_bytes())?;
    tmp.persist(path)
        .map_err(|e| anyhow!("could not write {}: {}", path.display(), e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{Metadata, ResultItem};

    fn view_in(dir: &Path) -> SessionView {
        SessionView::at(dir.join("report.html")).unwrap()
    }

    #[test]
    fn empty_sections_are_omitted() {
        let dir = tempfile::tempdir().unwrap();
        let view = view_in(dir.path());
        let html = view.to_html();
        assert!(!html.contains("<h2>Dataset</h2>"));
        assert!(!html.contains("<h2>Result</h2>"));
        assert!(!html.contains("<h2>History</h2>"));
    }

    #[test]
    fn populated_sections_appear() {
        let dir = tempfile::tempdir().unwrap();
        let mut view = view_in(dir.path());
        view.set_command("show totals");
        view.set_code("df.sum()");
        view.set_result(ExecutionResult::Single(ResultItem::new("text", "42")));
        let html = view.to_html();
        assert!(html.contains("<h2>Command</h2>"));
        assert!(html.contains("show totals"));
        assert!(html.contains("<code>df.sum()</code>"));
        assert!(html.contains("<p>42</p>"));
    }

    #[test]
    fn state_round_trips_through_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut view = view_in(dir.path());
        let meta: Metadata = serde_json::from_str(
            r#"{"dtypes":{"a":"int64"},"sample_rows":[{"a":1}]}"#,
        )
        .unwrap();
        view.metadata_mut().update(&meta);
        view.set_command("sum a");
        view.save().unwrap();

        let reloaded = view_in(dir.path());
        assert_eq!(reloaded.command(), Some("sum a"));
        assert!(reloaded.metadata().fragment().contains("<th>a</th>"));
        assert!(dir.path().join("report.html").exists());
    }

    #[test]
    fn failed_action_leaves_report_untouched() {
        // Nothing writes the report besides save(); mutating state without
        // saving must leave the file byte-identical.
        let dir = tempfile::tempdir().unwrap();
        let mut view = view_in(dir.path());
        view.set_command("first");
        view.save().unwrap();
        let before = fs::read_to_string(dir.path().join("report.html")).unwrap();

        view.set_command("second");
        let after = fs::read_to_string(dir.path().join("report.html")).unwrap();
        assert_eq!(before, after);
    }
}
