use anyhow::Result;
use voxdata::api::types::{ExecutionResult, HistoryEntry, Metadata, ResultItem};
use voxdata::views::SessionView;

#[test]
fn report_reflects_a_full_session() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let report = dir.path().join("report.html");

    let mut view = SessionView::at(report.clone())?;
    let meta: Metadata = serde_json::from_str(
        r#"{"dtypes":{"a":"int64"},"sample_rows":[{"a":7}]}"#,
    )?;
    view.metadata_mut().update(&meta);
    view.set_command("sum of a");
    view.set_code("df['a'].sum()");
    view.set_result(ExecutionResult::Single(ResultItem::new("text", "7")));
    view.history_mut().set(vec![HistoryEntry {
        command: "sum of a".into(),
        code: "df['a'].sum()".into(),
    }]);
    view.save()?;

    let html = std::fs::read_to_string(&report)?;
    assert!(html.contains("<h2>Dataset</h2>"));
    assert!(html.contains("<h2>Command</h2>"));
    assert!(html.contains("sum of a"));
    assert!(html.contains("<p>7</p>"));
    assert!(html.contains("<h2>History</h2>"));
    Ok(())
}

#[test]
fn state_survives_separate_invocations() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let report = dir.path().join("report.html");

    {
        let mut view = SessionView::at(report.clone())?;
        view.set_command("first run");
        view.save()?;
    }

    // A later invocation picks up where the previous one stopped.
    let view = SessionView::at(report)?;
    assert_eq!(view.command(), Some("first run"));
    Ok(())
}

#[test]
fn fresh_session_renders_no_empty_sections() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let view = SessionView::at(dir.path().join("report.html"))?;
    let html = view.to_html();
    assert!(!html.contains("<section>"));
    Ok(())
}
