//! Result rendering: one `{type, data}` record in, one HTML fragment out.
//!
//! Payloads come from the trusted backend and are embedded verbatim; the
//! renderer never escapes, sorts, or coerces what it was given.

use serde::Deserialize;
use serde_json::Value;

use crate::api::types::{ExecutionResult, ResultItem};

/// Render an execution result to an HTML fragment. A multi result is the
/// ordered concatenation of its items; anything else renders as one item.
pub fn render(result: &ExecutionResult) -> String {
    match result {
        ExecutionResult::Multi(multi) => multi.data.iter().map(render_item).collect(),
        ExecutionResult::Single(item) => render_item(item),
    }
}

/// Render one result record. Unknown types degrade to an inline warning and
/// never fail, so siblings in a multi result keep rendering.
pub fn render_item(item: &ResultItem) -> String {
    match item.kind.as_str() {
        "table" => match parse_split_frame(&item.data) {
            Ok(frame) => render_table(&frame),
            Err(msg) => render_error(&msg),
        },
        "plot" => format!(
            r#"<img src="data:image/png;base64,{}" class="img-fluid" alt="Plot">"#,
            item.data
        ),
        "plotly" => format!("<div>{}</div>", item.data),
        "text" => format!("<p>{}</p>", item.data),
        "error" => render_error(&item.data),
        other => format!(r#"<p class="text-danger">Unknown result type: {}</p>"#, other),
    }
}

/// Tabular payload in pandas `orient="split"` form.
#[derive(Debug, Deserialize)]
pub struct SplitFrame {
    pub columns: Vec<String>,
    pub data: Vec<Vec<Value>>,
}

/// Parse a serialized table payload, rejecting ragged rows. The error string
/// names what was malformed and is rendered as an error item.
pub fn parse_split_frame(payload: &str) -> Result<SplitFrame, String> {
    let frame: SplitFrame = serde_json::from_str(payload)
        .map_err(|e| format!("malformed table payload: {}", e))?;
    for (i, row) in frame.data.iter().enumerate() {
        if row.len() != frame.columns.len() {
            return Err(format!(
                "malformed table payload: row {} has {} cells, expected {}",
                i + 1,
                row.len(),
                frame.columns.len()
            ));
        }
    }
    Ok(frame)
}

/// Display text of one cell, as-is: strings unquoted, everything else in its
/// JSON form.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn render_table(frame: &SplitFrame) -> String {
    let mut out = String::from(r#"<table class="table table-bordered table-hover"><thead><tr>"#);
    for col in &frame.columns {
        out.push_str(&format!("<th>{}</th>", col));
    }
    out.push_str("</tr></thead><tbody>");
    for row in &frame.data {
        out.push_str("<tr>");
        for cell in row {
            out.push_str(&format!("<td>{}</td>", cell_text(cell)));
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table>");
    out
}

fn render_error(message: &str) -> String {
    format!(r#"<p class="text-danger">{}</p>"#, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::ExecutionResult;

    #[test]
    fn single_result_equals_render_item() {
        let item = ResultItem::new("text", "hello");
        let result = ExecutionResult::Single(item.clone());
        assert_eq!(render(&result), render_item(&item));
    }

    #[test]
    fn text_is_verbatim() {
        assert_eq!(render_item(&ResultItem::new("text", "hello")), "<p>hello</p>");
    }

    #[test]
    fn multi_concatenates_in_order() {
        let a = ResultItem::new("text", "a");
        let b = ResultItem::new("text", "b");
        let forward = ExecutionResult::multi(vec![a.clone(), b.clone()]);
        let reversed = ExecutionResult::multi(vec![b.clone(), a.clone()]);
        assert_eq!(render(&forward), "<p>a</p><p>b</p>");
        assert_eq!(render(&reversed), "<p>b</p><p>a</p>");
    }

    #[test]
    fn empty_multi_renders_nothing() {
        assert_eq!(render(&ExecutionResult::multi(vec![])), "");
    }

    #[test]
    fn table_preserves_column_and_row_order() {
        let item = ResultItem::new("table", r#"{"columns":["a","b"],"data":[[1,2],[3,4]]}"#);
        assert_eq!(
            render_item(&item),
            "<table class=\"table table-bordered table-hover\"><thead><tr>\
             <th>a</th><th>b</th></tr></thead><tbody>\
             <tr><td>1</td><td>2</td></tr><tr><td>3</td><td>4</td></tr>\
             </tbody></table>"
        );
    }

    #[test]
    fn table_cells_render_as_given() {
        let item = ResultItem::new(
            "table",
            r#"{"columns":["x"],"data":[["txt"],[null],[true],[1.5]]}"#,
        );
        let html = render_item(&item);
        assert!(html.contains("<td>txt</td>"));
        assert!(html.contains("<td>null</td>"));
        assert!(html.contains("<td>true</td>"));
        assert!(html.contains("<td>1.5</td>"));
    }

    #[test]
    fn plot_embeds_payload_verbatim() {
        let html = render_item(&ResultItem::new("plot", "QUJD"));
        assert_eq!(html, r#"<img src="data:image/png;base64,QUJD" class="img-fluid" alt="Plot">"#);
    }

    #[test]
    fn plotly_fragment_is_unescaped() {
        let html = render_item(&ResultItem::new("plotly", "<script>Plotly.react()</script>"));
        assert_eq!(html, "<div><script>Plotly.react()</script></div>");
    }

    #[test]
    fn unknown_type_is_marked_and_does_not_raise() {
        let html = render_item(&ResultItem::new("bogus", "x"));
        assert_eq!(html, r#"<p class="text-danger">Unknown result type: bogus</p>"#);
    }

    #[test]
    fn unknown_type_does_not_block_siblings() {
        let result = ExecutionResult::multi(vec![
            ResultItem::new("bogus", "x"),
            ResultItem::new("text", "still here"),
        ]);
        assert!(render(&result).contains("<p>still here</p>"));
    }

    #[test]
    fn unparseable_table_renders_as_error() {
        let html = render_item(&ResultItem::new("table", "not json"));
        assert!(html.starts_with(r#"<p class="text-danger">malformed table payload"#));
    }

    #[test]
    fn ragged_table_row_names_the_row() {
        let html = render_item(&ResultItem::new(
            "table",
            r#"{"columns":["a","b"],"data":[[1,2],[3]]}"#,
        ));
        assert!(html.contains("row 2 has 1 cells, expected 2"));
    }

    #[test]
    fn error_item_renders_its_text() {
        let html = render_item(&ResultItem::new("error", "boom"));
        assert_eq!(html, r#"<p class="text-danger">boom</p>"#);
    }
}
