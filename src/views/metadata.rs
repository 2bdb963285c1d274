//! Dataset metadata view: dtypes key/value table plus sample rows.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::types::Metadata;
use crate::render::cell_text;

/// View-model for the metadata section. Holds the last metadata worth
/// showing; the rendered fragment is a pure function of that state.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct MetadataView {
    metadata: Option<Metadata>,
}

impl MetadataView {
    /// Take updated metadata. An update without sample rows is a no-op: the
    /// previously displayed metadata stays visible. Returns whether the
    /// update applied.
    pub fn update(&mut self, metadata: &Metadata) -> bool {
        if metadata.sample_rows.is_empty() {
            return false;
        }
        self.metadata = Some(metadata.clone());
        true
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    /// HTML fragment for the section; empty until something was rendered.
    pub fn fragment(&self) -> String {
        let Some(meta) = &self.metadata else {
            return String::new();
        };

        let mut out = String::from(r#"<table class="table"><thead><tr>"#);
        for key in meta.dtypes.keys() {
            out.push_str(&format!("<th>{}</th>", key));
        }
        out.push_str("</tr></thead><tbody><tr>");
        for value in meta.dtypes.values() {
            out.push_str(&format!("<td>{}</td>", cell_text(value)));
        }
        out.push_str("</tr></tbody></table>");

        // Sample rows, built the same way table results are. Column order
        // comes from the first row; every row shares that key set.
        let rows = &meta.sample_rows;
        let columns: Vec<&String> = rows[0].keys().collect();
        out.push_str(r#"<table class="table table-striped"><thead><tr>"#);
        for col in &columns {
            out.push_str(&format!("<th>{}</th>", col));
        }
        out.push_str("</tr></thead><tbody>");
        for row in rows {
            out.push_str("<tr>");
            for col in &columns {
                let cell = row.get(*col).unwrap_or(&Value::Null);
                out.push_str(&format!("<td>{}</td>", cell_text(cell)));
            }
            out.push_str("</tr>");
        }
        out.push_str("</tbody></table>");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(json: &str) -> Metadata {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn renders_dtypes_and_sample_rows_in_order() {
        let mut view = MetadataView::default();
        view.update(&metadata(
            r#"{"dtypes":{"name":"object","age":"int64"},
                "sample_rows":[{"name":"ada","age":36},{"name":"kay","age":52}]}"#,
        ));
        let html = view.fragment();
        let name_pos = html.find("<th>name</th>").unwrap();
        let age_pos = html.find("<th>age</th>").unwrap();
        assert!(name_pos < age_pos);
        assert!(html.contains("<td>object</td><td>int64</td>"));
        assert!(html.contains("<td>ada</td><td>36</td>"));
        assert!(html.contains("<td>kay</td><td>52</td>"));
    }

    #[test]
    fn empty_sample_rows_leaves_previous_view() {
        let mut view = MetadataView::default();
        assert!(view.update(&metadata(
            r#"{"dtypes":{"a":"int64"},"sample_rows":[{"a":1}]}"#,
        )));
        let before = view.fragment();
        // the no-op is reported, so callers don't announce a stale view
        assert!(!view.update(&metadata(r#"{"dtypes":{"b":"object"},"sample_rows":[]}"#)));
        assert_eq!(view.fragment(), before);
    }

    #[test]
    fn empty_view_renders_nothing() {
        assert_eq!(MetadataView::default().fragment(), "");
    }
}
