//! Describe the dataset uploaded in this session: dtypes, ranges, categories.

use anyhow::{bail, Result};
use serde_json::Value;

use crate::config::Config;
use crate::printer::MarkdownPrinter;
use crate::render::cell_text;
use crate::views::SessionView;

pub async fn run(cfg: &Config) -> Result<()> {
    let view = SessionView::load(cfg)?;
    let Some(meta) = view.metadata().metadata() else {
        bail!("No dataset uploaded yet in this session.");
    };

    let mut md = String::from("### Columns\n\n|column|dtype|\n|-|-|\n");
    for (col, dtype) in &meta.dtypes {
        md.push_str(&format!("|{}|{}|\n", col, cell_text(dtype)));
    }

    if !meta.numerical_ranges.is_empty() {
        md.push_str("\n### Numerical ranges\n\n|column|min|max|\n|-|-|-|\n");
        for (col, range) in &meta.numerical_ranges {
            let min = range.get("min").unwrap_or(&Value::Null);
            let max = range.get("max").unwrap_or(&Value::Null);
            md.push_str(&format!("|{}|{}|{}|\n", col, cell_text(min), cell_text(max)));
        }
    }

    if !meta.categorical_values.is_empty() {
        md.push_str("\n### Categorical values\n\n");
        for (col, values) in &meta.categorical_values {
            let shown = match values {
                Value::Array(vals) => vals
                    .iter()
                    .map(cell_text)
                    .collect::<Vec<_>>()
                    .join(", "),
                other => cell_text(other),
            };
            md.push_str(&format!("- **{}**: {}\n", col, shown));
        }
    }

    MarkdownPrinter::default().print(&md);
    Ok(())
}
