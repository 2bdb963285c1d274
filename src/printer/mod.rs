//! Colored status lines (the toast role) and terminal result previews.

use owo_colors::OwoColorize;
use termimad::MadSkin;

use crate::api::types::ExecutionResult;
use crate::render::{cell_text, parse_split_frame};

pub fn success(msg: &str) {
    println!("{}", msg.green());
}

pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

pub struct MarkdownPrinter {
    pub skin: MadSkin,
}

impl Default for MarkdownPrinter {
    fn default() -> Self {
        Self { skin: MadSkin::default() }
    }
}

impl MarkdownPrinter {
    pub fn print(&self, text: &str) {
        self.skin.print_text(text);
        println!();
    }
}

/// Markdown preview of an execution result for the terminal. Image payloads
/// only live in the HTML report, so they preview as placeholders here.
pub fn result_preview(result: &ExecutionResult) -> String {
    let items: Vec<_> = match result {
        ExecutionResult::Multi(multi) => multi.data.iter().collect(),
        ExecutionResult::Single(item) => vec![item],
    };

    let mut out = String::new();
    for item in items {
        if !out.is_empty() {
            out.push('\n');
        }
        match item.kind.as_str() {
            "table" => match parse_split_frame(&item.data) {
                Ok(frame) => {
                    out.push_str(&format!("|{}|\n", frame.columns.join("|")));
                    out.push_str(&format!("|{}|\n", vec!["-"; frame.columns.len()].join("|")));
                    for row in &frame.data {
                        let cells: Vec<String> = row.iter().map(cell_text).collect();
                        out.push_str(&format!("|{}|\n", cells.join("|")));
                    }
                }
                Err(msg) => out.push_str(&format!("**error:** {}\n", msg)),
            },
            "plot" => out.push_str("*[plot image, see the session report]*\n"),
            "plotly" => out.push_str("*[interactive figure, see the session report]*\n"),
            "text" => out.push_str(&format!("{}\n", item.data)),
            "error" => out.push_str(&format!("**error:** {}\n", item.data)),
            other => out.push_str(&format!("**unknown result type:** {}\n", other)),
        }
    }
    out
}
