//! Command history view: newest first, hidden entirely when empty.

use serde::{Deserialize, Serialize};

use crate::api::types::HistoryEntry;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct HistoryView {
    entries: Vec<HistoryEntry>,
}

impl HistoryView {
    /// Replace the entries with a fresh fetch (oldest first, as served).
    pub fn set(&mut self, entries: Vec<HistoryEntry>) {
        self.entries = entries;
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// HTML fragment, most recent entry first, labeled with its server-side
    /// position. Empty history renders nothing, hiding the section.
    pub fn fragment(&self) -> String {
        let mut out = String::new();
        for (i, entry) in self.entries.iter().enumerate().rev() {
            out.push_str(&format!(
                "<div class=\"history-item\"><h4>Command {}:</h4><p>{}</p><pre>{}</pre></div>",
                i + 1,
                entry.command,
                entry.code
            ));
        }
        out
    }
}
