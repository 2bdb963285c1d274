//! Wire types shared with the analysis backend.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered JSON object; insertion order is the backend's display order.
pub type JsonMap = serde_json::Map<String, Value>;

/// One displayable record of an execution result.
///
/// `data` is interpreted per `kind`: a split-orient table document for
/// `table`, a base64 PNG for `plot`, a trusted HTML fragment for `plotly`,
/// plain display text for `text` and `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultItem {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: String,
}

impl ResultItem {
    pub fn new(kind: impl Into<String>, data: impl Into<String>) -> Self {
        Self { kind: kind.into(), data: data.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiResult {
    #[serde(rename = "type")]
    pub kind: String, // always "multi" on the wire
    pub data: Vec<ResultItem>,
}

/// Either one result record or an ordered aggregation of several.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExecutionResult {
    Multi(MultiResult),
    Single(ResultItem),
}

impl ExecutionResult {
    pub fn multi(items: Vec<ResultItem>) -> Self {
        Self::Multi(MultiResult { kind: "multi".into(), data: items })
    }
}

/// Dataset metadata returned by upload and (optionally) execute.
///
/// Only `dtypes` and `sample_rows` are rendered; the remaining fields feed
/// the `describe` display when the backend provides them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub dtypes: JsonMap,
    #[serde(default)]
    pub sample_rows: Vec<JsonMap>,
    #[serde(default)]
    pub numerical_ranges: JsonMap,
    #[serde(default)]
    pub categorical_values: JsonMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub command: String,
    pub code: String,
}

/// Success payload of generate_code.
#[derive(Debug, Clone)]
pub struct GeneratedCode {
    pub code: String,
    pub message: Option<String>,
    /// Optional spoken reply, base64 mp3.
    pub audio: Option<String>,
}

/// Success payload of execute_code.
#[derive(Debug, Clone)]
pub struct Execution {
    pub result: ExecutionResult,
    pub metadata: Option<Metadata>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_and_multi_results_deserialize() {
        let single: ExecutionResult =
            serde_json::from_str(r#"{"type":"text","data":"hello"}"#).unwrap();
        assert_eq!(single, ExecutionResult::Single(ResultItem::new("text", "hello")));

        let multi: ExecutionResult = serde_json::from_str(
            r#"{"type":"multi","data":[{"type":"text","data":"a"},{"type":"plot","data":"Zm9v"}]}"#,
        )
        .unwrap();
        match multi {
            ExecutionResult::Multi(m) => {
                assert_eq!(m.data.len(), 2);
                assert_eq!(m.data[0].kind, "text");
                assert_eq!(m.data[1].kind, "plot");
            }
            other => panic!("expected multi, got {:?}", other),
        }
    }

    #[test]
    fn metadata_preserves_column_order() {
        let meta: Metadata = serde_json::from_str(
            r#"{"dtypes":{"z":"int64","a":"object","m":"float64"},"sample_rows":[]}"#,
        )
        .unwrap();
        let keys: Vec<&String> = meta.dtypes.keys().collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }
}
