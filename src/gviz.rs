use serde::Deserialize;
use serde_json::Value;

use crate::error::SheetError;
use crate::table::{CellValue, Row};

const ENVELOPE_OPEN: &str = "google.visualization.Query.setResponse(";
const ENVELOPE_CLOSE: &str = ");";

#[derive(Debug, Deserialize)]
struct GvizResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    errors: Vec<GvizIssue>,
    #[serde(default)]
    table: Option<GvizTable>,
}

#[derive(Debug, Deserialize)]
struct GvizIssue {
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    detailed_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GvizTable {
    #[serde(default)]
    cols: Vec<GvizColumn>,
    #[serde(default)]
    rows: Vec<GvizRow>,
}

#[derive(Debug, Deserialize)]
struct GvizColumn {
    #[serde(default)]
    label: String,
}

#[derive(Debug, Deserialize)]
struct GvizRow {
    #[serde(default)]
    c: Vec<Option<GvizCell>>,
}

#[derive(Debug, Deserialize)]
struct GvizCell {
    #[serde(default)]
    v: Value,
}

/// Returns the JSON text inside `google.visualization.Query.setResponse(...);`.
///
/// Anything before the callback (the `/*O_o*/` guard) is ignored, and the
/// payload runs to the last `);` in the body.
pub fn strip_envelope(raw: &str) -> Option<&str> {
    let open = raw.find(ENVELOPE_OPEN)?;
    let body_start = open + ENVELOPE_OPEN.len();
    let close = raw.rfind(ENVELOPE_CLOSE)?;
    if close < body_start {
        return None;
    }
    Some(&raw[body_start..close])
}

/// Parses a full gviz response body for `table` into rows.
pub fn parse_response(table: &str, raw: &str) -> Result<Vec<Row>, SheetError> {
    let json = strip_envelope(raw).ok_or_else(|| SheetError::MalformedEnvelope {
        table: table.to_string(),
    })?;
    parse_payload(table, json)
}

/// Parses the inner payload. A missing table or zero rows is a valid empty result.
pub fn parse_payload(table: &str, json: &str) -> Result<Vec<Row>, SheetError> {
    let response: GvizResponse =
        serde_json::from_str(json).map_err(|err| SheetError::MalformedPayload {
            table: table.to_string(),
            message: err.to_string(),
        })?;

    if response.status.as_deref() == Some("error") {
        let message = response
            .errors
            .first()
            .and_then(|issue| {
                issue
                    .detailed_message
                    .clone()
                    .or_else(|| issue.message.clone())
                    .or_else(|| issue.reason.clone())
            })
            .unwrap_or_else(|| "source reported an error".to_string());
        return Err(SheetError::MalformedPayload {
            table: table.to_string(),
            message,
        });
    }

    let Some(data) = response.table else {
        return Ok(Vec::new());
    };
    Ok(build_rows(&data))
}

fn build_rows(data: &GvizTable) -> Vec<Row> {
    let labels: Vec<&str> = data.cols.iter().map(|col| col.label.as_str()).collect();
    data.rows
        .iter()
        .map(|row| {
            let mut out = Row::new();
            for (idx, cell) in row.c.iter().enumerate() {
                let Some(label) = labels.get(idx) else {
                    continue;
                };
                let value = cell
                    .as_ref()
                    .map(|cell| CellValue::from_json(&cell.v))
                    .unwrap_or_default();
                out.insert(*label, value);
            }
            out
        })
        .collect()
}
