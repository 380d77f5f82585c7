use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use super::extract::extract_blocks;
use super::types::{CellValue, ResultRow, Segment, SplitMessage};

/// Label that separates the SQL preamble from the query output.
pub const RESULT_MARKER: &str = "Result:";

#[derive(Debug, Error)]
pub enum ResultParseError {
    #[error("result payload is empty")]
    Empty,
    #[error("result payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("result payload is not an array")]
    NotAnArray,
    #[error("result row {index} is not an object")]
    RowNotObject { index: usize },
    #[error("result row {index} has a nested value in column `{column}`")]
    NestedValue { index: usize, column: String },
}

/// Separates a trailing `Result:` payload from the rest of the message.
///
/// The preamble always goes through the block extractor. The payload becomes
/// a `ResultTable` when it is a JSON array of flat objects and a `ResultText`
/// otherwise; a parse failure never leaves this function.
pub fn split_result(content: &str) -> SplitMessage {
    let Some(marker) = content.find(RESULT_MARKER) else {
        return SplitMessage {
            preamble: extract_blocks(content),
            result: None,
        };
    };

    let preamble = content[..marker].trim();
    let payload = content[marker + RESULT_MARKER.len()..].trim();

    SplitMessage {
        preamble: extract_blocks(preamble),
        result: Some(result_segment(payload)),
    }
}

fn result_segment(payload: &str) -> Segment {
    match parse_result_payload(payload) {
        Ok((columns, rows)) => Segment::ResultTable { columns, rows },
        Err(err) => {
            debug!(%err, "result payload is not tabular, keeping it as text");
            Segment::ResultText {
                text: payload.to_string(),
            }
        }
    }
}

/// Parses an array of flat JSON objects into a header and rows.
///
/// The header is the key set of the first row in document order. Later rows
/// may omit or add keys.
pub fn parse_result_payload(
    payload: &str,
) -> Result<(Vec<String>, Vec<ResultRow>), ResultParseError> {
    if payload.is_empty() {
        return Err(ResultParseError::Empty);
    }

    let Value::Array(items) = serde_json::from_str::<Value>(payload)? else {
        return Err(ResultParseError::NotAnArray);
    };

    let rows = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| parse_row(index, item))
        .collect::<Result<Vec<_>, _>>()?;

    let columns = rows
        .first()
        .map(|row| row.keys().map(str::to_string).collect())
        .unwrap_or_default();

    Ok((columns, rows))
}

fn parse_row(index: usize, item: Value) -> Result<ResultRow, ResultParseError> {
    let Value::Object(map) = item else {
        return Err(ResultParseError::RowNotObject { index });
    };

    let cells = map
        .into_iter()
        .map(|(column, value)| {
            let cell = match value {
                Value::Null => CellValue::Null,
                Value::Bool(flag) => CellValue::Bool(flag),
                Value::Number(number) => CellValue::Number(number),
                Value::String(text) => CellValue::Text(text),
                Value::Array(_) | Value::Object(_) => {
                    return Err(ResultParseError::NestedValue { index, column });
                }
            };
            Ok((column, cell))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ResultRow::new(cells))
}
