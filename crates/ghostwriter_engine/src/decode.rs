use ghostwriter_core::{
    ContentRecord, CrawlerRecord, ListKind, ListQuery, ListResult, LogRecord, PipelineTask, Record,
};
use ghostwriter_logging::gw_warn;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::routes::{list_shape, ListShape};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid json: {0}")]
    Json(String),
    #[error("expected {expected}, got {found}")]
    Shape {
        expected: String,
        found: &'static str,
    },
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("invalid record at index {index}: {message}")]
    Record { index: usize, message: String },
}

/// Parse one JSON document into `T`.
pub fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeError> {
    serde_json::from_slice(bytes).map_err(|err| DecodeError::Json(err.to_string()))
}

/// Decode a list response into records for `kind`, paired with `query`.
///
/// Paginated lists must use their envelope; a bare array there is a shape
/// error. A page longer than the requested page size is truncated.
pub fn decode_list(
    kind: ListKind,
    query: &ListQuery,
    bytes: &[u8],
) -> Result<ListResult, DecodeError> {
    let body: Value = decode_json(bytes)?;
    let (raw_items, total) = match list_shape(kind) {
        ListShape::BareArray => match body {
            Value::Array(items) => {
                let total = items.len() as u64;
                (items, total)
            }
            other => {
                return Err(DecodeError::Shape {
                    expected: "array".into(),
                    found: json_type(&other),
                })
            }
        },
        ListShape::Envelope(field) => split_envelope(body, field)?,
    };

    let mut items = raw_items
        .into_iter()
        .enumerate()
        .map(|(index, raw)| decode_record(kind, index, raw))
        .collect::<Result<Vec<_>, _>>()?;

    let limit = query.page_size() as usize;
    if kind.is_paginated() && items.len() > limit {
        gw_warn!(
            "{} returned {} records for page size {}; truncating",
            kind,
            items.len(),
            limit
        );
        items.truncate(limit);
    }

    Ok(ListResult {
        items,
        total,
        query: query.clone(),
    })
}

fn split_envelope(body: Value, field: &'static str) -> Result<(Vec<Value>, u64), DecodeError> {
    let mut object = match body {
        Value::Object(object) => object,
        other => {
            return Err(DecodeError::Shape {
                expected: format!("object with `{field}` and `total`"),
                found: json_type(&other),
            })
        }
    };
    let items = match object.remove(field) {
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(DecodeError::Shape {
                expected: format!("array in `{field}`"),
                found: json_type(&other),
            })
        }
        None => return Err(DecodeError::MissingField(field)),
    };
    let total = object
        .get("total")
        .ok_or(DecodeError::MissingField("total"))?
        .as_u64()
        .ok_or_else(|| DecodeError::Shape {
            expected: "non-negative integer in `total`".into(),
            found: "other value",
        })?;
    Ok((items, total))
}

fn decode_record(kind: ListKind, index: usize, raw: Value) -> Result<Record, DecodeError> {
    fn parse<T: DeserializeOwned>(index: usize, raw: Value) -> Result<T, DecodeError> {
        serde_json::from_value(raw).map_err(|err| DecodeError::Record {
            index,
            message: err.to_string(),
        })
    }

    Ok(match kind {
        ListKind::Content => Record::Content(parse::<ContentRecord>(index, raw)?),
        ListKind::Logs => Record::Log(parse::<LogRecord>(index, raw)?),
        ListKind::Crawlers => Record::Crawler(parse::<CrawlerRecord>(index, raw)?),
        ListKind::Pipeline => Record::Task(parse::<PipelineTask>(index, raw)?),
    })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
