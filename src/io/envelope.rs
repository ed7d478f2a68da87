//! REST list envelope decoding
//!
//! List endpoints answer either with a paginated object
//! (`{"count": .., "next": .., "previous": .., "results": [..]}`) or with a
//! bare array. [`decode_envelope`] normalizes both into a [`ListEnvelope`].
//!
//! Items stay as raw JSON values here so a single bad item can be rejected
//! on its own by the caller instead of failing the whole response.

use crate::cli::DecodeMode;
use crate::types::LedgerError;
use serde::Deserialize;
use serde_json::Value;

/// Paginated list response
#[derive(Debug, Deserialize)]
struct Page {
    results: Vec<Value>,
    #[serde(default)]
    count: Option<u64>,
    #[serde(default)]
    next: Option<String>,
    #[serde(default)]
    previous: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListResponse {
    Paginated(Page),
    Flat(Vec<Value>),
}

/// Normalized list response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListEnvelope {
    pub items: Vec<Value>,
    /// Server-side total, when the response was paginated
    pub count: Option<u64>,
    pub next: Option<String>,
    pub previous: Option<String>,
}

impl ListEnvelope {
    /// Whether the server reported more pages than this response holds
    pub fn is_partial(&self) -> bool {
        self.next.is_some()
            || self
                .count
                .is_some_and(|count| count > self.items.len() as u64)
    }
}

impl From<ListResponse> for ListEnvelope {
    fn from(response: ListResponse) -> Self {
        match response {
            ListResponse::Paginated(page) => ListEnvelope {
                items: page.results,
                count: page.count,
                next: page.next,
                previous: page.previous,
            },
            ListResponse::Flat(items) => ListEnvelope {
                items,
                ..Default::default()
            },
        }
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(map) if map.contains_key("results") => {
            "an object whose 'results' is not an array"
        }
        Value::Object(_) => "an object without 'results'",
    }
}

/// Decode a list response
///
/// Malformed JSON is always an error. A well-formed document of the wrong
/// shape is an error in `Strict` mode and an empty list (logged at `warn`)
/// in `Lenient` mode.
pub fn decode_envelope(bytes: &[u8], mode: DecodeMode) -> Result<ListEnvelope, LedgerError> {
    let value: Value = serde_json::from_slice(bytes)?;
    let shape = describe(&value);

    match serde_json::from_value::<ListResponse>(value) {
        Ok(response) => {
            let envelope = ListEnvelope::from(response);
            if envelope.is_partial() {
                tracing::warn!(
                    items = envelope.items.len(),
                    count = ?envelope.count,
                    previous = ?envelope.previous,
                    "List response is one page of several, only this page is used"
                );
            }
            Ok(envelope)
        }
        Err(_) => match mode {
            DecodeMode::Strict => Err(LedgerError::unexpected_shape(&format!(
                "expected a list or a paginated object, found {}",
                shape
            ))),
            DecodeMode::Lenient => {
                tracing::warn!("Unexpected list response ({}), treating as empty", shape);
                Ok(ListEnvelope::default())
            }
        },
    }
}
