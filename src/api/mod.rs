//! HTTP request handlers, one module per resource.

pub mod reviews;
pub mod services;
pub mod session;
pub mod stats;

use serde::Serialize;
use serde_json::{Map, Value};

/// Body returned by update and delete operations.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable outcome of the operation.
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// True when `field` is present in `doc` as a non-empty string.
fn non_empty_text(doc: &Map<String, Value>, field: &str) -> bool {
    doc.get(field)
        .and_then(Value::as_str)
        .is_some_and(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn non_empty_text_requires_a_present_non_empty_string() {
        let doc = json!({
            "title": "Plumbing",
            "empty": "",
            "number": 7,
        });
        let doc = doc.as_object().unwrap();

        assert!(non_empty_text(doc, "title"));
        assert!(!non_empty_text(doc, "empty"));
        assert!(!non_empty_text(doc, "number"));
        assert!(!non_empty_text(doc, "missing"));
    }
}
