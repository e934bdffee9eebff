//! Document and identifier types shared by all collections.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::AppError;

/// Field under which the store writes the generated identifier into each
/// inserted document.
pub const ID_FIELD: &str = "_id";

/// A schemaless document: whatever JSON object the client sent, stored
/// verbatim apart from the injected [`ID_FIELD`].
pub type Document = Map<String, Value>;

/// Identifier the store assigns to a document on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier received from a client.
    ///
    /// Malformed input is reported as an internal error, not an input error;
    /// the routes taking an id segment promise a 500 for garbage ids.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("malformed document id {raw:?}: {e}")))
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Acknowledgment for a successful insert, serialized straight into the
/// creation response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertResult {
    /// Whether the store accepted the write.
    pub acknowledged: bool,
    /// Identifier assigned to the new document.
    pub inserted_id: DocumentId,
}

/// Outcome of an update by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateResult {
    /// How many documents the identifier matched (zero or one).
    pub matched_count: u64,
}

/// Outcome of a delete by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteResult {
    /// How many documents were removed (zero or one).
    pub deleted_count: u64,
}
