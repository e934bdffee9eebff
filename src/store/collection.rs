//! Operations on a single named collection.

use serde_json::Value;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::AppError;

use super::document::{DeleteResult, Document, DocumentId, InsertResult, UpdateResult, ID_FIELD};

/// Handle to one collection. Cheap to clone; every operation goes through the
/// shared connection pool.
#[derive(Debug, Clone)]
pub struct Collection {
    pool: SqlitePool,
    name: &'static str,
}

impl Collection {
    pub(super) fn new(pool: SqlitePool, name: &'static str) -> Self {
        Self { pool, name }
    }

    /// Insert a document, assigning and embedding a fresh identifier.
    pub async fn insert_one(&self, mut doc: Document) -> Result<InsertResult, AppError> {
        let id = DocumentId::generate();
        doc.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
        let raw = serialize_document(&doc)?;

        let sql = format!("INSERT INTO {} (id, doc) VALUES (?, ?)", self.name);
        sqlx::query(&sql)
            .bind(id.to_string())
            .bind(raw)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("insert into {} failed: {}", self.name, e))
            })?;

        debug!(collection = self.name, %id, "inserted document");
        Ok(InsertResult {
            acknowledged: true,
            inserted_id: id,
        })
    }

    /// Fetch a single document by identifier.
    pub async fn find_by_id(&self, id: DocumentId) -> Result<Option<Document>, AppError> {
        let sql = format!("SELECT doc FROM {} WHERE id = ?", self.name);
        let raw: Option<String> = sqlx::query_scalar(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("lookup in {} failed: {}", self.name, e))
            })?;

        raw.as_deref().map(parse_document).transpose()
    }

    /// List documents in insertion order, truncated to `limit` when given.
    pub async fn find_all(&self, limit: Option<u32>) -> Result<Vec<Document>, AppError> {
        let sql = format!("SELECT doc FROM {} ORDER BY rowid LIMIT ?", self.name);
        let rows: Vec<String> = sqlx::query_scalar(&sql)
            // SQLite treats a negative LIMIT as "no limit".
            .bind(limit.map_or(-1_i64, i64::from))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("listing {} failed: {}", self.name, e))
            })?;

        rows.iter().map(|raw| parse_document(raw)).collect()
    }

    /// List documents whose top-level `field` equals the string `value`, in
    /// insertion order.
    pub async fn find_by_field(&self, field: &str, value: &str) -> Result<Vec<Document>, AppError> {
        let sql = format!(
            "SELECT doc FROM {} WHERE json_extract(doc, ?) = ? ORDER BY rowid",
            self.name
        );
        let rows: Vec<String> = sqlx::query_scalar(&sql)
            .bind(format!("$.{field}"))
            .bind(value)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("field query on {} failed: {}", self.name, e))
            })?;

        rows.iter().map(|raw| parse_document(raw)).collect()
    }

    /// Merge the top-level fields of `patch` into the matched document,
    /// leaving fields absent from the patch untouched.
    ///
    /// Read-merge-write: concurrent updates to the same document race and the
    /// last write wins. The identifier field is immutable and skipped if the
    /// patch carries one.
    pub async fn update_one(
        &self,
        id: DocumentId,
        patch: Document,
    ) -> Result<UpdateResult, AppError> {
        let Some(mut doc) = self.find_by_id(id).await? else {
            return Ok(UpdateResult { matched_count: 0 });
        };

        for (key, value) in patch {
            if key == ID_FIELD {
                continue;
            }
            doc.insert(key, value);
        }
        let raw = serialize_document(&doc)?;

        let sql = format!("UPDATE {} SET doc = ? WHERE id = ?", self.name);
        sqlx::query(&sql)
            .bind(raw)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("update in {} failed: {}", self.name, e))
            })?;

        debug!(collection = self.name, %id, "updated document");
        Ok(UpdateResult { matched_count: 1 })
    }

    /// Delete the matched document, reporting how many rows went away.
    pub async fn delete_one(&self, id: DocumentId) -> Result<DeleteResult, AppError> {
        let sql = format!("DELETE FROM {} WHERE id = ?", self.name);
        let result = sqlx::query(&sql)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("delete in {} failed: {}", self.name, e))
            })?;

        debug!(
            collection = self.name,
            %id,
            deleted = result.rows_affected(),
            "delete executed"
        );
        Ok(DeleteResult {
            deleted_count: result.rows_affected(),
        })
    }

    /// Count every document in the collection.
    pub async fn count(&self) -> Result<u64, AppError> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.name);
        let count: i64 = sqlx::query_scalar(&sql)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("count of {} failed: {}", self.name, e))
            })?;
        Ok(count as u64)
    }
}

fn serialize_document(doc: &Document) -> Result<String, AppError> {
    serde_json::to_string(doc)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to serialize document: {e}")))
}

fn parse_document(raw: &str) -> Result<Document, AppError> {
    serde_json::from_str(raw)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("stored document is not valid JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::super::testing::temp_store;
    use super::*;

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().expect("test document is an object").clone()
    }

    #[tokio::test]
    async fn insert_assigns_id_and_find_by_id_returns_the_document() {
        let (store, _dir) = temp_store().await;
        let services = store.services();

        let ack = services
            .insert_one(doc(json!({ "serviceTitle": "Plumbing", "price": 49.5 })))
            .await
            .unwrap();
        assert!(ack.acknowledged);

        let found = services.find_by_id(ack.inserted_id).await.unwrap().unwrap();
        assert_eq!(found["serviceTitle"], json!("Plumbing"));
        assert_eq!(found["price"], json!(49.5));
        assert_eq!(found[ID_FIELD], json!(ack.inserted_id.to_string()));
    }

    #[tokio::test]
    async fn find_by_id_returns_none_for_absent_documents() {
        let (store, _dir) = temp_store().await;
        let found = store
            .services()
            .find_by_id(DocumentId::generate())
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn find_all_preserves_insertion_order_and_honors_the_limit() {
        let (store, _dir) = temp_store().await;
        let services = store.services();

        for index in 0..4 {
            services
                .insert_one(doc(json!({ "serviceTitle": format!("S{index}") })))
                .await
                .unwrap();
        }

        let all = services.find_all(None).await.unwrap();
        let titles: Vec<_> = all.iter().map(|d| d["serviceTitle"].clone()).collect();
        assert_eq!(titles, vec![json!("S0"), json!("S1"), json!("S2"), json!("S3")]);

        let capped = services.find_all(Some(2)).await.unwrap();
        assert_eq!(capped.len(), 2);
        assert_eq!(capped[0]["serviceTitle"], json!("S0"));
        assert_eq!(capped[1]["serviceTitle"], json!("S1"));
    }

    #[tokio::test]
    async fn find_by_field_matches_exact_string_values() {
        let (store, _dir) = temp_store().await;
        let reviews = store.reviews();

        reviews
            .insert_one(doc(json!({ "serviceId": "abc", "text": "first" })))
            .await
            .unwrap();
        reviews
            .insert_one(doc(json!({ "serviceId": "xyz", "text": "other" })))
            .await
            .unwrap();
        reviews
            .insert_one(doc(json!({ "serviceId": "abc", "text": "second" })))
            .await
            .unwrap();

        let matched = reviews.find_by_field("serviceId", "abc").await.unwrap();
        assert_eq!(matched.len(), 2);
        assert_eq!(matched[0]["text"], json!("first"));
        assert_eq!(matched[1]["text"], json!("second"));

        let none = reviews.find_by_field("serviceId", "missing").await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn update_merges_fields_and_keeps_the_identifier() {
        let (store, _dir) = temp_store().await;
        let services = store.services();

        let ack = services
            .insert_one(doc(json!({ "serviceTitle": "Old", "area": "north" })))
            .await
            .unwrap();

        let outcome = services
            .update_one(
                ack.inserted_id,
                doc(json!({ "serviceTitle": "New", "_id": "forged" })),
            )
            .await
            .unwrap();
        assert_eq!(outcome.matched_count, 1);

        let updated = services.find_by_id(ack.inserted_id).await.unwrap().unwrap();
        assert_eq!(updated["serviceTitle"], json!("New"));
        assert_eq!(updated["area"], json!("north"));
        assert_eq!(updated[ID_FIELD], json!(ack.inserted_id.to_string()));
    }

    #[tokio::test]
    async fn update_reports_a_match_even_when_nothing_changes() {
        let (store, _dir) = temp_store().await;
        let services = store.services();

        let ack = services
            .insert_one(doc(json!({ "serviceTitle": "Same" })))
            .await
            .unwrap();

        let outcome = services
            .update_one(ack.inserted_id, doc(json!({ "serviceTitle": "Same" })))
            .await
            .unwrap();
        assert_eq!(outcome.matched_count, 1);
    }

    #[tokio::test]
    async fn update_of_an_absent_document_matches_nothing() {
        let (store, _dir) = temp_store().await;
        let outcome = store
            .services()
            .update_one(DocumentId::generate(), doc(json!({ "x": 1 })))
            .await
            .unwrap();
        assert_eq!(outcome.matched_count, 0);
    }

    #[tokio::test]
    async fn delete_removes_exactly_the_addressed_document() {
        let (store, _dir) = temp_store().await;
        let services = store.services();

        let first = services
            .insert_one(doc(json!({ "serviceTitle": "keep" })))
            .await
            .unwrap();
        let second = services
            .insert_one(doc(json!({ "serviceTitle": "drop" })))
            .await
            .unwrap();

        let outcome = services.delete_one(second.inserted_id).await.unwrap();
        assert_eq!(outcome.deleted_count, 1);
        assert!(services.find_by_id(second.inserted_id).await.unwrap().is_none());
        assert!(services.find_by_id(first.inserted_id).await.unwrap().is_some());

        let again = services.delete_one(second.inserted_id).await.unwrap();
        assert_eq!(again.deleted_count, 0);
    }

    #[tokio::test]
    async fn count_tracks_inserts_and_deletes() {
        let (store, _dir) = temp_store().await;
        let users = store.users();

        assert_eq!(users.count().await.unwrap(), 0);
        let ack = users
            .insert_one(doc(json!({ "email": "a@example.com" })))
            .await
            .unwrap();
        assert_eq!(users.count().await.unwrap(), 1);
        users.delete_one(ack.inserted_id).await.unwrap();
        assert_eq!(users.count().await.unwrap(), 0);
    }
}
