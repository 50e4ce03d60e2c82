//! In-memory document store - used when no database is configured.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use myco_core::error::StoreError;
use myco_core::ports::{DocumentQuery, DocumentStore, FieldValue, SortDirection, StoredDocument};

/// Collections of documents kept in a HashMap behind an async RwLock.
///
/// Note: Data is lost on process restart.
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<StoredDocument>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// Insert or replace a document by id.
    pub async fn put(&self, collection: &str, doc: StoredDocument) {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();

        match docs.iter_mut().find(|d| d.id == doc.id) {
            Some(existing) => *existing = doc,
            None => docs.push(doc),
        }
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Type order used when a field holds values of different kinds.
fn kind_rank(value: &FieldValue) -> u8 {
    match value {
        FieldValue::Null => 0,
        FieldValue::Bool(_) => 1,
        FieldValue::Integer(_) | FieldValue::Double(_) => 2,
        FieldValue::Timestamp(_) => 3,
        FieldValue::String(_) => 4,
        FieldValue::Array(_) => 5,
        FieldValue::Map(_) => 6,
    }
}

fn compare_values(a: &FieldValue, b: &FieldValue) -> Ordering {
    match (a, b) {
        (FieldValue::Bool(x), FieldValue::Bool(y)) => x.cmp(y),
        (FieldValue::Integer(x), FieldValue::Integer(y)) => x.cmp(y),
        (FieldValue::Integer(x), FieldValue::Double(y)) => (*x as f64).total_cmp(y),
        (FieldValue::Double(x), FieldValue::Integer(y)) => x.total_cmp(&(*y as f64)),
        (FieldValue::Double(x), FieldValue::Double(y)) => x.total_cmp(y),
        (FieldValue::Timestamp(x), FieldValue::Timestamp(y)) => x.cmp(y),
        (FieldValue::String(x), FieldValue::String(y)) => x.cmp(y),
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

/// Missing fields sort last whichever the direction.
fn compare_field(a: Option<&FieldValue>, b: Option<&FieldValue>, dir: SortDirection) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => match dir {
            SortDirection::Ascending => compare_values(x, y),
            SortDirection::Descending => compare_values(y, x),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn query(&self, query: &DocumentQuery) -> Result<Vec<StoredDocument>, StoreError> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(&query.collection) else {
            return Ok(Vec::new());
        };

        let mut matched: Vec<StoredDocument> = docs
            .iter()
            .filter(|doc| {
                query
                    .filters
                    .iter()
                    .all(|f| doc.get(&f.field) == Some(&f.equals))
            })
            .cloned()
            .collect();

        if let Some(order) = &query.order_by {
            // Stable, so ties keep insertion order.
            matched.sort_by(|a, b| {
                compare_field(a.get(&order.field), b.get(&order.field), order.direction)
            });
        }

        Ok(matched)
    }
}
