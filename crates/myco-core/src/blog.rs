//! Blog listing - the read query behind the public blog page.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Map;

use crate::domain::BlogPost;
use crate::error::StoreError;
use crate::ports::{DocumentQuery, DocumentStore, FieldValue, SortDirection, StoredDocument};

pub const BLOG_COLLECTION: &str = "blog_posts";

const IS_PUBLISHED: &str = "is_published";
const CREATED_AT: &str = "created_at";
const UPDATED_AT: &str = "updated_at";
const PUBLISHED_AT: &str = "published_at";

/// Blog listing failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BlogError {
    /// Shown to the viewer as-is.
    #[error("{0}")]
    Query(String),
}

impl From<StoreError> for BlogError {
    fn from(err: StoreError) -> Self {
        BlogError::Query(format!("Failed to load blog posts: {err}"))
    }
}

/// Query for the posts a viewer may see, newest first.
///
/// Admins get no publication filter at all.
pub fn listing_query(is_admin: bool) -> DocumentQuery {
    let query = DocumentQuery::collection(BLOG_COLLECTION);
    let query = if is_admin {
        query
    } else {
        query.where_eq(IS_PUBLISHED, true)
    };
    query.order_by(CREATED_AT, SortDirection::Descending)
}

fn iso(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Turn a stored document into a `BlogPost`.
///
/// `created_at`/`updated_at` that are not native timestamps fall back to
/// `now`; this is lossy. `published_at` falls back to `None`.
pub fn normalize(doc: StoredDocument, now: DateTime<Utc>) -> BlogPost {
    let StoredDocument { id, mut fields } = doc;

    let mut required_timestamp = |name: &str| match fields.remove(name) {
        Some(FieldValue::Timestamp(ts)) => iso(ts),
        other => {
            tracing::warn!(
                post_id = %id,
                field = name,
                stored = ?other,
                "Blog post timestamp is not a native timestamp, substituting current time"
            );
            iso(now)
        }
    };
    let created_at = required_timestamp(CREATED_AT);
    let updated_at = required_timestamp(UPDATED_AT);

    let published_at = fields
        .remove(PUBLISHED_AT)
        .and_then(|v| v.as_timestamp())
        .map(iso);
    let is_published = fields
        .remove(IS_PUBLISHED)
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    fields.remove("id");

    let content: Map<String, serde_json::Value> = fields
        .into_iter()
        .map(|(name, value)| (name, value.to_json()))
        .collect();

    BlogPost {
        id,
        is_published,
        created_at,
        updated_at,
        published_at,
        content,
    }
}

/// Runs the blog listing query against a document store.
#[derive(Clone)]
pub struct BlogListing {
    store: Arc<dyn DocumentStore>,
}

impl BlogListing {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn fetch(&self, is_admin: bool) -> Result<Vec<BlogPost>, BlogError> {
        let query = listing_query(is_admin);
        let documents = self.store.query(&query).await.map_err(|e| {
            tracing::error!(error = %e, is_admin, "Blog listing query failed");
            BlogError::from(e)
        })?;

        let now = Utc::now();
        let posts: Vec<BlogPost> = documents
            .into_iter()
            .map(|doc| normalize(doc, now))
            .collect();

        tracing::debug!(count = posts.len(), is_admin, "Blog posts loaded");
        Ok(posts)
    }
}
