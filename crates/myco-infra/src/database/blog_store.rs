//! PostgreSQL-backed `blog_posts` collection.

use async_trait::async_trait;
use sea_orm::sea_query::NullOrdering;
use sea_orm::{ColumnTrait, DbConn, EntityTrait, Order, QueryFilter, QueryOrder, Select};

use myco_core::blog::BLOG_COLLECTION;
use myco_core::error::StoreError;
use myco_core::ports::{DocumentQuery, DocumentStore, FieldValue, SortDirection, StoredDocument};

use super::entity::blog_post::{Column, Entity as BlogPostEntity};

/// Serves the blog collection out of the `blog_posts` table.
///
/// Only the filters and sort keys the site uses are translated; anything
/// else is rejected rather than silently ignored.
pub struct PostgresBlogStore {
    pub(crate) db: DbConn,
}

impl PostgresBlogStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

fn sort_column(field: &str) -> Result<Column, StoreError> {
    match field {
        "created_at" => Ok(Column::CreatedAt),
        "updated_at" => Ok(Column::UpdatedAt),
        "published_at" => Ok(Column::PublishedAt),
        "title" => Ok(Column::Title),
        other => Err(StoreError::Unsupported(format!("cannot order by '{other}'"))),
    }
}

fn build_select(query: &DocumentQuery) -> Result<Select<BlogPostEntity>, StoreError> {
    if query.collection != BLOG_COLLECTION {
        return Err(StoreError::Unsupported(format!(
            "unknown collection '{}'",
            query.collection
        )));
    }

    let mut select = BlogPostEntity::find();

    for filter in &query.filters {
        select = match (filter.field.as_str(), &filter.equals) {
            ("is_published", FieldValue::Bool(published)) => {
                select.filter(Column::IsPublished.eq(*published))
            }
            ("id", FieldValue::String(id)) => select.filter(Column::Id.eq(id.clone())),
            ("author", FieldValue::String(author)) => {
                select.filter(Column::Author.eq(author.clone()))
            }
            (field, value) => {
                return Err(StoreError::Unsupported(format!(
                    "cannot filter '{field}' by {value:?}"
                )));
            }
        };
    }

    if let Some(order) = &query.order_by {
        let direction = match order.direction {
            SortDirection::Ascending => Order::Asc,
            SortDirection::Descending => Order::Desc,
        };
        select = select.order_by_with_nulls(sort_column(&order.field)?, direction, NullOrdering::Last);
    }

    Ok(select)
}

#[async_trait]
impl DocumentStore for PostgresBlogStore {
    async fn query(&self, query: &DocumentQuery) -> Result<Vec<StoredDocument>, StoreError> {
        let select = build_select(query)?;

        let rows = select
            .all(&self.db)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        tracing::debug!(collection = %query.collection, rows = rows.len(), "Blog query executed");
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
