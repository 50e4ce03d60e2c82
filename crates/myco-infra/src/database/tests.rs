#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase};

    use myco_core::blog::{BlogListing, listing_query};
    use myco_core::error::StoreError;
    use myco_core::ports::{DocumentQuery, DocumentStore, FieldValue};

    use crate::database::PostgresBlogStore;
    use crate::database::entity::blog_post;

    fn row(id: &str, published: bool, day: u32) -> blog_post::Model {
        let ts = Utc.with_ymd_and_hms(2024, 6, day, 9, 30, 0).unwrap();
        blog_post::Model {
            id: id.to_owned(),
            title: format!("Post {id}"),
            excerpt: None,
            content: "Content".to_owned(),
            author: Some("MushRoomService".to_owned()),
            tags: Some(serde_json::json!(["oyster", "grow-log"])),
            is_published: published,
            created_at: Some(ts.into()),
            updated_at: Some(ts.into()),
            published_at: published.then(|| ts.into()),
        }
    }

    #[tokio::test]
    async fn test_public_query_filters_and_orders() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row("b", true, 2), row("a", true, 1)]])
            .into_connection();
        let store = PostgresBlogStore::new(db);

        let docs = store.query(&listing_query(false)).await.unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id, "b");
        assert_eq!(docs[0].get("is_published"), Some(&FieldValue::Bool(true)));

        let log = format!("{:?}", store.db.into_transaction_log());
        assert!(log.contains("is_published"));
        assert!(log.contains("WHERE"));
        assert!(log.contains("DESC"));
    }

    #[tokio::test]
    async fn test_admin_query_has_no_where_clause() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row("draft", false, 3)]])
            .into_connection();
        let store = PostgresBlogStore::new(db);

        let docs = store.query(&listing_query(true)).await.unwrap();

        assert_eq!(docs.len(), 1);
        let log = format!("{:?}", store.db.into_transaction_log());
        assert!(!log.contains("WHERE"));
    }

    #[tokio::test]
    async fn test_rows_normalize_through_listing() {
        let mut undated = row("undated", false, 1);
        undated.created_at = None;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row("live", true, 5), undated]])
            .into_connection();
        let listing = BlogListing::new(std::sync::Arc::new(PostgresBlogStore::new(db)));

        let posts = listing.fetch(true).await.unwrap();

        assert_eq!(posts[0].created_at, "2024-06-05T09:30:00.000Z");
        assert_eq!(
            posts[0].published_at.as_deref(),
            Some("2024-06-05T09:30:00.000Z")
        );
        assert_eq!(posts[0].content["tags"], serde_json::json!(["oyster", "grow-log"]));
        assert_eq!(posts[1].published_at, None);
        assert!(!posts[1].created_at.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_collection_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let store = PostgresBlogStore::new(db);

        let result = store.query(&DocumentQuery::collection("recipes")).await;

        assert!(matches!(result, Err(StoreError::Unsupported(_))));
    }

    #[tokio::test]
    async fn test_unsupported_filter_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let store = PostgresBlogStore::new(db);
        let query = DocumentQuery::collection("blog_posts").where_eq("title", "Hello");

        let result = store.query(&query).await;

        assert!(matches!(result, Err(StoreError::Unsupported(_))));
    }
}
