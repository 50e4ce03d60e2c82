//! Application state - shared across all handlers.

use std::sync::Arc;

use tokio::sync::RwLock;

use myco_core::blog::BlogListing;
use myco_core::catalog::RecipeCatalog;
use myco_core::feed::BlogFeed;
use myco_core::ports::{AdminPolicy, DocumentStore};
use myco_infra::InMemoryDocumentStore;
use myco_infra::database::DatabaseConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Submissions and moderation take the write lock, so they serialize.
    pub catalog: Arc<RwLock<RecipeCatalog>>,
    pub blog: BlogListing,
    /// One feed per viewing context, so a public refresh never supersedes
    /// an admin one or the reverse.
    public_feed: Arc<BlogFeed>,
    admin_feed: Arc<BlogFeed>,
    pub admin_policy: Arc<dyn AdminPolicy>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>, admin_policy: Arc<dyn AdminPolicy>) -> Self {
        let store = Self::document_store(db_config).await;
        let state = Self::with_store(store, admin_policy, RecipeCatalog::with_defaults());

        tracing::info!("Application state initialized");
        state
    }

    pub fn with_store(
        store: Arc<dyn DocumentStore>,
        admin_policy: Arc<dyn AdminPolicy>,
        catalog: RecipeCatalog,
    ) -> Self {
        Self {
            catalog: Arc::new(RwLock::new(catalog)),
            blog: BlogListing::new(store),
            public_feed: Arc::new(BlogFeed::new()),
            admin_feed: Arc::new(BlogFeed::new()),
            admin_policy,
        }
    }

    pub fn feed(&self, is_admin: bool) -> &BlogFeed {
        if is_admin {
            &self.admin_feed
        } else {
            &self.public_feed
        }
    }

    #[cfg(feature = "postgres")]
    async fn document_store(db_config: Option<&DatabaseConfig>) -> Arc<dyn DocumentStore> {
        use myco_infra::{DatabaseConnections, PostgresBlogStore};

        let Some(config) = db_config else {
            tracing::warn!("DATABASE_URL not set. Serving the blog from the in-memory store.");
            return Arc::new(InMemoryDocumentStore::new());
        };

        match DatabaseConnections::init(config).await {
            Ok(connections) => Arc::new(PostgresBlogStore::new(connections.main)),
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                Arc::new(InMemoryDocumentStore::new())
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn document_store(_db_config: Option<&DatabaseConfig>) -> Arc<dyn DocumentStore> {
        tracing::info!("Running without postgres feature - using in-memory document store");
        Arc::new(InMemoryDocumentStore::new())
    }
}
