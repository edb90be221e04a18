//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use crate::config::ApiConfig;
use crate::models::category::CategoryNode;

/// How long the assembled category tree may be served from cache.
const CATEGORY_TREE_TTL: Duration = Duration::from_secs(60);

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the database pool and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: PgPool,
    category_tree: Cache<&'static str, Arc<Vec<CategoryNode>>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ApiConfig, pool: PgPool) -> Self {
        let category_tree = Cache::builder()
            .max_capacity(1)
            .time_to_live(CATEGORY_TREE_TTL)
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                category_tree,
            }),
        }
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get the cached category tree, if still fresh.
    pub async fn cached_category_tree(&self) -> Option<Arc<Vec<CategoryNode>>> {
        self.inner.category_tree.get("tree").await
    }

    /// Store a freshly assembled category tree.
    pub async fn store_category_tree(&self, tree: Arc<Vec<CategoryNode>>) {
        self.inner.category_tree.insert("tree", tree).await;
    }

    /// Drop the cached tree after a category mutation.
    pub async fn invalidate_category_tree(&self) {
        self.inner.category_tree.invalidate("tree").await;
    }
}
