//! Category repository.
//!
//! Categories form a self-referential hierarchy. The repository returns
//! flat lists; `models::category::build_tree` assembles the nested view.

use chrono::{DateTime, Utc};
use gearshop_core::{CategoryId, messages};
use sqlx::PgPool;

use super::{RepositoryError, Result};
use crate::models::category::{Category, CreateCategoryRequest, UpdateCategoryRequest};

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: CategoryId,
    name: String,
    slug: String,
    parent_id: Option<CategoryId>,
    sort_order: i32,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            slug: row.slug,
            parent_id: row.parent_id,
            sort_order: row.sort_order,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

const COLUMNS: &str = "id, name, slug, parent_id, sort_order, is_active, created_at";

pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, include_inactive: bool) -> Result<Vec<Category>> {
        let sql = if include_inactive {
            format!("SELECT {COLUMNS} FROM categories ORDER BY sort_order, id")
        } else {
            format!("SELECT {COLUMNS} FROM categories WHERE is_active ORDER BY sort_order, id")
        };
        let rows = sqlx::query_as::<_, CategoryRow>(&sql)
            .fetch_all(self.pool)
            .await?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    pub async fn find(&self, id: CategoryId) -> Result<Category> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {COLUMNS} FROM categories WHERE id = $1"
        ))
        .bind(id)
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::from_sqlx)?;
        Ok(row.into())
    }

    /// Whether a category row exists at all.
    pub async fn exists(&self, id: CategoryId) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
                .bind(id)
                .fetch_one(self.pool)
                .await?;
        Ok(exists)
    }

    pub async fn create(&self, req: &CreateCategoryRequest) -> Result<Category> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "INSERT INTO categories (name, slug, parent_id, sort_order)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        ))
        .bind(&req.name)
        .bind(&req.slug)
        .bind(req.parent_id)
        .bind(req.sort_order.unwrap_or(0))
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            RepositoryError::conflict_on_unique(e, "categories_slug_key", messages::SLUG_TAKEN)
        })?;
        Ok(row.into())
    }

    pub async fn update(&self, id: CategoryId, req: &UpdateCategoryRequest) -> Result<Category> {
        // parent_id uses a sentinel pair because "set to NULL" and "leave
        // unchanged" are different updates.
        let (set_parent, parent_value) = match req.parent_id {
            Some(value) => (true, value),
            None => (false, None),
        };

        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "UPDATE categories SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                parent_id = CASE WHEN $4 THEN $5 ELSE parent_id END,
                sort_order = COALESCE($6, sort_order),
                is_active = COALESCE($7, is_active),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&req.name)
        .bind(&req.slug)
        .bind(set_parent)
        .bind(parent_value)
        .bind(req.sort_order)
        .bind(req.is_active)
        .fetch_one(self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => RepositoryError::NotFound,
            other => RepositoryError::conflict_on_unique(
                other,
                "categories_slug_key",
                messages::SLUG_TAKEN,
            ),
        })?;
        Ok(row.into())
    }

    /// Delete a category. Refused while children or products reference it.
    pub async fn delete(&self, id: CategoryId) -> Result<()> {
        let has_children: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE parent_id = $1)")
                .bind(id)
                .fetch_one(self.pool)
                .await?;
        if has_children {
            return Err(RepositoryError::Conflict(
                messages::CATEGORY_HAS_CHILDREN.to_string(),
            ));
        }

        let in_use: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE category_id = $1)")
                .bind(id)
                .fetch_one(self.pool)
                .await?;
        if in_use {
            return Err(RepositoryError::Conflict(
                messages::CATEGORY_IN_USE.to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// IDs on the path from `id` up to the root, `id` included. Used to
    /// reject a parent change that would create a cycle.
    pub async fn ancestor_ids(&self, id: CategoryId) -> Result<Vec<CategoryId>> {
        let ids: Vec<CategoryId> = sqlx::query_scalar(
            "WITH RECURSIVE ancestors AS (
                 SELECT id, parent_id FROM categories WHERE id = $1
                 UNION ALL
                 SELECT c.id, c.parent_id
                 FROM categories c
                 JOIN ancestors a ON c.id = a.parent_id
             )
             SELECT id FROM ancestors",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;
        Ok(ids)
    }

    /// IDs of `id` and every descendant. Product listings filtered by a
    /// parent category include products filed under its children.
    pub async fn subtree_ids(&self, id: CategoryId) -> Result<Vec<CategoryId>> {
        let ids: Vec<CategoryId> = sqlx::query_scalar(
            "WITH RECURSIVE subtree AS (
                 SELECT id FROM categories WHERE id = $1
                 UNION ALL
                 SELECT c.id
                 FROM categories c
                 JOIN subtree s ON c.parent_id = s.id
             )
             SELECT id FROM subtree",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;
        Ok(ids)
    }
}
