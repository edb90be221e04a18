//! Brand repository.

use chrono::{DateTime, Utc};
use gearshop_core::{BrandId, messages};
use sqlx::PgPool;

use super::{RepositoryError, Result};
use crate::models::brand::{Brand, CreateBrandRequest, UpdateBrandRequest};

#[derive(Debug, sqlx::FromRow)]
struct BrandRow {
    id: BrandId,
    name: String,
    slug: String,
    logo_url: Option<String>,
    description: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl From<BrandRow> for Brand {
    fn from(row: BrandRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            slug: row.slug,
            logo_url: row.logo_url,
            description: row.description,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

const COLUMNS: &str = "id, name, slug, logo_url, description, is_active, created_at";

pub struct BrandRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BrandRepository<'a> {
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All brands. The storefront filters to `is_active` client-side so the
    /// admin listing can reuse this.
    pub async fn list(&self, include_inactive: bool) -> Result<Vec<Brand>> {
        let rows = if include_inactive {
            sqlx::query_as::<_, BrandRow>(&format!(
                "SELECT {COLUMNS} FROM brands ORDER BY name"
            ))
            .fetch_all(self.pool)
            .await?
        } else {
            sqlx::query_as::<_, BrandRow>(&format!(
                "SELECT {COLUMNS} FROM brands WHERE is_active ORDER BY name"
            ))
            .fetch_all(self.pool)
            .await?
        };
        Ok(rows.into_iter().map(Brand::from).collect())
    }

    pub async fn find(&self, id: BrandId) -> Result<Brand> {
        let row = sqlx::query_as::<_, BrandRow>(&format!(
            "SELECT {COLUMNS} FROM brands WHERE id = $1"
        ))
        .bind(id)
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::from_sqlx)?;
        Ok(row.into())
    }

    pub async fn create(&self, req: &CreateBrandRequest) -> Result<Brand> {
        let row = sqlx::query_as::<_, BrandRow>(&format!(
            "INSERT INTO brands (name, slug, logo_url, description)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        ))
        .bind(&req.name)
        .bind(&req.slug)
        .bind(&req.logo_url)
        .bind(&req.description)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            RepositoryError::conflict_on_unique(e, "brands_slug_key", messages::SLUG_TAKEN)
        })?;
        Ok(row.into())
    }

    pub async fn update(&self, id: BrandId, req: &UpdateBrandRequest) -> Result<Brand> {
        let row = sqlx::query_as::<_, BrandRow>(&format!(
            "UPDATE brands SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                logo_url = COALESCE($4, logo_url),
                description = COALESCE($5, description),
                is_active = COALESCE($6, is_active),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&req.name)
        .bind(&req.slug)
        .bind(&req.logo_url)
        .bind(&req.description)
        .bind(req.is_active)
        .fetch_one(self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => RepositoryError::NotFound,
            other => RepositoryError::conflict_on_unique(
                other,
                "brands_slug_key",
                messages::SLUG_TAKEN,
            ),
        })?;
        Ok(row.into())
    }

    /// Delete a brand. Fails with a conflict while products still
    /// reference it.
    pub async fn delete(&self, id: BrandId) -> Result<()> {
        let in_use: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE brand_id = $1)")
                .bind(id)
                .fetch_one(self.pool)
                .await?;
        if in_use {
            return Err(RepositoryError::Conflict(messages::BRAND_IN_USE.to_string()));
        }

        let result = sqlx::query("DELETE FROM brands WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
